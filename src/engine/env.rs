//! Lexical environments.
//!
//! An environment is an ordered mapping from symbolic names to values plus
//! an optional parent. `lookup` and `assign` walk outward through parents
//! until found or exhausted; `define` always hits the current frame. A frame
//! is created per operation activation and lives exactly as long as
//! something (a closure, a continuation) holds a handle to it.
//!
//! Cloning an `Environment` clones the handle, not the frame, so closures
//! and continuations share frames; mutation through one handle is visible
//! to every holder. Access is single-threaded by design, hence `Rc/RefCell`
//! instead of locking.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::error::{Result, SchemeError};
use super::value::Value;

struct Frame {
    /// Debug label, usually the name of the operation that was activated.
    label: Rc<str>,
    bindings: HashMap<Rc<str>, Value>,
    parent: Option<Environment>,
}

/// A shared handle to a lexical frame.
#[derive(Clone)]
pub struct Environment {
    frame: Rc<RefCell<Frame>>,
}

impl Environment {
    /// A fresh root frame with no parent.
    pub fn new(label: &str) -> Self {
        Environment {
            frame: Rc::new(RefCell::new(Frame {
                label: Rc::from(label),
                bindings: HashMap::new(),
                parent: None,
            })),
        }
    }

    /// A new child frame whose lookups fall through to `self`.
    pub fn extend(&self, label: &str) -> Environment {
        Environment {
            frame: Rc::new(RefCell::new(Frame {
                label: Rc::from(label),
                bindings: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    pub fn label(&self) -> Rc<str> {
        self.frame.borrow().label.clone()
    }

    /// Creates or overwrites a binding in this frame only.
    pub fn define(&self, name: Rc<str>, value: Value) {
        self.frame.borrow_mut().bindings.insert(name, value);
    }

    /// Walks outward for `name`; unresolved symbols are an error, never a
    /// default value.
    pub fn lookup(&self, name: &str) -> Result<Value> {
        let mut current = self.clone();
        loop {
            let next = {
                let frame = current.frame.borrow();
                if let Some(value) = frame.bindings.get(name) {
                    return Ok(value.clone());
                }
                frame.parent.clone()
            };
            match next {
                Some(parent) => current = parent,
                None => return Err(SchemeError::UnboundSymbol(name.to_string())),
            }
        }
    }

    /// Mutates the nearest existing binding found by the outward walk;
    /// fails if none exists anywhere in the chain.
    pub fn assign(&self, name: &str, value: Value) -> Result<()> {
        let mut current = self.clone();
        loop {
            let next = {
                let mut frame = current.frame.borrow_mut();
                if let Some(slot) = frame.bindings.get_mut(name) {
                    *slot = value;
                    return Ok(());
                }
                frame.parent.clone()
            };
            match next {
                Some(parent) => current = parent,
                None => return Err(SchemeError::AssignUnbound(name.to_string())),
            }
        }
    }

    /// Whether two handles refer to the same frame.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.frame, &other.frame)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let frame = self.frame.borrow();
        f.debug_struct("Environment")
            .field("label", &frame.label)
            .field("bindings", &frame.bindings.len())
            .field("has_parent", &frame.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_lookup_is_an_error() {
        let env = Environment::new("test");
        let err = env.lookup("missing").unwrap_err();
        assert_eq!(err, SchemeError::UnboundSymbol("missing".to_string()));
    }

    #[test]
    fn define_is_local_and_shadows() {
        let outer = Environment::new("outer");
        outer.define(Rc::from("x"), Value::Integer(1));

        let inner = outer.extend("inner");
        inner.define(Rc::from("x"), Value::Integer(2));

        assert!(matches!(inner.lookup("x").unwrap(), Value::Integer(2)));
        assert!(matches!(outer.lookup("x").unwrap(), Value::Integer(1)));
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let outer = Environment::new("outer");
        outer.define(Rc::from("x"), Value::Integer(1));
        let inner = outer.extend("inner").extend("innermost");
        assert!(matches!(inner.lookup("x").unwrap(), Value::Integer(1)));
    }

    #[test]
    fn assign_mutates_nearest_existing_binding() {
        let outer = Environment::new("outer");
        outer.define(Rc::from("x"), Value::Integer(1));
        let inner = outer.extend("inner");

        inner.assign("x", Value::Integer(5)).unwrap();
        assert!(matches!(outer.lookup("x").unwrap(), Value::Integer(5)));
    }

    #[test]
    fn assign_to_unbound_fails_and_creates_nothing() {
        let env = Environment::new("test");
        let err = env.assign("ghost", Value::Integer(1)).unwrap_err();
        assert_eq!(err, SchemeError::AssignUnbound("ghost".to_string()));
        assert!(env.lookup("ghost").is_err());
    }

    #[test]
    fn frames_are_shared_through_handles() {
        let env = Environment::new("shared");
        let alias = env.clone();
        env.define(Rc::from("x"), Value::Integer(1));
        assert!(matches!(alias.lookup("x").unwrap(), Value::Integer(1)));
        assert!(env.ptr_eq(&alias));
    }
}
