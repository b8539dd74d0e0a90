//! The universal tagged value representation.
//!
//! Every language entity is a `Value`. The kind set is closed and known in
//! advance, so dispatch is a single `match` and exhaustiveness is checked by
//! the compiler. Heap-backed kinds (pairs, strings, vectors, operations,
//! continuations) are shared `Rc` handles; cloning a `Value` never copies
//! structure.
//!
//! Values support three increasingly strict equivalences: identity (`eq`),
//! shallow value equivalence (`eqv`), and deep structural equivalence
//! (`equal`), the latter cycle-safe.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use itertools::Itertools;

use super::callcc::Escape;
use super::cons::{self, PairCell};
use super::error::{Result, SchemeError};
use super::operation::Operation;

/// A mutable string cell. Marked constant when it appears inside a quoted
/// literal.
#[derive(Debug)]
pub struct StringCell {
    chars: RefCell<String>,
    constant: Cell<bool>,
}

impl StringCell {
    pub fn new(s: String) -> Self {
        StringCell {
            chars: RefCell::new(s),
            constant: Cell::new(false),
        }
    }

    pub fn get(&self) -> String {
        self.chars.borrow().clone()
    }

    pub fn set(&self, s: String) -> Result<()> {
        if self.constant.get() {
            return Err(SchemeError::ConstantMutation(format!(
                "\"{}\"",
                self.chars.borrow()
            )));
        }
        *self.chars.borrow_mut() = s;
        Ok(())
    }

    pub(crate) fn mark_constant(&self) {
        self.constant.set(true);
    }

    pub fn is_constant(&self) -> bool {
        self.constant.get()
    }
}

/// A mutable vector cell, same constancy rules as [`StringCell`].
#[derive(Debug)]
pub struct VectorCell {
    items: RefCell<Vec<Value>>,
    constant: Cell<bool>,
}

impl VectorCell {
    pub fn new(items: Vec<Value>) -> Self {
        VectorCell {
            items: RefCell::new(items),
            constant: Cell::new(false),
        }
    }

    pub fn items(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    pub fn set(&self, index: usize, value: Value) -> Result<()> {
        if self.constant.get() {
            return Err(SchemeError::ConstantMutation(format!(
                "#({})",
                self.items.borrow().iter().map(|v| v.to_string()).join(" ")
            )));
        }
        let mut items = self.items.borrow_mut();
        if index >= items.len() {
            return Err(SchemeError::Type {
                expected: "valid vector index",
                found: index.to_string(),
            });
        }
        items[index] = value;
        Ok(())
    }

    pub(crate) fn mark_constant(&self) {
        self.constant.set(true);
    }

    pub fn is_constant(&self) -> bool {
        self.constant.get()
    }
}

/// The universal type: every language entity is one of these kinds.
#[derive(Clone)]
pub enum Value {
    /// The empty list, a unique terminator distinguishable from all pairs.
    Nil,
    /// The result of expressions with no useful value.
    Unspecified,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Char(char),
    Symbol(Rc<str>),
    Str(Rc<StringCell>),
    Vector(Rc<VectorCell>),
    Pair(Rc<PairCell>),
    Procedure(Rc<Operation>),
    Syntax(Rc<Operation>),
    Continuation(Rc<Escape>),
}

impl Value {
    pub fn symbol(name: &str) -> Value {
        Value::Symbol(Rc::from(name))
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::Str(Rc::new(StringCell::new(s.into())))
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Vector(Rc::new(VectorCell::new(items)))
    }

    /// The name of the kind, as used in error reporting.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "empty list",
            Value::Unspecified => "unspecified",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Char(_) => "character",
            Value::Symbol(_) => "symbol",
            Value::Str(_) => "string",
            Value::Vector(_) => "vector",
            Value::Pair(_) => "pair",
            Value::Procedure(_) => "procedure",
            Value::Syntax(_) => "syntax",
            Value::Continuation(_) => "continuation",
        }
    }

    /// Only `#f` is false; every other value counts as true.
    pub fn is_false(&self) -> bool {
        matches!(self, Value::Boolean(false))
    }

    pub fn is_true(&self) -> bool {
        !self.is_false()
    }

    pub fn as_symbol(&self) -> Option<&Rc<str>> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Identity: immediates compare by value, heap kinds by handle.
    pub fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Unspecified, Value::Unspecified) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::Vector(a), Value::Vector(b)) => Rc::ptr_eq(a, b),
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Procedure(a), Value::Procedure(b)) => Rc::ptr_eq(a, b),
            (Value::Syntax(a), Value::Syntax(b)) => Rc::ptr_eq(a, b),
            (Value::Continuation(a), Value::Continuation(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Shallow value equivalence. For this kind set it coincides with
    /// identity; it exists as its own notion so callers state intent.
    pub fn eqv(&self, other: &Value) -> bool {
        self.eq(other)
    }

    /// Deep structural equivalence. Iterative, with a visited set over
    /// handle pairs so shared and circular structure terminates.
    pub fn equal(&self, other: &Value) -> bool {
        let mut pending = vec![(self.clone(), other.clone())];
        let mut visited: HashSet<(usize, usize)> = HashSet::new();

        while let Some((a, b)) = pending.pop() {
            match (&a, &b) {
                (Value::Pair(pa), Value::Pair(pb)) => {
                    let key = (Rc::as_ptr(pa) as usize, Rc::as_ptr(pb) as usize);
                    if !visited.insert(key) {
                        continue;
                    }
                    pending.push((pa.car(), pb.car()));
                    pending.push((pa.cdr(), pb.cdr()));
                }
                (Value::Vector(va), Value::Vector(vb)) => {
                    let key = (Rc::as_ptr(va) as usize, Rc::as_ptr(vb) as usize);
                    if !visited.insert(key) {
                        continue;
                    }
                    let (ia, ib) = (va.items(), vb.items());
                    if ia.len() != ib.len() {
                        return false;
                    }
                    pending.extend(ia.into_iter().zip(ib));
                }
                (Value::Str(sa), Value::Str(sb)) => {
                    if sa.get() != sb.get() {
                        return false;
                    }
                }
                _ => {
                    if !a.eqv(&b) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Marks this value and everything reachable from it constant, so later
    /// mutation attempts fail. Used by `quote`. Iterative and cycle-safe.
    pub fn set_constant(&self) {
        let mut pending = vec![self.clone()];
        let mut visited: HashSet<usize> = HashSet::new();

        while let Some(value) = pending.pop() {
            match value {
                Value::Pair(p) => {
                    if visited.insert(Rc::as_ptr(&p) as usize) {
                        p.mark_constant();
                        pending.push(p.car());
                        pending.push(p.cdr());
                    }
                }
                Value::Vector(v) => {
                    if visited.insert(Rc::as_ptr(&v) as usize) {
                        v.mark_constant();
                        pending.extend(v.items());
                    }
                }
                Value::Str(s) => s.mark_constant(),
                _ => {}
            }
        }
    }

    /// Whether mutation of this value would fail. Immediates are always
    /// constant; operations and continuations have no mutable surface.
    pub fn is_constant(&self) -> bool {
        match self {
            Value::Pair(p) => p.is_constant(),
            Value::Vector(v) => v.is_constant(),
            Value::Str(s) => s.is_constant(),
            _ => true,
        }
    }
}

fn write_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        ' ' => write!(f, "#\\space"),
        '\n' => write!(f, "#\\newline"),
        '\t' => write!(f, "#\\tab"),
        other => write!(f, "#\\{}", other),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "()"),
            Value::Unspecified => write!(f, "#<unspecified>"),
            Value::Boolean(true) => write!(f, "#t"),
            Value::Boolean(false) => write!(f, "#f"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Real(r) => {
                if r.fract() == 0.0 && r.is_finite() {
                    write!(f, "{:.1}", r)
                } else {
                    write!(f, "{}", r)
                }
            }
            Value::Char(c) => write_char(f, *c),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Str(s) => write!(f, "\"{}\"", s.get().replace('\\', "\\\\").replace('"', "\\\"")),
            Value::Vector(v) => {
                write!(
                    f,
                    "#({})",
                    v.items().iter().map(|i| i.to_string()).join(" ")
                )
            }
            Value::Pair(_) => cons::write_list(f, self),
            Value::Procedure(op) => write!(f, "#<procedure {}>", op.name()),
            Value::Syntax(op) => write!(f, "#<syntax {}>", op.name()),
            Value::Continuation(_) => write!(f, "#<continuation>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cons::{cons, list_from_vec};

    #[test]
    fn only_false_is_false() {
        assert!(Value::Boolean(false).is_false());
        assert!(Value::Boolean(true).is_true());
        assert!(Value::Integer(0).is_true());
        assert!(Value::Nil.is_true());
        assert!(Value::string("").is_true());
    }

    #[test]
    fn eq_is_identity_for_heap_kinds() {
        let a = cons(Value::Integer(1), Value::Nil);
        let b = cons(Value::Integer(1), Value::Nil);
        assert!(a.eq(&a));
        assert!(!a.eq(&b));
        assert!(a.equal(&b));
    }

    #[test]
    fn symbols_compare_by_name() {
        assert!(Value::symbol("x").eq(&Value::symbol("x")));
        assert!(!Value::symbol("x").eq(&Value::symbol("y")));
    }

    #[test]
    fn equal_descends_structure() {
        let a = list_from_vec(vec![Value::Integer(1), Value::string("hi")]);
        let b = list_from_vec(vec![Value::Integer(1), Value::string("hi")]);
        assert!(a.equal(&b));

        let c = list_from_vec(vec![Value::Integer(2), Value::string("hi")]);
        assert!(!a.equal(&c));
    }

    #[test]
    fn equal_terminates_on_shared_cycles() {
        let a = cons(Value::Integer(1), Value::Nil);
        let b = cons(Value::Integer(1), Value::Nil);
        if let (Value::Pair(pa), Value::Pair(pb)) = (&a, &b) {
            pa.set_cdr(a.clone()).unwrap();
            pb.set_cdr(b.clone()).unwrap();
        }
        assert!(a.equal(&b));
    }

    #[test]
    fn quoted_data_rejects_mutation() {
        let list = list_from_vec(vec![Value::Integer(1), Value::Integer(2)]);
        list.set_constant();
        if let Value::Pair(p) = &list {
            let err = p.set_car(Value::Integer(9)).unwrap_err();
            assert!(matches!(err, SchemeError::ConstantMutation(_)));
        } else {
            unreachable!();
        }
    }

    #[test]
    fn display_external_representations() {
        assert_eq!(Value::Boolean(true).to_string(), "#t");
        assert_eq!(Value::Char('a').to_string(), "#\\a");
        assert_eq!(Value::Char(' ').to_string(), "#\\space");
        assert_eq!(Value::string("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(
            Value::vector(vec![Value::Integer(1), Value::Integer(2)]).to_string(),
            "#(1 2)"
        );
    }
}
