//! Pair cells and list plumbing.
//!
//! Lists are chains of pair cells ending in the unique empty-list value.
//! A chain may be proper (ends at the empty list), improper (ends at any
//! other non-pair), or circular (the cdr chain revisits a cell). Properness
//! and circularity are detected, never assumed; the detector is an iterative
//! two-pointer walk so it runs in constant space on arbitrarily long chains.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::error::{Result, SchemeError};
use super::value::Value;

/// A two-slot cell. Both slots are mutable unless the cell has been marked
/// constant (e.g. by appearing inside a quoted literal).
#[derive(Debug)]
pub struct PairCell {
    car: RefCell<Value>,
    cdr: RefCell<Value>,
    constant: Cell<bool>,
}

impl PairCell {
    pub fn new(car: Value, cdr: Value) -> Self {
        PairCell {
            car: RefCell::new(car),
            cdr: RefCell::new(cdr),
            constant: Cell::new(false),
        }
    }

    pub fn car(&self) -> Value {
        self.car.borrow().clone()
    }

    pub fn cdr(&self) -> Value {
        self.cdr.borrow().clone()
    }

    pub fn set_car(&self, value: Value) -> Result<()> {
        self.check_mutable()?;
        *self.car.borrow_mut() = value;
        Ok(())
    }

    pub fn set_cdr(&self, value: Value) -> Result<()> {
        self.check_mutable()?;
        *self.cdr.borrow_mut() = value;
        Ok(())
    }

    fn check_mutable(&self) -> Result<()> {
        if self.constant.get() {
            // Rendering goes through the cycle-safe list printer.
            return Err(SchemeError::ConstantMutation(
                cons(self.car(), self.cdr()).to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn mark_constant(&self) {
        self.constant.set(true);
    }

    pub fn is_constant(&self) -> bool {
        self.constant.get()
    }
}

/// Builds a single pair.
pub fn cons(car: Value, cdr: Value) -> Value {
    Value::Pair(Rc::new(PairCell::new(car, cdr)))
}

/// Builds a proper list from the items, last cdr the empty list.
pub fn list_from_vec(items: Vec<Value>) -> Value {
    let mut list = Value::Nil;
    for item in items.into_iter().rev() {
        list = cons(item, list);
    }
    list
}

/// The cdr of `value` if it is a pair.
fn cdr_of(value: &Value) -> Option<Value> {
    match value {
        Value::Pair(p) => Some(p.cdr()),
        _ => None,
    }
}

/// Whether the cdr chain starting at `value` revisits a cell.
pub fn is_circular(value: &Value) -> bool {
    let mut slow = value.clone();
    let mut fast = value.clone();
    loop {
        fast = match cdr_of(&fast) {
            Some(next) => next,
            None => return false,
        };
        fast = match cdr_of(&fast) {
            Some(next) => next,
            None => return false,
        };
        slow = cdr_of(&slow).expect("slow trails fast");
        if let (Value::Pair(a), Value::Pair(b)) = (&slow, &fast) {
            if Rc::ptr_eq(a, b) {
                return true;
            }
        }
    }
}

/// Whether `value` is a proper list: a cdr chain that terminates at the
/// empty list without revisiting a cell.
pub fn is_proper_list(value: &Value) -> bool {
    if is_circular(value) {
        return false;
    }
    let mut current = value.clone();
    loop {
        match current {
            Value::Nil => return true,
            Value::Pair(p) => current = p.cdr(),
            _ => return false,
        }
    }
}

/// Collects a proper list into a vector of its elements. Fails with a type
/// error on improper or circular chains.
pub fn list_to_vec(list: &Value) -> Result<Vec<Value>> {
    if !is_proper_list(list) {
        return Err(SchemeError::Type {
            expected: "proper list",
            found: list.to_string(),
        });
    }
    let mut items = Vec::new();
    let mut current = list.clone();
    while let Value::Pair(p) = current {
        items.push(p.car());
        current = p.cdr();
    }
    Ok(items)
}

/// The length of a proper list, `None` for anything else.
pub fn list_length(list: &Value) -> Option<usize> {
    if !is_proper_list(list) {
        return None;
    }
    let mut len = 0;
    let mut current = list.clone();
    while let Value::Pair(p) = current {
        len += 1;
        current = p.cdr();
    }
    Some(len)
}

/// Printer for pair chains, shared with `Value`'s `Display`. Circular
/// chains print a marker instead of looping forever.
pub(crate) fn write_list(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    if is_circular(value) {
        return write!(f, "#<circular list>");
    }
    write!(f, "(")?;
    let mut current = value.clone();
    let mut first = true;
    loop {
        match current {
            Value::Nil => break,
            Value::Pair(p) => {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{}", p.car())?;
                first = false;
                current = p.cdr();
            }
            other => {
                write!(f, " . {}", other)?;
                break;
            }
        }
    }
    write!(f, ")")
}
