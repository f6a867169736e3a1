//! Variable storage with lexical scoping.

use std::collections::HashMap;
use std::mem;

use crate::eval::Value;

/// A frame of variable bindings chained to the frame of the enclosing
/// lexical scope.
///
/// Lookup and assignment walk the chain outward until the name is found or
/// the chain is exhausted; definition always happens in the innermost frame,
/// shadowing any outer binding of the same name.  Each frame is uniquely
/// owned by its inner frame (or by the evaluator, for the global one), so no
/// shared ownership is needed.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
    enclosing: Option<Box<Environment>>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    /// Enter a new innermost frame.
    pub fn push(&mut self) {
        let enclosing = mem::take(self);
        self.enclosing = Some(Box::new(enclosing));
    }

    /// Discard the innermost frame and its bindings.
    pub fn pop(&mut self) {
        if let Some(enclosing) = self.enclosing.take() {
            *self = *enclosing;
        }
    }

    /// Define `name` in the innermost frame.  Redefinition overwrites.
    pub fn define(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_owned(), value);
    }

    /// Assign to the nearest frame that already defines `name`.  Returns
    /// false when no frame in the chain does.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            true
        } else if let Some(enclosing) = self.enclosing.as_mut() {
            enclosing.assign(name, value)
        } else {
            false
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.bindings.get(name) {
            Some(value) => Some(value),
            None => self.enclosing.as_ref().and_then(|e| e.get(name)),
        }
    }
}
