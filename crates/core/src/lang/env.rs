use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::lang::value::Value;

/// A variable table, chained to an outer scope for closures. The root
/// environment of a session persists across submissions.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Environment {
    store: HashMap<String, Value>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            store: HashMap::new(),
            outer: None,
        }
    }

    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Self {
        Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        match self.store.get(key) {
            Some(value) => Some(value.clone()),
            None => match &self.outer {
                Some(outer) => outer.borrow().get(key),
                None => None,
            },
        }
    }

    /// Binds `key` in this scope, shadowing any outer binding.
    pub fn define(&mut self, key: String, value: Value) {
        self.store.insert(key, value);
    }

    /// Updates the nearest scope that already binds `key`; binds in this
    /// scope if no scope does.
    pub fn assign(&mut self, key: &str, value: Value) {
        if self.store.contains_key(key) {
            self.store.insert(key.to_string(), value);
            return;
        }

        if let Some(outer) = &self.outer {
            let bound_in_outer = outer.borrow().contains(key);
            if bound_in_outer {
                outer.borrow_mut().assign(key, value);
                return;
            }
        }

        self.store.insert(key.to_string(), value);
    }

    fn contains(&self, key: &str) -> bool {
        if self.store.contains_key(key) {
            return true;
        }
        match &self.outer {
            Some(outer) => outer.borrow().contains(key),
            None => false,
        }
    }
}
