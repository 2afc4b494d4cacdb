use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A single scope in the environment chain: a name-to-value map plus a link
/// to the enclosing scope. Shared ownership lets a closure keep its defining
/// environment alive even after the block that created it has exited.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    pub variables: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, variables: HashMap::new() }
    }

    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = self.enclosing.clone()
            .unwrap_or_else(|| unreachable!("resolver guarantees an enclosing environment at depth 1"));

        for _ in 1..distance {
            let parent = environment.borrow().enclosing.clone()
                .unwrap_or_else(|| unreachable!("resolver guarantees an enclosing environment at this depth"));
            environment = parent;
        }

        environment
    }

    /// Assigns to an existing binding found by walking up the chain to globals.
    /// Used only for unresolved (global) references; see `assign_at` for resolved ones.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance == 0 {
            self.variables.insert(name.lexeme.clone(), value);
        } else {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), value);
        }
    }

    /// Reads an unresolved (global) reference by walking up the chain.
    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.variables.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        if distance == 0 {
            self.variables.get(&name.lexeme).cloned()
        } else {
            self.ancestor(distance).borrow().variables.get(&name.lexeme).cloned()
        }
        .ok_or_else(|| RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}
