use std::collections::HashMap;

use crate::engine::runtime::Value;
use crate::error::EnvError;

/// Chained variable scope. Lookup and assignment search this scope, then walk
/// outward through the parent link. The interpreter only ever creates the
/// global scope today, but child scopes are supported for block scoping.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    parent: Option<Box<Environment>>,
    vars: HashMap<String, Value>,
}

impl Environment {
    pub fn new(parent: Option<Box<Environment>>) -> Self {
        Environment {
            parent,
            vars: HashMap::new(),
        }
    }

    /// Defines a new variable in this scope. Parent scopes are not checked;
    /// only a same-scope redefinition is an error.
    pub fn define(&mut self, name: &str, value: Value) -> Result<(), EnvError> {
        if self.vars.contains_key(name) {
            return Err(EnvError::AlreadyDeclared(name.to_string()));
        }
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Reassigns an existing variable, searching outward through the chain.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EnvError> {
        if let Some(slot) = self.vars.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match self.parent.as_mut() {
            Some(parent) => parent.assign(name, value),
            None => Err(EnvError::Undefined(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, EnvError> {
        if let Some(value) = self.vars.get(name) {
            return Ok(value.clone());
        }
        match self.parent.as_ref() {
            Some(parent) => parent.get(name),
            None => Err(EnvError::Undefined(name.to_string())),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.vars.contains_key(name)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.exists(name))
    }
}
