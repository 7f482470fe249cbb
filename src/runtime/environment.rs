use std::collections::HashMap;

use crate::error::{Error, Result, Span};
use crate::runtime::Value;

/// Flat identifier-to-value bindings. No nested scopes: a fresh
/// `Environment` is created per `map`/`reduce` lambda body and receives only
/// its bound parameter, with no access to the caller's variables.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
}

impl Environment {
    /// Creates an empty environment
    pub fn new() -> Self {
        Environment {
            variables: HashMap::new(),
        }
    }

    /// Looks up an identifier, failing with a `Name` error if unbound
    pub fn get(&self, name: &str, span: Span) -> Result<Value> {
        self.variables.get(name).cloned().ok_or_else(|| Error::Name {
            name: name.to_string(),
            span,
        })
    }

    /// Binds or rebinds an identifier
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// True if `name` is bound
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s() -> Span {
        Span::point(1, 0)
    }

    #[test]
    fn test_set_and_get() {
        let mut env = Environment::new();
        env.set("x", Value::Int(5));
        assert_eq!(env.get("x", s()).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_unbound_identifier_errors() {
        let env = Environment::new();
        assert!(env.get("missing", s()).is_err());
    }

    #[test]
    fn test_rebinding_overwrites() {
        let mut env = Environment::new();
        env.set("x", Value::Int(1));
        env.set("x", Value::Int(2));
        assert_eq!(env.get("x", s()).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_fresh_environment_has_no_outer_bindings() {
        let mut outer = Environment::new();
        outer.set("x", Value::Int(1));
        let inner = Environment::new();
        assert!(!inner.contains("x"));
    }
}
