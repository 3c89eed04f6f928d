use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvError {
    AlreadyExists,
    NotExists,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvError::AlreadyExists => write!(f, "variable already exists"),
            EnvError::NotExists => write!(f, "variable not exists"),
        }
    }
}

/// One scope in the lexical chain. The handle is cheap to clone and shared:
/// closures keep their defining environment alive through it.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Rc<EnvInner>,
}

#[derive(Debug)]
struct EnvInner {
    store: RefCell<HashMap<Rc<str>, Value>>,
    outer: Option<Environment>,
    self_value: RefCell<Option<Value>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(EnvInner {
                store: RefCell::new(HashMap::new()),
                outer: None,
                self_value: RefCell::new(None),
            }),
        }
    }

    pub fn with_outer(outer: Environment) -> Self {
        Self {
            inner: Rc::new(EnvInner {
                store: RefCell::new(HashMap::new()),
                outer: Some(outer),
                self_value: RefCell::new(None),
            }),
        }
    }

    /// Binds a new name in this scope; redeclaration here is an error even
    /// if an outer scope already has the name (that one is shadowed).
    pub fn declare(&self, name: Rc<str>, value: Value) -> Result<(), EnvError> {
        let mut store = self.inner.store.borrow_mut();
        if store.contains_key(&name) {
            return Err(EnvError::AlreadyExists);
        }
        store.insert(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.inner.store.borrow().get(name) {
            return Some(value.clone());
        }
        self.inner.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Reassigns the nearest binding of `name`, walking outward.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), EnvError> {
        let mut store = self.inner.store.borrow_mut();
        if let Some(slot) = store.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        drop(store);
        match &self.inner.outer {
            Some(outer) => outer.assign(name, value),
            None => Err(EnvError::NotExists),
        }
    }

    /// The nearest `self` binding, walking outward.
    pub fn self_value(&self) -> Option<Value> {
        if let Some(value) = self.inner.self_value.borrow().as_ref() {
            return Some(value.clone());
        }
        self.inner.outer.as_ref().and_then(|outer| outer.self_value())
    }

    pub fn set_self(&self, value: Value) {
        *self.inner.self_value.borrow_mut() = Some(value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_declare_and_get() {
        let env = Environment::new();
        env.declare(Rc::from("x"), num(42.0)).unwrap();
        assert!(matches!(env.get("x"), Some(Value::Number(n)) if n == 42.0));
        assert!(env.get("y").is_none());
    }

    #[test]
    fn test_duplicate_declare_fails() {
        let env = Environment::new();
        env.declare(Rc::from("x"), num(1.0)).unwrap();
        assert_eq!(
            env.declare(Rc::from("x"), num(2.0)),
            Err(EnvError::AlreadyExists)
        );
    }

    #[test]
    fn test_inner_scope_shadows_and_can_redeclare() {
        let outer = Environment::new();
        outer.declare(Rc::from("x"), num(1.0)).unwrap();

        let inner = Environment::with_outer(outer.clone());
        inner.declare(Rc::from("x"), num(2.0)).unwrap();
        assert!(matches!(inner.get("x"), Some(Value::Number(n)) if n == 2.0));
        assert!(matches!(outer.get("x"), Some(Value::Number(n)) if n == 1.0));
    }

    #[test]
    fn test_assign_walks_outward() {
        let outer = Environment::new();
        outer.declare(Rc::from("x"), num(1.0)).unwrap();

        let inner = Environment::with_outer(outer.clone());
        inner.assign("x", num(5.0)).unwrap();
        assert!(matches!(outer.get("x"), Some(Value::Number(n)) if n == 5.0));

        assert_eq!(inner.assign("missing", num(0.0)), Err(EnvError::NotExists));
    }

    #[test]
    fn test_self_binding_walks_outward() {
        let outer = Environment::new();
        assert!(outer.self_value().is_none());
        outer.set_self(Value::Boolean(true));

        let inner = Environment::with_outer(outer);
        assert!(matches!(inner.self_value(), Some(Value::Boolean(true))));
    }
}
