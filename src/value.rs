use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Stmt;
use crate::interpreter::control_flow::Unwind;
use crate::interpreter::environment::Environment;
use crate::interpreter::evaluator::Interpreter;

/// Runtime values. `Null` and the booleans are immediate; everything else
/// lives behind an `Rc` so values share structure and `===` can observe
/// reference identity.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Vector(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<MapTable>>),
    Function(Rc<Function>),
    Native(Rc<Native>),
    Method(Rc<Method>),
    Class(Rc<Class>),
    Instance(Rc<Instance>),
    Exception(Rc<Exception>),
    Module(Rc<Module>),
}

/// A user function: parameter names, shared body, and the environment it
/// closed over. The name is present for declared functions and methods.
pub struct Function {
    pub name: Option<Rc<str>>,
    pub params: Vec<Rc<str>>,
    pub body: Rc<Stmt>,
    pub closure: Environment,
}

// The closure links back into the environment tree, which can contain this
// function again; Debug must not follow it.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

pub type NativeFn = fn(&mut Interpreter, Option<&Value>, &[Value]) -> Result<Value, Unwind>;

/// A host function with a fixed arity.
#[derive(Debug)]
pub struct Native {
    pub name: &'static str,
    pub arity: usize,
    pub function: NativeFn,
}

/// A callable bound to a receiver. When `is_init` is set, calling the
/// method yields the receiver instead of the body's return value.
#[derive(Debug)]
pub struct Method {
    pub function: Value,
    pub receiver: Value,
    pub is_init: bool,
}

#[derive(Debug)]
pub struct Class {
    pub name: Option<Rc<str>>,
    pub inits: IndexMap<Rc<str>, Value>,
    pub methods: IndexMap<Rc<str>, Value>,
}

#[derive(Debug)]
pub struct Instance {
    pub class: Rc<Class>,
    pub fields: RefCell<HashMap<Rc<str>, Value>>,
}

/// A caught or catchable error value: message plus the call stack captured
/// at throw time, innermost callee first.
#[derive(Debug)]
pub struct Exception {
    pub message: String,
    pub stack_trace: Vec<Value>,
}

#[derive(Debug)]
pub struct Module {
    pub store: IndexMap<Rc<str>, Value>,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Native(_) => "native",
            Value::Method(_) => "method",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
            Value::Exception(_) => "exception",
            Value::Module(_) => "module",
        }
    }

    /// Everything is truthy except `null` and `false`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            _ => true,
        }
    }

    /// The raw text form used by `throw` and string building: strings
    /// contribute their characters without quotes, everything else renders
    /// as it would under `say`.
    pub fn stringify(&self) -> String {
        match self {
            Value::String(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}

/// Reference identity, observable through `===` / `!==`.
///
/// `Null` and booleans are interned by construction, so identity collapses
/// to tag equality. Numbers compare by value (whether two equal number
/// literals are "the same" number is implementation-defined here). All heap
/// values compare by pointer.
pub fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => Rc::ptr_eq(x, y),
        (Value::Vector(x), Value::Vector(y)) => Rc::ptr_eq(x, y),
        (Value::Map(x), Value::Map(y)) => Rc::ptr_eq(x, y),
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Native(x), Value::Native(y)) => Rc::ptr_eq(x, y),
        (Value::Method(x), Value::Method(y)) => Rc::ptr_eq(x, y),
        (Value::Class(x), Value::Class(y)) => Rc::ptr_eq(x, y),
        (Value::Instance(x), Value::Instance(y)) => Rc::ptr_eq(x, y),
        (Value::Exception(x), Value::Exception(y)) => Rc::ptr_eq(x, y),
        (Value::Module(x), Value::Module(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Vector(v) => write!(f, "<vector {:p}>", Rc::as_ptr(v)),
            Value::Map(m) => write!(f, "<map {:p}>", Rc::as_ptr(m)),
            Value::Function(fun) => {
                write!(f, "<function {} {:p}>", anon(&fun.name), Rc::as_ptr(fun))
            }
            Value::Native(native) => write!(
                f,
                "<function '{}' {:p}>",
                native.name,
                Rc::as_ptr(native)
            ),
            Value::Method(m) => write!(f, "<method {} of {}>", m.function, m.receiver),
            Value::Class(c) => write!(f, "<class {} {:p}>", anon(&c.name), Rc::as_ptr(c)),
            Value::Instance(i) => {
                write!(f, "<instance {:p} of {}>", Rc::as_ptr(i), Value::Class(i.class.clone()))
            }
            Value::Exception(e) => {
                write!(f, "<exception \"{}\" {:p}>", e.message, Rc::as_ptr(e))
            }
            Value::Module(m) => write!(f, "<module {:p}>", Rc::as_ptr(m)),
        }
    }
}

fn anon(name: &Option<Rc<str>>) -> String {
    match name {
        Some(name) => format!("'{}'", name),
        None => "(anonymous)".to_string(),
    }
}

/* == map storage =========================================================== */

/// A map key: only numbers and strings hash. NaN keys are normalized by
/// `OrderedFloat`, so a NaN key equals itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Number(OrderedFloat<f64>),
    String(Rc<str>),
}

impl MapKey {
    /// `None` means the value is unhashable.
    pub fn from_value(value: &Value) -> Option<MapKey> {
        match value {
            Value::Number(n) => Some(MapKey::Number(OrderedFloat(*n))),
            Value::String(s) => Some(MapKey::String(s.clone())),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            MapKey::Number(n) => Value::Number(n.into_inner()),
            MapKey::String(s) => Value::String(s.clone()),
        }
    }
}

/// Insertion-ordered storage behind `Value::Map`.
#[derive(Debug, Default)]
pub struct MapTable {
    entries: IndexMap<MapKey, Value>,
}

impl MapTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &MapKey) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    pub fn set(&mut self, key: MapKey, value: Value) {
        self.entries.insert(key, value);
    }

    pub fn remove(&mut self, key: &MapKey) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fresh key values in insertion order.
    pub fn keys(&self) -> Vec<Value> {
        self.entries.keys().map(MapKey::to_value).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(elems: Vec<Value>) -> Value {
        Value::Vector(Rc::new(RefCell::new(elems)))
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::String(Rc::from("")).is_truthy());
        assert!(vector(vec![]).is_truthy());
    }

    #[test]
    fn display_formats() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Number(1.0).to_string(), "1");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Number(-0.25).to_string(), "-0.25");
        assert_eq!(Value::String(Rc::from("hi")).to_string(), "\"hi\"");
        assert!(vector(vec![]).to_string().starts_with("<vector 0x"));
    }

    #[test]
    fn stringify_drops_string_quotes() {
        assert_eq!(Value::String(Rc::from("boom")).stringify(), "boom");
        assert_eq!(Value::Number(3.0).stringify(), "3");
        assert_eq!(Value::Null.stringify(), "null");
    }

    #[test]
    fn identity_on_immediates_and_references() {
        assert!(identical(&Value::Null, &Value::Null));
        assert!(identical(&Value::Boolean(true), &Value::Boolean(true)));
        assert!(!identical(&Value::Boolean(true), &Value::Boolean(false)));
        assert!(!identical(&Value::Null, &Value::Boolean(false)));

        let a = vector(vec![]);
        let b = vector(vec![]);
        assert!(identical(&a, &a.clone()));
        assert!(!identical(&a, &b));
    }

    #[test]
    fn map_table_keys_and_values() {
        let mut table = MapTable::new();
        table.set(MapKey::from_value(&Value::Number(1.0)).unwrap(), Value::Boolean(true));
        table.set(
            MapKey::from_value(&Value::String(Rc::from("k"))).unwrap(),
            Value::Number(2.0),
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.keys().len(), 2);
        assert_eq!(table.values().len(), 2);
        assert!(MapKey::from_value(&Value::Null).is_none());
        assert!(MapKey::from_value(&vector(vec![])).is_none());
    }

    #[test]
    fn map_table_nan_key_equals_itself() {
        let mut table = MapTable::new();
        let nan = MapKey::from_value(&Value::Number(f64::NAN)).unwrap();
        table.set(nan.clone(), Value::Number(7.0));
        let again = MapKey::from_value(&Value::Number(f64::NAN)).unwrap();
        assert!(matches!(table.get(&again), Some(Value::Number(n)) if n == 7.0));
    }
}
