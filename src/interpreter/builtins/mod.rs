//! Built-in classes and host functions.
//!
//! Method access on a primitive goes through a hidden class per type:
//! - **Boolean** / **Number**: `to_string`
//! - **String**: `reverse`, `to_upper_case`, `to_lower_case`
//! - **Vector**: `push`, `pop`, `length`
//! - **Map**: `size`, `keys`, `values`
//! - **Exception**: `message`
//!
//! The same class objects are bound by name in the global scope, next to
//! the `clock` and `class_of` natives and the `math` module.

mod map;
mod math;
mod misc;
mod scalar;
mod string;
mod vector;

use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::{Class, Native, NativeFn, Value};

use super::environment::Environment;

/// The hidden classes, created once per interpreter and shared between the
/// global bindings, method dispatch and `class_of`.
pub struct BaseClasses {
    pub boolean: Rc<Class>,
    pub number: Rc<Class>,
    pub string: Rc<Class>,
    pub vector: Rc<Class>,
    pub map: Rc<Class>,
    pub exception: Rc<Class>,
}

impl BaseClasses {
    pub fn new() -> Self {
        Self {
            boolean: scalar::boolean_class(),
            number: scalar::number_class(),
            string: string::string_class(),
            vector: vector::vector_class(),
            map: map::map_class(),
            exception: misc::exception_class(),
        }
    }

    /// The class backing method access on a primitive value, if any.
    pub fn for_value(&self, value: &Value) -> Option<Rc<Class>> {
        let class = match value {
            Value::Boolean(_) => &self.boolean,
            Value::Number(_) => &self.number,
            Value::String(_) => &self.string,
            Value::Vector(_) => &self.vector,
            Value::Map(_) => &self.map,
            Value::Exception(_) => &self.exception,
            _ => return None,
        };
        Some(class.clone())
    }
}

impl Default for BaseClasses {
    fn default() -> Self {
        Self::new()
    }
}

/// Seeds a fresh global scope. The names are distinct, so the declares
/// cannot collide.
pub fn install(env: &Environment, classes: &BaseClasses) {
    let bindings = [
        ("Boolean", Value::Class(classes.boolean.clone())),
        ("Number", Value::Class(classes.number.clone())),
        ("String", Value::Class(classes.string.clone())),
        ("Vector", Value::Class(classes.vector.clone())),
        ("Map", Value::Class(classes.map.clone())),
        ("Exception", Value::Class(classes.exception.clone())),
        ("clock", misc::clock_native()),
        ("class_of", misc::class_of_native()),
        ("math", math::math_module()),
    ];
    for (name, value) in bindings {
        let _ = env.declare(Rc::from(name), value);
    }
}

/// Builds a hidden class from a method table.
fn class(name: &str, members: &[(&'static str, usize, NativeFn)]) -> Rc<Class> {
    let mut methods = IndexMap::new();
    for &(member, arity, function) in members {
        methods.insert(Rc::from(member), native(member, arity, function));
    }
    Rc::new(Class {
        name: Some(Rc::from(name)),
        inits: IndexMap::new(),
        methods,
    })
}

fn native(name: &'static str, arity: usize, function: NativeFn) -> Value {
    Value::Native(Rc::new(Native {
        name,
        arity,
        function,
    }))
}
