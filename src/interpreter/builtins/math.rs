use std::rc::Rc;

use indexmap::IndexMap;

use crate::interpreter::control_flow::Unwind;
use crate::interpreter::evaluator::Interpreter;
use crate::value::{Module, Value};

/// The `math` module: `PI`, `pow(x, y)`, `sqrt(x)`.
pub fn math_module() -> Value {
    let mut store = IndexMap::new();
    store.insert(Rc::from("PI"), Value::Number(std::f64::consts::PI));
    store.insert(Rc::from("pow"), super::native("pow", 2, pow));
    store.insert(Rc::from("sqrt"), super::native("sqrt", 1, sqrt));
    Value::Module(Rc::new(Module { store }))
}

fn pow(
    interp: &mut Interpreter,
    _receiver: Option<&Value>,
    args: &[Value],
) -> Result<Value, Unwind> {
    let (Value::Number(base), Value::Number(exponent)) = (&args[0], &args[1]) else {
        return Err(interp.throw("non number argument"));
    };
    Ok(Value::Number(base.powf(*exponent)))
}

fn sqrt(
    interp: &mut Interpreter,
    _receiver: Option<&Value>,
    args: &[Value],
) -> Result<Value, Unwind> {
    let Value::Number(value) = &args[0] else {
        return Err(interp.throw("non number argument"));
    };
    Ok(Value::Number(value.sqrt()))
}
