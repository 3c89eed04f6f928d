use std::rc::Rc;

use crate::interpreter::control_flow::Unwind;
use crate::interpreter::evaluator::Interpreter;
use crate::value::{Class, Value};

pub fn boolean_class() -> Rc<Class> {
    super::class("Boolean", &[("to_string", 0, boolean_to_string)])
}

pub fn number_class() -> Rc<Class> {
    super::class("Number", &[("to_string", 0, number_to_string)])
}

fn boolean_to_string(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let Some(Value::Boolean(value)) = receiver else {
        return Err(interp.throw("expected 'boolean' receiver"));
    };
    Ok(Value::String(Rc::from(value.to_string().as_str())))
}

fn number_to_string(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let Some(Value::Number(value)) = receiver else {
        return Err(interp.throw("expected 'number' receiver"));
    };
    Ok(Value::String(Rc::from(value.to_string().as_str())))
}
