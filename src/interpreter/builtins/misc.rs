use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::interpreter::control_flow::Unwind;
use crate::interpreter::evaluator::Interpreter;
use crate::value::{Class, Value};

pub fn exception_class() -> Rc<Class> {
    super::class("Exception", &[("message", 0, message)])
}

fn message(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let Some(Value::Exception(exception)) = receiver else {
        return Err(interp.throw("expected 'exception' receiver"));
    };
    Ok(Value::String(Rc::from(exception.message.as_str())))
}

/// `clock()`: whole seconds since the Unix epoch.
pub fn clock_native() -> Value {
    super::native("clock", 0, clock)
}

fn clock(
    _interp: &mut Interpreter,
    _receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs() as f64);
    Ok(Value::Number(seconds))
}

/// `class_of(v)`: the class object backing `v`, or `null`.
pub fn class_of_native() -> Value {
    super::native("class_of", 1, class_of)
}

fn class_of(
    interp: &mut Interpreter,
    _receiver: Option<&Value>,
    args: &[Value],
) -> Result<Value, Unwind> {
    Ok(interp.class_of_value(&args[0]))
}
