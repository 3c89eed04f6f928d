use std::cell::RefCell;
use std::rc::Rc;

use crate::interpreter::control_flow::Unwind;
use crate::interpreter::evaluator::Interpreter;
use crate::value::{Class, Value};

pub fn vector_class() -> Rc<Class> {
    super::class(
        "Vector",
        &[("push", 1, push), ("pop", 0, pop), ("length", 0, length)],
    )
}

fn receiver_elems<'a>(
    interp: &Interpreter,
    receiver: Option<&'a Value>,
) -> Result<&'a Rc<RefCell<Vec<Value>>>, Unwind> {
    match receiver {
        Some(Value::Vector(elems)) => Ok(elems),
        _ => Err(interp.throw("expected 'vector' receiver")),
    }
}

fn push(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    args: &[Value],
) -> Result<Value, Unwind> {
    let elems = receiver_elems(interp, receiver)?;
    elems.borrow_mut().push(args[0].clone());
    Ok(Value::Null)
}

fn pop(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let elems = receiver_elems(interp, receiver)?;
    let popped = elems.borrow_mut().pop();
    popped.ok_or_else(|| interp.throw("pop from empty vector"))
}

fn length(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let elems = receiver_elems(interp, receiver)?;
    let length = elems.borrow().len();
    Ok(Value::Number(length as f64))
}
