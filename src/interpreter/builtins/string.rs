use std::rc::Rc;

use crate::interpreter::control_flow::Unwind;
use crate::interpreter::evaluator::Interpreter;
use crate::value::{Class, Value};

pub fn string_class() -> Rc<Class> {
    super::class(
        "String",
        &[
            ("reverse", 0, reverse),
            ("to_upper_case", 0, to_upper_case),
            ("to_lower_case", 0, to_lower_case),
        ],
    )
}

fn receiver_text<'a>(
    interp: &Interpreter,
    receiver: Option<&'a Value>,
) -> Result<&'a Rc<str>, Unwind> {
    match receiver {
        Some(Value::String(text)) => Ok(text),
        _ => Err(interp.throw("expected 'string' receiver")),
    }
}

/// Reverses by Unicode scalar value.
fn reverse(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let text = receiver_text(interp, receiver)?;
    let reversed: String = text.chars().rev().collect();
    Ok(Value::String(Rc::from(reversed.as_str())))
}

// Case mapping is ASCII-only; anything else passes through unchanged.

fn to_upper_case(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let text = receiver_text(interp, receiver)?;
    let upper: String = text.chars().map(|c| c.to_ascii_uppercase()).collect();
    Ok(Value::String(Rc::from(upper.as_str())))
}

fn to_lower_case(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let text = receiver_text(interp, receiver)?;
    let lower: String = text.chars().map(|c| c.to_ascii_lowercase()).collect();
    Ok(Value::String(Rc::from(lower.as_str())))
}
