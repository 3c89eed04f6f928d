use std::rc::Rc;

use crate::value::{Exception, Value};

/// Non-local transfer carried in the error position of evaluator results,
/// so `?` unwinds past intervening frames until a construct consumes it:
/// calls consume `Return`, loops consume `Break` and `Continue`, and
/// `try` consumes `Throw`.
#[derive(Debug)]
pub enum Unwind {
    Return(Value),
    Break,
    Continue,
    Throw(Rc<Exception>),
}
