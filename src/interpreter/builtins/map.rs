use std::cell::RefCell;
use std::rc::Rc;

use crate::interpreter::control_flow::Unwind;
use crate::interpreter::evaluator::Interpreter;
use crate::value::{Class, MapTable, Value};

pub fn map_class() -> Rc<Class> {
    super::class(
        "Map",
        &[("size", 0, size), ("keys", 0, keys), ("values", 0, values)],
    )
}

fn receiver_table<'a>(
    interp: &Interpreter,
    receiver: Option<&'a Value>,
) -> Result<&'a Rc<RefCell<MapTable>>, Unwind> {
    match receiver {
        Some(Value::Map(table)) => Ok(table),
        _ => Err(interp.throw("expected 'map' receiver")),
    }
}

fn size(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let table = receiver_table(interp, receiver)?;
    let size = table.borrow().len();
    Ok(Value::Number(size as f64))
}

fn keys(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let table = receiver_table(interp, receiver)?;
    let keys = table.borrow().keys();
    Ok(Value::Vector(Rc::new(RefCell::new(keys))))
}

fn values(
    interp: &mut Interpreter,
    receiver: Option<&Value>,
    _args: &[Value],
) -> Result<Value, Unwind> {
    let table = receiver_table(interp, receiver)?;
    let values = table.borrow().values();
    Ok(Value::Vector(Rc::new(RefCell::new(values))))
}
