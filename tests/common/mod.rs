#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use needle::interpreter::{Interpreter, ScriptError};

/// A `Write` target the test keeps a handle on after handing it to the
/// interpreter.
#[derive(Clone, Default)]
pub struct SharedOutput {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn run(source: &str) -> (Result<(), ScriptError>, String) {
    let output = SharedOutput::new();
    let mut interpreter = Interpreter::with_output(Box::new(output.clone()));
    let result = interpreter.run(source);
    (result, output.contents())
}

/// Runs a script that must succeed and returns its `say` output.
pub fn run_ok(source: &str) -> String {
    let (result, output) = run(source);
    assert!(result.is_ok(), "script failed: {:?}", result.err());
    output
}

/// Runs a script that must fail with an uncaught exception and returns
/// the exception message.
pub fn run_uncaught(source: &str) -> String {
    use needle::interpreter::RuntimeError;
    match run(source).0 {
        Err(ScriptError::Runtime(RuntimeError::Uncaught(exception))) => exception.message.clone(),
        other => panic!("expected an uncaught exception, got {:?}", other),
    }
}
