use std::fmt;
use std::rc::Rc;

use crate::diagnostic::{Diagnostic, Span};
use crate::token::Token;
use crate::value::Exception;

/// A parse diagnostic: what went wrong and where. Collected into a list;
/// the parser keeps going after each one.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub width: usize,
}

impl ParseError {
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: token.line,
            column: token.column,
            width: token.lexeme.chars().count().max(1),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(&self.message)
            .with_code("E0001")
            .with_label(Span::new(self.line, self.column, self.width), "")
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.line, self.column
        )
    }
}

impl std::error::Error for ParseError {}

/// How a script run can fail: an uncaught exception, or a control signal
/// that surfaced at top level.
#[derive(Debug)]
pub enum RuntimeError {
    Uncaught(Rc<Exception>),
    ReturnOutsideFunction,
    BreakOutsideLoop,
    ContinueOutsideLoop,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Uncaught(exception) => {
                writeln!(f, "Exception: {}", exception.message)?;
                for callee in &exception.stack_trace {
                    writeln!(f, "\tin {}", callee)?;
                }
                Ok(())
            }
            RuntimeError::ReturnOutsideFunction => write!(f, "'return' outside function"),
            RuntimeError::BreakOutsideLoop => write!(f, "'break' outside loop"),
            RuntimeError::ContinueOutsideLoop => write!(f, "'continue' outside loop"),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Either side of `Interpreter::run`.
#[derive(Debug)]
pub enum ScriptError {
    Parse(Vec<ParseError>),
    Runtime(RuntimeError),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Parse(errors) => {
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
            ScriptError::Runtime(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for ScriptError {}
