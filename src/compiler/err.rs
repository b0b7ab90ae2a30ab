use thiserror::Error;

use super::interpreter::handler::HandlerError;
use super::syntax::ast::crumb::{Identifier, Path, SpanPos};
use super::syntax::ast::operator::Binary;
use super::syntax::err::SyntaxError;

#[macro_export]
macro_rules! sys_error {
    ($($arg:tt)*) => {
        panic!($($arg)*)
    };
}

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    // Lexis Errors
    #[error("{position}: unrecognized token at '{rest}'")]
    UnrecognizedToken { position: SpanPos, rest: String },

    // Syntax Errors
    #[error("{} syntax error(s):\n{}", .0.len(), join_lines(.0))]
    Syntax(Vec<SyntaxError>),

    // Semantics Errors
    #[error("{position}: '{name}' redefinition")]
    Redefinition { name: Path, position: SpanPos },
    #[error("{position}: '{name}' is not defined")]
    UnboundName { name: Path, position: SpanPos },
    #[error("{position}: unknown function '{name}'")]
    UnknownFunction { name: Identifier, position: SpanPos },
    #[error("{position}: dimension mismatch, {left} {operator} {right}")]
    DimensionMismatch {
        operator: Binary,
        left: usize,
        right: usize,
        position: SpanPos,
    },
    #[error("{position}: {operation} is undefined for {operand}")]
    IllegalOperand {
        operation: String,
        operand: &'static str,
        position: SpanPos,
    },
    #[error("{position}: division by zero")]
    DivisionByZero { position: SpanPos },
    #[error("{position}: vector elements must be numbers, found {found}")]
    NonScalarVectorElement {
        found: &'static str,
        position: SpanPos,
    },
    #[error("{position}: argument '{name}' given more than once")]
    DuplicateArgument { name: Identifier, position: SpanPos },
    #[error("{position}: {name}: {message}")]
    BuiltinArgument {
        name: Identifier,
        message: String,
        position: SpanPos,
    },

    // Handler Errors
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

fn join_lines(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
