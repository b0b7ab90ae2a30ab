use std::fmt::{self, Display};

use super::ast::crumb::SpanPos;

pub const EXPECTED_NEWLINE: &str = "expected end of line";
pub const EXPECTED_EQUALS: &str = "expected '='";
pub const EXPECTED_LEFT_PARENTHESES: &str = "expected '('";
pub const EXPECTED_RIGHT_PARENTHESES: &str = "expected ')'";
pub const EXPECTED_NAME: &str = "expected a name";
pub const BAD_PATH_SEGMENT: &str = "expected a name after ':'";
pub const QUALIFIED_ARGUMENT_NAME: &str = "argument names cannot be qualified";
pub const QUALIFIED_CALL: &str = "function names cannot be qualified";
pub const COMMENT_NOT_AT_LINE_END: &str = "comment must end the line";
pub const UNEXPECTED_TOKEN: &str = "unexpected token";
pub const WRONG_LINE_START: &str = "a line must start with a declaration";

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub position: SpanPos,
}

impl SyntaxError {
    #[must_use]
    pub fn new(message: impl Into<String>, position: SpanPos) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            position,
        }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let SyntaxError { message, position } = self;
        write!(f, "{message} at {position}")
    }
}
