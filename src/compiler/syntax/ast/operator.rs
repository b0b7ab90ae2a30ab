use std::fmt::Display;
use std::fmt::{self};

use crate::compiler::lexis::token::TokenKind;

pub trait Operator {
    /// precedence and associativity:
    /// - (unary) - : 30 right
    /// - * / : 20 left
    /// - + - : 10 left
    fn precedence(&self) -> u8;
    fn is_left_associative(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unary {
    Negative,
}

impl Operator for Unary {
    fn precedence(&self) -> u8 {
        match self {
            Unary::Negative => 30u8,
        }
    }

    fn is_left_associative(&self) -> bool {
        match self {
            Unary::Negative => false,
        }
    }
}

impl Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unary::Negative => "Negative",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binary {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Binary {
    #[must_use]
    pub fn of(kind: TokenKind) -> Option<Binary> {
        match kind {
            TokenKind::Plus => Some(Binary::Add),
            TokenKind::Minus => Some(Binary::Subtract),
            TokenKind::Star => Some(Binary::Multiply),
            TokenKind::Slash => Some(Binary::Divide),
            _ => None,
        }
    }

    #[must_use]
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Binary::Add => left + right,
            Binary::Subtract => left - right,
            Binary::Multiply => left * right,
            Binary::Divide => left / right,
        }
    }

    /// Whether `self`, sitting on top of the operator stack, must be reduced
    /// before `incoming` is pushed.
    #[must_use]
    pub fn binds_before(&self, incoming: &Binary) -> bool {
        if incoming.is_left_associative() {
            self.precedence() >= incoming.precedence()
        } else {
            self.precedence() > incoming.precedence()
        }
    }
}

impl Operator for Binary {
    fn precedence(&self) -> u8 {
        match self {
            Binary::Multiply | Binary::Divide => 20u8,
            Binary::Add | Binary::Subtract => 10u8,
        }
    }

    fn is_left_associative(&self) -> bool {
        match self {
            Binary::Add | Binary::Subtract | Binary::Multiply | Binary::Divide => true,
        }
    }
}

impl Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Binary::Add => "Add",
            Binary::Subtract => "Subtract",
            Binary::Multiply => "Multiply",
            Binary::Divide => "Divide",
        };
        write!(f, "{s}")
    }
}
