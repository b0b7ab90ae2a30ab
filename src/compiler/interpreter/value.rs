use std::fmt::{self, Display};

use crate::compiler::err::{CompileError, CompileResult};
use crate::compiler::syntax::ast::crumb::SpanPos;
use crate::compiler::syntax::ast::operator::{Binary, Unary};
use crate::util::common::Arr;

pub const NUMBER: &str = "number";
pub const VECTOR: &str = "vector";
pub const HANDLE: &str = "handle";

/// Anything an expression evaluates to or a name may be bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<H> {
    Number(f64),
    Vector(Arr<f64>),
    /// Opaque result of a group or material declaration.
    Handle(H),
}

/// Why two values could not be combined elementwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    Handle,
    Length(usize, usize),
}

impl<H> Value<H> {
    #[must_use]
    pub fn vector(elements: &[f64]) -> Value<H> {
        Value::Vector(elements.into())
    }

    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => NUMBER,
            Value::Vector(_) => VECTOR,
            Value::Handle(_) => HANDLE,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Value::Vector(elements) => Some(elements),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_handle(&self) -> Option<&H> {
        match self {
            Value::Handle(handle) => Some(handle),
            _ => None,
        }
    }

    /// Applies `f` to a number or to every element of a vector.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Option<Value<H>> {
        match self {
            Value::Number(number) => Some(Value::Number(f(*number))),
            Value::Vector(elements) => Some(Value::Vector(elements.iter().map(|e| f(*e)).collect())),
            Value::Handle(_) => None,
        }
    }

    /// Combines two values elementwise. A number paired with a vector is
    /// broadcast over every element.
    ///
    /// # Errors
    pub fn zip_with(&self, other: &Value<H>, f: impl Fn(f64, f64) -> f64) -> Result<Value<H>, Mismatch> {
        match (self, other) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(f(*l, *r))),
            (Value::Vector(l), Value::Number(r)) => {
                Ok(Value::Vector(l.iter().map(|e| f(*e, *r)).collect()))
            }
            (Value::Number(l), Value::Vector(r)) => {
                Ok(Value::Vector(r.iter().map(|e| f(*l, *e)).collect()))
            }
            (Value::Vector(l), Value::Vector(r)) if l.len() == r.len() => Ok(Value::Vector(
                l.iter().zip(r.iter()).map(|(l, r)| f(*l, *r)).collect(),
            )),
            (Value::Vector(l), Value::Vector(r)) => Err(Mismatch::Length(l.len(), r.len())),
            (Value::Handle(_), _) | (_, Value::Handle(_)) => Err(Mismatch::Handle),
        }
    }

    fn has_zero(&self) -> bool {
        match self {
            Value::Number(number) => *number == 0.0,
            Value::Vector(elements) => elements.iter().any(|e| *e == 0.0),
            Value::Handle(_) => false,
        }
    }

    /// # Errors
    pub fn binary(&self, operator: Binary, other: &Value<H>, position: SpanPos) -> CompileResult<Value<H>> {
        if operator == Binary::Divide && other.has_zero() {
            return Err(CompileError::DivisionByZero { position });
        }
        self.zip_with(other, |l, r| operator.apply(l, r))
            .map_err(|mismatch| match mismatch {
                Mismatch::Length(left, right) => CompileError::DimensionMismatch {
                    operator,
                    left,
                    right,
                    position,
                },
                Mismatch::Handle => CompileError::IllegalOperand {
                    operation: operator.to_string(),
                    operand: HANDLE,
                    position,
                },
            })
    }

    /// # Errors
    pub fn unary(&self, operator: Unary, position: SpanPos) -> CompileResult<Value<H>> {
        match operator {
            Unary::Negative => self.map(|e| -e).ok_or(CompileError::IllegalOperand {
                operation: operator.to_string(),
                operand: HANDLE,
                position,
            }),
        }
    }
}

impl<H> From<f64> for Value<H> {
    fn from(number: f64) -> Value<H> {
        Value::Number(number)
    }
}

impl<H: Display> Display for Value<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(number) => write!(f, "{number}"),
            Value::Vector(elements) => {
                let elements = elements
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                write!(f, "({})", elements.join(", "))
            }
            Value::Handle(handle) => write!(f, "<{handle}>"),
        }
    }
}
