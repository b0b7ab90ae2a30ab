use std::fmt::{self, Display};

use crate::util::pretty_format::{indent, PrettyFormat};

use super::crumb::{Identifier, Path, Span};
use super::operator::{Binary, Unary};

pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

pub enum ExpressionKind {
    Binary(Binary, Box<Expression>, Box<Expression>),
    Unary(Unary, Box<Expression>),

    /// Reference to a name bound by an earlier line.
    Constant(ConstantRef),
    Call(Identifier, Vec<Argument>),

    Number(f64),
    Vector(Vec<Expression>),
}

pub struct ConstantRef {
    pub path: Path,
    pub name: Identifier,
}

impl ConstantRef {
    #[must_use]
    pub fn qualified(&self) -> Path {
        self.path.join(&self.name)
    }
}

pub struct NamedArgument {
    pub name: Identifier,
    pub expression: Expression,
    pub span: Span,
}

pub enum Argument {
    Positional(Expression),
    Named(NamedArgument),
}

impl Argument {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Argument::Positional(expression) => expression.span,
            Argument::Named(NamedArgument { span, .. }) => *span,
        }
    }
}

impl Expression {
    #[must_use]
    pub fn new(kind: ExpressionKind, span: Span) -> Expression {
        Expression { kind, span }
    }
}

impl PrettyFormat for Expression {
    fn pretty_format(&self, f: &mut fmt::Formatter, indentation_num: usize) -> fmt::Result {
        let indentation = indent(indentation_num);
        match &self.kind {
            ExpressionKind::Binary(operator, left, right) => {
                writeln!(f, "{indentation}{operator}")?;
                left.pretty_format(f, indentation_num + 1)?;
                right.pretty_format(f, indentation_num + 1)?;
            }
            ExpressionKind::Unary(operator, operand) => {
                writeln!(f, "{indentation}{operator}")?;
                operand.pretty_format(f, indentation_num + 1)?;
            }
            ExpressionKind::Constant(constant) => {
                writeln!(f, "{indentation}Constant {}", constant.qualified())?;
            }
            ExpressionKind::Call(callee, arguments) => {
                writeln!(f, "{indentation}Call {callee}")?;
                for argument in arguments {
                    argument.pretty_format(f, indentation_num + 1)?;
                }
            }
            ExpressionKind::Number(literal) => {
                writeln!(f, "{indentation}{literal}")?;
            }
            ExpressionKind::Vector(elements) => {
                writeln!(f, "{indentation}Vector[{}]", elements.len())?;
                elements
                    .iter()
                    .try_for_each(|element| element.pretty_format(f, indentation_num + 1))?;
            }
        }
        Ok(())
    }
}

impl PrettyFormat for Argument {
    fn pretty_format(&self, f: &mut fmt::Formatter, indentation_num: usize) -> fmt::Result {
        match self {
            Argument::Positional(expression) => expression.pretty_format(f, indentation_num),
            Argument::Named(NamedArgument {
                name, expression, ..
            }) => {
                writeln!(f, "{}{name} =", indent(indentation_num))?;
                expression.pretty_format(f, indentation_num + 1)
            }
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.pretty_format(f, 0)
    }
}
