use std::fmt::{self, Display};

use crate::util::pretty_format::{indent, PrettyFormat};

use self::crumb::{Identifier, Path, Span};
use self::expression::{Argument, Expression};

pub mod crumb;
pub mod expression;
pub mod operator;

/// `$material`, `$group` or a shape line.
pub struct DeclareDetail {
    /// Namespace prefix, the root path when the name is unqualified.
    pub path: Path,
    pub name: Identifier,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

/// `$const a:b = <expression>`
pub struct ConstDetail {
    pub path: Path,
    pub name: Identifier,
    pub expression: Expression,
    pub span: Span,
}

pub enum Unit {
    Shape(DeclareDetail),
    Material(DeclareDetail),
    Group(DeclareDetail),
    Const(ConstDetail),
}

impl Unit {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Unit::Shape(DeclareDetail { span, .. })
            | Unit::Material(DeclareDetail { span, .. })
            | Unit::Group(DeclareDetail { span, .. })
            | Unit::Const(ConstDetail { span, .. }) => *span,
        }
    }

    /// The fully qualified name this unit declares.
    #[must_use]
    pub fn qualified(&self) -> Path {
        match self {
            Unit::Shape(DeclareDetail { path, name, .. })
            | Unit::Material(DeclareDetail { path, name, .. })
            | Unit::Group(DeclareDetail { path, name, .. })
            | Unit::Const(ConstDetail { path, name, .. }) => path.join(name),
        }
    }
}

pub struct File {
    pub units: Vec<Unit>,
}

fn pretty_format_declare(
    f: &mut fmt::Formatter,
    indentation_num: usize,
    tag: &str,
    detail: &DeclareDetail,
) -> fmt::Result {
    let DeclareDetail {
        path,
        name,
        arguments,
        span,
    } = detail;
    writeln!(
        f,
        "{}{tag} {name} in {path} @{span}",
        indent(indentation_num)
    )?;
    arguments
        .iter()
        .try_for_each(|argument| argument.pretty_format(f, indentation_num + 1))
}

impl PrettyFormat for Unit {
    fn pretty_format(&self, f: &mut fmt::Formatter, indentation_num: usize) -> fmt::Result {
        match self {
            Unit::Shape(detail) => pretty_format_declare(f, indentation_num, "Shape", detail),
            Unit::Material(detail) => {
                pretty_format_declare(f, indentation_num, "Material", detail)
            }
            Unit::Group(detail) => pretty_format_declare(f, indentation_num, "Group", detail),
            Unit::Const(ConstDetail {
                path,
                name,
                expression,
                span,
            }) => {
                writeln!(
                    f,
                    "{}Const {name} in {path} @{span}",
                    indent(indentation_num)
                )?;
                expression.pretty_format(f, indentation_num + 1)
            }
        }
    }
}

impl PrettyFormat for File {
    fn pretty_format(&self, f: &mut fmt::Formatter, indentation_num: usize) -> fmt::Result {
        self.units
            .iter()
            .try_for_each(|unit| unit.pretty_format(f, indentation_num))
    }
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.pretty_format(f, 0)
    }
}
