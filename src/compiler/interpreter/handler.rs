use std::fmt::{self, Display};

use indexmap::IndexMap;
use thiserror::Error;

use crate::compiler::syntax::ast::crumb::{Identifier, Path};

use super::value::Value;

/// Failure reported by a scene collaborator. The message reaches the user
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> HandlerError {
        HandlerError {
            message: message.into(),
        }
    }
}

/// Evaluated arguments of a declaration or call, both groups in the order
/// they were written.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments<H> {
    pub positional: Vec<Value<H>>,
    pub named: IndexMap<Identifier, Value<H>>,
}

impl<H> Arguments<H> {
    #[must_use]
    pub fn new() -> Arguments<H> {
        Arguments {
            positional: Vec::new(),
            named: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value<H>> {
        self.named.get(name)
    }
}

impl<H> Default for Arguments<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Display> Display for Arguments<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Arguments { positional, named } = self;
        let rendered = positional
            .iter()
            .map(ToString::to_string)
            .chain(named.iter().map(|(name, value)| format!("{name}={value}")))
            .collect::<Vec<_>>();
        write!(f, "{}", rendered.join(", "))
    }
}

/// `$group` or `$material` as seen by the handler.
pub struct Declaration<'a, H> {
    /// 0-based line of the declaration.
    pub line: usize,
    /// Handle bound to the namespace prefix, `None` at the root.
    pub parent: Option<&'a H>,
    pub name: &'a str,
    pub arguments: Arguments<H>,
}

/// A shape line. Shapes are never bound, so the handler returns nothing.
pub struct ShapeDeclaration<'a, H> {
    pub line: usize,
    pub parent_path: &'a Path,
    pub parent: Option<&'a H>,
    pub type_name: &'a str,
    pub arguments: Arguments<H>,
}

/// The scene-building collaborator driven by the interpreter. Calls arrive
/// synchronously, in document order.
pub trait SceneHandler {
    type Handle: Clone + 'static;

    /// # Errors
    fn shape(&mut self, declaration: ShapeDeclaration<'_, Self::Handle>) -> Result<(), HandlerError>;

    /// # Errors
    fn group(&mut self, declaration: Declaration<'_, Self::Handle>) -> Result<Self::Handle, HandlerError>;

    /// # Errors
    fn material(&mut self, declaration: Declaration<'_, Self::Handle>) -> Result<Self::Handle, HandlerError>;
}
