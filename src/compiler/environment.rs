use std::collections::HashMap;

use super::err::{CompileError, CompileResult};
use super::syntax::ast::crumb::{Path, SpanPos};

/// Flat namespace of everything a document has bound so far, keyed by the
/// fully qualified path. Names are never rebound.
pub struct Environment<T> {
    bindings: HashMap<Path, T>,
}

impl<T> Environment<T> {
    #[must_use]
    pub fn new() -> Environment<T> {
        Environment {
            bindings: HashMap::new(),
        }
    }

    /// # Errors
    ///
    /// `Redefinition` if `name` is already bound; the old binding is kept.
    pub fn declare(&mut self, name: Path, value: T, position: SpanPos) -> CompileResult<()> {
        if self.bindings.contains_key(&name) {
            return Err(CompileError::Redefinition { name, position });
        }
        self.bindings.insert(name, value);
        Ok(())
    }

    /// # Errors
    pub fn ensure_free(&self, name: &Path, position: SpanPos) -> CompileResult<()> {
        if self.contains(name) {
            return Err(CompileError::Redefinition {
                name: name.clone(),
                position,
            });
        }
        Ok(())
    }

    /// # Errors
    pub fn lookup(&self, name: &Path, position: SpanPos) -> CompileResult<&T> {
        self.bindings
            .get(name)
            .ok_or_else(|| CompileError::UnboundName {
                name: name.clone(),
                position,
            })
    }

    #[must_use]
    pub fn get(&self, name: &Path) -> Option<&T> {
        self.bindings.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &Path) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &T)> {
        self.bindings.iter()
    }
}

impl<T> Default for Environment<T> {
    fn default() -> Self {
        Self::new()
    }
}
