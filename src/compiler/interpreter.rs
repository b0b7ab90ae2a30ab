use tracing::{debug, info};

use self::builtin::Builtins;
use self::handler::{Arguments, Declaration, SceneHandler, ShapeDeclaration};
use self::value::Value;

use super::environment::Environment;
use super::err::{CompileError, CompileResult};
use super::syntax::ast::crumb::{Path, SpanPos};
use super::syntax::ast::expression::{Argument, Expression, ExpressionKind, NamedArgument};
use super::syntax::ast::{ConstDetail, DeclareDetail, File, Unit};

pub mod builtin;
pub mod handler;
pub mod value;

#[derive(Clone, Copy)]
enum DeclareKind {
    Group,
    Material,
}

/// Walks a parsed file in order, evaluating expressions and forwarding
/// declarations to the scene handler.
pub struct Interpreter<S: SceneHandler> {
    handler: S,
    builtins: Builtins<S::Handle>,
    environment: Environment<Value<S::Handle>>,
}

impl<S: SceneHandler> Interpreter<S> {
    #[must_use]
    pub fn new(handler: S) -> Interpreter<S> {
        Interpreter::with_builtins(handler, Builtins::standard())
    }

    #[must_use]
    pub fn with_builtins(handler: S, builtins: Builtins<S::Handle>) -> Interpreter<S> {
        Interpreter {
            handler,
            builtins,
            environment: Environment::new(),
        }
    }

    /// Runs every unit of `file`. The environment is emptied first, so a run
    /// never sees names bound by a previous one. Stops at the first error.
    ///
    /// # Errors
    pub fn interpret(&mut self, file: &File) -> CompileResult<()> {
        self.environment.clear();
        for unit in &file.units {
            self.interpret_unit(unit)?;
        }
        info!(
            units = file.units.len(),
            bindings = self.environment.len(),
            "interpretation finished"
        );
        Ok(())
    }

    #[must_use]
    pub fn environment(&self) -> &Environment<Value<S::Handle>> {
        &self.environment
    }

    pub fn builtins_mut(&mut self) -> &mut Builtins<S::Handle> {
        &mut self.builtins
    }

    #[must_use]
    pub fn handler(&self) -> &S {
        &self.handler
    }

    pub fn into_handler(self) -> S {
        self.handler
    }

    fn interpret_unit(&mut self, unit: &Unit) -> CompileResult<()> {
        debug!(name = %unit.qualified(), line = unit.span().line(), "interpreting unit");
        match unit {
            Unit::Const(detail) => self.interpret_const(detail),
            Unit::Group(detail) => self.interpret_declaration(detail, DeclareKind::Group),
            Unit::Material(detail) => self.interpret_declaration(detail, DeclareKind::Material),
            Unit::Shape(detail) => self.interpret_shape(detail),
        }
    }

    fn interpret_const(&mut self, detail: &ConstDetail) -> CompileResult<()> {
        let ConstDetail {
            path,
            name,
            expression,
            span,
        } = detail;
        let value = self.evaluate(expression)?;
        self.environment.declare(path.join(name), value, span.start)
    }

    fn interpret_declaration(&mut self, detail: &DeclareDetail, kind: DeclareKind) -> CompileResult<()> {
        let DeclareDetail {
            path,
            name,
            arguments,
            span,
        } = detail;
        let qualified = path.join(name);
        self.environment.ensure_free(&qualified, span.start)?;
        let arguments = self.evaluate_arguments(arguments)?;
        let parent = resolve_parent(&self.environment, path, span.start)?;
        let declaration = Declaration {
            line: span.line(),
            parent,
            name,
            arguments,
        };
        let handle = match kind {
            DeclareKind::Group => self.handler.group(declaration)?,
            DeclareKind::Material => self.handler.material(declaration)?,
        };
        self.environment
            .declare(qualified, Value::Handle(handle), span.start)
    }

    fn interpret_shape(&mut self, detail: &DeclareDetail) -> CompileResult<()> {
        let DeclareDetail {
            path,
            name,
            arguments,
            span,
        } = detail;
        let arguments = self.evaluate_arguments(arguments)?;
        let parent = resolve_parent(&self.environment, path, span.start)?;
        self.handler.shape(ShapeDeclaration {
            line: span.line(),
            parent_path: path,
            parent,
            type_name: name,
            arguments,
        })?;
        Ok(())
    }

    fn evaluate_arguments(&self, arguments: &[Argument]) -> CompileResult<Arguments<S::Handle>> {
        let mut evaluated = Arguments::new();
        for argument in arguments {
            match argument {
                Argument::Positional(expression) => {
                    evaluated.positional.push(self.evaluate(expression)?);
                }
                Argument::Named(NamedArgument {
                    name,
                    expression,
                    span,
                }) => {
                    if evaluated.named.contains_key(name) {
                        return Err(CompileError::DuplicateArgument {
                            name: name.clone(),
                            position: span.start,
                        });
                    }
                    let value = self.evaluate(expression)?;
                    evaluated.named.insert(name.clone(), value);
                }
            }
        }
        Ok(evaluated)
    }

    fn evaluate(&self, expression: &Expression) -> CompileResult<Value<S::Handle>> {
        let position = expression.span.start;
        match &expression.kind {
            ExpressionKind::Binary(operator, left, right) => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                left.binary(*operator, &right, position)
            }
            ExpressionKind::Unary(operator, operand) => {
                self.evaluate(operand)?.unary(*operator, position)
            }
            ExpressionKind::Constant(constant) => self
                .environment
                .lookup(&constant.qualified(), position)
                .cloned(),
            ExpressionKind::Call(name, arguments) => {
                let arguments = self.evaluate_arguments(arguments)?;
                self.builtins.call(name, &arguments, position)
            }
            ExpressionKind::Number(number) => Ok(Value::Number(*number)),
            ExpressionKind::Vector(elements) => {
                let mut numbers = Vec::with_capacity(elements.len());
                for element in elements {
                    match self.evaluate(element)? {
                        Value::Number(number) => numbers.push(number),
                        other => {
                            return Err(CompileError::NonScalarVectorElement {
                                found: other.kind_name(),
                                position: element.span.start,
                            })
                        }
                    }
                }
                Ok(Value::Vector(numbers.into()))
            }
        }
    }
}

/// The handle bound to a declaration's namespace prefix, `None` at the root.
fn resolve_parent<'e, H>(
    environment: &'e Environment<Value<H>>,
    path: &Path,
    position: SpanPos,
) -> CompileResult<Option<&'e H>> {
    if path.is_root() {
        return Ok(None);
    }
    let value = environment.lookup(path, position)?;
    value
        .as_handle()
        .map(Some)
        .ok_or_else(|| CompileError::IllegalOperand {
            operation: format!("using '{path}' as a parent"),
            operand: value.kind_name(),
            position,
        })
}
