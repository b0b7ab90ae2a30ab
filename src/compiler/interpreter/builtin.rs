use std::collections::HashMap;

use crate::compiler::err::{CompileError, CompileResult};
use crate::compiler::syntax::ast::crumb::{Identifier, SpanPos};

use super::handler::Arguments;
use super::value::{Mismatch, Value};

pub type BuiltinFn<H> = Box<dyn Fn(&Arguments<H>) -> Result<Value<H>, String>>;

/// Functions callable from expressions, e.g. `deg2rad(90)`.
pub struct Builtins<H> {
    functions: HashMap<Identifier, BuiltinFn<H>>,
}

impl<H: Clone + 'static> Builtins<H> {
    #[must_use]
    pub fn empty() -> Builtins<H> {
        Builtins {
            functions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn standard() -> Builtins<H> {
        let mut builtins = Builtins::empty();
        builtins.register("deg2rad", elementwise(f64::to_radians));
        builtins.register("rad2deg", elementwise(f64::to_degrees));
        builtins.register("sqrt", elementwise(f64::sqrt));
        builtins.register("abs", elementwise(f64::abs));
        builtins.register("sin", elementwise(f64::sin));
        builtins.register("cos", elementwise(f64::cos));
        builtins.register("min", pairwise(f64::min));
        builtins.register("max", pairwise(f64::max));
        builtins.register("clamp", |arguments: &Arguments<H>| {
            let [x, lo, hi] = expect_positional::<H, 3>(arguments)?;
            let raised = combine(x, lo, f64::max)?;
            combine(&raised, hi, f64::min)
        });
        builtins
    }

    /// Adds or replaces `name`.
    pub fn register(
        &mut self,
        name: &str,
        function: impl Fn(&Arguments<H>) -> Result<Value<H>, String> + 'static,
    ) {
        self.functions.insert(name.to_string(), Box::new(function));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// # Errors
    ///
    /// `UnknownFunction` for an unregistered name, `BuiltinArgument` when the
    /// function rejects its arguments.
    pub fn call(&self, name: &str, arguments: &Arguments<H>, position: SpanPos) -> CompileResult<Value<H>> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| CompileError::UnknownFunction {
                name: name.to_string(),
                position,
            })?;
        function(arguments).map_err(|message| CompileError::BuiltinArgument {
            name: name.to_string(),
            message,
            position,
        })
    }
}

impl<H: Clone + 'static> Default for Builtins<H> {
    fn default() -> Self {
        Self::standard()
    }
}

fn expect_positional<H, const N: usize>(arguments: &Arguments<H>) -> Result<&[Value<H>; N], String> {
    if !arguments.named.is_empty() {
        return Err(String::from("named arguments are not accepted"));
    }
    <&[Value<H>; N]>::try_from(arguments.positional.as_slice()).map_err(|_| {
        format!(
            "expected {N} argument(s), found {}",
            arguments.positional.len()
        )
    })
}

fn combine<H: Clone>(left: &Value<H>, right: &Value<H>, f: fn(f64, f64) -> f64) -> Result<Value<H>, String> {
    left.zip_with(right, f).map_err(|mismatch| match mismatch {
        Mismatch::Handle => String::from("expected a number or vector, found handle"),
        Mismatch::Length(left, right) => format!("vector lengths differ, {left} and {right}"),
    })
}

fn elementwise<H: Clone>(f: fn(f64) -> f64) -> impl Fn(&Arguments<H>) -> Result<Value<H>, String> {
    move |arguments: &Arguments<H>| {
        let [x] = expect_positional::<H, 1>(arguments)?;
        x.map(f)
            .ok_or_else(|| String::from("expected a number or vector, found handle"))
    }
}

fn pairwise<H: Clone>(f: fn(f64, f64) -> f64) -> impl Fn(&Arguments<H>) -> Result<Value<H>, String> {
    move |arguments: &Arguments<H>| {
        let [a, b] = expect_positional::<H, 2>(arguments)?;
        combine(a, b, f)
    }
}
