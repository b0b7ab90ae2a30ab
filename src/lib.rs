use compiler::err::CompileResult;
use compiler::interpreter::handler::SceneHandler;
use compiler::interpreter::Interpreter;
use compiler::lexis::token::Token;
use compiler::syntax::ast::File;
use compiler::syntax::parser::Parser;
use scene::{Scene, SceneBuilder};

pub mod compiler;
pub mod constants;
pub mod scene;
pub mod util;

/// # Errors
pub fn tokenize(code: &str) -> CompileResult<Vec<Token>> {
    compiler::lexis::lexer::tokenize(code)
}

/// # Errors
pub fn syntax_analyze(code: &str) -> CompileResult<File> {
    Parser::new(code).parse_file()
}

/// Feeds `file` to `handler` and hands the handler back once every unit has
/// been interpreted.
///
/// # Errors
pub fn interpret<S: SceneHandler>(file: &File, handler: S) -> CompileResult<S> {
    let mut interpreter = Interpreter::new(handler);
    interpreter.interpret(file)?;
    Ok(interpreter.into_handler())
}

/// Parses and interprets `code` into a [`Scene`].
///
/// # Errors
pub fn load(code: &str) -> CompileResult<Scene> {
    let file = syntax_analyze(code)?;
    let builder = interpret(&file, SceneBuilder::new())?;
    Ok(builder.into_scene())
}
