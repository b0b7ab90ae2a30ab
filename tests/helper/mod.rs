use std::fs;
use std::rc::Rc;

use tableau::compiler::interpreter::handler::{
    Arguments, Declaration, HandlerError, SceneHandler, ShapeDeclaration,
};
use tableau::compiler::interpreter::Interpreter;
use tableau::constants::common::SCENE_EXT;
use tableau::syntax_analyze;

const PATH_TO_TEST_FILES: &str = "static/test_files";

pub fn test_with(test_name: &str) {
    let path_to_test = format!("{PATH_TO_TEST_FILES}/{test_name}");

    let files = fs::read_dir(path_to_test)
        .unwrap()
        .map(Result::unwrap)
        .map(|entry| {
            let os_filename = entry.file_name();
            let filename = os_filename.to_string_lossy();
            (filename.into_owned(), entry.path())
        })
        .map(Rc::new)
        .collect::<Rc<_>>();
    let (_, output) = files
        .iter()
        .map(Rc::as_ref)
        .find(|(filename, _)| filename == "output")
        .unwrap();
    let output = fs::read_to_string(output).unwrap();

    let scene = files
        .iter()
        .map(Rc::as_ref)
        .find(|(filename, _)| filename.ends_with(SCENE_EXT))
        .map(|(_, file)| fs::read_to_string(file).unwrap())
        .unwrap();

    assert_eq!(transcript(&scene), output);
}

/// Every callback as one line, followed by the error that stopped the run.
fn transcript(code: &str) -> String {
    let mut interpreter = Interpreter::new(Transcript::default());
    let result = syntax_analyze(code).and_then(|file| interpreter.interpret(&file));
    let mut lines = interpreter.into_handler().lines;
    if let Err(e) = result {
        lines.push(format!("error: {e}"));
    }
    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// Handles are qualified names.
#[derive(Default)]
struct Transcript {
    lines: Vec<String>,
}

fn parent_of(parent: Option<&String>) -> String {
    parent.map_or_else(|| String::from("-"), |parent| format!("<{parent}>"))
}

impl Transcript {
    fn declare(&mut self, kind: &str, declaration: &Declaration<'_, String>) -> String {
        let Declaration {
            line,
            parent,
            name,
            arguments,
        } = declaration;
        self.push(kind, *line, &parent_of(*parent), name, arguments);
        match parent {
            Some(parent) => format!("{parent}:{name}"),
            None => name.to_string(),
        }
    }

    fn push(&mut self, kind: &str, line: usize, scope: &str, name: &str, arguments: &Arguments<String>) {
        self.lines
            .push(format!("{kind} {line} {scope} {name}({arguments})"));
    }
}

impl SceneHandler for Transcript {
    type Handle = String;

    fn shape(&mut self, declaration: ShapeDeclaration<'_, String>) -> Result<(), HandlerError> {
        let scope = format!(
            "{} {}",
            declaration.parent_path,
            parent_of(declaration.parent)
        );
        self.push(
            "shape",
            declaration.line,
            &scope,
            declaration.type_name,
            &declaration.arguments,
        );
        Ok(())
    }

    fn group(&mut self, declaration: Declaration<'_, String>) -> Result<String, HandlerError> {
        Ok(self.declare("group", &declaration))
    }

    fn material(&mut self, declaration: Declaration<'_, String>) -> Result<String, HandlerError> {
        if declaration.name == "Broken" {
            return Err(HandlerError::new("material 'Broken' rejected"));
        }
        Ok(self.declare("material", &declaration))
    }
}
