use std::mem;

use tracing::{debug, error};

use crate::compiler::err::{CompileError, CompileResult};
use crate::compiler::lexis::lexer::Lexer;
use crate::compiler::lexis::token::{Token, TokenKind};
use crate::sys_error;

use super::ast::crumb::{Path, Span, SpanPos};
use super::ast::expression::{Argument, ConstantRef, Expression, ExpressionKind, NamedArgument};
use super::ast::operator::{Binary, Unary};
use super::ast::{ConstDetail, DeclareDetail, File, Unit};
use super::err::{
    SyntaxError, BAD_PATH_SEGMENT, COMMENT_NOT_AT_LINE_END, EXPECTED_EQUALS,
    EXPECTED_LEFT_PARENTHESES, EXPECTED_NAME, EXPECTED_NEWLINE, EXPECTED_RIGHT_PARENTHESES,
    QUALIFIED_ARGUMENT_NAME, QUALIFIED_CALL, UNEXPECTED_TOKEN, WRONG_LINE_START,
};

/// `Ok(None)` means a syntax error was recorded and the production gave up.
type Parsed<T> = CompileResult<Option<T>>;

fn start_of(token: &Token) -> SpanPos {
    SpanPos::new(token.line, token.span.0)
}

fn end_of(token: &Token) -> SpanPos {
    SpanPos::new(token.line, token.span.1)
}

fn span_of(token: &Token) -> Span {
    Span::new(start_of(token), end_of(token))
}

fn split_path(path: &Path) -> Option<(Path, String)> {
    path.last().map(|name| (path.beginning(), name.clone()))
}

pub struct Parser {
    lexer: Lexer,
    previous: Token,
    current: Token,
    errors: Vec<SyntaxError>,
}

impl Parser {
    #[must_use]
    pub fn new(code: &str) -> Parser {
        Parser::from_lexer(Lexer::new(code))
    }

    #[must_use]
    pub fn from_lexer(lexer: Lexer) -> Parser {
        let placeholder = Token::new(TokenKind::Eof, "", (0, 0), 0);
        Parser {
            lexer,
            previous: placeholder.clone(),
            current: placeholder,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Parses the whole document. Syntax errors are collected line by line
    /// and returned together; a lexical error aborts immediately.
    ///
    /// # Errors
    pub fn parse_file(&mut self) -> CompileResult<File> {
        self.errors.clear();
        self.advance()?;
        let units = self.parse_body()?;
        if self.errors.is_empty() {
            debug!(units = units.len(), "parsed file");
            Ok(File { units })
        } else {
            Err(CompileError::Syntax(mem::take(&mut self.errors)))
        }
    }

    fn advance(&mut self) -> CompileResult<()> {
        let next = self.lexer.next_token()?;
        self.previous = mem::replace(&mut self.current, next);
        Ok(())
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<bool> {
        let matched = self.check(kind);
        if matched {
            self.advance()?;
        }
        Ok(matched)
    }

    fn push_error(&mut self, message: impl Into<String>) {
        let error = SyntaxError::new(message, start_of(&self.current));
        error!("parser error: {error}");
        self.errors.push(error);
    }

    /// Newlines and comments are insignificant inside argument lists.
    fn skip_newlines(&mut self) -> CompileResult<()> {
        while self.check(TokenKind::Newline) || self.check(TokenKind::Comment) {
            self.advance()?;
        }
        Ok(())
    }

    fn skip_to_next_line(&mut self) -> CompileResult<()> {
        while !self.check(TokenKind::Newline) && !self.check(TokenKind::Eof) {
            self.advance()?;
        }
        self.advance()?;
        while self.check(TokenKind::Newline) {
            self.advance()?;
        }
        Ok(())
    }

    fn parse_body(&mut self) -> CompileResult<Vec<Unit>> {
        let mut units = Vec::new();
        while !self.check(TokenKind::Eof) {
            if let Some(unit) = self.parse_line()? {
                units.push(unit);
            }
        }
        Ok(units)
    }

    fn parse_line(&mut self) -> Parsed<Unit> {
        let unit = match self.current.kind {
            TokenKind::Newline => {
                self.advance()?;
                return Ok(None);
            }
            TokenKind::Comment => {
                self.advance()?;
                if !self.end_of_line()? {
                    self.skip_to_next_line()?;
                }
                return Ok(None);
            }
            TokenKind::Material => {
                self.advance()?;
                self.parse_declaration()?.map(Unit::Material)
            }
            TokenKind::Group => {
                self.advance()?;
                self.parse_declaration()?.map(Unit::Group)
            }
            TokenKind::Const => {
                self.advance()?;
                self.parse_const()?.map(Unit::Const)
            }
            TokenKind::Word => self.parse_shape()?.map(Unit::Shape),
            _ => {
                self.push_error(WRONG_LINE_START);
                None
            }
        };
        match unit {
            Some(unit) => {
                if !self.end_of_line()? {
                    self.skip_to_next_line()?;
                }
                Ok(Some(unit))
            }
            None => {
                self.skip_to_next_line()?;
                Ok(None)
            }
        }
    }

    /// Consumes an optional trailing comment and the line break.
    fn end_of_line(&mut self) -> CompileResult<bool> {
        let had_comment = self.expect(TokenKind::Comment)?;
        if self.expect(TokenKind::Newline)? || self.check(TokenKind::Eof) {
            return Ok(true);
        }
        if had_comment {
            self.push_error(COMMENT_NOT_AT_LINE_END);
        } else {
            self.push_error(EXPECTED_NEWLINE);
        }
        Ok(false)
    }

    fn parse_declaration(&mut self) -> Parsed<DeclareDetail> {
        let start = start_of(&self.previous);
        let Some((path, _)) = self.parse_path()? else {
            return Ok(None);
        };
        self.finish_declaration(start, &path)
    }

    fn parse_shape(&mut self) -> Parsed<DeclareDetail> {
        let start = start_of(&self.current);
        let Some((path, _)) = self.parse_path()? else {
            return Ok(None);
        };
        self.finish_declaration(start, &path)
    }

    fn finish_declaration(&mut self, start: SpanPos, path: &Path) -> Parsed<DeclareDetail> {
        let Some(arguments) = self.parse_arguments()? else {
            return Ok(None);
        };
        let Some((path, name)) = split_path(path) else {
            return Ok(None);
        };
        Ok(Some(DeclareDetail {
            path,
            name,
            arguments,
            span: Span::new(start, end_of(&self.previous)),
        }))
    }

    fn parse_const(&mut self) -> Parsed<ConstDetail> {
        let start = start_of(&self.previous);
        let Some((path, _)) = self.parse_path()? else {
            return Ok(None);
        };
        if !self.expect(TokenKind::Equals)? {
            self.push_error(EXPECTED_EQUALS);
            return Ok(None);
        }
        let Some(expression) = self.parse_expression(None)? else {
            return Ok(None);
        };
        let Some((path, name)) = split_path(&path) else {
            return Ok(None);
        };
        let span = Span::new(start, expression.span.end);
        Ok(Some(ConstDetail {
            path,
            name,
            expression,
            span,
        }))
    }

    fn parse_path(&mut self) -> Parsed<(Path, Span)> {
        if !self.check(TokenKind::Word) {
            self.push_error(EXPECTED_NAME);
            return Ok(None);
        }
        let start = start_of(&self.current);
        let mut end = end_of(&self.current);
        let mut segments = vec![self.current.literal.clone()];
        self.advance()?;
        while self.expect(TokenKind::Colon)? {
            if !self.check(TokenKind::Word) {
                self.push_error(BAD_PATH_SEGMENT);
                return Ok(None);
            }
            end = end_of(&self.current);
            segments.push(self.current.literal.clone());
            self.advance()?;
        }
        Ok(Some((Path(segments.into()), Span::new(start, end))))
    }

    fn parse_arguments(&mut self) -> Parsed<Vec<Argument>> {
        if !self.expect(TokenKind::LeftParentheses)? {
            self.push_error(EXPECTED_LEFT_PARENTHESES);
            return Ok(None);
        }
        self.skip_newlines()?;
        if self.expect(TokenKind::RightParentheses)? {
            return Ok(Some(Vec::new()));
        }
        let Some(first) = self.parse_argument()? else {
            return Ok(None);
        };
        let mut arguments = vec![first];
        while self.expect(TokenKind::Comma)? {
            self.skip_newlines()?;
            if self.check(TokenKind::RightParentheses) {
                break;
            }
            let Some(argument) = self.parse_argument()? else {
                return Ok(None);
            };
            arguments.push(argument);
        }
        self.skip_newlines()?;
        if !self.expect(TokenKind::RightParentheses)? {
            self.push_error(EXPECTED_RIGHT_PARENTHESES);
            return Ok(None);
        }
        Ok(Some(arguments))
    }

    fn parse_argument(&mut self) -> Parsed<Argument> {
        if !self.check(TokenKind::Word) {
            return Ok(self.parse_expression(None)?.map(Argument::Positional));
        }
        let Some((path, span)) = self.parse_path()? else {
            return Ok(None);
        };
        if self.expect(TokenKind::Equals)? {
            if path.len() > 1 {
                self.push_error(QUALIFIED_ARGUMENT_NAME);
                return Ok(None);
            }
            let Some((_, name)) = split_path(&path) else {
                return Ok(None);
            };
            let Some(expression) = self.parse_expression(None)? else {
                return Ok(None);
            };
            let span = span.to(&expression.span);
            return Ok(Some(Argument::Named(NamedArgument {
                name,
                expression,
                span,
            })));
        }
        let Some(operand) = self.finish_path_operand(&path, span)? else {
            return Ok(None);
        };
        Ok(self
            .parse_expression(Some(operand))?
            .map(Argument::Positional))
    }

    /// Precedence climbing with an explicit operator stack. An operator on
    /// top of the stack is reduced first when it binds at least as tight as
    /// the incoming one, which keeps `+ - * /` left associative.
    fn parse_expression(&mut self, first: Option<Expression>) -> Parsed<Expression> {
        let mut operands = Vec::<Expression>::new();
        let mut operators = Vec::<Binary>::new();
        let mut pending = first;
        loop {
            let operand = match pending.take() {
                Some(operand) => operand,
                None => match self.parse_unary()? {
                    Some(operand) => operand,
                    None => return Ok(None),
                },
            };
            operands.push(operand);
            let Some(operator) = Binary::of(self.current.kind) else {
                break;
            };
            while let Some(top) = operators.last() {
                if !top.binds_before(&operator) {
                    break;
                }
                Parser::reduce(&mut operands, &mut operators);
            }
            operators.push(operator);
            self.advance()?;
        }
        while !operators.is_empty() {
            Parser::reduce(&mut operands, &mut operators);
        }
        Ok(operands.pop())
    }

    fn reduce(operands: &mut Vec<Expression>, operators: &mut Vec<Binary>) {
        let (Some(operator), Some(right), Some(left)) =
            (operators.pop(), operands.pop(), operands.pop())
        else {
            sys_error!("operator and operand stacks out of balance");
        };
        let span = left.span.to(&right.span);
        operands.push(Expression::new(
            ExpressionKind::Binary(operator, Box::new(left), Box::new(right)),
            span,
        ));
    }

    fn parse_unary(&mut self) -> Parsed<Expression> {
        match self.current.kind {
            TokenKind::Minus => {
                let start = start_of(&self.current);
                self.advance()?;
                let Some(operand) = self.parse_unary()? else {
                    return Ok(None);
                };
                let span = Span::new(start, operand.span.end);
                Ok(Some(Expression::new(
                    ExpressionKind::Unary(Unary::Negative, Box::new(operand)),
                    span,
                )))
            }
            TokenKind::Number => self.parse_number(),
            TokenKind::LeftParentheses => self.parse_parentheses(),
            TokenKind::Word => {
                let Some((path, span)) = self.parse_path()? else {
                    return Ok(None);
                };
                self.finish_path_operand(&path, span)
            }
            kind => {
                self.push_error(format!("{UNEXPECTED_TOKEN} {kind}"));
                Ok(None)
            }
        }
    }

    fn parse_number(&mut self) -> Parsed<Expression> {
        let span = span_of(&self.current);
        let Ok(literal) = self.current.literal.parse::<f64>() else {
            let message = format!("{UNEXPECTED_TOKEN} {:?}", self.current.literal);
            self.push_error(message);
            return Ok(None);
        };
        self.advance()?;
        Ok(Some(Expression::new(ExpressionKind::Number(literal), span)))
    }

    /// `( expr )` groups, `( expr , expr ... )` builds a vector.
    fn parse_parentheses(&mut self) -> Parsed<Expression> {
        let start = start_of(&self.current);
        self.advance()?;
        let Some(first) = self.parse_expression(None)? else {
            return Ok(None);
        };
        let mut elements = vec![first];
        while self.expect(TokenKind::Comma)? {
            self.skip_newlines()?;
            let Some(element) = self.parse_expression(None)? else {
                return Ok(None);
            };
            elements.push(element);
        }
        if !self.expect(TokenKind::RightParentheses)? {
            self.push_error(EXPECTED_RIGHT_PARENTHESES);
            return Ok(None);
        }
        let span = Span::new(start, end_of(&self.previous));
        if elements.len() == 1 {
            let Some(mut inner) = elements.pop() else {
                return Ok(None);
            };
            inner.span = span;
            return Ok(Some(inner));
        }
        Ok(Some(Expression::new(ExpressionKind::Vector(elements), span)))
    }

    /// A parsed path becomes a call when `(` follows, a constant otherwise.
    fn finish_path_operand(&mut self, path: &Path, span: Span) -> Parsed<Expression> {
        let Some((prefix, name)) = split_path(path) else {
            return Ok(None);
        };
        if !self.check(TokenKind::LeftParentheses) {
            return Ok(Some(Expression::new(
                ExpressionKind::Constant(ConstantRef { path: prefix, name }),
                span,
            )));
        }
        if !prefix.is_root() {
            self.push_error(QUALIFIED_CALL);
        }
        let Some(arguments) = self.parse_arguments()? else {
            return Ok(None);
        };
        if !prefix.is_root() {
            return Ok(None);
        }
        let span = Span::new(span.start, end_of(&self.previous));
        Ok(Some(Expression::new(
            ExpressionKind::Call(name, arguments),
            span,
        )))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::compiler::syntax::ast::crumb::Identifier;

    fn parse(code: &str) -> CompileResult<File> {
        Parser::new(code).parse_file()
    }

    fn parse_const_expression(code: &str) -> Expression {
        let mut file = parse(&format!("$const x = {code}")).unwrap();
        let Some(Unit::Const(detail)) = file.units.pop() else {
            panic!("expected a constant");
        };
        detail.expression
    }

    /// Renders an expression as a fully parenthesised string.
    fn render(expression: &Expression) -> String {
        match &expression.kind {
            ExpressionKind::Binary(operator, left, right) => {
                let symbol = match operator {
                    Binary::Add => "+",
                    Binary::Subtract => "-",
                    Binary::Multiply => "*",
                    Binary::Divide => "/",
                };
                format!("({} {symbol} {})", render(left), render(right))
            }
            ExpressionKind::Unary(Unary::Negative, operand) => format!("-{}", render(operand)),
            ExpressionKind::Constant(constant) => constant.qualified().to_string(),
            ExpressionKind::Call(name, arguments) => format!("{name}/{}", arguments.len()),
            ExpressionKind::Number(number) => number.to_string(),
            ExpressionKind::Vector(elements) => {
                let elements = elements.iter().map(render).collect::<Vec<_>>();
                format!("<{}>", elements.join(", "))
            }
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(render(&parse_const_expression("2 + 3 * 4")), "(2 + (3 * 4))");
        assert_eq!(render(&parse_const_expression("(2 + 3) * 4")), "((2 + 3) * 4)");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(render(&parse_const_expression("1 - 2 - 3")), "((1 - 2) - 3)");
        assert_eq!(
            render(&parse_const_expression("1 - 2 * 3 - 4")),
            "((1 - (2 * 3)) - 4)"
        );
        assert_eq!(render(&parse_const_expression("8 / 4 / 2")), "((8 / 4) / 2)");
    }

    #[test]
    fn test_unary_binds_tightest() {
        assert_eq!(render(&parse_const_expression("-2 * 3")), "(-2 * 3)");
        assert_eq!(render(&parse_const_expression("--x")), "--x");
    }

    #[test]
    fn test_vector_and_call() {
        assert_eq!(
            render(&parse_const_expression("(1, 2 + a:b, deg2rad(90))")),
            "<1, (2 + a:b), deg2rad/1>"
        );
    }

    #[test]
    fn test_expression_spans() {
        let expression = parse_const_expression("1 + (2, 3)");
        assert_eq!(expression.span.start, SpanPos::new(0, 11));
        assert_eq!(expression.span.end, SpanPos::new(0, 21));
    }

    #[test]
    fn test_declarations() {
        let code = indoc! {"
            # a small room
            $material Red(color=(1, 0, 0))
            $group World()
            $const World:height = 3

            World:Room(position=(1, 0, 0))
            sphere(size=1, material=Red)  # trailing comment
        "};
        let file = parse(code).unwrap();
        assert_eq!(file.units.len(), 5);
        let qualified = file
            .units
            .iter()
            .map(|unit| unit.qualified().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            qualified,
            vec!["Red", "World", "World:height", "World:Room", "sphere"]
        );
        let Unit::Shape(room) = &file.units[3] else {
            panic!("expected a shape");
        };
        assert_eq!(room.path, Path::single("World"));
        assert_eq!(room.name, "Room");
        assert_eq!(room.span.start, SpanPos::new(5, 0));
    }

    #[test]
    fn test_multi_line_arguments() {
        let code = indoc! {"
            cube(
                position=(0, 0, 0), # centre
                size=(1, 2, 3),
            )
        "};
        let file = parse(code).unwrap();
        let Some(Unit::Shape(cube)) = file.units.first() else {
            panic!("expected a shape");
        };
        let names = cube
            .arguments
            .iter()
            .filter_map(|argument| match argument {
                Argument::Named(NamedArgument { name, .. }) => Some(name.clone()),
                Argument::Positional(_) => None,
            })
            .collect::<Vec<Identifier>>();
        assert_eq!(names, vec!["position", "size"]);
    }

    #[test]
    fn test_bare_word_argument_is_constant() {
        let file = parse("sphere(Red, radius * 2)").unwrap();
        let Some(Unit::Shape(sphere)) = file.units.first() else {
            panic!("expected a shape");
        };
        let rendered = sphere
            .arguments
            .iter()
            .map(|argument| match argument {
                Argument::Positional(expression) => render(expression),
                Argument::Named(_) => String::from("named"),
            })
            .collect::<Vec<_>>();
        assert_eq!(rendered, vec!["Red", "(radius * 2)"]);
    }

    #[test]
    fn test_errors_accumulate_across_lines() {
        let code = indoc! {"
            sphere(size=)
            cube()
            $const = 4
        "};
        let Err(CompileError::Syntax(errors)) = parse(code) else {
            panic!("expected syntax errors");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].position, SpanPos::new(0, 12));
        assert_eq!(errors[1].position, SpanPos::new(2, 7));
    }

    #[test]
    fn test_bad_line_start() {
        let Err(CompileError::Syntax(errors)) = parse("= 4\nsphere()") else {
            panic!("expected syntax errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, WRONG_LINE_START);
    }

    #[test]
    fn test_qualified_names_rejected_where_plain_expected() {
        let Err(CompileError::Syntax(errors)) = parse("sphere(a:b=1)\n$const y = m:f(2)") else {
            panic!("expected syntax errors");
        };
        let messages = errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>();
        assert_eq!(messages, vec![QUALIFIED_ARGUMENT_NAME, QUALIFIED_CALL]);
    }

    #[test]
    fn test_missing_line_break() {
        let Err(CompileError::Syntax(errors)) = parse("sphere() cube()") else {
            panic!("expected syntax errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, EXPECTED_NEWLINE);
    }

    #[test]
    fn test_lexical_error_is_fatal() {
        assert!(matches!(
            parse("sphere(size=1)\n!"),
            Err(CompileError::UnrecognizedToken { .. })
        ));
    }
}
