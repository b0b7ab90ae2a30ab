use tracing::trace;

use crate::compiler::err::{CompileError, CompileResult};
use crate::compiler::syntax::ast::crumb::SpanPos;

use super::text::Reader;
use super::token::{Token, TokenKind, TOKEN_TABLE};

#[derive(Default)]
pub struct Lexer {
    reader: Reader,
}

impl Lexer {
    #[must_use]
    pub fn new(code: &str) -> Lexer {
        let mut lexer = Lexer::default();
        lexer.set_src(code);
        lexer
    }

    /// Replaces the source and rewinds both cursors.
    pub fn set_src(&mut self, code: &str) {
        self.reader = Reader::new(code);
    }

    /// # Errors
    pub fn peek_token(&self) -> CompileResult<Token> {
        let mut reader = self.reader.clone();
        Lexer::digest_token(&mut reader)
    }

    /// Once the source is exhausted every call yields `Eof`.
    ///
    /// # Errors
    pub fn next_token(&mut self) -> CompileResult<Token> {
        let token = Lexer::digest_token(&mut self.reader)?;
        trace!(%token, "token");
        Ok(token)
    }

    fn digest_token(reader: &mut Reader) -> CompileResult<Token> {
        if reader.is_exhausted() {
            return Ok(Token::new(TokenKind::Eof, "", (0, 0), reader.line()));
        }
        reader.skip_blanks();
        let rest = reader.rest();
        if rest.is_empty() {
            let (line, column) = (reader.line(), reader.column());
            reader.next_line();
            return Ok(Token::new(
                TokenKind::Newline,
                "\n",
                (column, column + 1),
                line,
            ));
        }
        match TOKEN_TABLE.match_prefix(rest) {
            Some((kind, size)) if size > 0 => {
                let start = reader.column();
                let token = Token::new(kind, &rest[..size], (start, start + size), reader.line());
                reader.forward(size);
                Ok(token)
            }
            _ => Err(CompileError::UnrecognizedToken {
                position: SpanPos::new(reader.line(), reader.column()),
                rest: rest.to_string(),
            }),
        }
    }
}

/// Scans `code` up to and including the first `Eof`.
///
/// # Errors
pub fn tokenize(code: &str) -> CompileResult<Vec<Token>> {
    let mut lexer = Lexer::new(code);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if is_eof {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(code: &str) -> Vec<TokenKind> {
        tokenize(code)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_shape_line() {
        use TokenKind::*;
        assert_eq!(
            kinds("sphere(size=1)"),
            vec![Word, LeftParentheses, Word, Equals, Number, RightParentheses, Newline, Eof]
        );
    }

    #[test]
    fn test_token_positions() {
        let tokens = tokenize("$const  x = 2.5").unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Const, "$const", (0, 6), 0));
        assert_eq!(tokens[1], Token::new(TokenKind::Word, "x", (8, 9), 0));
        assert_eq!(tokens[3], Token::new(TokenKind::Number, "2.5", (12, 15), 0));
        assert_eq!(tokens[4], Token::new(TokenKind::Newline, "\n", (15, 16), 0));
    }

    #[test]
    fn test_blank_lines_and_comments() {
        use TokenKind::*;
        assert_eq!(
            kinds("# header\n\n\t$group World()\n"),
            vec![
                Comment,
                Newline,
                Newline,
                Group,
                Word,
                LeftParentheses,
                RightParentheses,
                Newline,
                Newline,
                Eof
            ]
        );
    }

    #[test]
    fn test_crlf_is_accepted() {
        use TokenKind::*;
        assert_eq!(kinds("a()\r\n"), vec![Word, LeftParentheses, RightParentheses, Newline, Newline, Eof]);
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Word);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Newline);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut lexer = Lexer::new("World:Room");
        assert_eq!(lexer.peek_token().unwrap().literal, "World");
        assert_eq!(lexer.peek_token().unwrap().literal, "World");
        assert_eq!(lexer.next_token().unwrap().literal, "World");
        assert_eq!(lexer.peek_token().unwrap().kind, TokenKind::Colon);
    }

    #[test]
    fn test_set_src_rewinds() {
        let mut lexer = Lexer::new("a");
        lexer.next_token().unwrap();
        lexer.set_src("b");
        assert_eq!(lexer.next_token().unwrap().literal, "b");
    }

    #[test]
    fn test_unrecognized_token_aborts() {
        let error = tokenize("sphere()\ncube(size=@)").unwrap_err();
        let CompileError::UnrecognizedToken { position, rest } = error else {
            panic!("expected a lexical error");
        };
        assert_eq!(position, SpanPos::new(1, 10));
        assert_eq!(rest, "@)");
    }
}
