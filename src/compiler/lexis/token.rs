use std::fmt::{self, Display};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sys_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Material,
    Group,
    Const,

    Number,
    Word,

    Plus,
    Minus,
    Star,
    Slash,

    LeftParentheses,
    RightParentheses,
    Comma,
    Colon,
    Equals,

    Comment,

    Newline,
    Eof,
}

impl TokenKind {
    pub const ALL: [TokenKind; 17] = [
        TokenKind::Material,
        TokenKind::Group,
        TokenKind::Const,
        TokenKind::Number,
        TokenKind::Word,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::LeftParentheses,
        TokenKind::RightParentheses,
        TokenKind::Comma,
        TokenKind::Colon,
        TokenKind::Equals,
        TokenKind::Comment,
        TokenKind::Newline,
        TokenKind::Eof,
    ];

    /// Kinds the lexer produces itself instead of matching them in the text.
    #[must_use]
    pub fn is_synthetic(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Eof)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Material => "$material",
            TokenKind::Group => "$group",
            TokenKind::Const => "$const",
            TokenKind::Number => "number",
            TokenKind::Word => "word",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::LeftParentheses => "'('",
            TokenKind::RightParentheses => "')'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Equals => "'='",
            TokenKind::Comment => "comment",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of file",
        };
        write!(f, "{s}")
    }
}

/// Pattern table, tried in order: the first alternative that matches wins.
/// Synthetic kinds carry placeholders that never take part in matching.
pub const TOKEN_PATTERNS: [(&str, TokenKind); 17] = [
    (r"\(", TokenKind::LeftParentheses),
    (r"\)", TokenKind::RightParentheses),
    (r",", TokenKind::Comma),
    (r":", TokenKind::Colon),
    (r"=", TokenKind::Equals),
    (r"\+", TokenKind::Plus),
    (r"-", TokenKind::Minus),
    (r"\*", TokenKind::Star),
    (r"/", TokenKind::Slash),
    (r"#.*$", TokenKind::Comment),
    (r"-?\d+(?:\.\d*)?", TokenKind::Number),
    (r"\$material", TokenKind::Material),
    (r"\$group", TokenKind::Group),
    (r"\$const", TokenKind::Const),
    (r"[_a-zA-Z][_a-zA-Z0-9]*", TokenKind::Word),
    ("<RESERVED_NEWLINE>", TokenKind::Newline),
    ("<RESERVED_EOF>", TokenKind::Eof),
];

pub struct TokenTable {
    regex: Regex,
    kinds: Vec<TokenKind>,
}

impl TokenTable {
    fn build() -> TokenTable {
        check_bijection();
        let (patterns, kinds): (Vec<_>, Vec<_>) = TOKEN_PATTERNS
            .iter()
            .filter(|(_, kind)| !kind.is_synthetic())
            .enumerate()
            .map(|(index, (pattern, kind))| (format!("(?P<t{index}>{pattern})"), *kind))
            .unzip();
        let source = format!("^(?:{})", patterns.join("|"));
        match Regex::new(&source) {
            Ok(regex) => TokenTable { regex, kinds },
            Err(e) => sys_error!("token table does not compile: {e}"),
        }
    }

    /// Matches the first table entry that accepts a prefix of `text`.
    /// Returns the kind and the byte length of the match.
    #[must_use]
    pub fn match_prefix(&self, text: &str) -> Option<(TokenKind, usize)> {
        let captures = self.regex.captures(text)?;
        self.kinds.iter().enumerate().find_map(|(index, kind)| {
            captures
                .name(&format!("t{index}"))
                .map(|matched| (*kind, matched.end()))
        })
    }
}

fn check_bijection() {
    for kind in TokenKind::ALL {
        let count = TOKEN_PATTERNS.iter().filter(|(_, k)| *k == kind).count();
        if count != 1 {
            sys_error!("token kind {kind:?} is bound to {count} patterns");
        }
    }
    for (index, (pattern, _)) in TOKEN_PATTERNS.iter().enumerate() {
        if TOKEN_PATTERNS[index + 1..].iter().any(|(p, _)| p == pattern) {
            sys_error!("pattern {pattern} is bound to more than one token kind");
        }
    }
}

pub static TOKEN_TABLE: Lazy<TokenTable> = Lazy::new(TokenTable::build);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    /// Column range `[start, end)` within the line.
    pub span: (usize, usize),
    pub line: usize,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, literal: &str, span: (usize, usize), line: usize) -> Token {
        Token {
            kind,
            literal: literal.to_string(),
            span,
            line,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Token {
            kind,
            literal,
            span: (start, end),
            line,
        } = self;
        match kind {
            TokenKind::Newline | TokenKind::Eof => write!(f, "{}:{start}-{end} {kind}", line + 1),
            _ => write!(f, "{}:{start}-{end} {kind} {literal:?}", line + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_one_pattern() {
        check_bijection();
        assert_eq!(TokenKind::ALL.len(), TOKEN_PATTERNS.len());
    }

    #[test]
    fn test_minus_wins_over_signed_number() {
        assert_eq!(TOKEN_TABLE.match_prefix("-1"), Some((TokenKind::Minus, 1)));
    }

    #[test]
    fn test_keywords_and_words() {
        assert_eq!(
            TOKEN_TABLE.match_prefix("$material Red"),
            Some((TokenKind::Material, 9))
        );
        assert_eq!(
            TOKEN_TABLE.match_prefix("World:Room"),
            Some((TokenKind::Word, 5))
        );
    }

    #[test]
    fn test_number_with_fraction() {
        assert_eq!(
            TOKEN_TABLE.match_prefix("12.5)"),
            Some((TokenKind::Number, 4))
        );
        assert_eq!(TOKEN_TABLE.match_prefix("3.)"), Some((TokenKind::Number, 2)));
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        assert_eq!(
            TOKEN_TABLE.match_prefix("# lights (1, 2)"),
            Some((TokenKind::Comment, 15))
        );
    }

    #[test]
    fn test_reserved_placeholders_never_match() {
        assert_eq!(TOKEN_TABLE.match_prefix("<RESERVED_EOF>"), None);
        assert_eq!(TOKEN_TABLE.match_prefix("@"), None);
    }
}
