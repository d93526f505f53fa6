use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Error,       // Illegal character
    Cd,          // cd (command position only)
    Pwd,         // pwd (command position only)
    Exit,        // exit (command position only)
    Path,        // Word without wildcard
    Wildcard,    // Word containing an unescaped '*'
    RedirectIn,  // <
    RedirectOut, // >
    Pipe,        // |
    And,         // &&
    Or,          // ||
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Eof => "<end of line>",
            TokenKind::Error => "<illegal character>",
            TokenKind::Cd => "'cd'",
            TokenKind::Pwd => "'pwd'",
            TokenKind::Exit => "'exit'",
            TokenKind::Path => "path",
            TokenKind::Wildcard => "wildcard",
            TokenKind::RedirectIn => "'<'",
            TokenKind::RedirectOut => "'>'",
            TokenKind::Pipe => "'|'",
            TokenKind::And => "'&&'",
            TokenKind::Or => "'||'",
        }
    }

    /// Anything that can stand as a command argument.
    pub fn is_word(&self) -> bool {
        matches!(self, TokenKind::Path | TokenKind::Wildcard)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,       // Original text, escapes included
    pub span: (usize, usize), // Byte range [start, end)
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: &str, span: (usize, usize)) -> Self {
        Token {
            kind,
            lexeme: lexeme.to_string(),
            span,
        }
    }

    pub fn eof(pos: usize) -> Self {
        Token::new(TokenKind::Eof, "", (pos, pos))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lexeme.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "'{}'", self.lexeme)
        }
    }
}
