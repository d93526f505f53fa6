mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

/// Strips escape backslashes from a word, yielding the argument text.
pub fn translate(lexeme: &str) -> String {
    let mut out = String::with_capacity(lexeme.len());
    let mut chars = lexeme.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(ch);
        }
    }
    out
}
