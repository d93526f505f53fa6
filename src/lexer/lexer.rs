use super::token::{Token, TokenKind};

/// One-token-per-call lexer over a single input line.
///
/// Builtin names are only recognised in command position, so `echo cd`
/// yields a plain path token for `cd`.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    command_position: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            command_position: true,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Token::eof(start),
        };

        let token = match ch {
            '<' => self.operator(TokenKind::RedirectIn, 1),
            '>' => self.operator(TokenKind::RedirectOut, 1),
            '|' => {
                if self.peek_nth(1) == Some('|') {
                    self.operator(TokenKind::Or, 2)
                } else {
                    self.operator(TokenKind::Pipe, 1)
                }
            }
            '&' => {
                if self.peek_nth(1) == Some('&') {
                    self.operator(TokenKind::And, 2)
                } else {
                    // Background jobs are not supported
                    self.operator(TokenKind::Error, 1)
                }
            }
            c if c.is_control() => {
                self.pos += c.len_utf8();
                Token::new(TokenKind::Error, &self.input[start..self.pos], (start, self.pos))
            }
            _ => self.read_word(),
        };

        self.command_position = matches!(
            token.kind,
            TokenKind::Pipe | TokenKind::And | TokenKind::Or
        );
        token
    }

    pub fn tokenize_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = matches!(token.kind, TokenKind::Eof | TokenKind::Error);
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !matches!(ch, ' ' | '\t' | '\r' | '\n') {
                break;
            }
            self.pos += 1;
        }
    }

    // Operators are ASCII, so `len` is a byte count.
    fn operator(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.pos;
        self.pos += len;
        Token::new(kind, &self.input[start..self.pos], (start, self.pos))
    }

    fn read_word(&mut self) -> Token {
        let start = self.pos;
        let mut wildcard = false;

        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' | '<' | '>' | '|' | '&' => break,
                '\\' => {
                    self.pos += 1;
                    match self.peek() {
                        Some(escaped) => self.pos += escaped.len_utf8(),
                        None => {
                            // Dangling escape at end of line
                            return Token::new(
                                TokenKind::Error,
                                &self.input[start..self.pos],
                                (start, self.pos),
                            );
                        }
                    }
                }
                '*' => {
                    wildcard = true;
                    self.pos += 1;
                }
                c if c.is_control() => break,
                c => self.pos += c.len_utf8(),
            }
        }

        let lexeme = &self.input[start..self.pos];
        let kind = if wildcard {
            TokenKind::Wildcard
        } else if self.command_position {
            match lexeme {
                "cd" => TokenKind::Cd,
                "pwd" => TokenKind::Pwd,
                "exit" => TokenKind::Exit,
                _ => TokenKind::Path,
            }
        } else {
            TokenKind::Path
        };
        Token::new(kind, lexeme, (start, self.pos))
    }
}
