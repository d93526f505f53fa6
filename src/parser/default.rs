use std::mem;

use crate::ast::{Command, CommandKind, CommandTree, RedirectKind};
use crate::lexer::{self, Lexer, Token, TokenKind};
use crate::parser::{ParseError, Parser};

/// Recursive descent parser with a single token of lookahead.
///
/// `t` is the last consumed token and `la` the lookahead; `advance` moves
/// `la` into `t` and lexes a fresh lookahead.
pub struct DefaultParser<'a> {
    lexer: Lexer<'a>,
    t: Token,
    la: Token,
}

impl<'a> DefaultParser<'a> {
    pub fn new(line: &'a str) -> Self {
        let mut lexer = Lexer::new(line);
        let la = lexer.next_token();
        Self {
            lexer,
            t: Token::eof(0),
            la,
        }
    }

    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.t = mem::replace(&mut self.la, next);
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), ParseError> {
        if self.la.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        if self.la.kind == TokenKind::Error {
            ParseError::IllegalCharacter {
                found: self.la.lexeme.clone(),
                pos: self.la.span.0,
            }
        } else {
            ParseError::UnexpectedToken {
                found: self.la.to_string(),
                expected,
                pos: self.la.span.0,
            }
        }
    }
}

impl<'a> Parser for DefaultParser<'a> {
    fn parse(&mut self) -> Result<CommandTree, ParseError> {
        if self.la.kind == TokenKind::Eof {
            return Err(ParseError::EmptyInput);
        }
        let tree = self.parse_and_or()?;
        self.expect(TokenKind::Eof, "end of line")?;
        Ok(tree)
    }
}

impl<'a> DefaultParser<'a> {
    // `&&` and `||` share one precedence level and associate to the left.
    fn parse_and_or(&mut self) -> Result<CommandTree, ParseError> {
        let mut node = CommandTree::Pipeline(self.parse_pipeline()?);
        loop {
            match self.la.kind {
                TokenKind::And => {
                    self.advance();
                    let rhs = CommandTree::Pipeline(self.parse_pipeline()?);
                    node = CommandTree::And(Box::new(node), Box::new(rhs));
                }
                TokenKind::Or => {
                    self.advance();
                    let rhs = CommandTree::Pipeline(self.parse_pipeline()?);
                    node = CommandTree::Or(Box::new(node), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn parse_pipeline(&mut self) -> Result<Vec<Command>, ParseError> {
        let mut commands = vec![self.parse_redirected_command()?];
        while self.la.kind == TokenKind::Pipe {
            self.advance();
            commands.push(self.parse_redirected_command()?);
        }
        Ok(commands)
    }

    fn parse_redirected_command(&mut self) -> Result<Command, ParseError> {
        let mut cmd = self.parse_command()?;
        while self.la.kind.is_word() {
            self.advance();
            cmd.args.push(lexer::translate(&self.t.lexeme));
        }
        while matches!(self.la.kind, TokenKind::RedirectIn | TokenKind::RedirectOut) {
            self.parse_redirect(&mut cmd)?;
        }
        Ok(cmd)
    }

    fn parse_command(&mut self) -> Result<Command, ParseError> {
        let kind = match self.la.kind {
            TokenKind::Path => CommandKind::External,
            TokenKind::Cd => CommandKind::Cd,
            TokenKind::Pwd => CommandKind::Pwd,
            TokenKind::Exit => CommandKind::Exit,
            _ => return Err(self.unexpected("command")),
        };
        self.advance();
        Ok(Command::new(kind, &lexer::translate(&self.t.lexeme)))
    }

    fn parse_redirect(&mut self, cmd: &mut Command) -> Result<(), ParseError> {
        let kind = if self.la.kind == TokenKind::RedirectIn {
            RedirectKind::In
        } else {
            RedirectKind::Out
        };
        self.advance();
        self.expect(TokenKind::Path, "redirection path")?;
        let path = lexer::translate(&self.t.lexeme);

        let slot = match kind {
            RedirectKind::In => &mut cmd.redirect_in,
            RedirectKind::Out => &mut cmd.redirect_out,
        };
        if slot.is_some() {
            return Err(ParseError::DuplicateRedirect { kind, path });
        }
        *slot = Some(path);
        Ok(())
    }
}
