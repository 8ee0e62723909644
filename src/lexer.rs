//! @ai:module:intent Convert raw TextGrid text into positioned tokens
//! @ai:module:layer application
//! @ai:module:public_api tokenize, Token, TokenKind
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::{Error, Position, Result};
use regex::Regex;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::OnceLock;

/// @ai:intent Kind and value of a lexed token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Number(f64),
    Str(String),
    Flag(Flag),
    LBracket,
    RBracket,
    Equals,
    Colon,
    Eof,
}

/// Angle-bracketed markers written after `tiers?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Exists,
    Absent,
}

/// @ai:intent A token with the position of its first character
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "`{name}`"),
            TokenKind::Number(value) => write!(f, "number {value}"),
            TokenKind::Str(value) => write!(f, "string {value:?}"),
            TokenKind::Flag(Flag::Exists) => write!(f, "`<exists>`"),
            TokenKind::Flag(Flag::Absent) => write!(f, "`<absent>`"),
            TokenKind::LBracket => write!(f, "`[`"),
            TokenKind::RBracket => write!(f, "`]`"),
            TokenKind::Equals => write!(f, "`=`"),
            TokenKind::Colon => write!(f, "`:`"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// @ai:intent Tokenize a whole TextGrid source, ending with a single Eof token
/// @ai:post last token is Eof; no token is produced for whitespace or comments
/// @ai:effects pure
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let tokens = Lexer::new(source).lex_all()?;
    tracing::trace!(count = tokens.len(), "tokenized input");
    Ok(tokens)
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("Invalid regex pattern")
    })
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn lex_all(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '!' {
                while matches!(self.chars.peek(), Some(&c) if c != '\n') {
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();
        let position = self.position();

        let Some(&c) = self.chars.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position,
            });
        };

        let kind = match c {
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '=' => self.single(TokenKind::Equals),
            ':' => self.single(TokenKind::Colon),
            '"' => self.string(position)?,
            '<' => self.flag(position)?,
            c if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => self.number(position)?,
            c if c.is_alphabetic() || c == '_' => self.ident(),
            other => {
                return Err(Error::Lex {
                    position,
                    text: other.to_string(),
                })
            }
        };

        Ok(Token { kind, position })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    fn ident(&mut self) -> TokenKind {
        let mut name = self.take_while(|c| c.is_alphanumeric() || c == '_');
        if self.chars.peek() == Some(&'?') {
            self.bump();
            name.push('?');
        }
        TokenKind::Ident(name)
    }

    /// Greedy over the numeric alphabet so `1.2.3` fails as a whole.
    fn number(&mut self, position: Position) -> Result<TokenKind> {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            let after_exponent = matches!(text.chars().last(), Some('e' | 'E'));
            let accept = c.is_ascii_digit()
                || c == '.'
                || matches!(c, 'e' | 'E')
                || (matches!(c, '+' | '-') && (text.is_empty() || after_exponent));
            if !accept {
                break;
            }
            text.push(c);
            self.bump();
        }

        if !number_pattern().is_match(&text) {
            return Err(Error::Lex { position, text });
        }
        match text.parse::<f64>() {
            // overflowing literals parse to infinity
            Ok(value) if value.is_finite() => Ok(TokenKind::Number(value)),
            _ => Err(Error::Lex { position, text }),
        }
    }

    fn string(&mut self, position: Position) -> Result<TokenKind> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') if self.chars.peek() == Some(&'"') => {
                    self.bump();
                    value.push('"');
                }
                Some('"') => return Ok(TokenKind::Str(value)),
                Some(c) => value.push(c),
                None => {
                    return Err(Error::Lex {
                        position,
                        text: format!("unterminated string \"{value}"),
                    })
                }
            }
        }
    }

    fn flag(&mut self, position: Position) -> Result<TokenKind> {
        let mut text = String::new();
        while let Some(c) = self.bump() {
            text.push(c);
            if c == '>' || c == '\n' {
                break;
            }
        }
        match text.as_str() {
            "<exists>" => Ok(TokenKind::Flag(Flag::Exists)),
            "<absent>" => Ok(TokenKind::Flag(Flag::Absent)),
            _ => Err(Error::Lex {
                position,
                text: text.trim_end().to_string(),
            }),
        }
    }
}
