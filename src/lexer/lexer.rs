use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{Position, Span, MK_TOKEN};

use super::tokens::{LexError, Token, TokenKind, RESERVED_LOOKUP};

lazy_static! {
    static ref NUMBER_PATTERN: Regex = Regex::new("^[0-9]+(\\.[0-9]+)?$").unwrap();
}

/// Anything the parser can pull tokens from.
///
/// Implementations must keep returning `EOF` once the input is exhausted.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

/// Pull-based lexer over an in-memory buffer.
///
/// Tracks the current character, one character of lookahead, the byte offset
/// and the line/column of the current character.
#[derive(Clone)]
pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    offset: u32,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            source: source.chars().collect(),
            pos: 0,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn ch(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn read_char(&mut self) {
        if let Some(ch) = self.ch() {
            self.pos += 1;
            self.offset += ch.len_utf8() as u32;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    fn slice(&self, from: usize) -> String {
        self.source[from..self.pos].iter().collect()
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        loop {
            while matches!(self.ch(), Some(c) if c.is_whitespace()) {
                self.read_char();
            }

            if self.ch() == Some('/') && self.peek_char() == Some('/') {
                while !matches!(self.ch(), None | Some('\n')) {
                    self.read_char();
                }
                continue;
            }

            break;
        }
    }

    fn finish(&self, kind: TokenKind, value: String, start: Position) -> Token {
        MK_TOKEN!(
            kind,
            value,
            Span {
                start,
                end: self.position()
            }
        )
    }

    fn single(&mut self, kind: TokenKind, start: Position) -> Token {
        let from = self.pos;
        self.read_char();
        let value = self.slice(from);
        self.finish(kind, value, start)
    }

    /// Emits `double` when the lookahead is `second`, `single` otherwise.
    fn one_or_two(
        &mut self,
        second: char,
        double: TokenKind,
        single: TokenKind,
        start: Position,
    ) -> Token {
        let from = self.pos;
        self.read_char();
        let kind = if self.ch() == Some(second) {
            self.read_char();
            double
        } else {
            single
        };
        let value = self.slice(from);
        self.finish(kind, value, start)
    }

    fn read_identifier(&mut self, start: Position) -> Token {
        let from = self.pos;
        while matches!(self.ch(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.read_char();
        }

        let value = self.slice(from);
        let kind = RESERVED_LOOKUP
            .get(value.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);

        self.finish(kind, value, start)
    }

    fn read_number(&mut self, start: Position) -> Token {
        let from = self.pos;
        while matches!(self.ch(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.read_char();
        }

        let value = self.slice(from);
        let kind = if !NUMBER_PATTERN.is_match(&value) {
            TokenKind::Illegal(LexError::InvalidFloatLiteral)
        } else if value.contains('.') {
            TokenKind::Float
        } else {
            TokenKind::Int
        };

        self.finish(kind, value, start)
    }

    fn read_string(&mut self, start: Position) -> Token {
        // Opening quote
        self.read_char();
        let from = self.pos;

        loop {
            match self.ch() {
                None => {
                    let value = self.slice(from);
                    return self.finish(
                        TokenKind::Illegal(LexError::UnterminatedString),
                        value,
                        start,
                    );
                }
                Some('"') => break,
                Some('\\') => {
                    self.read_char();
                    self.read_char();
                }
                Some(_) => self.read_char(),
            }
        }

        let value = self.slice(from);
        // Closing quote
        self.read_char();
        self.finish(TokenKind::Str, value, start)
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.position();

        let Some(ch) = self.ch() else {
            return self.finish(TokenKind::EOF, String::from("EOF"), start);
        };

        let token = match ch {
            '.' => self.single(TokenKind::Dot, start),
            ';' => self.single(TokenKind::Semicolon, start),
            ',' => self.single(TokenKind::Comma, start),
            '(' => self.single(TokenKind::OpenParen, start),
            ')' => self.single(TokenKind::CloseParen, start),
            '{' => self.single(TokenKind::OpenCurly, start),
            '}' => self.single(TokenKind::CloseCurly, start),
            '+' => self.single(TokenKind::Plus, start),
            '-' => self.single(TokenKind::Dash, start),
            '*' => self.single(TokenKind::Star, start),
            '/' => self.single(TokenKind::Slash, start),
            '=' => self.one_or_two('=', TokenKind::Equals, TokenKind::Assignment, start),
            '!' => self.one_or_two('=', TokenKind::NotEquals, TokenKind::Not, start),
            '<' => self.one_or_two('=', TokenKind::LessEquals, TokenKind::Less, start),
            '>' => self.one_or_two('=', TokenKind::GreaterEquals, TokenKind::Greater, start),
            ':' => self.one_or_two(
                ':',
                TokenKind::DoubleColon,
                TokenKind::Illegal(LexError::IllegalCharacter),
                start,
            ),
            '"' => self.read_string(start),
            c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier(start),
            c if c.is_ascii_digit() => self.read_number(start),
            _ => self.single(TokenKind::Illegal(LexError::IllegalCharacter), start),
        };

        trace!(
            "lexed {} {:?} at {}:{}",
            token.kind,
            token.value,
            token.line(),
            token.column()
        );

        token
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Token {
        Lexer::next_token(self)
    }
}

/// Replays an already lexed stream, then repeats a final `EOF` forever.
pub struct TokenBuffer {
    tokens: std::vec::IntoIter<Token>,
    last: Span,
}

impl TokenBuffer {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenBuffer {
            tokens: tokens.into_iter(),
            last: Span {
                start: Position::null(),
                end: Position::null(),
            },
        }
    }
}

impl TokenSource for TokenBuffer {
    fn next_token(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) if token.kind != TokenKind::EOF => {
                self.last = Span {
                    start: token.span.end,
                    end: token.span.end,
                };
                token
            }
            Some(token) => {
                self.last = token.span;
                token
            }
            None => MK_TOKEN!(TokenKind::EOF, String::from("EOF"), self.last),
        }
    }
}

/// Lexes the whole buffer, up to and including the first `EOF`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lex = Lexer::new(source);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token();
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);

        if done {
            return tokens;
        }
    }
}

/// Decodes the escape sequences kept raw in a string token.
pub fn unescape(raw: &str) -> String {
    let mut result = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();
                let mut hex = String::new();

                for _ in 0..2 {
                    match chars.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            hex.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
            }
            // Unknown escape or lone backslash: keep it
            _ => result.push(ch),
        }
    }

    result
}
