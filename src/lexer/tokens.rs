use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("fn", TokenKind::Fn);
        map.insert("let", TokenKind::Let);
        map.insert("print", TokenKind::Print);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("return", TokenKind::Return);
        map.insert("true", TokenKind::Bool);
        map.insert("false", TokenKind::Bool);
        map.insert("int", TokenKind::IntType);
        map.insert("str", TokenKind::StrType);
        map.insert("float", TokenKind::FloatType);
        map.insert("bool", TokenKind::BoolType);
        map.insert("len", TokenKind::Len);
        map.insert("clock", TokenKind::Clock);
        map.insert("context", TokenKind::Context);
        map
    };
}

/// Reason attached to an `Illegal` token.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum LexError {
    UnterminatedString,
    InvalidFloatLiteral,
    IllegalCharacter,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Illegal(LexError),

    Int,
    Float,
    Str,
    Bool,
    Identifier,

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Dot,
    DoubleColon,
    Semicolon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,

    // Reserved
    Fn,
    Let,
    Print,
    If,
    Else,
    Return,
    Clock,
    Context,
    Len,
    IntType,
    StrType,
    FloatType,
    BoolType,
}

impl TokenKind {
    /// Whether the kind comes from the reserved word table.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Fn
                | TokenKind::Let
                | TokenKind::Print
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Return
                | TokenKind::Clock
                | TokenKind::Context
                | TokenKind::Len
                | TokenKind::IntType
                | TokenKind::StrType
                | TokenKind::FloatType
                | TokenKind::BoolType
                | TokenKind::Bool
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    pub fn column(&self) -> u32 {
        self.span.start.column
    }

    /// Builds a token of another kind at the same location, used when the
    /// parser has to synthesise a node (e.g. the `0` of a desugared `-x`).
    pub fn synthesize(&self, kind: TokenKind, value: &str) -> Token {
        Token {
            kind,
            value: String::from(value),
            span: self.span,
        }
    }
}
