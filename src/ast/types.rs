//! Literal kind tagging.
//!
//! The front end does no type inference; it only remembers which literal
//! kind a value came from so tooling can show it next to a symbol.

use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Str,
    Bool,
}

impl ValueKind {
    pub fn from_token_kind(kind: TokenKind) -> Option<ValueKind> {
        match kind {
            TokenKind::Int => Some(ValueKind::Int),
            TokenKind::Float => Some(ValueKind::Float),
            TokenKind::Str => Some(ValueKind::Str),
            TokenKind::Bool => Some(ValueKind::Bool),
            _ => None,
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::Bool => "bool",
        };
        write!(f, "{}", name)
    }
}
