//! Lexical analysis module for the front end.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Pull based tokenization, one token per call
//! - Recognition of keywords, identifiers, literals, and operators
//! - Token position tracking for error reporting
//! - Comments and whitespace handling
//!
//! Malformed input never stops the lexer; it produces `Illegal` tokens that
//! the parser turns into errors.

pub mod lexer;
pub mod tokens;
