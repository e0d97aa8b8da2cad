//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree while maintaining the symbol table. It
//! handles:
//!
//! - Statement parsing by recursive descent (declarations, functions,
//!   control flow, scoped blocks)
//! - Expression parsing with an operator precedence (shunting-yard) parser
//! - Scope entry and exit, symbol definition and lookup
//! - Error recovery and reporting
//!
//! Syntax errors abandon the statement they occur in and the parser skips
//! to the next statement boundary; declaration errors are only recorded.

pub mod expr;
pub mod parser;
pub mod stmt;
