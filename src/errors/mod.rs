//! Error types and error collection for the front end.
//!
//! This module defines the errors produced while lexing and parsing.
//! It includes:
//!
//! - Error structures pointing at the offending token
//! - Lexical, syntax and declaration error variants
//! - Helpful error messages and suggestions
//! - The collector the parser records errors into without halting

pub mod errors;

#[cfg(test)]
mod tests;
