//! Unit tests for error handling.
//!
//! This module contains tests for error types, tips and the collector.

use crate::errors::errors::{Error, ErrorCollector, ErrorImpl, ErrorTip};
use crate::lexer::tokens::{Token, TokenKind};
use crate::symbol_table::symbol_table::SymbolError;
use crate::{Position, Span};

fn token_at(value: &str, offset: u32, line: u32, column: u32) -> Token {
    let position = Position {
        offset,
        line,
        column,
    };
    Token {
        kind: TokenKind::Identifier,
        value: value.to_string(),
        span: Span {
            start: position,
            end: position,
        },
    }
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::IllegalCharacter {
            character: "@".to_string(),
        },
        token_at("@", 10, 1, 11),
    );

    assert_eq!(error.get_error_name(), "IllegalCharacter");
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        token_at("identifier", 42, 3, 7),
    );

    assert_eq!(error.get_position().offset, 42);
    assert_eq!(error.get_position().line, 3);
    assert_eq!(error.get_position().column, 7);
    assert_eq!(error.get_token().value, "identifier");
}

#[test]
fn test_variable_not_declared_error() {
    let error = Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: "foo".to_string(),
        },
        token_at("foo", 0, 1, 1),
    );

    assert_eq!(error.get_error_name(), "VariableNotDeclared");
    assert!(error.message().contains("foo"));
}

#[test]
fn test_variable_already_declared_error() {
    let error = Error::new(
        ErrorImpl::VariableAlreadyDeclared {
            variable: "x".to_string(),
        },
        token_at("x", 0, 1, 1),
    );

    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
}

#[test]
fn test_too_many_anonymous_contexts_message() {
    let error = Error::new(
        ErrorImpl::TooManyAnonymousContexts {
            context: "global".to_string(),
            limit: 2,
        },
        token_at("{", 0, 1, 1),
    );

    assert_eq!(
        error.message(),
        "context \"global\" exceeds 2 anonymous contexts"
    );
}

#[test]
fn test_error_display_includes_line_and_column() {
    let error = Error::new(ErrorImpl::UnmatchedParen, token_at(")", 5, 2, 4));

    assert_eq!(error.to_string(), "2:4: unmatched closing parenthesis");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::IllegalCharacter {
            character: "@".to_string(),
        },
        token_at("@", 0, 1, 1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        token_at("}", 0, 1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_collector_keeps_order() {
    let mut collector = ErrorCollector::new();
    assert!(collector.is_empty());

    collector.push(Error::new(ErrorImpl::UnmatchedParen, token_at(")", 0, 1, 1)));
    collector.push(Error::new(ErrorImpl::UnclosedParen, token_at("(", 4, 1, 5)));

    assert_eq!(collector.len(), 2);
    let names: Vec<&str> = collector.iter().map(|e| e.get_error_name()).collect();
    assert_eq!(names, vec!["UnmatchedParen", "UnclosedParen"]);

    let errors = collector.into_vec();
    assert_eq!(errors[1].get_position().offset, 4);
}

#[test]
fn test_symbol_errors_convert() {
    let error = ErrorImpl::from(SymbolError::AlreadyDeclared {
        name: "x".to_string(),
        line: 1,
        column: 5,
    });
    assert_eq!(
        error,
        ErrorImpl::VariableAlreadyDeclared {
            variable: "x".to_string(),
        }
    );

    let error = ErrorImpl::from(SymbolError::TooManyAnonymousContexts {
        context: "main".to_string(),
        limit: 64,
    });
    assert_eq!(error.to_string(), "context \"main\" exceeds 64 anonymous contexts");
}
