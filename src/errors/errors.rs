use std::fmt::Display;

use thiserror::Error;
use tracing::debug;

use crate::{lexer::tokens::Token, symbol_table::symbol_table::SymbolError, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    token: Token,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, token: Token) -> Self {
        Error {
            internal_error: error_impl,
            token,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.token.span.start
    }

    pub fn get_token(&self) -> &Token {
        &self.token
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::InvalidFloatLiteral { .. } => "InvalidFloatLiteral",
            ErrorImpl::IllegalCharacter { .. } => "IllegalCharacter",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedExpression { .. } => "ExpectedExpression",
            ErrorImpl::OperandUnderflow { .. } => "OperandUnderflow",
            ErrorImpl::UnmatchedParen => "UnmatchedParen",
            ErrorImpl::UnclosedParen => "UnclosedParen",
            ErrorImpl::UnclosedBlock { .. } => "UnclosedBlock",
            ErrorImpl::UnmatchedCloseBrace => "UnmatchedCloseBrace",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::InvalidContextName { .. } => "InvalidContextName",
            ErrorImpl::TooManyAnonymousContexts { .. } => "TooManyAnonymousContexts",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::InvalidAssignment { .. } => "InvalidAssignment",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("Add the closing `\"` to the string literal"))
            }
            ErrorImpl::InvalidFloatLiteral { literal } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, a `.` needs a digit on both sides",
                literal
            )),
            ErrorImpl::IllegalCharacter { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::ExpectedExpression { token } => {
                ErrorTip::Suggestion(format!("Expected an expression before `{}`", token))
            }
            ErrorImpl::OperandUnderflow { operator } => ErrorTip::Suggestion(format!(
                "Operator `{}` is missing an operand",
                operator
            )),
            ErrorImpl::UnmatchedParen => {
                ErrorTip::Suggestion(String::from("Remove the `)` or add a matching `(`"))
            }
            ErrorImpl::UnclosedParen => ErrorTip::Suggestion(String::from("Add the missing `)`")),
            ErrorImpl::UnclosedBlock { context } => {
                ErrorTip::Suggestion(format!("Add the `}}` closing context `{}`", context))
            }
            ErrorImpl::UnmatchedCloseBrace => {
                ErrorTip::Suggestion(String::from("Remove the `}` or add a matching `{`"))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::VariableNotDeclared { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` not declared, declare it with `let` first",
                variable
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` already declared, use `{} = ...` to reassign it",
                variable, variable
            )),
            ErrorImpl::InvalidContextName { name } => ErrorTip::Suggestion(format!(
                "`{}` is a reserved keyword and cannot name a context",
                name
            )),
            ErrorImpl::TooManyAnonymousContexts { context, limit } => {
                ErrorTip::Suggestion(format!(
                    "Context `{}` already holds {} anonymous blocks, name some of them with `context`",
                    context, limit
                ))
            }
            ErrorImpl::NotCallable { name } => {
                ErrorTip::Suggestion(format!("`{}` is not a function", name))
            }
            ErrorImpl::InvalidAssignment { name, kind } => ErrorTip::Suggestion(format!(
                "`{}` is a {}, only variables and parameters can be assigned",
                name, kind
            )),
            ErrorImpl::NestingTooDeep { limit } => ErrorTip::Suggestion(format!(
                "Nesting is limited to {} levels, move the inner code into a function",
                limit
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let position = self.get_position();
        write!(
            f,
            "{}:{}: {}",
            position.line, position.column, self.internal_error
        )
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid float literal: {literal:?}")]
    InvalidFloatLiteral { literal: String },
    #[error("illegal character: {character:?}")]
    IllegalCharacter { character: String },

    // Syntax
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected expression, found {token:?}")]
    ExpectedExpression { token: String },
    #[error("operator {operator:?} is missing an operand")]
    OperandUnderflow { operator: String },
    #[error("unmatched closing parenthesis")]
    UnmatchedParen,
    #[error("unclosed parenthesis")]
    UnclosedParen,
    #[error("context {context:?} is never closed")]
    UnclosedBlock { context: String },
    #[error("unmatched closing brace")]
    UnmatchedCloseBrace,
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Declarations
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("invalid context name {name:?}")]
    InvalidContextName { name: String },
    #[error("context {context:?} exceeds {limit} anonymous contexts")]
    TooManyAnonymousContexts { context: String, limit: usize },
    #[error("{name:?} is not callable")]
    NotCallable { name: String },
    #[error("cannot assign to {kind} {name:?}")]
    InvalidAssignment { name: String, kind: String },

    // Limits
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl From<SymbolError> for ErrorImpl {
    fn from(error: SymbolError) -> Self {
        match error {
            SymbolError::AlreadyDeclared { name, .. } => {
                ErrorImpl::VariableAlreadyDeclared { variable: name }
            }
            SymbolError::TooManyAnonymousContexts { context, limit } => {
                ErrorImpl::TooManyAnonymousContexts { context, limit }
            }
        }
    }
}

/// Ordered, non-halting sink for everything that goes wrong during a parse.
#[derive(Debug, Default, Clone)]
pub struct ErrorCollector {
    errors: Vec<Error>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        ErrorCollector { errors: vec![] }
    }

    pub fn push(&mut self, error: Error) {
        debug!("recorded {}: {}", error.get_error_name(), error);
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<Error> {
        self.errors
    }
}
