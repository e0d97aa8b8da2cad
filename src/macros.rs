//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_ERROR!` - Creates an Error for an offending token
//!
//! These macros reduce boilerplate in the lexer and parser.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's lexeme
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Int, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates an Error pointing at an offending token.
///
/// # Example
///
/// ```ignore
/// let error = MK_ERROR!(token, ErrorImpl::UnmatchedParen);
/// ```
#[macro_export]
macro_rules! MK_ERROR {
    ($token:expr, $error:expr) => {
        $crate::errors::errors::Error::new($error, ($token).clone())
    };
}
