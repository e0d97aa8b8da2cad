//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct, its configuration and the
//! result of a parse. The parser pulls tokens from a `TokenSource` with two
//! tokens of lookahead, owns the statement arena, the symbol table whose
//! active context is the scope being parsed, and the error collector.
//!
//! Statement rules live in `stmt`, the shunting-yard expression parser in
//! `expr`.

use std::mem;

use tracing::debug;

use crate::{
    ast::{
        ast::{Ast, StmtId},
        expressions::{Expr, ExprKind},
        statements::StmtKind,
        types::ValueKind,
    },
    errors::errors::{Error, ErrorCollector, ErrorImpl},
    lexer::{
        lexer::{TokenBuffer, TokenSource},
        tokens::{LexError, Token, TokenKind},
    },
    render_error,
    symbol_table::symbol_table::{SymbolTable, DEFAULT_MAX_ANONYMOUS_CONTEXTS},
    MK_ERROR,
};

use super::stmt::parse_stmts;

/// Block levels and nested calls allowed before the parser stops descending.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// Knobs for a single parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Shown in rendered diagnostics.
    pub source_name: String,
    /// Anonymous child blocks allowed per context.
    pub max_anonymous_contexts: usize,
    /// Deepest context level a block body is parsed at, and deepest call
    /// nesting inside one expression.
    pub max_nesting_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            source_name: String::from("<input>"),
            max_anonymous_contexts: DEFAULT_MAX_ANONYMOUS_CONTEXTS,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// Everything a parse produces. The AST is as complete as the input allowed,
/// `errors` lists every problem in the order it was found.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub ast: Ast,
    pub symbols: SymbolTable,
    pub errors: Vec<Error>,
    pub source_name: String,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_parts(self) -> (Ast, SymbolTable, Vec<Error>) {
        (self.ast, self.symbols, self.errors)
    }

    /// Renders every error against `source`, one diagnostic after another.
    pub fn render_errors(&self, source: &str) -> String {
        self.errors
            .iter()
            .map(|error| render_error(error, source, &self.source_name))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    source: Box<dyn TokenSource>,
    current: Token,
    next: Token,
    ast: Ast,
    symbols: SymbolTable,
    errors: ErrorCollector,
    /// Return kind slot of every function literal being parsed, innermost last.
    return_kinds: Vec<Option<ValueKind>>,
    call_depth: usize,
    config: ParserConfig,
}

impl Parser {
    /// Creates a parser over an already lexed token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser::with_config(TokenBuffer::new(tokens), ParserConfig::default())
    }

    pub fn with_config(source: impl TokenSource + 'static, config: ParserConfig) -> Self {
        let mut source: Box<dyn TokenSource> = Box::new(source);
        let current = source.next_token();
        let next = source.next_token();

        Parser {
            source,
            current,
            next,
            ast: Ast::new(),
            symbols: SymbolTable::with_anonymous_limit(config.max_anonymous_contexts),
            errors: ErrorCollector::new(),
            return_kinds: vec![],
            call_depth: 0,
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Kind of the token after the current one.
    pub fn next_token_kind(&self) -> TokenKind {
        self.next.kind
    }

    /// Advances to the next token and returns the previous one.
    pub fn advance(&mut self) -> Token {
        let pulled = self.source.next_token();
        let next = mem::replace(&mut self.next, pulled);
        mem::replace(&mut self.current, next)
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// An `Illegal` token always reports its lexical error instead.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind == expected_kind {
            return Ok(self.advance());
        }

        if let TokenKind::Illegal(_) = token.kind {
            return Err(lex_error(token));
        }

        match error {
            Some(error) => Err(error),
            None => Err(MK_ERROR!(
                token,
                ErrorImpl::UnexpectedToken {
                    token: token.value.clone(),
                }
            )),
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Returns true while the current token is not EOF.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn push_stmt(&mut self, kind: StmtKind, token: Token) -> StmtId {
        self.ast.push(kind, token)
    }

    /// Records a problem without stopping the parse.
    pub fn record(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &ErrorCollector {
        &self.errors
    }

    pub(crate) fn enter_function(&mut self) {
        self.return_kinds.push(None);
    }

    pub(crate) fn exit_function(&mut self) -> Option<ValueKind> {
        self.return_kinds.pop().flatten()
    }

    /// The first `return` with a known kind decides the function's kind.
    pub(crate) fn note_return_kind(&mut self, kind: Option<ValueKind>) {
        if let Some(slot) = self.return_kinds.last_mut() {
            if slot.is_none() {
                *slot = kind;
            }
        }
    }

    /// Fails once calls are nested `max_nesting_depth` deep.
    pub(crate) fn enter_call(&mut self, callee: &Token) -> Result<(), Error> {
        let limit = self.config.max_nesting_depth;
        if self.call_depth >= limit {
            return Err(MK_ERROR!(callee, ErrorImpl::NestingTooDeep { limit }));
        }

        self.call_depth += 1;
        Ok(())
    }

    pub(crate) fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    /// Kind of a literal, or the tag of the variable an identifier resolves to.
    pub fn value_kind_of(&self, expr: &Expr) -> Option<ValueKind> {
        match &expr.kind {
            ExprKind::Identifier(name) => self
                .symbols
                .lookup(name)
                .and_then(|symbol| symbol.value_kind),
            _ => expr.literal_kind(),
        }
    }

    /// Skips to the next statement boundary after a syntax error.
    ///
    /// Stops after a `;` or a balanced `{ ... }` group at depth 0 (unless an
    /// `else` follows it), or before a `}` that closes the enclosing block.
    pub fn synchronize(&mut self) {
        let mut depth = 0usize;

        loop {
            match self.current_token_kind() {
                TokenKind::EOF => break,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::CloseCurly if depth == 0 => break,
                TokenKind::OpenCurly => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::CloseCurly => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 && self.current_token_kind() != TokenKind::Else {
                        break;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }

        debug!(
            "resynchronized at {} {:?}",
            self.current.kind, self.current.value
        );
    }

    /// Skips the rest of a block whose `{` was already consumed, up to and
    /// including its matching `}`. Returns false when EOF comes first.
    pub fn skip_block(&mut self) -> bool {
        let mut depth = 1usize;

        loop {
            match self.current_token_kind() {
                TokenKind::EOF => return false,
                TokenKind::OpenCurly => depth += 1,
                TokenKind::CloseCurly => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return true;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Parses statements until EOF and hands back everything built.
    pub fn parse_program(mut self) -> ParseResult {
        let program = parse_stmts(&mut self, false);
        self.ast.set_program(program);

        debug!(
            "parsed {} statements with {} errors",
            self.ast.len(),
            self.errors.len()
        );

        ParseResult {
            ast: self.ast,
            symbols: self.symbols,
            errors: self.errors.into_vec(),
            source_name: self.config.source_name,
        }
    }
}

/// Turns an `Illegal` token into the error it stands for.
pub fn lex_error(token: &Token) -> Error {
    let error = match token.kind {
        TokenKind::Illegal(LexError::UnterminatedString) => ErrorImpl::UnterminatedString,
        TokenKind::Illegal(LexError::InvalidFloatLiteral) => ErrorImpl::InvalidFloatLiteral {
            literal: token.value.clone(),
        },
        _ => ErrorImpl::IllegalCharacter {
            character: token.value.clone(),
        },
    };

    MK_ERROR!(token, error)
}

/// Parses a stream of tokens into an Abstract Syntax Tree.
///
/// This is the main entry point for parsing pre-lexed input. Parsing never
/// stops early: syntax errors skip to the next statement and declaration
/// errors are only recorded.
pub fn parse(tokens: Vec<Token>) -> ParseResult {
    Parser::new(tokens).parse_program()
}
