use tracing::debug;

use crate::{
    ast::{
        ast::StmtId,
        expressions::InfixOperator,
        statements::{Block, IfClause, Param, Predicate, StmtKind},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    symbol_table::{
        symbol::{Symbol, SymbolKind},
        symbol_table::Binding,
    },
    MK_ERROR,
};

use super::{
    expr::{parse_expr, ExprContext},
    parser::Parser,
};

/// Parses statements until EOF, or until the `}` closing the current block
/// when `in_block` is set. Errors are recorded and skipped past, so this
/// never fails.
pub fn parse_stmts(parser: &mut Parser, in_block: bool) -> Vec<StmtId> {
    let mut body = vec![];

    loop {
        match parser.current_token_kind() {
            TokenKind::EOF => break,
            TokenKind::CloseCurly if in_block => break,
            TokenKind::CloseCurly => {
                let token = parser.advance();
                parser.record(MK_ERROR!(token, ErrorImpl::UnmatchedCloseBrace));
                continue;
            }
            // Stray or trailing `;`
            TokenKind::Semicolon => {
                parser.advance();
                continue;
            }
            _ => {}
        }

        match parse_stmt(parser) {
            Ok(id) => body.push(id),
            Err(error) => {
                parser.record(error);
                parser.synchronize();
            }
        }
    }

    body
}

pub fn parse_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    match parser.current_token_kind() {
        TokenKind::Let => parse_let_stmt(parser),
        TokenKind::Identifier if parser.next_token_kind() == TokenKind::Assignment => {
            parse_assign_stmt(parser)
        }
        TokenKind::If => parse_if_stmt(parser),
        TokenKind::Print => parse_print_stmt(parser),
        TokenKind::Return => parse_return_stmt(parser),
        TokenKind::Clock => parse_clock_stmt(parser),
        TokenKind::Fn => parse_fn_stmt(parser),
        TokenKind::OpenCurly => parse_block_stmt(parser),
        TokenKind::Context => parse_context_stmt(parser),
        _ => parse_expression_stmt(parser),
    }
}

/// Binds a new name in the current context. A clash in the same context is
/// recorded and the existing symbol is rebound.
fn declare(parser: &mut Parser, symbol: Symbol, token: &Token) {
    if let Err(error) = parser
        .symbols_mut()
        .define(symbol.clone(), Binding::Declare)
    {
        parser.record(MK_ERROR!(token, ErrorImpl::from(error)));
        // Rebinding an existing name cannot fail
        let _ = parser.symbols_mut().define(symbol, Binding::Rebind);
    }
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let expr = parse_expr(parser, ExprContext::Statement)?;
    parser.expect(TokenKind::Semicolon)?;

    let token = expr.token.clone();
    Ok(parser.push_stmt(StmtKind::Expression(expr), token))
}

/// `let x = e;` or `let a, b;`
pub fn parse_let_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start_token = parser.advance();

    if parser.current_token_kind() == TokenKind::Identifier
        && parser.next_token_kind() == TokenKind::Assignment
    {
        let name_token = parser.advance();
        parser.advance();

        let value = parse_expr(parser, ExprContext::Statement)?;
        parser.expect(TokenKind::Semicolon)?;

        let value_kind = parser.value_kind_of(&value);
        let symbol =
            Symbol::from_token(&name_token, SymbolKind::Variable).with_value(&value, value_kind);

        let id = parser.push_stmt(
            StmtKind::Let {
                name: name_token.value.clone(),
                value,
            },
            start_token,
        );
        declare(parser, symbol.with_node(id), &name_token);

        return Ok(id);
    }

    let mut names = vec![];
    loop {
        let token = parser.current_token();
        let error = MK_ERROR!(
            token,
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: String::from("expected identifier during variable declaration"),
            }
        );
        names.push(parser.expect_error(TokenKind::Identifier, Some(error))?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            continue;
        }
        break;
    }

    parser.expect(TokenKind::Semicolon)?;

    let id = parser.push_stmt(
        StmtKind::VarDeclaration {
            names: names.iter().map(|token| token.value.clone()).collect(),
        },
        start_token,
    );
    for token in &names {
        let symbol = Symbol::from_token(token, SymbolKind::Variable).with_node(id);
        declare(parser, symbol, token);
    }

    Ok(id)
}

/// `x = e;` updates the variable or parameter `x` resolves to, wherever it
/// lives.
pub fn parse_assign_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let target = parser.advance();
    parser.advance();

    let value = parse_expr(parser, ExprContext::Statement)?;
    parser.expect(TokenKind::Semicolon)?;

    let value_kind = parser.value_kind_of(&value);
    let rendered = value.to_string();

    let id = parser.push_stmt(
        StmtKind::Assign {
            target: target.value.clone(),
            value,
        },
        target.clone(),
    );

    let resolved = parser
        .symbols()
        .lookup(&target.value)
        .map(|symbol| symbol.kind);
    match resolved {
        None => parser.record(MK_ERROR!(
            target,
            ErrorImpl::VariableNotDeclared {
                variable: target.value.clone(),
            }
        )),
        // Functions, contexts and builtins keep their binding
        Some(kind) if !kind.is_assignable() => parser.record(MK_ERROR!(
            target,
            ErrorImpl::InvalidAssignment {
                name: target.value.clone(),
                kind: kind.to_string(),
            }
        )),
        Some(_) => {
            let symbols = parser.symbols_mut();
            symbols.record_reference(&target.value, target.span.start);
            if let Some(symbol) = symbols.lookup_mut(&target.value) {
                symbol.value = Some(rendered);
                symbol.value_kind = value_kind;
            }
        }
    }

    Ok(id)
}

/// `l op r` inside the parentheses of an `if`.
fn parse_predicate(parser: &mut Parser) -> Result<Predicate, Error> {
    let left = parse_expr(parser, ExprContext::PredicateLeft)?;

    let token = parser.current_token().clone();
    let operator = match InfixOperator::from_token_kind(token.kind) {
        Some(operator) if operator.is_comparison() => operator,
        _ => {
            return Err(MK_ERROR!(
                token,
                ErrorImpl::UnexpectedTokenDetailed {
                    token: token.value.clone(),
                    message: String::from("expected a comparison operator"),
                }
            ))
        }
    };
    parser.advance();

    let right = parse_expr(parser, ExprContext::PredicateRight)?;

    Ok(Predicate {
        left,
        operator,
        right,
    })
}

/// `if (p) { } else if (p) { } else { }` as a single node.
pub fn parse_if_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start_token = parser.advance();

    let mut clauses = vec![];
    loop {
        parser.expect(TokenKind::OpenParen)?;
        let predicate = parse_predicate(parser)?;
        parser.expect(TokenKind::CloseParen)?;

        let open = parser.expect(TokenKind::OpenCurly)?;
        let block = parse_anonymous_block(parser, &open);
        clauses.push(IfClause { predicate, block });

        if parser.current_token_kind() == TokenKind::Else
            && parser.next_token_kind() == TokenKind::If
        {
            parser.advance();
            parser.advance();
            continue;
        }
        break;
    }

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        let open = parser.expect(TokenKind::OpenCurly)?;
        Some(parse_anonymous_block(parser, &open))
    } else {
        None
    };

    Ok(parser.push_stmt(StmtKind::If { clauses, else_body }, start_token))
}

/// `print a, b;`
pub fn parse_print_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start_token = parser.advance();

    let mut args = vec![parse_expr(parser, ExprContext::Statement)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        args.push(parse_expr(parser, ExprContext::Statement)?);
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(parser.push_stmt(StmtKind::Print { args }, start_token))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start_token = parser.advance();

    let value = parse_expr(parser, ExprContext::Statement)?;
    parser.expect(TokenKind::Semicolon)?;

    let kind = parser.value_kind_of(&value);
    parser.note_return_kind(kind);

    Ok(parser.push_stmt(StmtKind::Return { value }, start_token))
}

/// `clock.name();`
pub fn parse_clock_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start_token = parser.advance();

    parser.expect(TokenKind::Dot)?;
    let function = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::OpenParen)?;
    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(parser.push_stmt(StmtKind::Clock { function }, start_token))
}

/// `fn name(a, b) { ... }`
///
/// The name is bound before the body so the body can call itself.
pub fn parse_fn_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start_token = parser.advance();

    let token = parser.current_token();
    let error = MK_ERROR!(
        token,
        ErrorImpl::UnexpectedTokenDetailed {
            token: token.value.clone(),
            message: String::from("expected function name"),
        }
    );
    let name_token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let token = parser.expect(TokenKind::Identifier)?;
            params.push(Param {
                name: token.value.clone(),
                token,
            });

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
                continue;
            }
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    let open = parser.expect(TokenKind::OpenCurly)?;

    let name = name_token.value.clone();
    let parent = parser.symbols().current();

    let mut symbol = Symbol::from_token(&name_token, SymbolKind::Function);
    let signature: Vec<&str> = params.iter().map(|param| param.name.as_str()).collect();
    symbol.value = Some(format!("fn({})", signature.join(", ")));
    declare(parser, symbol, &name_token);

    parser.symbols_mut().enter_context(&name);
    for param in &params {
        declare(
            parser,
            Symbol::from_token(&param.token, SymbolKind::Parameter),
            &param.token,
        );
    }

    parser.enter_function();
    let block = parse_block_body(parser, &open);
    let return_kind = parser.exit_function();
    parser.symbols_mut().exit_context();

    let id = parser.push_stmt(
        StmtKind::FunctionLiteral {
            name: name.clone(),
            params,
            block,
            return_kind,
        },
        start_token,
    );
    parser.symbols_mut().attach_node(parent, &name, id);

    debug!("parsed function {:?} returning {:?}", name, return_kind);
    Ok(id)
}

/// A bare `{ ... }`.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let open = parser.advance();
    let block = parse_anonymous_block(parser, &open);

    Ok(parser.push_stmt(StmtKind::ContextBlock { name: None, block }, open))
}

/// `context name { ... }`
pub fn parse_context_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start_token = parser.advance();
    let name_token = parser.current_token().clone();

    let name = match name_token.kind {
        TokenKind::Identifier => Some(name_token.value.clone()),
        kind if kind.is_keyword() => {
            parser.record(MK_ERROR!(
                name_token,
                ErrorImpl::InvalidContextName {
                    name: name_token.value.clone(),
                }
            ));
            None
        }
        _ => {
            return Err(MK_ERROR!(
                name_token,
                ErrorImpl::UnexpectedTokenDetailed {
                    token: name_token.value.clone(),
                    message: String::from("expected a context name"),
                }
            ))
        }
    };
    parser.advance();

    let open = parser.expect(TokenKind::OpenCurly)?;

    match name {
        Some(name) => {
            let parent = parser.symbols().current();
            declare(
                parser,
                Symbol::from_token(&name_token, SymbolKind::Context),
                &name_token,
            );

            parser.symbols_mut().enter_context(&name);
            let block = parse_block_body(parser, &open);
            parser.symbols_mut().exit_context();

            let id = parser.push_stmt(
                StmtKind::ContextBlock {
                    name: Some(name.clone()),
                    block,
                },
                start_token,
            );
            parser.symbols_mut().attach_node(parent, &name, id);
            Ok(id)
        }
        // Rejected name: the block still parses, under a generated name
        None => {
            let block = parse_anonymous_block(parser, &open);
            Ok(parser.push_stmt(StmtKind::ContextBlock { name: None, block }, start_token))
        }
    }
}

/// Parses a block body in a fresh `anonymous_<n>` child of the current
/// context. Going over the per-context limit is recorded, not fatal.
pub fn parse_anonymous_block(parser: &mut Parser, open: &Token) -> Block {
    if let Err(error) = parser.symbols().check_anonymous_limit() {
        parser.record(MK_ERROR!(open, ErrorImpl::from(error)));
    }

    parser.symbols_mut().enter_anonymous_context();
    let block = parse_block_body(parser, open);
    parser.symbols_mut().exit_context();

    block
}

/// Statements up to and including the closing `}`, parsed in the context
/// the caller has just entered. Past `max_nesting_depth` the body is
/// skipped unparsed and left empty.
fn parse_block_body(parser: &mut Parser, open: &Token) -> Block {
    let context = parser.symbols().current();
    let limit = parser.config().max_nesting_depth;

    let (body, closed) = if parser.symbols().level() > limit {
        parser.record(MK_ERROR!(open, ErrorImpl::NestingTooDeep { limit }));
        (vec![], parser.skip_block())
    } else {
        let body = parse_stmts(parser, true);
        let closed = parser.current_token_kind() == TokenKind::CloseCurly;
        if closed {
            parser.advance();
        }
        (body, closed)
    };

    if !closed {
        let name = parser.symbols().current_context().name.clone();
        parser.record(MK_ERROR!(open, ErrorImpl::UnclosedBlock { context: name }));
    }

    Block { context, body }
}
