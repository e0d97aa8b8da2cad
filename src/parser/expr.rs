//! Operator precedence (shunting-yard) expression parser.
//!
//! Operands go to an output stack and operators to an operator stack; an
//! operator is reduced onto its operands once an incoming operator of equal
//! or lower precedence shows up, which makes every binary operator left
//! associative. `(` sits on the operator stack as a sentinel of precedence 0.

use crate::{
    ast::expressions::{Expr, ExprKind, InfixOperator, PrefixOperator},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::unescape,
        tokens::{Token, TokenKind},
    },
    MK_ERROR,
};

use super::parser::{lex_error, Parser};

const PREFIX_PRECEDENCE: u8 = 4;

/// Where an expression sits, which decides the tokens that end it.
///
/// Terminators are left for the caller to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprContext {
    /// Right hand sides, expression statements and `print`/`return` values.
    /// A stray `)` is an error.
    Statement,
    /// A call argument, ended by `,` or the call's `)`.
    Argument,
    /// Left of a predicate's comparison, ended by that comparison.
    PredicateLeft,
    /// Right of a predicate's comparison, ended by the predicate's `)`.
    PredicateRight,
}

impl ExprContext {
    fn ends_at_close_paren(&self) -> bool {
        !matches!(self, ExprContext::Statement)
    }
}

enum Operator {
    Infix(InfixOperator, Token),
    Prefix(PrefixOperator, Token),
    Paren(Token),
}

impl Operator {
    fn precedence(&self) -> u8 {
        match self {
            Operator::Infix(operator, _) => operator.precedence(),
            Operator::Prefix(..) => PREFIX_PRECEDENCE,
            Operator::Paren(_) => 0,
        }
    }
}

/// Parses one expression starting at the current token.
pub fn parse_expr(parser: &mut Parser, context: ExprContext) -> Result<Expr, Error> {
    let mut output: Vec<Expr> = vec![];
    let mut operators: Vec<Operator> = vec![];
    let mut open_parens = 0usize;
    let mut expect_operand = true;

    loop {
        let token = parser.current_token().clone();

        if expect_operand && matches!(token.kind, TokenKind::Not | TokenKind::Dash) {
            let operator = if token.kind == TokenKind::Not {
                PrefixOperator::Not
            } else {
                PrefixOperator::Negate
            };
            operators.push(Operator::Prefix(operator, parser.advance()));
            continue;
        }

        if let Some(operator) = InfixOperator::from_token_kind(token.kind) {
            if operator.is_comparison() && open_parens == 0 {
                match context {
                    ExprContext::PredicateLeft => break,
                    ExprContext::PredicateRight => {
                        return Err(MK_ERROR!(
                            token,
                            ErrorImpl::UnexpectedTokenDetailed {
                                token: token.value.clone(),
                                message: String::from("chained comparisons are not supported"),
                            }
                        ));
                    }
                    _ => {}
                }
            }

            if expect_operand {
                return Err(MK_ERROR!(
                    token,
                    ErrorImpl::ExpectedExpression {
                        token: token.value.clone(),
                    }
                ));
            }

            while operators
                .last()
                .is_some_and(|top| top.precedence() >= operator.precedence())
            {
                if let Some(top) = operators.pop() {
                    apply(&mut output, top)?;
                }
            }

            operators.push(Operator::Infix(operator, parser.advance()));
            expect_operand = true;
            continue;
        }

        match token.kind {
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Str
            | TokenKind::Bool
            | TokenKind::Identifier
            | TokenKind::Len => {
                if !expect_operand {
                    return Err(MK_ERROR!(
                        token,
                        ErrorImpl::UnexpectedToken {
                            token: token.value.clone(),
                        }
                    ));
                }

                output.push(parse_atom(parser)?);
                expect_operand = false;
            }
            TokenKind::Illegal(_) => return Err(lex_error(&token)),
            TokenKind::OpenParen => {
                if !expect_operand {
                    return Err(MK_ERROR!(
                        token,
                        ErrorImpl::UnexpectedToken {
                            token: token.value.clone(),
                        }
                    ));
                }

                operators.push(Operator::Paren(parser.advance()));
                open_parens += 1;
            }
            TokenKind::CloseParen => {
                if open_parens == 0 {
                    if context.ends_at_close_paren() {
                        break;
                    }
                    return Err(MK_ERROR!(token, ErrorImpl::UnmatchedParen));
                }

                if expect_operand {
                    return Err(MK_ERROR!(
                        token,
                        ErrorImpl::ExpectedExpression {
                            token: token.value.clone(),
                        }
                    ));
                }

                let open = loop {
                    match operators.pop() {
                        Some(Operator::Paren(open)) => break open,
                        Some(operator) => apply(&mut output, operator)?,
                        None => return Err(MK_ERROR!(token, ErrorImpl::UnmatchedParen)),
                    }
                };
                let inner = pop_operand(&mut output, &open)?;
                output.push(Expr::new(ExprKind::Grouped(Box::new(inner)), open));

                parser.advance();
                open_parens -= 1;
            }
            _ => break,
        }
    }

    if expect_operand {
        let token = parser.current_token();
        return Err(MK_ERROR!(
            token,
            ErrorImpl::ExpectedExpression {
                token: token.value.clone(),
            }
        ));
    }

    while let Some(operator) = operators.pop() {
        if let Operator::Paren(open) = operator {
            return Err(MK_ERROR!(open, ErrorImpl::UnclosedParen));
        }
        apply(&mut output, operator)?;
    }

    let expr = pop_operand(&mut output, parser.current_token())?;
    if let Some(extra) = output.pop() {
        return Err(MK_ERROR!(
            extra.token,
            ErrorImpl::UnexpectedToken {
                token: extra.token.value.clone(),
            }
        ));
    }

    Ok(expr)
}

fn pop_operand(output: &mut Vec<Expr>, operator: &Token) -> Result<Expr, Error> {
    output.pop().ok_or_else(|| {
        MK_ERROR!(
            operator,
            ErrorImpl::OperandUnderflow {
                operator: operator.value.clone(),
            }
        )
    })
}

/// Folds an operator taken off the stack onto its operands.
fn apply(output: &mut Vec<Expr>, operator: Operator) -> Result<(), Error> {
    let expr = match operator {
        Operator::Infix(operator, token) => {
            let right = pop_operand(output, &token)?;
            let left = pop_operand(output, &token)?;
            Expr::new(
                ExprKind::Infix {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                token,
            )
        }
        Operator::Prefix(PrefixOperator::Not, token) => {
            let operand = pop_operand(output, &token)?;
            Expr::new(
                ExprKind::Prefix {
                    operator: PrefixOperator::Not,
                    operand: Box::new(operand),
                },
                token,
            )
        }
        // -x is 0 - x
        Operator::Prefix(PrefixOperator::Negate, token) => {
            let operand = pop_operand(output, &token)?;
            let zero = Expr::new(ExprKind::IntLit(0), token.synthesize(TokenKind::Int, "0"));
            Expr::new(
                ExprKind::Infix {
                    operator: InfixOperator::Minus,
                    left: Box::new(zero),
                    right: Box::new(operand),
                },
                token,
            )
        }
        Operator::Paren(open) => return Err(MK_ERROR!(open, ErrorImpl::UnclosedParen)),
    };

    output.push(expr);
    Ok(())
}

/// Literal, identifier or call at the current token.
fn parse_atom(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Identifier | TokenKind::Len
            if parser.next_token_kind() == TokenKind::OpenParen =>
        {
            parse_call(parser)
        }
        TokenKind::Len => Err(MK_ERROR!(
            token,
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: String::from("`len` can only be called"),
            }
        )),
        TokenKind::Identifier => {
            parser.advance();
            if parser.symbols().lookup(&token.value).is_none() {
                parser.record(MK_ERROR!(
                    token,
                    ErrorImpl::VariableNotDeclared {
                        variable: token.value.clone(),
                    }
                ));
            }
            Ok(Expr::new(ExprKind::Identifier(token.value.clone()), token))
        }
        TokenKind::Int => match token.value.parse::<i64>() {
            Ok(value) => {
                parser.advance();
                Ok(Expr::new(ExprKind::IntLit(value), token))
            }
            Err(_) => Err(MK_ERROR!(
                token,
                ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                }
            )),
        },
        TokenKind::Float => match token.value.parse::<f64>() {
            Ok(value) => {
                parser.advance();
                Ok(Expr::new(ExprKind::FloatLit(value), token))
            }
            Err(_) => Err(MK_ERROR!(
                token,
                ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                }
            )),
        },
        TokenKind::Str => {
            parser.advance();
            Ok(Expr::new(ExprKind::StrLit(unescape(&token.value)), token))
        }
        TokenKind::Bool => {
            parser.advance();
            Ok(Expr::new(ExprKind::BoolLit(token.value == "true"), token))
        }
        _ => Err(MK_ERROR!(
            token,
            ErrorImpl::ExpectedExpression {
                token: token.value.clone(),
            }
        )),
    }
}

/// `name(arg, ...)`. The callee has to resolve to a function or builtin;
/// when it does not, the call is still built and the problem recorded.
pub fn parse_call(parser: &mut Parser) -> Result<Expr, Error> {
    let callee = parser.advance();
    parser.expect(TokenKind::OpenParen)?;

    parser.enter_call(&callee)?;
    let args = parse_args(parser);
    parser.exit_call();
    let args = args?;

    parser.expect(TokenKind::CloseParen)?;

    let callable = parser
        .symbols()
        .lookup(&callee.value)
        .map(|symbol| symbol.kind.is_callable());
    match callable {
        None => parser.record(MK_ERROR!(
            callee,
            ErrorImpl::VariableNotDeclared {
                variable: callee.value.clone(),
            }
        )),
        Some(false) => parser.record(MK_ERROR!(
            callee,
            ErrorImpl::NotCallable {
                name: callee.value.clone(),
            }
        )),
        Some(true) => {}
    }

    Ok(Expr::new(
        ExprKind::Call {
            callee: callee.value.clone(),
            args,
        },
        callee,
    ))
}

fn parse_args(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    let mut args = vec![];
    if parser.current_token_kind() == TokenKind::CloseParen {
        return Ok(args);
    }

    loop {
        args.push(parse_expr(parser, ExprContext::Argument)?);

        if parser.current_token_kind() != TokenKind::Comma {
            return Ok(args);
        }
        parser.advance();
    }
}
