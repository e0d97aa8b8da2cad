use crate::{lexer::tokens::Token, symbol_table::context::ContextId};

use super::{
    ast::StmtId,
    expressions::{Expr, InfixOperator},
    types::ValueKind,
};

/// Statement node stored in the `Ast` arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub id: StmtId,
    pub kind: StmtKind,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `let name = value;`
    Let { name: String, value: Expr },
    /// `let a, b;`
    VarDeclaration { names: Vec<String> },
    /// `target = value;`
    Assign { target: String, value: Expr },
    Expression(Expr),
    /// One `if` plus every `else if`, in source order.
    If {
        clauses: Vec<IfClause>,
        else_body: Option<Block>,
    },
    Print { args: Vec<Expr> },
    Return { value: Expr },
    /// `clock.function();`
    Clock { function: String },
    /// `{ ... }` or `context name { ... }`
    ContextBlock { name: Option<String>, block: Block },
    FunctionLiteral {
        name: String,
        params: Vec<Param>,
        block: Block,
        return_kind: Option<ValueKind>,
    },
}

/// Statements of a scoped body together with the context they were parsed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub context: ContextId,
    pub body: Vec<StmtId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfClause {
    pub predicate: Predicate,
    pub block: Block,
}

/// A single comparison; predicates have no boolean connectives.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub left: Expr,
    pub operator: InfixOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub token: Token,
}
