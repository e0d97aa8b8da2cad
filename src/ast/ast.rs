use std::{ops::Index, slice::Iter};

use crate::lexer::tokens::Token;

use super::statements::{Stmt, StmtKind};

/// Stable index of a statement inside an `Ast`.
///
/// Symbols keep these instead of references so that the tree stays the only
/// owner of its nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(pub usize);

/// Arena owning every statement of a parse.
///
/// Children are pushed before their parents, which refer to them by
/// `StmtId`. An id appears in at most one body (or in the program list);
/// statements of an enclosing statement that failed to parse stay in the
/// arena but are reachable from nowhere.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Stmt>,
    program: Vec<StmtId>,
}

impl Ast {
    pub fn new() -> Self {
        Ast {
            nodes: vec![],
            program: vec![],
        }
    }

    /// Stores a completed statement and returns its id.
    pub fn push(&mut self, kind: StmtKind, token: Token) -> StmtId {
        let id = StmtId(self.nodes.len());
        self.nodes.push(Stmt { id, kind, token });
        id
    }

    pub fn get(&self, id: StmtId) -> Option<&Stmt> {
        self.nodes.get(id.0)
    }

    pub fn set_program(&mut self, program: Vec<StmtId>) {
        self.program = program;
    }

    /// Top level statements, in source order.
    pub fn program(&self) -> &[StmtId] {
        &self.program
    }

    pub fn statements(&self) -> impl Iterator<Item = &Stmt> {
        self.program.iter().map(|id| &self.nodes[id.0])
    }

    /// Every node of the arena, in completion order.
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<StmtId> for Ast {
    type Output = Stmt;

    fn index(&self, id: StmtId) -> &Self::Output {
        &self.nodes[id.0]
    }
}
