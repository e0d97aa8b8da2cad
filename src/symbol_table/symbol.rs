use std::fmt::Display;

use crate::{
    ast::{ast::StmtId, expressions::Expr, types::ValueKind},
    lexer::tokens::Token,
    Position,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
    /// A named `context` block.
    Context,
    /// Provided by the language, seeded into the global context.
    Builtin,
}

impl SymbolKind {
    pub fn is_callable(&self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Builtin)
    }

    pub fn is_assignable(&self) -> bool {
        matches!(self, SymbolKind::Variable | SymbolKind::Parameter)
    }
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Function => "function",
            SymbolKind::Context => "context",
            SymbolKind::Builtin => "builtin",
        };
        write!(f, "{}", name)
    }
}

/// Compile-time record of a declared name.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub declared_at: Position,
    pub kind: SymbolKind,
    /// Depth of the declaring context, set by `SymbolTable::define`.
    pub context_level: usize,
    /// Declaring statement. `None` for builtins, parameters and while the
    /// declaring statement is still being parsed.
    pub node: Option<StmtId>,
    pub value_kind: Option<ValueKind>,
    /// Rendered initializer or last assigned value.
    pub value: Option<String>,
    /// Positions of later assignments.
    pub references: Vec<Position>,
}

impl Symbol {
    pub fn new(name: &str, kind: SymbolKind, declared_at: Position) -> Self {
        Symbol {
            name: String::from(name),
            declared_at,
            kind,
            context_level: 0,
            node: None,
            value_kind: None,
            value: None,
            references: vec![],
        }
    }

    pub fn from_token(token: &Token, kind: SymbolKind) -> Self {
        Symbol::new(&token.value, kind, token.span.start)
    }

    pub fn with_value(mut self, value: &Expr, value_kind: Option<ValueKind>) -> Self {
        self.value = Some(value.to_string());
        self.value_kind = value_kind;
        self
    }

    pub fn with_node(mut self, node: StmtId) -> Self {
        self.node = Some(node);
        self
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Symbol '{}' of kind '{}' at context level {}",
            self.name, self.kind, self.context_level
        )
    }
}
