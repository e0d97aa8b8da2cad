use std::{fmt::Display, ops::Index};

use thiserror::Error;
use tracing::debug;

use crate::{ast::ast::StmtId, Position};

use super::{
    context::{Context, ContextId},
    symbol::{Symbol, SymbolKind},
};

pub const GLOBAL_CONTEXT: &str = "global";
pub const DEFAULT_MAX_ANONYMOUS_CONTEXTS: usize = 64;

/// Names the global context knows about before any source is parsed.
// `print` and `clock` lex as keywords, so only `len` can ever be looked up
const BUILTINS: [&str; 1] = ["len"];

/// What the caller means when binding a name that may already exist in the
/// current context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// A fresh declaration (`let`); an existing binding is an error.
    Declare,
    /// Replace an existing binding in place, or create it.
    Rebind,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    #[error("symbol {name:?} already declared at {line}:{column}")]
    AlreadyDeclared { name: String, line: u32, column: u32 },
    #[error("context {context:?} exceeds {limit} anonymous contexts")]
    TooManyAnonymousContexts { context: String, limit: usize },
}

/// One line of the flat rendering of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolRow {
    pub context: String,
    pub name: String,
    pub kind: SymbolKind,
    pub declared_at: Position,
    pub level: usize,
    pub value: String,
}

/// Arena of contexts plus the path from the global context to the one
/// currently being parsed.
///
/// Exited contexts stay in the arena so the finished table can still be
/// queried and rendered; only `path` shrinks.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    contexts: Vec<Context>,
    path: Vec<ContextId>,
    max_anonymous_contexts: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::with_anonymous_limit(DEFAULT_MAX_ANONYMOUS_CONTEXTS)
    }

    pub fn with_anonymous_limit(max_anonymous_contexts: usize) -> Self {
        let global = Context::new(ContextId(0), GLOBAL_CONTEXT, None, 0);
        let mut table = SymbolTable {
            contexts: vec![global],
            path: vec![ContextId(0)],
            max_anonymous_contexts,
        };

        for name in BUILTINS {
            table.contexts[0].bindings.insert(
                String::from(name),
                Symbol::new(name, SymbolKind::Builtin, Position::null()),
            );
        }

        table
    }

    pub fn global(&self) -> ContextId {
        ContextId(0)
    }

    pub fn current(&self) -> ContextId {
        self.path[self.path.len() - 1]
    }

    pub fn current_context(&self) -> &Context {
        &self.contexts[self.current().0]
    }

    fn current_context_mut(&mut self) -> &mut Context {
        let current = self.current();
        &mut self.contexts[current.0]
    }

    /// Level of the current context.
    pub fn level(&self) -> usize {
        self.current_context().level
    }

    pub fn context(&self, id: ContextId) -> Option<&Context> {
        self.contexts.get(id.0)
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// First context with the given name, in creation order.
    pub fn find_context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|context| context.name == name)
    }

    /// Names of the contexts on the active path, global first.
    pub fn path(&self) -> Vec<&str> {
        self.path
            .iter()
            .map(|id| self.contexts[id.0].name.as_str())
            .collect()
    }

    /// Pushes a named child of the current context and makes it current.
    pub fn enter_context(&mut self, name: &str) -> ContextId {
        let parent = self.current();
        let id = ContextId(self.contexts.len());
        let level = self.contexts[parent.0].level + 1;

        self.contexts.push(Context::new(id, name, Some(parent), level));
        self.contexts[parent.0].children.push(id);
        self.path.push(id);

        debug!("entered context {:?} at level {}", name, level);
        id
    }

    /// Fails when the current context already has the maximum number of
    /// anonymous children.
    pub fn check_anonymous_limit(&self) -> Result<(), SymbolError> {
        let context = self.current_context();
        if context.anonymous_count() >= self.max_anonymous_contexts {
            Err(SymbolError::TooManyAnonymousContexts {
                context: context.name.clone(),
                limit: self.max_anonymous_contexts,
            })
        } else {
            Ok(())
        }
    }

    /// Pushes an unnamed child, named `anonymous_<n>` from the parent's counter.
    pub fn enter_anonymous_context(&mut self) -> ContextId {
        let name = self.current_context_mut().next_anonymous_name();
        self.enter_context(&name)
    }

    /// Pops back to the parent and returns it.
    ///
    /// # Panics
    ///
    /// Panics when called on the global context: no grammar rule exits more
    /// contexts than it entered, so this is a bug in the parser.
    pub fn exit_context(&mut self) -> ContextId {
        if self.path.len() <= 1 {
            panic!("attempted to exit the global context");
        }

        let exited = self.path.pop().unwrap_or(ContextId(0));
        debug!("exited context {:?}", self.contexts[exited.0].name);
        self.current()
    }

    /// Binds `symbol` in the current context.
    pub fn define(&mut self, mut symbol: Symbol, binding: Binding) -> Result<(), SymbolError> {
        let level = self.level();
        symbol.context_level = level;

        if let Some(existing) = self.current_context().get(&symbol.name) {
            if binding == Binding::Declare {
                return Err(SymbolError::AlreadyDeclared {
                    name: symbol.name,
                    line: existing.declared_at.line,
                    column: existing.declared_at.column,
                });
            }
        } else if let Some(shadowed) = self.lookup(&symbol.name) {
            debug!(
                "{:?} at level {} shadows the one at level {}",
                symbol.name, level, shadowed.context_level
            );
        }

        let context = self.current_context_mut();
        match context.bindings.get_mut(&symbol.name) {
            Some(existing) => {
                existing.references.push(symbol.declared_at);
                existing.kind = symbol.kind;
                existing.value = symbol.value;
                existing.value_kind = symbol.value_kind;
                if symbol.node.is_some() {
                    existing.node = symbol.node;
                }
                debug!("rebound {:?} in {:?}", existing.name, context.name);
            }
            None => {
                debug!("defined {:?} in {:?}", symbol.name, context.name);
                context.bindings.insert(symbol.name.clone(), symbol);
            }
        }

        Ok(())
    }

    /// Walks from the current context up through its parents.
    pub fn resolve(&self, name: &str) -> Option<(ContextId, &Symbol)> {
        let mut next = Some(self.current());

        while let Some(id) = next {
            let context = &self.contexts[id.0];
            if let Some(symbol) = context.get(name) {
                return Some((id, symbol));
            }
            next = context.parent;
        }

        None
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.resolve(name).map(|(_, symbol)| symbol)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let (id, _) = self.resolve(name)?;
        self.contexts[id.0].bindings.get_mut(name)
    }

    /// Looks in the current context only.
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.current_context().get(name)
    }

    /// Points an existing symbol at its (now complete) declaring statement.
    pub fn attach_node(&mut self, context: ContextId, name: &str, node: StmtId) -> bool {
        match self
            .contexts
            .get_mut(context.0)
            .and_then(|context| context.bindings.get_mut(name))
        {
            Some(symbol) => {
                symbol.node = Some(node);
                true
            }
            None => false,
        }
    }

    /// Notes a later use of `name` on the symbol it resolves to.
    pub fn record_reference(&mut self, name: &str, position: Position) -> bool {
        match self.lookup_mut(name) {
            Some(symbol) => {
                symbol.references.push(position);
                true
            }
            None => false,
        }
    }

    /// Every symbol of every context, contexts in creation order and
    /// symbols sorted by name within a context.
    pub fn rows(&self) -> Vec<SymbolRow> {
        self.contexts
            .iter()
            .flat_map(|context| {
                context.symbols().into_iter().map(|symbol| SymbolRow {
                    context: context.name.clone(),
                    name: symbol.name.clone(),
                    kind: symbol.kind,
                    declared_at: symbol.declared_at,
                    level: symbol.context_level,
                    value: symbol.value.clone().unwrap_or_default(),
                })
            })
            .collect()
    }
}

impl Index<ContextId> for SymbolTable {
    type Output = Context;

    fn index(&self, id: ContextId) -> &Self::Output {
        &self.contexts[id.0]
    }
}

impl Display for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers = ["context", "name", "kind", "declared at", "level", "value"];
        let cells: Vec<[String; 6]> = self
            .rows()
            .into_iter()
            .map(|row| {
                [
                    row.context,
                    row.name,
                    row.kind.to_string(),
                    format!("{}:{}", row.declared_at.line, row.declared_at.column),
                    row.level.to_string(),
                    row.value,
                ]
            })
            .collect();

        let mut widths = headers.map(|header| header.len());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        let header: Vec<String> = headers
            .iter()
            .zip(widths.iter())
            .map(|(header, width)| format!("{:<width$}", header, width = width))
            .collect();
        writeln!(f, "{}", header.join(" | ").trim_end())?;

        let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;

        for row in cells {
            let line: Vec<String> = row
                .iter()
                .zip(widths.iter())
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect();
            writeln!(f, "{}", line.join(" | ").trim_end())?;
        }

        Ok(())
    }
}
