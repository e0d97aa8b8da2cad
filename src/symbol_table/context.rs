use std::collections::HashMap;

use super::symbol::Symbol;

/// Index of a context inside its `SymbolTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub usize);

/// One lexical scope frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub id: ContextId,
    pub name: String,
    pub parent: Option<ContextId>,
    /// Distance from the global context, which is level 0.
    pub level: usize,
    pub bindings: HashMap<String, Symbol>,
    pub children: Vec<ContextId>,
    anonymous_count: usize,
}

impl Context {
    pub fn new(id: ContextId, name: &str, parent: Option<ContextId>, level: usize) -> Self {
        Context {
            id,
            name: String::from(name),
            parent,
            level,
            bindings: HashMap::new(),
            children: vec![],
            anonymous_count: 0,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.bindings.get(name)
    }

    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    pub fn anonymous_count(&self) -> usize {
        self.anonymous_count
    }

    /// Reserves the next generated name for an unnamed child block.
    pub(crate) fn next_anonymous_name(&mut self) -> String {
        let name = format!("anonymous_{}", self.anonymous_count);
        self.anonymous_count += 1;
        name
    }

    /// Bindings sorted by name, for stable rendering.
    pub fn symbols(&self) -> Vec<&Symbol> {
        let mut symbols: Vec<&Symbol> = self.bindings.values().collect();
        symbols.sort_by(|a, b| a.name.cmp(&b.name));
        symbols
    }
}
