//! Scope tracking for the parser.
//!
//! The symbol table is an arena of contexts (scope frames) linked to their
//! parents, plus the path of contexts the parser is currently inside. It
//! supports:
//!
//! - Defining and rebinding symbols in the current context
//! - Lookup through the current context's lineage
//! - Named and generated (anonymous) context names
//! - Rendering every symbol as a flat table

pub mod context;
pub mod symbol;
pub mod symbol_table;

#[cfg(test)]
mod tests;
