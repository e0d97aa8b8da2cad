use crate::{
    symbol_table::{
        symbol::{Symbol, SymbolKind},
        symbol_table::{Binding, SymbolError, SymbolTable},
    },
    Position,
};

fn at(line: u32, column: u32) -> Position {
    Position {
        offset: 0,
        line,
        column,
    }
}

fn variable(name: &str, line: u32) -> Symbol {
    Symbol::new(name, SymbolKind::Variable, at(line, 1))
}

#[test]
fn test_global_context_has_builtins() {
    let table = SymbolTable::new();

    assert_eq!(table.level(), 0);
    assert!(table.current_context().is_global());
    let len = table.lookup("len").unwrap();
    assert_eq!(len.kind, SymbolKind::Builtin);
    assert!(len.kind.is_callable());
    // Keywords, never identifiers
    assert!(table.lookup("print").is_none());
    assert!(table.lookup("clock").is_none());
}

#[test]
fn test_define_sets_context_level() {
    let mut table = SymbolTable::new();
    table.enter_context("main");
    table.enter_anonymous_context();
    table.define(variable("x", 1), Binding::Declare).unwrap();

    assert_eq!(table.lookup("x").unwrap().context_level, 2);
}

#[test]
fn test_lookup_walks_lineage() {
    let mut table = SymbolTable::new();
    table.define(variable("x", 1), Binding::Declare).unwrap();
    table.enter_context("outer");
    table.define(variable("y", 2), Binding::Declare).unwrap();
    table.enter_context("inner");

    assert!(table.lookup("x").is_some());
    assert!(table.lookup("y").is_some());
    assert!(table.lookup_local("x").is_none());
    assert_eq!(table.path(), vec!["global", "outer", "inner"]);
}

#[test]
fn test_sibling_contexts_are_not_visible() {
    let mut table = SymbolTable::new();
    table.enter_context("a");
    table.define(variable("hidden", 1), Binding::Declare).unwrap();
    table.exit_context();
    table.enter_context("b");

    assert!(table.lookup("hidden").is_none());
}

#[test]
fn test_shadowing_resolves_innermost() {
    let mut table = SymbolTable::new();
    table.define(variable("x", 1), Binding::Declare).unwrap();
    table.enter_anonymous_context();
    table.define(variable("x", 2), Binding::Declare).unwrap();

    let (context, symbol) = table.resolve("x").unwrap();
    assert_eq!(context, table.current());
    assert_eq!(symbol.declared_at.line, 2);

    table.exit_context();
    assert_eq!(table.lookup("x").unwrap().declared_at.line, 1);
}

#[test]
fn test_declare_twice_in_same_context_fails() {
    let mut table = SymbolTable::new();
    table.define(variable("x", 1), Binding::Declare).unwrap();

    let error = table.define(variable("x", 3), Binding::Declare).unwrap_err();
    assert_eq!(
        error,
        SymbolError::AlreadyDeclared {
            name: String::from("x"),
            line: 1,
            column: 1,
        }
    );
}

#[test]
fn test_rebind_updates_in_place() {
    let mut table = SymbolTable::new();
    table.define(variable("x", 1), Binding::Declare).unwrap();
    table.define(variable("x", 4), Binding::Rebind).unwrap();

    let symbol = table.lookup("x").unwrap();
    assert_eq!(symbol.declared_at.line, 1);
    assert_eq!(symbol.references, vec![at(4, 1)]);
    assert_eq!(table.current_context().bindings.len(), 2);
}

#[test]
fn test_exited_contexts_stay_queryable() {
    let mut table = SymbolTable::new();
    let id = table.enter_context("helper");
    table.define(variable("local", 1), Binding::Declare).unwrap();
    table.exit_context();

    assert_eq!(table.current(), table.global());
    assert_eq!(table[id].name, "helper");
    assert!(table[id].get("local").is_some());
    assert_eq!(table[table.global()].children, vec![id]);
    assert_eq!(table.find_context("helper").unwrap().id, id);
}

#[test]
#[should_panic(expected = "global context")]
fn test_exit_global_context_panics() {
    let mut table = SymbolTable::new();
    table.exit_context();
}

#[test]
fn test_anonymous_context_names_count_per_parent() {
    let mut table = SymbolTable::new();
    let first = table.enter_anonymous_context();
    let nested = table.enter_anonymous_context();
    table.exit_context();
    table.exit_context();
    let second = table.enter_anonymous_context();

    assert_eq!(table[first].name, "anonymous_0");
    assert_eq!(table[nested].name, "anonymous_0");
    assert_eq!(table[second].name, "anonymous_1");
}

#[test]
fn test_anonymous_limit() {
    let mut table = SymbolTable::with_anonymous_limit(2);
    for _ in 0..2 {
        assert!(table.check_anonymous_limit().is_ok());
        table.enter_anonymous_context();
        table.exit_context();
    }

    assert_eq!(
        table.check_anonymous_limit(),
        Err(SymbolError::TooManyAnonymousContexts {
            context: String::from("global"),
            limit: 2,
        })
    );
}

#[test]
fn test_lookup_mut_reaches_ancestor() {
    let mut table = SymbolTable::new();
    table.define(variable("counter", 1), Binding::Declare).unwrap();
    table.enter_anonymous_context();

    table.lookup_mut("counter").unwrap().value = Some(String::from("7"));
    table.exit_context();

    assert_eq!(table.lookup("counter").unwrap().value.as_deref(), Some("7"));
}

#[test]
fn test_render_lists_every_context() {
    let mut table = SymbolTable::new();
    let mut x = variable("x", 1);
    x.value = Some(String::from("5"));
    table.define(x, Binding::Declare).unwrap();
    table.enter_context("main");
    table.define(variable("y", 2), Binding::Declare).unwrap();
    table.exit_context();

    let rendered = table.to_string();
    let lines: Vec<&str> = rendered.lines().collect();

    assert!(lines[0].starts_with("context"));
    assert!(lines[0].contains("declared at"));
    assert_eq!(lines.len(), 2 + 3);
    assert!(lines
        .iter()
        .any(|line| line.starts_with("global") && line.contains("x") && line.ends_with("5")));
    assert!(lines
        .iter()
        .any(|line| line.starts_with("main") && line.contains("| y ")));
}
