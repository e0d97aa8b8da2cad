//! Integration tests for the whole front end.
//!
//! These tests drive source text through the lazily pulled lexer, the parser
//! and the symbol table, then inspect the AST, the finished table and the
//! rendered diagnostics.

use monke::{
    ast::statements::StmtKind,
    lexer::lexer::tokenize,
    parse, parse_source, parse_with,
    symbol_table::symbol::SymbolKind,
    ParserConfig,
};

const PROGRAM: &str = r#"
// Counts down and reports each step
let limit = 3;
let label = "step";

fn describe(n) {
    if (n == 0) {
        return "done";
    } else if (n < 0) {
        return "negative";
    } else {
        print label, n;
    }
    return describe(n - 1);
}

context main {
    let current = limit;
    current = current * 2 + 1;
    print describe(current);
    clock.tick();
}
"#;

#[test]
fn test_parse_full_program() {
    let result = parse_source(PROGRAM);

    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.ast.program().len(), 4);

    let describe = result.symbols.lookup("describe").unwrap();
    assert_eq!(describe.kind, SymbolKind::Function);
    assert!(matches!(
        &result.ast[describe.node.unwrap()].kind,
        StmtKind::FunctionLiteral { .. }
    ));

    let main = result.symbols.find_context("main").unwrap();
    let current = main.get("current").unwrap();
    assert_eq!(current.value.as_deref(), Some("(+ (* current 2) 1)"));
    assert_eq!(current.references.len(), 1);
    assert_eq!(result.symbols.path(), vec!["global"]);
}

#[test]
fn test_lazy_and_prelexed_parses_agree() {
    let lazy = parse_source(PROGRAM);
    let prelexed = parse(tokenize(PROGRAM));

    assert_eq!(lazy.ast, prelexed.ast);
    assert_eq!(lazy.symbols.to_string(), prelexed.symbols.to_string());
}

#[test]
fn test_function_contexts_nest() {
    let result = parse_source(PROGRAM);
    let symbols = &result.symbols;

    let describe = symbols.find_context("describe").unwrap();
    assert_eq!(describe.level, 1);
    assert_eq!(describe.get("n").unwrap().kind, SymbolKind::Parameter);
    // if, else if and else bodies
    assert_eq!(describe.children.len(), 3);
    for child in &describe.children {
        assert_eq!(symbols[*child].level, 2);
        assert_eq!(symbols[*child].parent, Some(describe.id));
    }
}

#[test]
fn test_errors_do_not_stop_the_parse() {
    let source = "let a = 1;\nb = a + ;\nlet c = \"open;\n";
    let result = parse_source(source);

    let names: Vec<&str> = result
        .errors
        .iter()
        .map(|error| error.get_error_name())
        .collect();
    assert_eq!(names, vec!["ExpectedExpression", "UnterminatedString"]);
    assert_eq!(result.ast.program().len(), 1);
    assert_eq!(result.errors[0].get_position().line, 2);
}

#[test]
fn test_render_errors() {
    let source = "let x = 1;\ny = 5;\n";
    let config = ParserConfig {
        source_name: String::from("main.mk"),
        ..ParserConfig::default()
    };
    let result = parse_with(source, &config);

    let rendered = result.render_errors(source);
    let lines: Vec<&str> = rendered.lines().collect();
    assert!(lines[0].starts_with("Error: VariableNotDeclared"));
    assert_eq!(lines[1], "-> main.mk");
    assert_eq!(lines[3], "2 | y = 5;");
    assert_eq!(lines[4], "  | ^");
}

#[test]
fn test_symbol_table_render() {
    let result = parse_source("let x = 1 + 2; fn f(a) { return a; } context app { let y = x; }");
    let rendered = result.symbols.to_string();

    assert!(rendered.lines().next().unwrap().contains("declared at"));
    for expected in ["(+ 1 2)", "fn(a)", "parameter", "context", "builtin"] {
        assert!(rendered.contains(expected), "missing {:?} in\n{}", expected, rendered);
    }
    // header, rule, len, x, f, app, a, y
    assert_eq!(rendered.lines().count(), 8);
}

#[test]
fn test_into_parts() {
    let (ast, symbols, errors) = parse_source("let x = 1; x = x + 1;").into_parts();

    assert!(errors.is_empty());
    assert_eq!(ast.program().len(), 2);
    assert_eq!(symbols.lookup("x").unwrap().value.as_deref(), Some("(+ x 1)"));
}
