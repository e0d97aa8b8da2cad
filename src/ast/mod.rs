/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The statement arena and statement ids
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes, blocks and if clauses
/// - types: Literal kind tags
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
