/// AST (Abstract Syntax Tree) module
/// Contains the tree shapes the resolver reads and patches
///
/// Submodules:
/// - ast: The expression arena, node handles and scope tags
/// - expressions: Definitions for the expression node kinds
/// - statements: Statements, functions and the program root
pub mod ast;
pub mod expressions;
pub mod statements;
