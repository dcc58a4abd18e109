/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the syntax tree
///
/// Submodules:
/// - ast: the parse root, shared building blocks and the `Node` traversal trait
/// - expressions: expression variants
/// - statements: statement and declaration variants
/// - types: type expression variants
/// - patterns: pattern variants
pub mod ast;
pub mod expressions;
pub mod patterns;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
