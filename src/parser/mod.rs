//! Parser module for building the syntax tree.
//!
//! The parser turns the token stream into a [`crate::ast::ast::Unit`]. It
//! uses a Pratt parser for expressions and types, with NUD (null
//! denotation) and LED (left denotation) handlers looked up by token kind,
//! and dispatches statements on positional keywords.
//!
//! Parsing does not stop at the first problem: a failed statement or member
//! is replaced by an error node, the diagnostic is recorded, and the parser
//! resynchronises at the next statement boundary.

pub mod decl;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod patterns;
pub mod resolver;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
