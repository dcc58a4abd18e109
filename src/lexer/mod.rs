//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts Somnium source
//! code into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Literals with decoded values (integers, floats, strings, booleans, null)
//! - Operators and punctuation, longest match first
//! - Comments and whitespace, kept as trivia attached to the next token
//! - Error tokens for input that cannot be lexed
//!
//! Words are never classified as keywords here; apart from `true`, `false`
//! and `null` every word is an identifier and the parser decides by position.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
