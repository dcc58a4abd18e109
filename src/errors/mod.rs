//! Error types and diagnostics.
//!
//! This module defines the error types used throughout the front-end:
//!
//! - `Error`: a failure in flight, returned by parsing functions with `?`
//! - `ErrorImpl`: the lexical and syntactic error variants
//! - `Diagnostic`: the collected, positioned report handed to callers
//! - Helpful error messages, suggestions and source excerpts

pub mod errors;

#[cfg(test)]
mod tests;
