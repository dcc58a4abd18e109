#![allow(clippy::module_inception)]

//! Syntax front-end for the Somnium language.
//!
//! [`parse`] turns source text into a [`ast::ast::Unit`] and a list of
//! [`errors::errors::Diagnostic`]s. It never fails: malformed input is
//! represented by error nodes in the tree and reported through diagnostics.
//!
//! Tracing is off unless `RUST_LOG` is set, e.g.
//! `RUST_LOG=somnium::parser=trace` follows every recovery and trial parse.

use std::sync::{Arc, Once};

use tracing::debug;

use crate::{ast::ast::Unit, errors::errors::Diagnostic, lexer::lexer::tokenize};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod stack;

extern crate regex;

/// A point in the source: byte offset plus 1-based line and column.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn null() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

/// A half-open source range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Empty span at `position`.
    pub fn at(position: Position) -> Self {
        Span {
            start: position,
            end: position,
        }
    }

    /// From the start of `self` to the end of `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }

    pub fn len(&self) -> usize {
        (self.end.offset - self.start.offset) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.offset as usize..self.end.offset as usize]
    }
}

/// Maps byte offsets to line and column numbers.
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );

        LineIndex {
            source,
            line_starts,
        }
    }

    /// Position of the byte at `offset`; offsets past the end clamp to the
    /// end of input.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].chars().count() + 1;

        Position {
            offset: offset as u32,
            line: line as u32 + 1,
            column: column as u32,
        }
    }

    /// Line number, full line text and 0-based column of `offset`.
    pub fn line_at(&self, offset: usize) -> (usize, &'a str, usize) {
        let position = self.position(offset);
        let line_start = self.line_starts[position.line as usize - 1];
        let line_end = self
            .line_starts
            .get(position.line as usize)
            .copied()
            .unwrap_or(self.source.len());

        (
            position.line as usize,
            &self.source[line_start..line_end],
            position.column as usize - 1,
        )
    }
}

/// Knobs for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Script units may contain any statement at the top level and end in a
    /// result expression. Library units only take declarations, `use` and
    /// `source` directives.
    pub script_mode: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { script_mode: true }
    }
}

impl ParseOptions {
    pub fn library() -> Self {
        ParseOptions { script_mode: false }
    }
}

/// Parses `source` as a script unit.
pub fn parse(source: &str, file_id: &str) -> (Unit, Vec<Diagnostic>) {
    parse_with_options(source, file_id, ParseOptions::default())
}

pub fn parse_with_options(
    source: &str,
    file_id: &str,
    options: ParseOptions,
) -> (Unit, Vec<Diagnostic>) {
    let file: Arc<str> = Arc::from(file_id);
    let (tokens, mut diagnostics) = tokenize(source, &file);
    debug!(file = %file, tokens = tokens.len(), lexical_errors = diagnostics.len(), "tokenized");

    let (unit, parse_diagnostics) = parser::parser::parse(tokens, file, options);
    diagnostics.extend(parse_diagnostics);
    diagnostics.sort_by_key(|d| d.span.start.offset);

    (unit, diagnostics)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=somnium=debug` or `RUST_LOG=somnium=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::LineIndex;

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nfoo\n\nTesting { }\n";
        let index = LineIndex::new(source);

        let (line_number, line, line_pos) = index.line_at(10);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = index.line_at(27);
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_position_counts_chars_not_bytes() {
        let source = "\"é\" x";
        let index = LineIndex::new(source);
        let position = index.position(5);

        assert_eq!(position.line, 1);
        assert_eq!(position.column, 5);
        assert_eq!(position.offset, 5);
    }

    #[test]
    fn test_position_clamps_past_end() {
        let index = LineIndex::new("ab\n");
        let position = index.position(100);

        assert_eq!(position.offset, 3);
        assert_eq!(position.line, 2);
        assert_eq!(position.column, 1);
    }
}
