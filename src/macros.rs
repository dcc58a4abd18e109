//! Utility macros for the front-end.
//!
//! - `MK_TOKEN!` - Creates a Token instance without trivia or literal value
//! - `MK_DEFAULT_HANDLER!` - Creates a lexer handler for tokens of a fixed kind
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's raw source text
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::EOF, String::new(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
            literal: None,
            leading_trivia: Vec::new(),
            error: None,
        }
    };
}

/// Creates a regex handler that always yields the given token kind and no
/// literal value.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^#:[A-Za-z_][A-Za-z0-9_]*").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Label),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr) => {
        |_text: &str| {
            Ok(Scanned {
                kind: $kind,
                literal: None,
            })
        }
    };
}
