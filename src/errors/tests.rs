//! Unit tests for error handling.
//!
//! This module contains tests for error types, severities and diagnostic
//! rendering.

use std::sync::Arc;

use crate::errors::errors::{Diagnostic, Error, ErrorImpl, ErrorTip, Severity};
use crate::{Position, Span};

fn span(offset: u32, line: u32, column: u32, len: u32) -> Span {
    Span::new(
        Position { offset, line, column },
        Position {
            offset: offset + len,
            line,
            column: column + len,
        },
    )
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "$".to_string(),
        },
        span(10, 1, 11, 1),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_span().start.offset, 10);
    assert_eq!(error.get_severity(), Severity::Error);
}

#[test]
fn test_warnings() {
    let modifier = Error::new(
        ErrorImpl::ModifierNotAllowed {
            modifier: "async".to_string(),
            declaration: "a function".to_string(),
        },
        span(0, 1, 1, 5),
    );
    let incomplete = Error::new(ErrorImpl::IncompleteParse, span(0, 1, 1, 0));

    assert_eq!(modifier.get_severity(), Severity::Warning);
    assert_eq!(incomplete.get_severity(), Severity::Warning);
}

#[test]
fn test_error_messages() {
    let error = ErrorImpl::ExpectedToken {
        expected: "`;`".to_string(),
        found: "`x`".to_string(),
    };
    assert_eq!(error.to_string(), "expected `;`, found `x`");

    let error = ErrorImpl::ModifierNotAllowed {
        modifier: "shared".to_string(),
        declaration: "a struct".to_string(),
    };
    assert_eq!(error.to_string(), "modifier `shared` has no meaning on a struct");
}

#[test]
fn test_error_tips() {
    let error = Error::new(
        ErrorImpl::UnclosedDelimiter {
            delimiter: "}".to_string(),
        },
        span(0, 1, 1, 0),
    );
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "add the matching `}`"),
        ErrorTip::None => panic!("expected a suggestion"),
    }

    let error = Error::new(ErrorImpl::IncompleteParse, span(0, 1, 1, 0));
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_diagnostic_from_error() {
    let file: Arc<str> = Arc::from("main.som");
    let error = Error::new(
        ErrorImpl::UnclosedDelimiter {
            delimiter: "}".to_string(),
        },
        span(12, 2, 1, 0),
    )
    .with_related(span(9, 1, 10, 1), "unclosed `{` opened here");

    let diagnostic = Diagnostic::from_error(error, &file);

    assert!(diagnostic.is_error());
    assert_eq!(diagnostic.name, "UnclosedDelimiter");
    assert_eq!(&*diagnostic.file, "main.som");
    assert_eq!(diagnostic.secondary.len(), 1);
    assert_eq!(diagnostic.secondary[0].span.start.offset, 9);
    assert_eq!(diagnostic.tip.as_deref(), Some("add the matching `}`"));
}

#[test]
fn test_diagnostic_display() {
    let file: Arc<str> = Arc::from("main.som");
    let diagnostic = Diagnostic::from_error(
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: ")".to_string(),
            },
            span(8, 3, 9, 1),
        ),
        &file,
    );

    assert_eq!(
        diagnostic.to_string(),
        "main.som:3:9: error[UnexpectedToken]: unexpected token: \")\""
    );
}

#[test]
fn test_render_points_at_column() {
    let file: Arc<str> = Arc::from("main.som");
    let source = "func f() {\nlet a = );\n}";
    let diagnostic = Diagnostic::from_error(
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: ")".to_string(),
            },
            span(19, 2, 9, 1),
        ),
        &file,
    );

    let rendered = diagnostic.render(source);
    let lines: Vec<&str> = rendered.lines().collect();

    assert!(lines[0].starts_with("error[UnexpectedToken]: unexpected token: \")\""));
    assert_eq!(lines[1], "-> main.som:2:9");
    assert_eq!(lines[3], "2 | let a = );");
    assert_eq!(lines[4], "  | --------^");
}
