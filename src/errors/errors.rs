use std::{fmt::Display, sync::Arc};

use thiserror::Error;

use crate::Span;

/// A parse failure in flight.
///
/// Parsing functions return `Result<T, Error>`; the recovery points in the
/// parser turn an `Error` into a [`Diagnostic`] and keep going.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
    related: Vec<Related>,
}

/// A secondary span attached to an error, e.g. the opening brace of an
/// unclosed block.
#[derive(Debug, Clone, PartialEq)]
pub struct Related {
    pub span: Span,
    pub message: String,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
            related: Vec::new(),
        }
    }

    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related.push(Related {
            span,
            message: message.into(),
        });
        self
    }

    pub fn get_span(&self) -> Span {
        self.span
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_severity(&self) -> Severity {
        match &self.internal_error {
            ErrorImpl::ModifierNotAllowed { .. } | ErrorImpl::IncompleteParse => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn get_error_name(&self) -> &'static str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedBlockComment => "UnterminatedBlockComment",
            ErrorImpl::InvalidEscape { .. } => "InvalidEscape",
            ErrorImpl::MalformedNumber { .. } => "MalformedNumber",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::UnclosedDelimiter { .. } => "UnclosedDelimiter",
            ErrorImpl::TrailingGarbage { .. } => "TrailingGarbage",
            ErrorImpl::NotAllowedAtTopLevel { .. } => "NotAllowedAtTopLevel",
            ErrorImpl::ModifierNotAllowed { .. } => "ModifierNotAllowed",
            ErrorImpl::IncompleteParse => "IncompleteParse",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("add a closing `\"` before the end of the line"))
            }
            ErrorImpl::UnterminatedBlockComment => {
                ErrorTip::Suggestion(String::from("close the comment with `*/`"))
            }
            ErrorImpl::InvalidEscape { escape } => ErrorTip::Suggestion(format!(
                "`{}` is not a valid escape, use one of \\\" \\\\ \\n \\r \\t \\0 \\u{{..}}",
                escape
            )),
            ErrorImpl::MalformedNumber { token } => {
                ErrorTip::Suggestion(format!("`{}` has no digits after its prefix", token))
            }
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::ExpectedToken { expected, .. } => {
                ErrorTip::Suggestion(format!("insert {} here", expected))
            }
            ErrorImpl::UnclosedDelimiter { delimiter } => {
                ErrorTip::Suggestion(format!("add the matching `{}`", delimiter))
            }
            ErrorImpl::TrailingGarbage { .. } => ErrorTip::Suggestion(String::from(
                "the result expression must be the last thing in the file",
            )),
            ErrorImpl::NotAllowedAtTopLevel { .. } => ErrorTip::Suggestion(String::from(
                "move it into a function body or enable script mode",
            )),
            ErrorImpl::ModifierNotAllowed { .. } => ErrorTip::None,
            ErrorImpl::IncompleteParse => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("invalid escape sequence {escape:?} in string literal")]
    InvalidEscape { escape: String },
    #[error("malformed number literal: {token:?}")]
    MalformedNumber { token: String },

    // Syntactic
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected {expected}, found {found}")]
    ExpectedToken { expected: String, found: String },
    #[error("unclosed delimiter, expected `{delimiter}` before end of input")]
    UnclosedDelimiter { delimiter: String },
    #[error("unexpected {token:?} after the result expression")]
    TrailingGarbage { token: String },
    #[error("{construct} is not allowed at the top level of a library unit")]
    NotAllowedAtTopLevel { construct: String },
    #[error("modifier `{modifier}` has no meaning on {declaration}")]
    ModifierNotAllowed { modifier: String, declaration: String },
    #[error("end of input reached before the parser could resynchronise")]
    IncompleteParse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A positioned problem reported to the caller of [`crate::parse`].
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub name: &'static str,
    pub message: String,
    pub tip: Option<String>,
    pub span: Span,
    pub secondary: Vec<Related>,
    pub file: Arc<str>,
}

impl Diagnostic {
    pub fn from_error(error: Error, file: &Arc<str>) -> Self {
        let tip = match error.get_tip() {
            ErrorTip::None => None,
            ErrorTip::Suggestion(tip) => Some(tip),
        };

        Diagnostic {
            severity: error.get_severity(),
            name: error.get_error_name(),
            message: error.internal_error.to_string(),
            tip,
            span: error.span,
            secondary: error.related,
            file: Arc::clone(file),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Renders the diagnostic with the offending source line underneath.
    ///
    /// ```text
    /// error[UnexpectedToken]: unexpected token: ")"
    /// -> main.som:3:9
    ///    |
    ///  3 | let a = );
    ///    | --------^
    /// ```
    pub fn render(&self, source: &str) -> String {
        let mut out = String::new();

        match &self.tip {
            Some(tip) => out.push_str(&format!(
                "{}[{}]: {} ({})\n",
                self.severity, self.name, self.message, tip
            )),
            None => out.push_str(&format!("{}[{}]: {}\n", self.severity, self.name, self.message)),
        }

        out.push_str(&format!(
            "-> {}:{}:{}\n",
            self.file, self.span.start.line, self.span.start.column
        ));
        out.push_str(&excerpt(source, self.span, None));

        for related in &self.secondary {
            out.push_str(&excerpt(source, related.span, Some(&related.message)));
        }

        out
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}[{}]: {}",
            self.file, self.span.start.line, self.span.start.column, self.severity, self.name, self.message
        )
    }
}

fn excerpt(source: &str, span: Span, label: Option<&str>) -> String {
    let line = span.start.line as usize;
    let line_text = source.lines().nth(line.saturating_sub(1)).unwrap_or("");
    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    let arrows = (span.start.column as usize)
        .saturating_sub(removed_whitespace)
        .max(1);

    let mut out = String::new();
    out.push_str(&format!("{:>padding$}\n", "|"));
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));
    match label {
        Some(label) => out.push_str(&format!("{:>padding$} {:->arrows$} {}\n", "|", "^", label)),
        None => out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^")),
    }
    out
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();
    (&string[start..], start)
}
