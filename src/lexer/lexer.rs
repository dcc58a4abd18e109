use std::{collections::HashMap, sync::Arc};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{
    errors::errors::{Diagnostic, Error, ErrorImpl},
    LineIndex, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{
    FloatSuffix, IntSuffix, LexErrorKind, LiteralValue, Token, TokenKind, Trivia, TriviaKind,
};

/// Kind and decoded literal produced by a pattern handler.
pub struct Scanned {
    kind: TokenKind,
    literal: Option<LiteralValue>,
}

pub type RegexHandler = fn(&str) -> Result<Scanned, LexErrorKind>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"^\s+").unwrap();

    /// Token patterns, tried in order. Floats come before integers so that
    /// `1.5` is not split, operators are a single longest-first alternation.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^#:[A-Za-z_][A-Za-z0-9_]*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Label) },
        RegexPattern { regex: Regex::new(r"^[0-9][0-9_]*(?:\.[0-9][0-9_]*(?:[eE][+-]?[0-9][0-9_]*)?|[eE][+-]?[0-9][0-9_]*)(?:f32|f64)?").unwrap(), handler: float_handler },
        RegexPattern { regex: Regex::new(r"^0(?:[xX][0-9a-fA-F_]*|[bB][01_]*|[oO][0-7_]*)(?:[iu](?:8|16|32|64|128|256))?").unwrap(), handler: radix_int_handler },
        RegexPattern { regex: Regex::new(r"^[0-9][0-9_]*(?:[iu](?:8|16|32|64|128|256))?").unwrap(), handler: decimal_int_handler },
        RegexPattern { regex: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(&operator_alternation()).unwrap(), handler: operator_handler },
    ];

    /// The only words the lexer classifies; everything else is positional.
    pub static ref LITERAL_KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("null", TokenKind::Null);
        map
    };

    pub static ref OPERATOR_LOOKUP: HashMap<&'static str, TokenKind> = OPERATORS.iter().copied().collect();
}

/// Operator spellings, longest first within each shared prefix.
const OPERATORS: &[(&str, TokenKind)] = &[
    (":=", TokenKind::ColonEquals),
    ("::", TokenKind::ColonColon),
    ("+=", TokenKind::PlusEquals),
    ("++", TokenKind::PlusPlus),
    ("-=", TokenKind::MinusEquals),
    ("--", TokenKind::MinusMinus),
    ("->", TokenKind::Arrow),
    ("*=", TokenKind::StarEquals),
    ("/=", TokenKind::SlashEquals),
    ("%=", TokenKind::PercentEquals),
    ("|>", TokenKind::Pipe),
    ("||", TokenKind::Or),
    ("??", TokenKind::QuestionQuestion),
    ("&&", TokenKind::And),
    ("==", TokenKind::Equals),
    ("=>", TokenKind::FatArrow),
    ("!=", TokenKind::NotEquals),
    ("!!", TokenKind::BangBang),
    ("<=", TokenKind::LessEquals),
    (">=", TokenKind::GreaterEquals),
    ("..", TokenKind::DotDot),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    ("{", TokenKind::OpenCurly),
    ("}", TokenKind::CloseCurly),
    ("[", TokenKind::OpenBracket),
    ("]", TokenKind::CloseBracket),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    (":", TokenKind::Colon),
    (".", TokenKind::Dot),
    ("?", TokenKind::Question),
    ("!", TokenKind::Not),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
    ("&", TokenKind::Ampersand),
    ("|", TokenKind::Bar),
    ("@", TokenKind::At),
    ("=", TokenKind::Assignment),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Dash),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
];

fn operator_alternation() -> String {
    let alternatives = OPERATORS
        .iter()
        .map(|(text, _)| regex::escape(text))
        .collect::<Vec<_>>()
        .join("|");
    format!("^(?:{})", alternatives)
}

/// Scans tokens out of a source buffer.
///
/// The lexer holds no cursor: [`Lexer::next_token`] is a pure function of the
/// source and a byte position, so a caller can restart lexing anywhere.
pub struct Lexer<'a> {
    source: &'a str,
    lines: LineIndex<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            lines: LineIndex::new(source),
        }
    }

    pub fn at_eof(&self, pos: usize) -> bool {
        pos >= self.source.len()
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.lines.position(start), self.lines.position(end))
    }

    /// Returns the token starting at or after `pos` together with the
    /// position just past it. Leading trivia is attached to the token.
    /// Never fails: bad input becomes an [`TokenKind::Error`] token.
    pub fn next_token(&self, pos: usize) -> (Token, usize) {
        let (leading_trivia, pos) = self.scan_trivia(pos);

        if self.at_eof(pos) {
            let mut token = MK_TOKEN!(TokenKind::EOF, String::new(), self.span(pos, pos));
            token.leading_trivia = leading_trivia;
            return (token, pos);
        }

        let (mut token, end) = self.scan_token(pos);
        token.leading_trivia = leading_trivia;
        (token, end)
    }

    fn scan_trivia(&self, mut pos: usize) -> (Vec<Trivia>, usize) {
        let mut trivia = Vec::new();

        loop {
            let remainder = &self.source[pos..];

            let (kind, len) = if let Some(matched) = WHITESPACE.find(remainder) {
                (TriviaKind::Whitespace, matched.end())
            } else if remainder.starts_with("//") {
                let len = remainder.find('\n').unwrap_or(remainder.len());
                let kind = if remainder.starts_with("///") && !remainder.starts_with("////") {
                    TriviaKind::DocLineComment
                } else {
                    TriviaKind::LineComment
                };
                (kind, len)
            } else if remainder.starts_with("/*") {
                // Unterminated block comments are left for `scan_token`.
                let Some(close) = remainder[2..].find("*/") else {
                    break;
                };
                let len = close + 4;
                let kind = if remainder.starts_with("/**") && len > 4 && !remainder.starts_with("/**/") {
                    TriviaKind::DocBlockComment
                } else {
                    TriviaKind::BlockComment
                };
                (kind, len)
            } else {
                break;
            };

            trivia.push(Trivia {
                kind,
                value: remainder[..len].to_string(),
                span: self.span(pos, pos + len),
            });
            pos += len;
        }

        (trivia, pos)
    }

    fn scan_token(&self, pos: usize) -> (Token, usize) {
        let remainder = &self.source[pos..];

        if remainder.starts_with('"') {
            return self.string_token(pos);
        }

        if remainder.starts_with("/*") {
            let len = remainder.find('\n').unwrap_or(remainder.len());
            return (
                self.error_token(pos, pos + len, LexErrorKind::UnterminatedBlockComment),
                pos + len,
            );
        }

        for pattern in PATTERNS.iter() {
            if let Some(matched) = pattern.regex.find(remainder) {
                let end = pos + matched.end();
                return match (pattern.handler)(matched.as_str()) {
                    Ok(scanned) => {
                        let mut token =
                            MK_TOKEN!(scanned.kind, matched.as_str().to_string(), self.span(pos, end));
                        token.literal = scanned.literal;
                        (token, end)
                    }
                    Err(kind) => (self.error_token(pos, end, kind), end),
                };
            }
        }

        let len = remainder.chars().next().map(char::len_utf8).unwrap_or(1);
        (
            self.error_token(pos, pos + len, LexErrorKind::UnrecognisedCharacter),
            pos + len,
        )
    }

    fn error_token(&self, start: usize, end: usize, kind: LexErrorKind) -> Token {
        let mut token = MK_TOKEN!(
            TokenKind::Error,
            self.source[start..end].to_string(),
            self.span(start, end)
        );
        token.error = Some(kind);
        token
    }

    /// Scans a string literal starting at the opening quote. The literal is
    /// consumed in one piece; a newline or end of input before the closing
    /// quote ends it as unterminated.
    fn string_token(&self, start: usize) -> (Token, usize) {
        let body = &self.source[start + 1..];
        let mut chars = body.char_indices().peekable();
        let mut value = String::new();
        let mut invalid: Option<String> = None;

        let end = loop {
            let Some((i, ch)) = chars.next() else {
                let end = self.source.len();
                return (
                    self.error_token(start, end, LexErrorKind::UnterminatedString),
                    end,
                );
            };

            match ch {
                '"' => break start + 1 + i + 1,
                '\n' => {
                    let end = start + 1 + i;
                    return (
                        self.error_token(start, end, LexErrorKind::UnterminatedString),
                        end,
                    );
                }
                '\\' => match chars.peek().copied() {
                    None | Some((_, '\n')) => continue,
                    Some((_, next)) => {
                        chars.next();
                        match next {
                            'n' => value.push('\n'),
                            't' => value.push('\t'),
                            'r' => value.push('\r'),
                            '\\' => value.push('\\'),
                            '"' => value.push('"'),
                            '0' => value.push('\0'),
                            'u' => match unicode_escape(&mut chars) {
                                Ok(decoded) => value.push(decoded),
                                Err(text) => {
                                    invalid.get_or_insert(format!("\\u{}", text));
                                }
                            },
                            other => {
                                invalid.get_or_insert(format!("\\{}", other));
                            }
                        }
                    }
                },
                _ => value.push(ch),
            }
        };

        if let Some(escape) = invalid {
            return (
                self.error_token(start, end, LexErrorKind::InvalidEscape(escape)),
                end,
            );
        }

        let mut token = MK_TOKEN!(
            TokenKind::String,
            self.source[start..end].to_string(),
            self.span(start, end)
        );
        token.literal = Some(LiteralValue::String(value));
        (token, end)
    }
}

/// Decodes the `{H..H}` part of a `\u{...}` escape. On failure returns the
/// text consumed so far for the diagnostic; a closing quote or newline is
/// never consumed.
fn unicode_escape<I>(chars: &mut std::iter::Peekable<I>) -> Result<char, String>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut text = String::new();

    if chars.peek().map(|(_, c)| *c) != Some('{') {
        return Err(text);
    }
    chars.next();
    text.push('{');

    let mut digits = String::new();
    while let Some((_, c)) = chars.peek().copied() {
        if c == '}' || c == '"' || c == '\n' {
            break;
        }
        chars.next();
        text.push(c);
        digits.push(c);
    }

    if chars.peek().map(|(_, c)| *c) != Some('}') {
        return Err(text);
    }
    chars.next();
    text.push('}');

    if digits.is_empty() || digits.len() > 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(text);
    }

    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or(text)
}

fn split_int_suffix(text: &str) -> (&str, Option<IntSuffix>) {
    for (index, c) in text.char_indices().rev() {
        if c == 'i' || c == 'u' {
            if let Ok(bits) = text[index + 1..].parse::<u16>() {
                return (
                    &text[..index],
                    Some(IntSuffix {
                        signed: c == 'i',
                        bits,
                    }),
                );
            }
        }
        if !c.is_ascii_digit() {
            break;
        }
    }
    (text, None)
}

fn int_literal(digits: &str, radix: u32, suffix: Option<IntSuffix>) -> Result<Scanned, LexErrorKind> {
    let cleaned = digits.replace('_', "");
    if cleaned.is_empty() {
        return Err(LexErrorKind::MalformedNumber);
    }

    Ok(Scanned {
        kind: TokenKind::Int,
        literal: Some(LiteralValue::Int {
            value: u128::from_str_radix(&cleaned, radix).ok(),
            suffix,
        }),
    })
}

fn decimal_int_handler(text: &str) -> Result<Scanned, LexErrorKind> {
    let (digits, suffix) = split_int_suffix(text);
    int_literal(digits, 10, suffix)
}

fn radix_int_handler(text: &str) -> Result<Scanned, LexErrorKind> {
    let (body, suffix) = split_int_suffix(text);
    let radix = match &body[..2] {
        "0x" | "0X" => 16,
        "0b" | "0B" => 2,
        _ => 8,
    };
    int_literal(&body[2..], radix, suffix)
}

fn float_handler(text: &str) -> Result<Scanned, LexErrorKind> {
    let (body, suffix) = if let Some(body) = text.strip_suffix("f32") {
        (body, Some(FloatSuffix::F32))
    } else if let Some(body) = text.strip_suffix("f64") {
        (body, Some(FloatSuffix::F64))
    } else {
        (text, None)
    };

    let value = body
        .replace('_', "")
        .parse::<f64>()
        .map_err(|_| LexErrorKind::MalformedNumber)?;

    Ok(Scanned {
        kind: TokenKind::Float,
        literal: Some(LiteralValue::Float { value, suffix }),
    })
}

fn symbol_handler(text: &str) -> Result<Scanned, LexErrorKind> {
    let kind = LITERAL_KEYWORDS
        .get(text)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let literal = match kind {
        TokenKind::True => Some(LiteralValue::Bool(true)),
        TokenKind::False => Some(LiteralValue::Bool(false)),
        TokenKind::Null => Some(LiteralValue::Null),
        _ => None,
    };

    Ok(Scanned { kind, literal })
}

fn operator_handler(text: &str) -> Result<Scanned, LexErrorKind> {
    let kind = OPERATOR_LOOKUP
        .get(text)
        .copied()
        .ok_or(LexErrorKind::UnrecognisedCharacter)?;
    Ok(Scanned {
        kind,
        literal: None,
    })
}

/// Turns the lexical error carried by an error token into an [`Error`].
pub fn lex_error(token: &Token) -> Option<Error> {
    let kind = match token.error.as_ref()? {
        LexErrorKind::UnrecognisedCharacter => ErrorImpl::UnrecognisedToken {
            token: token.value.clone(),
        },
        LexErrorKind::UnterminatedString => ErrorImpl::UnterminatedString,
        LexErrorKind::UnterminatedBlockComment => ErrorImpl::UnterminatedBlockComment,
        LexErrorKind::InvalidEscape(escape) => ErrorImpl::InvalidEscape {
            escape: escape.clone(),
        },
        LexErrorKind::MalformedNumber => ErrorImpl::MalformedNumber {
            token: token.value.clone(),
        },
    };
    Some(Error::new(kind, token.span))
}

/// Lexes the whole source. The returned stream always ends with exactly one
/// [`TokenKind::EOF`] token; every lexical error yields one diagnostic.
pub fn tokenize(source: &str, file: &Arc<str>) -> (Vec<Token>, Vec<Diagnostic>) {
    let lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    let mut diagnostics = Vec::new();
    let mut pos = 0;

    loop {
        let (token, next) = lexer.next_token(pos);
        trace!(kind = %token.kind, start = token.span.start.offset, end = token.span.end.offset, "token");

        if let Some(error) = lex_error(&token) {
            diagnostics.push(Diagnostic::from_error(error, file));
        }

        let at_end = token.kind == TokenKind::EOF;
        tokens.push(token);
        if at_end {
            break;
        }
        pos = next;
    }

    (tokens, diagnostics)
}
