//! Unit tests for the lexer module.
//!
//! Covers words, numeric and string literals, operators, trivia and the
//! error tokens produced for malformed input.

use std::sync::Arc;

use super::{
    lexer::{tokenize, Lexer},
    tokens::{FloatSuffix, IntSuffix, LexErrorKind, LiteralValue, Token, TokenKind, TriviaKind},
};

fn lex(source: &str) -> Vec<Token> {
    let file: Arc<str> = Arc::from("test.som");
    let (tokens, diagnostics) = tokenize(source, &file);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    tokens
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).iter().map(|token| token.kind).collect()
}

#[test]
fn test_tokenize_words_are_identifiers() {
    let tokens = lex("let func if match foo _bar baz_123");

    for token in &tokens[..7] {
        assert_eq!(token.kind, TokenKind::Identifier);
    }
    assert_eq!(tokens[0].value, "let");
    assert_eq!(tokens[5].value, "_bar");
    assert_eq!(tokens[7].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_literal_words() {
    let tokens = lex("true false null");

    assert_eq!(tokens[0].kind, TokenKind::True);
    assert_eq!(tokens[0].literal, Some(LiteralValue::Bool(true)));
    assert_eq!(tokens[1].kind, TokenKind::False);
    assert_eq!(tokens[1].literal, Some(LiteralValue::Bool(false)));
    assert_eq!(tokens[2].kind, TokenKind::Null);
    assert_eq!(tokens[2].literal, Some(LiteralValue::Null));
}

#[test]
fn test_tokenize_integers() {
    let tokens = lex("42 1_000 0xff 0b101 0o17 7u8 -3i64");

    assert_eq!(
        tokens[0].literal,
        Some(LiteralValue::Int { value: Some(42), suffix: None })
    );
    assert_eq!(
        tokens[1].literal,
        Some(LiteralValue::Int { value: Some(1000), suffix: None })
    );
    assert_eq!(
        tokens[2].literal,
        Some(LiteralValue::Int { value: Some(255), suffix: None })
    );
    assert_eq!(
        tokens[3].literal,
        Some(LiteralValue::Int { value: Some(5), suffix: None })
    );
    assert_eq!(
        tokens[4].literal,
        Some(LiteralValue::Int { value: Some(15), suffix: None })
    );
    assert_eq!(
        tokens[5].literal,
        Some(LiteralValue::Int {
            value: Some(7),
            suffix: Some(IntSuffix { signed: false, bits: 8 })
        })
    );
    // The sign is an operator, not part of the literal.
    assert_eq!(tokens[6].kind, TokenKind::Dash);
    assert_eq!(
        tokens[7].literal,
        Some(LiteralValue::Int {
            value: Some(3),
            suffix: Some(IntSuffix { signed: true, bits: 64 })
        })
    );
}

#[test]
fn test_tokenize_oversized_integer() {
    let tokens = lex("340282366920938463463374607431768211456");

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(
        tokens[0].literal,
        Some(LiteralValue::Int { value: None, suffix: None })
    );
}

#[test]
fn test_tokenize_floats() {
    let tokens = lex("3.14 1e3 2.5e-1f32");

    assert_eq!(
        tokens[0].literal,
        Some(LiteralValue::Float { value: 3.14, suffix: None })
    );
    assert_eq!(
        tokens[1].literal,
        Some(LiteralValue::Float { value: 1000.0, suffix: None })
    );
    assert_eq!(
        tokens[2].literal,
        Some(LiteralValue::Float {
            value: 0.25,
            suffix: Some(FloatSuffix::F32)
        })
    );
}

#[test]
fn test_tokenize_range_is_not_a_float() {
    assert_eq!(
        kinds("1..2"),
        vec![TokenKind::Int, TokenKind::DotDot, TokenKind::Int, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_strings() {
    let tokens = lex(r#""hello" "a\nb" "\u{48}i" "say \"hi\"""#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "\"hello\"");
    assert_eq!(tokens[0].literal, Some(LiteralValue::String("hello".to_string())));
    assert_eq!(tokens[1].literal, Some(LiteralValue::String("a\nb".to_string())));
    assert_eq!(tokens[2].literal, Some(LiteralValue::String("Hi".to_string())));
    assert_eq!(
        tokens[3].literal,
        Some(LiteralValue::String("say \"hi\"".to_string()))
    );
}

#[test]
fn test_tokenize_operators_longest_match() {
    assert_eq!(
        kinds(":= :: += ++ -> => == != !! ?? |> || && .. <= >="),
        vec![
            TokenKind::ColonEquals,
            TokenKind::ColonColon,
            TokenKind::PlusEquals,
            TokenKind::PlusPlus,
            TokenKind::Arrow,
            TokenKind::FatArrow,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::BangBang,
            TokenKind::QuestionQuestion,
            TokenKind::Pipe,
            TokenKind::Or,
            TokenKind::And,
            TokenKind::DotDot,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_label() {
    let tokens = lex("#:outer loop");

    assert_eq!(tokens[0].kind, TokenKind::Label);
    assert_eq!(tokens[0].value, "#:outer");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn test_trivia_attaches_to_next_token() {
    let tokens = lex("// note\n/// doc\n/* block */ x");

    let trivia: Vec<TriviaKind> = tokens[0].leading_trivia.iter().map(|t| t.kind).collect();
    assert_eq!(
        trivia,
        vec![
            TriviaKind::LineComment,
            TriviaKind::Whitespace,
            TriviaKind::DocLineComment,
            TriviaKind::Whitespace,
            TriviaKind::BlockComment,
            TriviaKind::Whitespace,
        ]
    );
    assert!(tokens[0].leading_trivia[2].is_doc());
    assert_eq!(tokens[0].value, "x");
}

#[test]
fn test_trailing_trivia_goes_to_eof() {
    let tokens = lex("x // end");

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].kind, TokenKind::EOF);
    assert_eq!(tokens[1].leading_trivia.len(), 2);
}

#[test]
fn test_positions_are_line_and_column() {
    let tokens = lex("a\n  bc");

    assert_eq!(tokens[1].span.start.line, 2);
    assert_eq!(tokens[1].span.start.column, 3);
    assert_eq!(tokens[1].span.start.offset, 4);
    assert_eq!(tokens[1].span.end.offset, 6);
}

#[test]
fn test_unterminated_string() {
    let file: Arc<str> = Arc::from("test.som");
    let (tokens, diagnostics) = tokenize("\"abc\nx", &file);

    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(tokens[0].error, Some(LexErrorKind::UnterminatedString));
    assert_eq!(tokens[0].value, "\"abc");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, "UnterminatedString");
}

#[test]
fn test_invalid_escape() {
    let file: Arc<str> = Arc::from("test.som");
    let (tokens, diagnostics) = tokenize(r#""a\qb""#, &file);

    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(
        tokens[0].error,
        Some(LexErrorKind::InvalidEscape("\\q".to_string()))
    );
    assert_eq!(diagnostics[0].name, "InvalidEscape");
}

#[test]
fn test_unterminated_block_comment() {
    let file: Arc<str> = Arc::from("test.som");
    let (tokens, diagnostics) = tokenize("x /* never closed", &file);

    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert_eq!(tokens[1].error, Some(LexErrorKind::UnterminatedBlockComment));
    assert_eq!(tokens[2].kind, TokenKind::EOF);
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_malformed_number() {
    let file: Arc<str> = Arc::from("test.som");
    let (tokens, diagnostics) = tokenize("0x", &file);

    assert_eq!(tokens[0].error, Some(LexErrorKind::MalformedNumber));
    assert_eq!(diagnostics[0].name, "MalformedNumber");
}

#[test]
fn test_unrecognised_character() {
    let file: Arc<str> = Arc::from("test.som");
    let (tokens, diagnostics) = tokenize("a $ b", &file);

    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert_eq!(tokens[1].value, "$");
    assert_eq!(tokens[2].value, "b");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, "UnrecognisedToken");
}

#[test]
fn test_next_token_restarts_anywhere() {
    let source = "foo bar";
    let lexer = Lexer::new(source);

    let (token, next) = lexer.next_token(3);
    assert_eq!(token.value, "bar");
    assert_eq!(next, 7);
    assert!(lexer.at_eof(next));
}

#[test]
fn test_token_values_reconstruct_source() {
    let source = "let x = /* c */ 1 +\n  \"s\"; // tail\n";
    let rebuilt: String = lex(source)
        .iter()
        .map(|token| {
            let mut text: String = token.leading_trivia.iter().map(|t| t.value.as_str()).collect();
            text.push_str(&token.value);
            text
        })
        .collect();

    assert_eq!(rebuilt, source);
}
