use crate::{
    ast::{
        ast::ErrorNode,
        patterns::{
            BindPattern, FieldPattern, GroupPattern, LiteralPattern, Pattern, StructCasePattern,
            StructFieldsPattern, TupleCasePattern, TuplePattern,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    stack::ensure_sufficient_stack,
};

use super::{
    expr::literal_from_token,
    parser::Parser,
    resolver::{parse_delimited, parse_group_or_tuple, parse_ident, parse_path, Parenthesized},
};

/// Parses a pattern.
///
/// Alternatives are tried in a fixed order: wildcard, `ref`/`mut` binding,
/// path-led case patterns, literals, parenthesised patterns and bare struct
/// field patterns. A lone identifier is a binding; a longer path without a
/// payload names a unit case.
pub fn parse_pattern(parser: &mut Parser) -> Result<Pattern, Error> {
    ensure_sufficient_stack(|| parse_pattern_inner(parser))
}

fn parse_pattern_inner(parser: &mut Parser) -> Result<Pattern, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Identifier => parse_word_pattern(parser),
        TokenKind::Int
        | TokenKind::Float
        | TokenKind::String
        | TokenKind::True
        | TokenKind::False
        | TokenKind::Null => {
            parser.advance();
            let literal = literal_from_token(&token)?;
            Ok(Pattern::Literal(LiteralPattern {
                negative: false,
                span: literal.span,
                literal,
            }))
        }
        TokenKind::Dash if matches!(parser.peek_kind(1), TokenKind::Int | TokenKind::Float) => {
            parser.advance();
            let number = parser.advance().clone();
            let literal = literal_from_token(&number)?;
            Ok(Pattern::Literal(LiteralPattern {
                negative: true,
                literal,
                span: parser.span_from(token.span.start),
            }))
        }
        TokenKind::OpenParen => parse_paren_pattern(parser),
        TokenKind::OpenCurly => {
            let start = token.span.start;
            let (fields, rest) = parse_field_patterns(parser)?;
            Ok(Pattern::StructFields(StructFieldsPattern {
                fields,
                rest,
                span: parser.span_from(start),
            }))
        }
        TokenKind::Error => {
            parser.advance();
            Ok(Pattern::Error(ErrorNode { span: token.span }))
        }
        _ => Err(parser.expected("a pattern")),
    }
}

fn parse_word_pattern(parser: &mut Parser) -> Result<Pattern, Error> {
    let start = parser.get_position();

    if parser.current_token().is_word("_") {
        let span = parser.advance().span;
        return Ok(Pattern::Wildcard(span));
    }

    let by_ref = parser.current_token().is_word("ref")
        && matches!(parser.peek_kind(1), TokenKind::Identifier);
    if by_ref {
        parser.advance();
    }
    let mutable =
        parser.current_token().is_word("mut") && parser.peek_kind(1) == TokenKind::Identifier;
    if mutable {
        parser.advance();
    }
    if by_ref || mutable {
        let name = parse_ident(parser)?;
        return Ok(Pattern::Bind(BindPattern {
            by_ref,
            mutable,
            name,
            span: parser.span_from(start),
        }));
    }

    let path = parse_path(parser)?;

    match parser.current_token_kind() {
        TokenKind::OpenParen => {
            parser.advance();
            let elements = parse_delimited(parser, TokenKind::CloseParen, parse_pattern)?;
            Ok(Pattern::TupleCase(TupleCasePattern {
                path,
                elements,
                span: parser.span_from(start),
            }))
        }
        TokenKind::OpenCurly => {
            let (fields, rest) = parse_field_patterns(parser)?;
            Ok(Pattern::StructCase(StructCasePattern {
                path,
                fields,
                rest,
                span: parser.span_from(start),
            }))
        }
        _ => match path.as_single_ident() {
            Some(name) => Ok(Pattern::Bind(BindPattern {
                by_ref: false,
                mutable: false,
                name: name.clone(),
                span: path.span,
            })),
            None => Ok(Pattern::Path(path)),
        },
    }
}

fn parse_paren_pattern(parser: &mut Parser) -> Result<Pattern, Error> {
    Ok(match parse_group_or_tuple(parser, parse_pattern)? {
        Parenthesized::Group(inner, span) => Pattern::Group(GroupPattern {
            inner: Box::new(inner),
            span,
        }),
        Parenthesized::Tuple(elements, span) => Pattern::Tuple(TuplePattern { elements, span }),
    })
}

/// `{ a, b: pattern, .. }`. Returns the fields and whether `..` was given.
fn parse_field_patterns(parser: &mut Parser) -> Result<(Vec<FieldPattern>, bool), Error> {
    parser.expect(TokenKind::OpenCurly)?;
    let mut fields = vec![];
    let mut rest = false;

    while parser.current_token_kind() != TokenKind::CloseCurly {
        if parser.eat(TokenKind::DotDot) {
            rest = true;
            parser.eat(TokenKind::Comma);
            break;
        }

        let name = parse_ident(parser)?;
        let pattern = if parser.eat(TokenKind::Colon) {
            Some(parse_pattern(parser)?)
        } else {
            None
        };
        fields.push(FieldPattern {
            span: parser.span_from(name.span.start),
            name,
            pattern,
        });

        if parser.current_token_kind() == TokenKind::CloseCurly {
            break;
        }
        parser.expect(TokenKind::Comma)?;
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok((fields, rest))
}
