//! Type parsing implementation.
//!
//! Like expressions, types are parsed with NUD/LED handlers and binding
//! powers. Prefix constructors (`&`, `?`, `^`, `~`, …) bind to a single
//! primary type; `|` joins union members and `!!` joins a fallible type with
//! its error types, loosest of all.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::ErrorNode,
        types::{
            ArrayType, FuncType, ReactiveType, RefKind, RefType, TupleType, TypeExpr, UnionType,
            WrappedType,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    stack::ensure_sufficient_stack,
    Position, Span,
};

use super::{
    expr::parse_expr,
    lookups::BindingPower,
    parser::Parser,
    resolver::{parse_delimited, parse_group_or_tuple, parse_path, Parenthesized},
};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum TypeBindingPower {
    Default,
    Fallible,
    Union,
    Primary,
}

pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeExpr, Error>;
pub type TypeLEDHandler = fn(&mut Parser, TypeExpr, TypeBindingPower) -> Result<TypeExpr, Error>;

pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;
pub type TypeBPLookup = HashMap<TokenKind, TypeBindingPower>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_led(TokenKind::BangBang, TypeBindingPower::Fallible, parse_joined_type);
    parser.type_led(TokenKind::Bar, TypeBindingPower::Union, parse_joined_type);

    parser.type_nud(TokenKind::Identifier, parse_word_type);
    parser.type_nud(TokenKind::Ampersand, parse_ref_type);
    parser.type_nud(TokenKind::And, parse_ref_type);
    parser.type_nud(TokenKind::Star, parse_pointer_type);
    parser.type_nud(TokenKind::Question, parse_option_type);
    parser.type_nud(TokenKind::QuestionQuestion, parse_option_type);
    parser.type_nud(TokenKind::Caret, parse_future_type);
    parser.type_nud(TokenKind::Tilde, parse_reactive_type);
    parser.type_nud(TokenKind::OpenBracket, parse_bracket_type);
    parser.type_nud(TokenKind::OpenParen, parse_paren_type);
    parser.type_nud(TokenKind::Error, parse_error_type);
}

/// Whether a type may begin with a token of this kind.
pub fn can_start_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::Ampersand
            | TokenKind::And
            | TokenKind::Star
            | TokenKind::Question
            | TokenKind::QuestionQuestion
            | TokenKind::Caret
            | TokenKind::Tilde
            | TokenKind::OpenBracket
            | TokenKind::OpenParen
            | TokenKind::Error
    )
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    parse_type_bp(parser, TypeBindingPower::Default)
}

pub fn parse_type_bp(parser: &mut Parser, bp: TypeBindingPower) -> Result<TypeExpr, Error> {
    ensure_sufficient_stack(|| {
        // First parse NUD
        let token_kind = parser.current_token_kind();
        let nud = match parser.get_type_nud_lookup().get(&token_kind) {
            Some(nud) => *nud,
            None => return Err(parser.expected("a type")),
        };

        let mut left = nud(parser)?;

        loop {
            let token_kind = parser.current_token_kind();
            let next_bp = match parser.get_type_bp_lookup().get(&token_kind) {
                Some(next_bp) if *next_bp > bp => *next_bp,
                _ => break,
            };
            let led = match parser.get_type_led_lookup().get(&token_kind) {
                Some(led) => *led,
                None => break,
            };
            left = led(parser, left, next_bp)?;
        }

        Ok(left)
    })
}

/// Operand of a prefix type constructor.
fn parse_operand(parser: &mut Parser) -> Result<Box<TypeExpr>, Error> {
    Ok(Box::new(parse_type_bp(parser, TypeBindingPower::Primary)?))
}

fn next_column(position: Position) -> Position {
    Position {
        offset: position.offset + 1,
        line: position.line,
        column: position.column + 1,
    }
}

/// `A | B | C` and `T !! E1 !! E2` collect into one flat node each.
pub fn parse_joined_type(
    parser: &mut Parser,
    left: TypeExpr,
    bp: TypeBindingPower,
) -> Result<TypeExpr, Error> {
    let fallible = parser.advance().kind == TokenKind::BangBang;
    let right = parse_type_bp(parser, bp)?;
    let span = left.get_span().to(right.get_span());

    let joined = match (left, fallible) {
        (TypeExpr::Union(mut union), false) => {
            union.members.push(right);
            union.span = span;
            TypeExpr::Union(union)
        }
        (TypeExpr::Fallible(mut union), true) => {
            union.members.push(right);
            union.span = span;
            TypeExpr::Fallible(union)
        }
        (left, false) => TypeExpr::Union(UnionType {
            members: vec![left, right],
            span,
        }),
        (left, true) => TypeExpr::Fallible(UnionType {
            members: vec![left, right],
            span,
        }),
    };
    Ok(joined)
}

pub fn parse_error_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let span = parser.advance().span;
    Ok(TypeExpr::Error(ErrorNode { span }))
}

/// Named types, `func(…) -> R`, and the word prefixes `borrow`, `unique`
/// and `shared`.
pub fn parse_word_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.current_token();
    let next = parser.peek_kind(1);

    if token.is_word("func") && next == TokenKind::OpenParen {
        return parse_func_type(parser);
    }

    let kind = match token.value.as_str() {
        "borrow" => Some(RefKind::Borrow),
        "unique" => Some(RefKind::Unique),
        "shared" => Some(RefKind::Shared),
        _ => None,
    };
    if let Some(kind) = kind {
        if can_start_type(next) {
            let start = parser.advance().span.start;
            let inner = parse_operand(parser)?;
            return Ok(TypeExpr::Ref(RefType {
                kind,
                inner,
                span: parser.span_from(start),
            }));
        }
    }

    Ok(TypeExpr::Named(parse_path(parser)?))
}

fn parse_func_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.advance().span.start;
    parser.expect(TokenKind::OpenParen)?;
    let params = parse_delimited(parser, TokenKind::CloseParen, parse_type)?;

    let return_type = if parser.eat(TokenKind::Arrow) {
        Some(parse_operand(parser)?)
    } else {
        None
    };

    Ok(TypeExpr::Func(FuncType {
        params,
        return_type,
        span: parser.span_from(start),
    }))
}

/// `&T`, `&mut T`, and `&&T` as a reference to a reference.
pub fn parse_ref_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.advance().clone();
    let start = token.span.start;

    let kind = if parser.current_token().is_word("mut") && can_start_type(parser.peek_kind(1)) {
        parser.advance();
        RefKind::RefMut
    } else {
        RefKind::Ref
    };

    let inner = parse_operand(parser)?;

    if token.kind == TokenKind::And {
        let inner = TypeExpr::Ref(RefType {
            kind,
            span: Span::new(next_column(start), inner.get_span().end),
            inner,
        });
        return Ok(TypeExpr::Ref(RefType {
            kind: RefKind::Ref,
            inner: Box::new(inner),
            span: parser.span_from(start),
        }));
    }

    Ok(TypeExpr::Ref(RefType {
        kind,
        inner,
        span: parser.span_from(start),
    }))
}

pub fn parse_pointer_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.advance().span.start;
    let inner = parse_operand(parser)?;
    Ok(TypeExpr::Ref(RefType {
        kind: RefKind::Pointer,
        inner,
        span: parser.span_from(start),
    }))
}

/// `?T`, and `??T` as an option of an option.
pub fn parse_option_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.advance().clone();
    let start = token.span.start;
    let inner = parse_operand(parser)?;

    if token.kind == TokenKind::QuestionQuestion {
        let inner = TypeExpr::Option(WrappedType {
            span: Span::new(next_column(start), inner.get_span().end),
            inner,
        });
        return Ok(TypeExpr::Option(WrappedType {
            inner: Box::new(inner),
            span: parser.span_from(start),
        }));
    }

    Ok(TypeExpr::Option(WrappedType {
        inner,
        span: parser.span_from(start),
    }))
}

pub fn parse_future_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.advance().span.start;
    let inner = parse_operand(parser)?;
    Ok(TypeExpr::Future(WrappedType {
        inner,
        span: parser.span_from(start),
    }))
}

pub fn parse_reactive_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.advance().span.start;
    let mutable = parser.current_token().is_word("mut") && can_start_type(parser.peek_kind(1));
    if mutable {
        parser.advance();
    }
    let inner = parse_operand(parser)?;
    Ok(TypeExpr::Reactive(ReactiveType {
        mutable,
        inner,
        span: parser.span_from(start),
    }))
}

/// `[T]` or `[T; size]`.
pub fn parse_bracket_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.advance().span.start;
    let element = Box::new(parse_type(parser)?);

    if parser.eat(TokenKind::Semicolon) {
        let size = parser.with_struct_literals(true, |parser| parse_expr(parser, BindingPower::Default))?;
        parser.expect(TokenKind::CloseBracket)?;
        return Ok(TypeExpr::Array(ArrayType {
            element,
            size: Box::new(size),
            span: parser.span_from(start),
        }));
    }

    parser.expect(TokenKind::CloseBracket)?;
    Ok(TypeExpr::Enumerable(WrappedType {
        inner: element,
        span: parser.span_from(start),
    }))
}

pub fn parse_paren_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    Ok(match parse_group_or_tuple(parser, parse_type)? {
        Parenthesized::Group(inner, span) => TypeExpr::Group(WrappedType {
            inner: Box::new(inner),
            span,
        }),
        Parenthesized::Tuple(elements, span) => TypeExpr::Tuple(TupleType { elements, span }),
    })
}
