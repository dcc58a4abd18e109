//! Ambiguity resolution.
//!
//! Somnium reuses the same surface for different constructs: words are
//! keywords only in certain positions, `(…)` may be a group or a tuple, and a
//! generic argument may be a type or a constant expression. The helpers in
//! this module make those choices deterministically.

use std::collections::HashMap;

use lazy_static::lazy_static;
use tracing::trace;

use crate::{
    ast::{
        ast::{GenericArg, GenericArgs, Ident, Path, PathSegment},
        statements::ModifierKind,
    },
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{
    expr::parse_expr,
    lookups::BindingPower,
    parser::Parser,
    types::{can_start_type, parse_type},
};

/// Words that act as keywords when the surrounding tokens fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    If,
    For,
    Par,
    While,
    Loop,
    Do,
    Match,
    Try,
    Return,
    Throw,
    Break,
    Continue,
    Yield,
    Move,
    Copy,
    Let,
    Use,
    Source,
    On,
    Catch,
    Func,
    Method,
    Trans,
    Class,
    Trait,
    Struct,
    Record,
    Service,
    Event,
    Enum,
    Module,
    Type,
    Extend,
    New,
    Drop,
    Prop,
    Public,
    Private,
    Extern,
    Static,
    Async,
    Unique,
    Shared,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, Keyword> = {
        let mut map = HashMap::new();
        map.insert("if", Keyword::If);
        map.insert("for", Keyword::For);
        map.insert("par", Keyword::Par);
        map.insert("while", Keyword::While);
        map.insert("loop", Keyword::Loop);
        map.insert("do", Keyword::Do);
        map.insert("match", Keyword::Match);
        map.insert("try", Keyword::Try);
        map.insert("return", Keyword::Return);
        map.insert("throw", Keyword::Throw);
        map.insert("break", Keyword::Break);
        map.insert("continue", Keyword::Continue);
        map.insert("yield", Keyword::Yield);
        map.insert("move", Keyword::Move);
        map.insert("copy", Keyword::Copy);
        map.insert("let", Keyword::Let);
        map.insert("use", Keyword::Use);
        map.insert("source", Keyword::Source);
        map.insert("on", Keyword::On);
        map.insert("catch", Keyword::Catch);
        map.insert("func", Keyword::Func);
        map.insert("method", Keyword::Method);
        map.insert("trans", Keyword::Trans);
        map.insert("class", Keyword::Class);
        map.insert("trait", Keyword::Trait);
        map.insert("struct", Keyword::Struct);
        map.insert("record", Keyword::Record);
        map.insert("service", Keyword::Service);
        map.insert("event", Keyword::Event);
        map.insert("enum", Keyword::Enum);
        map.insert("module", Keyword::Module);
        map.insert("type", Keyword::Type);
        map.insert("extend", Keyword::Extend);
        map.insert("new", Keyword::New);
        map.insert("drop", Keyword::Drop);
        map.insert("prop", Keyword::Prop);
        map.insert("public", Keyword::Public);
        map.insert("private", Keyword::Private);
        map.insert("extern", Keyword::Extern);
        map.insert("static", Keyword::Static);
        map.insert("async", Keyword::Async);
        map.insert("unique", Keyword::Unique);
        map.insert("shared", Keyword::Shared);
        map
    };
}

impl Keyword {
    /// Keywords that open a declaration, modifiers included.
    pub const DECL_STARTS: &'static [Keyword] = &[
        Keyword::Func,
        Keyword::Method,
        Keyword::Trans,
        Keyword::Class,
        Keyword::Trait,
        Keyword::Struct,
        Keyword::Record,
        Keyword::Service,
        Keyword::Event,
        Keyword::Enum,
        Keyword::Module,
        Keyword::Type,
        Keyword::Extend,
        Keyword::Public,
        Keyword::Private,
        Keyword::Extern,
        Keyword::Static,
        Keyword::Async,
        Keyword::Unique,
        Keyword::Shared,
    ];

    pub fn from_word(word: &str) -> Option<Keyword> {
        KEYWORDS.get(word).copied()
    }

    pub fn starts_decl(&self) -> bool {
        Keyword::DECL_STARTS.contains(self)
    }

    pub fn modifier(&self) -> Option<ModifierKind> {
        match self {
            Keyword::Public => Some(ModifierKind::Public),
            Keyword::Private => Some(ModifierKind::Private),
            Keyword::Extern => Some(ModifierKind::Extern),
            Keyword::Static => Some(ModifierKind::Static),
            Keyword::Async => Some(ModifierKind::Async),
            Keyword::Unique => Some(ModifierKind::Unique),
            Keyword::Shared => Some(ModifierKind::Shared),
            _ => None,
        }
    }

    /// Member-only declarations.
    pub fn is_member_only(&self) -> bool {
        matches!(self, Keyword::New | Keyword::Drop | Keyword::Prop)
    }
}

fn can_start_pattern(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Identifier | TokenKind::OpenParen | TokenKind::OpenCurly
    )
}

/// The keyword the token `offset` places ahead acts as, if any.
///
/// Classification looks at the following token: `on` needs an identifier,
/// `source` a string, `par` the word `for`, and so on. Anything that does not
/// fit stays an ordinary identifier.
pub fn keyword_at(parser: &Parser, offset: usize) -> Option<Keyword> {
    let token = parser.peek(offset);
    if token.kind != TokenKind::Identifier {
        return None;
    }
    let keyword = Keyword::from_word(&token.value)?;
    let next = parser.peek(offset + 1);

    let fits = match keyword {
        Keyword::If | Keyword::While | Keyword::Match | Keyword::Throw | Keyword::Move | Keyword::Copy => {
            next.kind.can_start_expr()
        }
        Keyword::For => can_start_pattern(next),
        Keyword::Par => next.is_word("for"),
        Keyword::Loop | Keyword::Do | Keyword::Try => next.kind == TokenKind::OpenCurly,
        Keyword::Return | Keyword::Break | Keyword::Continue | Keyword::Yield => {
            !next.kind.is_infix_only()
        }
        Keyword::Let => can_start_pattern(next),
        Keyword::Use | Keyword::On | Keyword::Catch | Keyword::Prop => {
            next.kind == TokenKind::Identifier
        }
        Keyword::Source => next.kind == TokenKind::String,
        Keyword::Func
        | Keyword::Method
        | Keyword::Trans
        | Keyword::Class
        | Keyword::Trait
        | Keyword::Struct
        | Keyword::Record
        | Keyword::Service
        | Keyword::Event
        | Keyword::Enum
        | Keyword::Module
        | Keyword::Type => next.kind == TokenKind::Identifier,
        Keyword::Extend => can_start_type(next.kind) && extend_target_ends(parser, offset + 1),
        Keyword::New => next.kind == TokenKind::OpenParen,
        Keyword::Drop => matches!(next.kind, TokenKind::OpenCurly | TokenKind::Semicolon),
        Keyword::Public
        | Keyword::Private
        | Keyword::Extern
        | Keyword::Static
        | Keyword::Async
        | Keyword::Unique
        | Keyword::Shared => modifiers_lead_to_decl(parser, offset + 1),
    };

    fits.then_some(keyword)
}

/// Whether the tokens from `offset` on are more modifiers followed by a
/// declaration keyword.
fn modifiers_lead_to_decl(parser: &Parser, offset: usize) -> bool {
    let mut offset = offset;
    loop {
        match keyword_at_plain(parser, offset) {
            Some(keyword) if keyword.modifier().is_some() => offset += 1,
            Some(_) => {
                return keyword_at(parser, offset)
                    .map(|keyword| keyword.starts_decl() || keyword.is_member_only() || keyword == Keyword::Let)
                    .unwrap_or(false)
            }
            None => return false,
        }
    }
}

/// Whether the tokens from `offset` on look like a type followed by the
/// `{` or `:` of an extension. Anything goes inside matched brackets; at the
/// outer level only type tokens may appear.
fn extend_target_ends(parser: &Parser, offset: usize) -> bool {
    let mut offset = offset;
    let mut depth = 0usize;
    loop {
        match parser.peek_kind(offset) {
            TokenKind::EOF => return false,
            TokenKind::OpenParen | TokenKind::OpenBracket => depth += 1,
            TokenKind::CloseParen | TokenKind::CloseBracket if depth > 0 => depth -= 1,
            _ if depth > 0 => {}
            TokenKind::OpenCurly | TokenKind::Colon => return true,
            TokenKind::ColonColon | TokenKind::Bar | TokenKind::BangBang | TokenKind::Arrow => {}
            kind if can_start_type(kind) && kind != TokenKind::Error => {}
            _ => return false,
        }
        offset += 1;
    }
}

fn keyword_at_plain(parser: &Parser, offset: usize) -> Option<Keyword> {
    let token = parser.peek(offset);
    if token.kind != TokenKind::Identifier {
        return None;
    }
    Keyword::from_word(&token.value)
}

/// Contents of a parenthesised list after the trailing-comma rule.
#[derive(Debug)]
pub enum Parenthesized<T> {
    /// `(x)`
    Group(T, Span),
    /// `()`, `(x,)`, `(x, y)`
    Tuple(Vec<T>, Span),
}

/// Parses `( item, … )` and applies the trailing-comma rule shared by
/// expressions, patterns and types: a single element without a comma is a
/// group, anything else is a tuple.
pub fn parse_group_or_tuple<T, F>(parser: &mut Parser, mut parse_item: F) -> Result<Parenthesized<T>, Error>
where
    F: FnMut(&mut Parser) -> Result<T, Error>,
{
    let open = parser.expect(TokenKind::OpenParen)?;
    let mut items = vec![];
    let mut saw_comma = false;

    while parser.current_token_kind() != TokenKind::CloseParen {
        items.push(parse_item(parser)?);
        if parser.current_token_kind() == TokenKind::CloseParen {
            break;
        }
        parser.expect(TokenKind::Comma)?;
        saw_comma = true;
    }

    parser.expect(TokenKind::CloseParen)?;
    let span = parser.span_from(open.span.start);

    if items.len() == 1 && !saw_comma {
        if let Some(item) = items.pop() {
            return Ok(Parenthesized::Group(item, span));
        }
    }
    Ok(Parenthesized::Tuple(items, span))
}

/// Parses a comma separated list up to `closer`, allowing a trailing comma.
/// The closer itself is consumed.
pub fn parse_delimited<T, F>(parser: &mut Parser, closer: TokenKind, mut parse_item: F) -> Result<Vec<T>, Error>
where
    F: FnMut(&mut Parser) -> Result<T, Error>,
{
    let mut items = vec![];
    while parser.current_token_kind() != closer {
        items.push(parse_item(parser)?);
        if parser.current_token_kind() == closer {
            break;
        }
        parser.expect(TokenKind::Comma)?;
    }
    parser.expect(closer)?;
    Ok(items)
}

pub fn parse_ident(parser: &mut Parser) -> Result<Ident, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(Ident {
        name: token.value,
        span: token.span,
    })
}

/// Parses `a::b[T]::c`. Whether the path is a type, an expression or a
/// pattern prefix is up to the caller.
pub fn parse_path(parser: &mut Parser) -> Result<Path, Error> {
    let start = parser.get_position();
    let mut segments = vec![parse_path_segment(parser)?];

    while parser.current_token_kind() == TokenKind::ColonColon
        && parser.peek_kind(1) == TokenKind::Identifier
    {
        parser.advance();
        segments.push(parse_path_segment(parser)?);
    }

    Ok(Path {
        segments,
        span: parser.span_from(start),
    })
}

fn parse_path_segment(parser: &mut Parser) -> Result<PathSegment, Error> {
    let name = parse_ident(parser)?;
    let generics = if generic_args_follow(parser) {
        Some(parse_generic_args(parser)?)
    } else {
        None
    };
    Ok(PathSegment { name, generics })
}

/// A `[` opens generic arguments only when it touches the previous token.
fn generic_args_follow(parser: &Parser) -> bool {
    let bracket = parser.current_token();
    bracket.kind == TokenKind::OpenBracket
        && bracket.leading_trivia.is_empty()
        && parser.last_end().offset == bracket.span.start.offset
}

fn parse_generic_args(parser: &mut Parser) -> Result<GenericArgs, Error> {
    let open = parser.expect(TokenKind::OpenBracket)?;
    let args = parser.with_struct_literals(true, |parser| {
        parse_delimited(parser, TokenKind::CloseBracket, parse_generic_arg)
    })?;
    Ok(GenericArgs {
        args,
        span: parser.span_from(open.span.start),
    })
}

/// Tries the argument as a type first. The type is kept only if it parsed
/// cleanly and ends right before `,` or `]`; otherwise the cursor is rewound
/// and the argument is parsed as an expression.
pub fn parse_generic_arg(parser: &mut Parser) -> Result<GenericArg, Error> {
    if can_start_type(parser.current_token_kind()) {
        let checkpoint = parser.checkpoint();
        if let Ok(ty) = parse_type(parser) {
            if matches!(
                parser.current_token_kind(),
                TokenKind::Comma | TokenKind::CloseBracket
            ) {
                return Ok(GenericArg::Type(ty));
            }
        }
        trace!(offset = parser.get_position().offset, "generic argument is not a type");
        parser.rewind(checkpoint);
    }

    Ok(GenericArg::Expr(parse_expr(parser, BindingPower::Default)?))
}
