use crate::{
    ast::{
        ast::Ident,
        statements::{
            CatchStmt, EventBind, ExpressionStmt, LetStmt, OnStmt, SourceStmt, Stmt, UseItem,
            UseStmt,
        },
    },
    errors::errors::Error,
    lexer::tokens::{LiteralValue, TokenKind},
};

use super::{
    decl::{parse_decl, DeclContext},
    expr::{extend_expr, parse_expr, starts_block_like},
    lookups::BindingPower,
    parser::{parse_block, Parser},
    patterns::parse_pattern,
    resolver::{keyword_at, parse_delimited, parse_ident, parse_path},
    types::parse_type,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(keyword) = keyword_at(parser, 0) {
        if let Some(handler) = parser.get_stmt_lookup().get(&keyword).copied() {
            return handler(parser);
        }
    }

    if parser.current_token_kind() == TokenKind::Semicolon {
        let span = parser.advance().span;
        return Ok(Stmt::Empty(span));
    }

    parse_expression_stmt(parser)
}

/// An expression statement. The `;` is left optional here; the statement
/// list decides whether a missing one makes the expression the list's value
/// or an error.
pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let expression = if starts_block_like(parser) {
        parse_expr(parser, BindingPower::Postfix)?
    } else {
        parse_expr(parser, BindingPower::Default)?
    };

    // A block-like statement may still be the head of a longer expression:
    // `match x { … }.len()`. Operators that may also start an expression
    // (`-`, `(`) begin a new statement instead.
    let expression = if expression.is_block_like() && parser.current_token_kind().is_infix_only() {
        extend_expr(parser, expression, BindingPower::Default)?
    } else {
        expression
    };

    let has_semicolon = parser.eat(TokenKind::Semicolon);

    Ok(Stmt::Expr(ExpressionStmt {
        expression,
        has_semicolon,
        span: parser.span_from(start),
    }))
}

/// `let pattern (: T)? (= value)? ;`
pub fn parse_let_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let pattern = parse_pattern(parser)?;

    let ty = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let value = if parser.eat(TokenKind::Assignment) {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Let(LetStmt {
        pattern,
        ty,
        value,
        span: parser.span_from(start),
    }))
}

/// `use a::b;`, `use a::b as c;`, `use a::{b, c as d};`
pub fn parse_use_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let mut path = vec![parse_ident(parser)?];
    let mut items = None;

    while parser.eat(TokenKind::ColonColon) {
        if parser.current_token_kind() == TokenKind::OpenCurly {
            parser.advance();
            items = Some(parse_delimited(parser, TokenKind::CloseCurly, parse_use_item)?);
            break;
        }
        path.push(parse_ident(parser)?);
    }

    let alias = parse_alias(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Use(UseStmt {
        path,
        items,
        alias,
        span: parser.span_from(start),
    }))
}

fn parse_use_item(parser: &mut Parser) -> Result<UseItem, Error> {
    let name = parse_ident(parser)?;
    let alias = parse_alias(parser)?;
    Ok(UseItem {
        span: parser.span_from(name.span.start),
        name,
        alias,
    })
}

fn parse_alias(parser: &mut Parser) -> Result<Option<Ident>, Error> {
    if parser.current_token().is_word("as") && parser.peek_kind(1) == TokenKind::Identifier {
        parser.advance();
        return Ok(Some(parse_ident(parser)?));
    }
    Ok(None)
}

/// `source "path";`
pub fn parse_source_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let token = parser.expect(TokenKind::String)?;
    let path = match token.literal {
        Some(LiteralValue::String(path)) => path,
        _ => token.value,
    };
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Source(SourceStmt {
        path,
        span: parser.span_from(start),
    }))
}

/// `on Event(pattern, name: pattern) { }`. The bind list may be omitted.
pub fn parse_on_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let event = parse_path(parser)?;

    let binds = if parser.eat(TokenKind::OpenParen) {
        parse_delimited(parser, TokenKind::CloseParen, parse_event_bind)?
    } else {
        vec![]
    };

    let body = parse_block(parser)?;

    Ok(Stmt::On(OnStmt {
        event,
        binds,
        body,
        span: parser.span_from(start),
    }))
}

fn parse_event_bind(parser: &mut Parser) -> Result<EventBind, Error> {
    let start = parser.get_position();
    let name = if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::Colon
    {
        let name = parse_ident(parser)?;
        parser.advance();
        Some(name)
    } else {
        None
    };

    let pattern = parse_pattern(parser)?;
    Ok(EventBind {
        name,
        pattern,
        span: parser.span_from(start),
    })
}

/// `catch err (: T)? { }`
pub fn parse_catch_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let name = parse_ident(parser)?;

    let ty = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(Stmt::Catch(CatchStmt {
        name,
        ty,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Decl(parse_decl(parser, DeclContext::Item)?))
}
