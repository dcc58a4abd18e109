use crate::{
    ast::{
        ast::{ErrorNode, Label, Path},
        expressions::{
            Argument, AssignOp, AssignmentExpr, BinaryExpr, BinaryOp, BreakExpr, CallExpr,
            ContinueExpr, DoWhileExpr, EnumerableLiteralExpr, Expr, FieldInit, ForExpr,
            GroupExpr, IfExpr, Literal, LoopExpr, MapEntry, MapLiteralExpr, MatchArm, MatchExpr,
            MemberExpr, MethodCallExpr, PostfixExpr, PostfixOp, ReturnExpr, StructLiteralExpr,
            ThrowExpr, TryExpr, TupleExpr, UnaryExpr, UnaryOp, WhileExpr, YieldExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{LiteralValue, Token, TokenKind},
    stack::ensure_sufficient_stack,
    Position, Span,
};

use super::{
    lookups::BindingPower,
    parser::{parse_block, Parser},
    patterns::parse_pattern,
    resolver::{
        keyword_at, parse_delimited, parse_group_or_tuple, parse_ident, parse_path, Keyword,
        Parenthesized,
    },
};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    ensure_sufficient_stack(|| {
        // First parse NUD
        let token_kind = parser.current_token_kind();
        let nud = match parser.get_nud_lookup().get(&token_kind) {
            Some(nud) => *nud,
            None => return Err(parser.expected("an expression")),
        };

        let left = nud(parser)?;
        extend_expr(parser, left, bp)
    })
}

/// Applies LED handlers to `left` while the next operator binds tighter
/// than `bp`.
pub fn extend_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let mut left = left;
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = match parser.get_bp_lookup().get(&token_kind) {
            Some(next_bp) if *next_bp > bp => *next_bp,
            _ => break,
        };
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

/// One character further along the same line.
fn next_column(position: Position) -> Position {
    Position {
        offset: position.offset + 1,
        line: position.line,
        column: position.column + 1,
    }
}

pub fn literal_from_token(token: &Token) -> Result<Literal, Error> {
    let value = match (token.kind, &token.literal) {
        (TokenKind::True, _) => LiteralValue::Bool(true),
        (TokenKind::False, _) => LiteralValue::Bool(false),
        (TokenKind::Null, _) => LiteralValue::Null,
        (_, Some(value)) => value.clone(),
        (_, None) => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: token.value.clone(),
                    message: String::from("expected a literal"),
                },
                token.span,
            ))
        }
    };

    Ok(Literal {
        value,
        raw: token.value.clone(),
        span: token.span,
    })
}

pub fn parse_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    Ok(Expr::Literal(literal_from_token(&token)?))
}

/// Error tokens were reported by the lexer; they become error nodes here
/// without a second diagnostic.
pub fn parse_error_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let span = parser.advance().span;
    Ok(Expr::Error(ErrorNode { span }))
}

pub fn parse_word_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match keyword_at(parser, 0) {
        Some(Keyword::If) => parse_if_expr(parser),
        Some(Keyword::For) => parse_for_expr(parser),
        Some(Keyword::Par) => parse_par_for_expr(parser),
        Some(Keyword::While) => parse_while_expr(parser),
        Some(Keyword::Loop) => parse_loop_expr(parser),
        Some(Keyword::Do) => parse_do_while_expr(parser),
        Some(Keyword::Match) => parse_match_expr(parser),
        Some(Keyword::Try) => parse_try_expr(parser),
        Some(Keyword::Return) => parse_return_expr(parser),
        Some(Keyword::Throw) => parse_throw_expr(parser),
        Some(Keyword::Break) => parse_break_expr(parser),
        Some(Keyword::Continue) => parse_continue_expr(parser),
        Some(Keyword::Yield) => parse_yield_expr(parser),
        Some(Keyword::Move) | Some(Keyword::Copy) => parse_prefix_expr(parser),
        _ => parse_path_expr(parser),
    }
}

fn parse_path_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let path = parse_path(parser)?;
    if parser.struct_literals_allowed() && struct_literal_follows(parser) {
        return parse_struct_literal(parser, path);
    }
    Ok(Expr::Path(path))
}

/// `{` continues a path as a struct literal only when followed by `}`, `..`
/// or a field name and then `:`, `,` or `}`.
fn struct_literal_follows(parser: &Parser) -> bool {
    if parser.current_token_kind() != TokenKind::OpenCurly {
        return false;
    }
    match parser.peek_kind(1) {
        TokenKind::CloseCurly | TokenKind::DotDot => true,
        TokenKind::Identifier => matches!(
            parser.peek_kind(2),
            TokenKind::Colon | TokenKind::Comma | TokenKind::CloseCurly
        ),
        _ => false,
    }
}

fn parse_struct_literal(parser: &mut Parser, path: Path) -> Result<Expr, Error> {
    let start = path.span.start;
    parser.expect(TokenKind::OpenCurly)?;

    let (fields, base) = parser.with_struct_literals(true, |parser| {
        let mut fields = vec![];
        let mut base = None;

        while parser.current_token_kind() != TokenKind::CloseCurly {
            if parser.eat(TokenKind::DotDot) {
                base = Some(Box::new(parse_expr(parser, BindingPower::Default)?));
                parser.eat(TokenKind::Comma);
                break;
            }

            let name = parse_ident(parser)?;
            let value = if parser.eat(TokenKind::Colon) {
                Some(parse_expr(parser, BindingPower::Default)?)
            } else {
                None
            };
            fields.push(FieldInit {
                span: parser.span_from(name.span.start),
                name,
                value,
            });

            if parser.current_token_kind() == TokenKind::CloseCurly {
                break;
            }
            parser.expect(TokenKind::Comma)?;
        }

        parser.expect(TokenKind::CloseCurly)?;
        Ok((fields, base))
    })?;

    Ok(Expr::StructLiteral(StructLiteralExpr {
        path,
        fields,
        base,
        span: parser.span_from(start),
    }))
}

pub fn parse_labeled_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let label = Label {
        name: token.value.trim_start_matches("#:").to_string(),
        span: token.span,
    };

    let labelable = parser.current_token_kind() == TokenKind::OpenCurly
        || matches!(
            keyword_at(parser, 0),
            Some(Keyword::For | Keyword::Par | Keyword::While | Keyword::Loop | Keyword::Do)
        );
    if !labelable {
        return Err(parser.expected("a loop or block after the label"));
    }

    let start = label.span.start;
    let mut expr = parse_expr(parser, BindingPower::Postfix)?;
    match &mut expr {
        Expr::Block(e) => {
            e.label = Some(label);
            e.span.start = start;
        }
        Expr::For(e) | Expr::ParFor(e) => {
            e.label = Some(label);
            e.span.start = start;
        }
        Expr::While(e) => {
            e.label = Some(label);
            e.span.start = start;
        }
        Expr::Loop(e) => {
            e.label = Some(label);
            e.span.start = start;
        }
        Expr::DoWhile(e) => {
            e.label = Some(label);
            e.span.start = start;
        }
        _ => {}
    }
    Ok(expr)
}

pub fn parse_block_expr(parser: &mut Parser) -> Result<Expr, Error> {
    Ok(Expr::Block(parse_block(parser)?))
}

pub fn parse_paren_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let parenthesized = parser.with_struct_literals(true, |parser| {
        parse_group_or_tuple(parser, |parser| parse_expr(parser, BindingPower::Default))
    })?;

    Ok(match parenthesized {
        Parenthesized::Group(inner, span) => Expr::Group(GroupExpr {
            inner: Box::new(inner),
            span,
        }),
        Parenthesized::Tuple(elements, span) => Expr::Tuple(TupleExpr { elements, span }),
    })
}

/// `[a, b]` is an enumerable literal, `[k: v]` a map literal, `[:]` the
/// empty map.
pub fn parse_bracket_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();
    let start = open.span.start;

    if parser.eat(TokenKind::CloseBracket) {
        return Ok(Expr::EnumerableLiteral(EnumerableLiteralExpr {
            elements: vec![],
            span: parser.span_from(start),
        }));
    }

    if parser.current_token_kind() == TokenKind::Colon
        && parser.peek_kind(1) == TokenKind::CloseBracket
    {
        parser.advance();
        parser.advance();
        return Ok(Expr::MapLiteral(MapLiteralExpr {
            entries: vec![],
            span: parser.span_from(start),
        }));
    }

    parser.with_struct_literals(true, |parser| {
        let first = parse_expr(parser, BindingPower::Default)?;

        if parser.current_token_kind() != TokenKind::Colon {
            let mut elements = vec![first];
            if parser.current_token_kind() != TokenKind::CloseBracket {
                parser.expect(TokenKind::Comma)?;
                elements.extend(parse_delimited(parser, TokenKind::CloseBracket, |parser| {
                    parse_expr(parser, BindingPower::Default)
                })?);
            } else {
                parser.advance();
            }
            return Ok(Expr::EnumerableLiteral(EnumerableLiteralExpr {
                elements,
                span: parser.span_from(start),
            }));
        }

        parser.advance();
        let value = parse_expr(parser, BindingPower::Default)?;
        let mut entries = vec![MapEntry {
            span: first.get_span().to(value.get_span()),
            key: first,
            value,
        }];

        if parser.current_token_kind() != TokenKind::CloseBracket {
            parser.expect(TokenKind::Comma)?;
            entries.extend(parse_delimited(parser, TokenKind::CloseBracket, parse_map_entry)?);
        } else {
            parser.advance();
        }

        Ok(Expr::MapLiteral(MapLiteralExpr {
            entries,
            span: parser.span_from(start),
        }))
    })
}

fn parse_map_entry(parser: &mut Parser) -> Result<MapEntry, Error> {
    let key = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    Ok(MapEntry {
        span: key.get_span().to(value.get_span()),
        key,
        value,
    })
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let start = operator_token.span.start;
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let operator = match operator_token.kind {
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Dash => UnaryOp::Neg,
        TokenKind::Tilde => UnaryOp::BitNot,
        TokenKind::Not => UnaryOp::Not,
        TokenKind::BangBang => {
            // `!!x` is `!(!x)`
            let inner = Expr::Unary(UnaryExpr {
                operator: UnaryOp::Not,
                span: Span::new(next_column(start), operand.get_span().end),
                operand: Box::new(operand),
            });
            return Ok(Expr::Unary(UnaryExpr {
                operator: UnaryOp::Not,
                span: parser.span_from(start),
                operand: Box::new(inner),
            }));
        }
        _ if operator_token.is_word("move") => UnaryOp::Move,
        _ if operator_token.is_word("copy") => UnaryOp::Copy,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: operator_token.value.clone(),
                },
                operator_token.span,
            ))
        }
    };

    Ok(Expr::Unary(UnaryExpr {
        operator,
        operand: Box::new(operand),
        span: parser.span_from(start),
    }))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    let operator = match operator_token.kind {
        TokenKind::Pipe => BinaryOp::Pipe,
        TokenKind::QuestionQuestion => BinaryOp::Nullish,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::And => BinaryOp::And,
        TokenKind::Equals => BinaryOp::Eq,
        TokenKind::NotEquals => BinaryOp::NotEq,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEquals => BinaryOp::LessEq,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEquals => BinaryOp::GreaterEq,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Dash => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        _ => BinaryOp::Rem,
    };

    Ok(Expr::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

/// Assignment is right associative: the value is parsed at the lowest
/// binding power so a following `:=` nests to the right.
pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let value = parse_expr(parser, BindingPower::Default)?;

    let operator = match operator_token.kind {
        TokenKind::PlusEquals => AssignOp::AddAssign,
        TokenKind::MinusEquals => AssignOp::SubAssign,
        TokenKind::StarEquals => AssignOp::MulAssign,
        TokenKind::SlashEquals => AssignOp::DivAssign,
        TokenKind::PercentEquals => AssignOp::RemAssign,
        _ => AssignOp::Assign,
    };

    Ok(Expr::Assignment(AssignmentExpr {
        span: left.get_span().to(value.get_span()),
        operator,
        assignee: Box::new(left),
        value: Box::new(value),
    }))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let start = left.get_span().start;

    let operator = match operator_token.kind {
        TokenKind::PlusPlus => PostfixOp::Increment,
        TokenKind::MinusMinus => PostfixOp::Decrement,
        TokenKind::Question => PostfixOp::Propagate,
        TokenKind::BangBang => {
            // `x!!` unwraps twice
            let inner = Expr::Postfix(PostfixExpr {
                operator: PostfixOp::Unwrap,
                operand: Box::new(left),
                span: Span::new(start, next_column(operator_token.span.start)),
            });
            return Ok(Expr::Postfix(PostfixExpr {
                operator: PostfixOp::Unwrap,
                operand: Box::new(inner),
                span: parser.span_from(start),
            }));
        }
        _ => PostfixOp::Unwrap,
    };

    Ok(Expr::Postfix(PostfixExpr {
        operator,
        operand: Box::new(left),
        span: parser.span_from(start),
    }))
}

/// `.field`, `.method(args)` and `.await`.
pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let start = left.get_span().start;

    if parser.current_token().is_word("await") && parser.peek_kind(1) != TokenKind::OpenParen {
        parser.advance();
        return Ok(Expr::Postfix(PostfixExpr {
            operator: PostfixOp::Await,
            operand: Box::new(left),
            span: parser.span_from(start),
        }));
    }

    let member = parse_ident(parser)?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        let args = parse_args(parser)?;
        return Ok(Expr::MethodCall(MethodCallExpr {
            receiver: Box::new(left),
            method: member,
            args,
            span: parser.span_from(start),
        }));
    }

    Ok(Expr::Member(MemberExpr {
        object: Box::new(left),
        member,
        span: parser.span_from(start),
    }))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let start = left.get_span().start;
    let args = parse_args(parser)?;

    Ok(Expr::Call(CallExpr {
        callee: Box::new(left),
        args,
        span: parser.span_from(start),
    }))
}

fn parse_args(parser: &mut Parser) -> Result<Vec<Argument>, Error> {
    parser.expect(TokenKind::OpenParen)?;
    parser.with_struct_literals(true, |parser| {
        parse_delimited(parser, TokenKind::CloseParen, parse_argument)
    })
}

/// `value` or `name: value`.
fn parse_argument(parser: &mut Parser) -> Result<Argument, Error> {
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

    let value = parse_expr(parser, BindingPower::Default)?;
    Ok(Argument {
        name,
        value,
        span: parser.span_from(start),
    })
}

/// Parses the head of a control-flow construct, where `{` belongs to the
/// body.
fn parse_head(parser: &mut Parser) -> Result<Expr, Error> {
    parser.with_struct_literals(false, |parser| parse_expr(parser, BindingPower::Default))
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let condition = parse_head(parser)?;
    let then_branch = parse_block(parser)?;

    let else_branch = if parser.current_token().is_word("else") {
        parser.advance();
        if keyword_at(parser, 0) == Some(Keyword::If) {
            Some(Box::new(parse_if_expr(parser)?))
        } else if parser.current_token_kind() == TokenKind::OpenCurly {
            Some(Box::new(Expr::Block(parse_block(parser)?)))
        } else {
            return Err(parser.expected("`if` or a block after `else`"));
        }
    } else {
        None
    };

    Ok(Expr::If(IfExpr {
        condition: Box::new(condition),
        then_branch,
        else_branch,
        span: parser.span_from(start),
    }))
}

fn parse_for_parts(parser: &mut Parser, start: Position) -> Result<ForExpr, Error> {
    let pattern = parse_pattern(parser)?;
    parser.expect_word("in")?;
    let iterable = parse_head(parser)?;
    let body = parse_block(parser)?;

    Ok(ForExpr {
        label: None,
        pattern,
        iterable: Box::new(iterable),
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_for_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    Ok(Expr::For(parse_for_parts(parser, start)?))
}

/// `par for x in xs { }`
pub fn parse_par_for_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    parser.expect_word("for")?;
    Ok(Expr::ParFor(parse_for_parts(parser, start)?))
}

pub fn parse_while_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let condition = parse_head(parser)?;
    let body = parse_block(parser)?;

    Ok(Expr::While(WhileExpr {
        label: None,
        condition: Box::new(condition),
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_loop_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let body = parse_block(parser)?;

    Ok(Expr::Loop(LoopExpr {
        label: None,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_do_while_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let body = parse_block(parser)?;
    parser.expect_word("while")?;
    let condition = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::DoWhile(DoWhileExpr {
        label: None,
        body,
        condition: Box::new(condition),
        span: parser.span_from(start),
    }))
}

pub fn parse_match_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let scrutinee = parse_head(parser)?;
    parser.expect(TokenKind::OpenCurly)?;

    let arms = parser.with_struct_literals(true, |parser| {
        let mut arms = vec![];
        while parser.current_token_kind() != TokenKind::CloseCurly {
            let arm = parse_match_arm(parser)?;
            let block_like = arm.body.is_block_like();
            arms.push(arm);

            if parser.eat(TokenKind::Comma) || parser.current_token_kind() == TokenKind::CloseCurly {
                continue;
            }
            if !block_like {
                return Err(parser.expected("`,` or `}` after a match arm"));
            }
        }
        parser.expect(TokenKind::CloseCurly)?;
        Ok(arms)
    })?;

    Ok(Expr::Match(MatchExpr {
        scrutinee: Box::new(scrutinee),
        arms,
        span: parser.span_from(start),
    }))
}

fn parse_match_arm(parser: &mut Parser) -> Result<MatchArm, Error> {
    let start = parser.get_position();
    let pattern = parse_pattern(parser)?;

    let guard = if parser.current_token().is_word("if") {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::FatArrow)?;
    let body = parse_arm_body(parser)?;

    Ok(MatchArm {
        pattern,
        guard,
        body,
        span: parser.span_from(start),
    })
}

/// A block-like arm body ends at its `}` like a block-like statement, so the
/// next arm may start with `(` or `-` without a separating `,`.
fn parse_arm_body(parser: &mut Parser) -> Result<Expr, Error> {
    if !starts_block_like(parser) {
        return parse_expr(parser, BindingPower::Default);
    }

    let body = parse_expr(parser, BindingPower::Postfix)?;
    if body.is_block_like() && parser.current_token_kind().is_infix_only() {
        extend_expr(parser, body, BindingPower::Default)
    } else {
        Ok(body)
    }
}

pub fn parse_try_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let body = parse_block(parser)?;

    Ok(Expr::Try(TryExpr {
        body,
        span: parser.span_from(start),
    }))
}

/// An optional operand, present when the next token can start an
/// expression.
fn parse_optional_value(parser: &mut Parser) -> Result<Option<Box<Expr>>, Error> {
    if parser.current_token_kind().can_start_expr() {
        Ok(Some(Box::new(parse_expr(parser, BindingPower::Default)?)))
    } else {
        Ok(None)
    }
}

fn parse_optional_label(parser: &mut Parser) -> Option<Label> {
    if parser.current_token_kind() != TokenKind::Label {
        return None;
    }
    let token = parser.advance();
    Some(Label {
        name: token.value.trim_start_matches("#:").to_string(),
        span: token.span,
    })
}

pub fn parse_return_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let value = parse_optional_value(parser)?;

    Ok(Expr::Return(ReturnExpr {
        value,
        span: parser.span_from(start),
    }))
}

pub fn parse_throw_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Throw(ThrowExpr {
        value: Box::new(value),
        span: parser.span_from(start),
    }))
}

pub fn parse_break_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let label = parse_optional_label(parser);
    let value = parse_optional_value(parser)?;

    Ok(Expr::Break(BreakExpr {
        label,
        value,
        span: parser.span_from(start),
    }))
}

pub fn parse_continue_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let label = parse_optional_label(parser);

    Ok(Expr::Continue(ContinueExpr {
        label,
        span: parser.span_from(start),
    }))
}

pub fn parse_yield_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let value = parse_optional_value(parser)?;

    Ok(Expr::Yield(YieldExpr {
        value,
        span: parser.span_from(start),
    }))
}

/// Whether the expression statement starting here is a block-like
/// construct, which ends the statement at its closing `}`.
pub fn starts_block_like(parser: &Parser) -> bool {
    match parser.current_token_kind() {
        TokenKind::OpenCurly | TokenKind::Label => true,
        TokenKind::Identifier => matches!(
            keyword_at(parser, 0),
            Some(
                Keyword::If
                    | Keyword::For
                    | Keyword::Par
                    | Keyword::While
                    | Keyword::Loop
                    | Keyword::Match
                    | Keyword::Try
            )
        ),
        _ => false,
    }
}
