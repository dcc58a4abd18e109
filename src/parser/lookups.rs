use std::collections::HashMap;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{
    expr::*,
    parser::Parser,
    resolver::Keyword,
    stmt::*,
};

/// Expression binding powers, lowest to highest.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    Pipe,
    Nullish,
    Or,
    And,
    Comparison,
    Additive,
    Multiplicative,
    Unary,
    Postfix,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Assignment, right associative
    parser.led(TokenKind::ColonEquals, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::PlusEquals, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::MinusEquals, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::StarEquals, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::SlashEquals, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::PercentEquals, BindingPower::Assignment, parse_assignment_expr);

    parser.led(TokenKind::Pipe, BindingPower::Pipe, parse_binary_expr);
    parser.led(TokenKind::QuestionQuestion, BindingPower::Nullish, parse_binary_expr);

    // Logical
    parser.led(TokenKind::Or, BindingPower::Or, parse_binary_expr);
    parser.led(TokenKind::And, BindingPower::And, parse_binary_expr);

    // Comparison
    parser.led(TokenKind::Equals, BindingPower::Comparison, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Comparison, parse_binary_expr);
    parser.led(TokenKind::Less, BindingPower::Comparison, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Comparison, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Comparison, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Comparison, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);

    // Postfix chain
    parser.led(TokenKind::PlusPlus, BindingPower::Postfix, parse_postfix_expr);
    parser.led(TokenKind::MinusMinus, BindingPower::Postfix, parse_postfix_expr);
    parser.led(TokenKind::Not, BindingPower::Postfix, parse_postfix_expr);
    parser.led(TokenKind::BangBang, BindingPower::Postfix, parse_postfix_expr);
    parser.led(TokenKind::Question, BindingPower::Postfix, parse_postfix_expr);
    parser.led(TokenKind::Dot, BindingPower::Postfix, parse_member_expr);
    parser.led(TokenKind::OpenParen, BindingPower::Postfix, parse_call_expr);

    // Literals and symbols
    parser.nud(TokenKind::Int, parse_literal_expr);
    parser.nud(TokenKind::Float, parse_literal_expr);
    parser.nud(TokenKind::String, parse_literal_expr);
    parser.nud(TokenKind::True, parse_literal_expr);
    parser.nud(TokenKind::False, parse_literal_expr);
    parser.nud(TokenKind::Null, parse_literal_expr);
    parser.nud(TokenKind::Identifier, parse_word_expr);
    parser.nud(TokenKind::Label, parse_labeled_expr);
    parser.nud(TokenKind::OpenParen, parse_paren_expr);
    parser.nud(TokenKind::OpenBracket, parse_bracket_expr);
    parser.nud(TokenKind::OpenCurly, parse_block_expr);
    parser.nud(TokenKind::Error, parse_error_expr);

    // Prefix
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Plus, parse_prefix_expr);
    parser.nud(TokenKind::Tilde, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::BangBang, parse_prefix_expr);

    // Statements
    parser.stmt(Keyword::Let, parse_let_stmt);
    parser.stmt(Keyword::Use, parse_use_stmt);
    parser.stmt(Keyword::Source, parse_source_stmt);
    parser.stmt(Keyword::On, parse_on_stmt);
    parser.stmt(Keyword::Catch, parse_catch_stmt);
    for keyword in Keyword::DECL_STARTS {
        parser.stmt(*keyword, parse_decl_stmt);
    }
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<Keyword, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
