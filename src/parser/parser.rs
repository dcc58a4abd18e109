//! Parser state and the unit-level driver.
//!
//! The parser keeps its own cursor over the token stream and collects
//! diagnostics as it goes. Expressions are parsed with a Pratt parser driven
//! by the NUD/LED lookup tables registered in [`super::lookups`]; statements
//! are dispatched on positional keywords.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{ErrorNode, Unit},
        expressions::{Block, Expr},
        statements::{ExpressionStmt, Stmt},
    },
    errors::errors::{Diagnostic, Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    stack::ensure_sufficient_stack,
    ParseOptions, Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler,
        NUDLookup, StmtHandler, StmtLookup,
    },
    resolver::{keyword_at, Keyword},
    stmt::parse_stmt,
    types::{create_token_type_lookups, TypeBPLookup, TypeBindingPower, TypeLEDHandler, TypeLEDLookup, TypeNUDHandler, TypeNUDLookup},
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file: Arc<str>,
    options: ParseOptions,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    type_nud_lookup: TypeNUDLookup,
    type_led_lookup: TypeLEDLookup,
    type_binding_power_lookup: TypeBPLookup,
    diagnostics: Vec<Diagnostic>,
    /// Set while parsing the head of `if`, `while`, `for` and `match`, where
    /// `{` opens the body rather than a struct literal.
    no_struct_literal: bool,
    incomplete: bool,
}

/// Saved parser state for a trial parse.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    pos: usize,
    diagnostics: usize,
    incomplete: bool,
}

/// Where a failed statement or member resynchronises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Inside `{ }`: an unmatched `}` ends the enclosing list and is left in
    /// place.
    Block,
    /// At the top of a unit: an unmatched `}` is skipped.
    TopLevel,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, file: Arc<str>, options: ParseOptions) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end)
                .unwrap_or_else(Position::null);
            tokens.push(MK_TOKEN!(TokenKind::EOF, String::new(), Span::at(end)));
        }

        Parser {
            tokens,
            pos: 0,
            file,
            options,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
            diagnostics: Vec::new(),
            no_struct_literal: false,
            incomplete: false,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.peek(0).kind
    }

    /// Token `offset` places ahead of the cursor. Looking past the end
    /// yields the EOF token.
    pub fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.peek(offset).kind
    }

    /// The token just before the cursor, if any.
    pub fn previous_token(&self) -> Option<&Token> {
        self.pos.checked_sub(1).and_then(|pos| self.tokens.get(pos))
    }

    /// Advances to the next token and returns the previous token. The cursor
    /// never moves past EOF.
    pub fn advance(&mut self) -> &Token {
        let pos = self.pos.min(self.tokens.len() - 1);
        if self.tokens[pos].kind != TokenKind::EOF {
            self.pos = pos + 1;
        }
        &self.tokens[pos]
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(error.unwrap_or_else(|| self.expected(describe_kind(expected_kind))));
        }
        Ok(self.advance().clone())
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Expects the identifier `word`, e.g. the `in` of a `for` loop.
    pub fn expect_word(&mut self, word: &str) -> Result<Token, Error> {
        if !self.current_token().is_word(word) {
            return Err(self.expected(&format!("`{}`", word)));
        }
        Ok(self.advance().clone())
    }

    /// An `ExpectedToken` error pointing at the current token.
    pub fn expected(&self, expected: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::ExpectedToken {
                expected: expected.to_string(),
                found: describe_token(token),
            },
            token.span,
        )
    }

    /// Consumes the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_token_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_file(&self) -> &Arc<str> {
        &self.file
    }

    pub fn get_options(&self) -> ParseOptions {
        self.options
    }

    /// Start of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start
    }

    /// End of the last consumed token, or the start of the current one when
    /// nothing has been consumed yet.
    pub fn last_end(&self) -> Position {
        match self.previous_token() {
            Some(token) => token.span.end,
            None => self.get_position(),
        }
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        let end = self.last_end();
        if end.offset < start.offset {
            Span::at(start)
        } else {
            Span::new(start, end)
        }
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    pub fn get_type_led_lookup(&self) -> &TypeLEDLookup {
        &self.type_led_lookup
    }

    pub fn get_type_bp_lookup(&self) -> &TypeBPLookup {
        &self.type_binding_power_lookup
    }

    /// Registers a left denotation (infix or postfix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a keyword.
    pub fn stmt(&mut self, keyword: Keyword, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(keyword, stmt_fn);
    }

    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: TypeBindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    pub fn struct_literals_allowed(&self) -> bool {
        !self.no_struct_literal
    }

    /// Runs `parse` with struct literals enabled or disabled, restoring the
    /// previous setting afterwards.
    pub fn with_struct_literals<T>(
        &mut self,
        allowed: bool,
        parse: impl FnOnce(&mut Parser) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let saved = self.no_struct_literal;
        self.no_struct_literal = !allowed;
        let result = parse(self);
        self.no_struct_literal = saved;
        result
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            diagnostics: self.diagnostics.len(),
            incomplete: self.incomplete,
        }
    }

    /// Moves the cursor back to `checkpoint` and drops every diagnostic
    /// recorded since.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        trace!(from = self.pos, to = checkpoint.pos, "rewind");
        self.pos = checkpoint.pos;
        self.diagnostics.truncate(checkpoint.diagnostics);
        self.incomplete = checkpoint.incomplete;
    }

    /// Records `error` as a diagnostic. Errors pointing at a lexer error
    /// token were already reported by the lexer and are dropped.
    pub fn report(&mut self, error: Error) {
        if self.is_lex_error_at(error.get_span()) {
            trace!(offset = error.get_span().start.offset, "error on lexer error token suppressed");
            return;
        }
        debug!(
            name = error.get_error_name(),
            line = error.get_span().start.line,
            column = error.get_span().start.column,
            "diagnostic"
        );
        let diagnostic = Diagnostic::from_error(error, &self.file);
        self.diagnostics.push(diagnostic);
    }

    fn is_lex_error_at(&self, span: Span) -> bool {
        self.tokens
            .binary_search_by_key(&span.start.offset, |token| token.span.start.offset)
            .map(|index| {
                let token = &self.tokens[index];
                token.kind == TokenKind::Error && token.span == span
            })
            .unwrap_or(false)
    }

    fn mark_incomplete(&mut self) {
        if self.incomplete {
            return;
        }
        self.incomplete = true;
        let eof = self.current_token().span;
        self.report(Error::new(ErrorImpl::IncompleteParse, eof));
    }

    /// Skips tokens after a failed statement or member until a point where
    /// parsing can resume: just past a `;`, just past the `}` closing a
    /// brace opened while skipping, or before a word that starts a new
    /// top-level construct. At least one token is skipped unless the cursor
    /// already sits on a closer the caller owns.
    pub fn synchronize(&mut self, mode: SyncMode) {
        let start = self.pos;
        let mut depth = 0usize;

        loop {
            let kind = self.current_token_kind();
            match kind {
                TokenKind::EOF => {
                    self.mark_incomplete();
                    break;
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::OpenCurly => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::CloseCurly if depth > 0 => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::CloseCurly => {
                    if mode == SyncMode::TopLevel {
                        self.advance();
                    }
                    break;
                }
                _ => {
                    if depth == 0 && self.pos > start && starts_top_level_construct(self) {
                        break;
                    }
                    self.advance();
                }
            }
        }

        debug!(skipped = self.pos - start, ?mode, "synchronized");
    }

    fn finish(self) -> (Vec<Token>, Vec<Diagnostic>, bool) {
        (self.tokens, self.diagnostics, !self.incomplete)
    }
}

fn starts_top_level_construct(parser: &Parser) -> bool {
    match keyword_at(parser, 0) {
        Some(keyword) => keyword.starts_decl() || matches!(keyword, Keyword::Use | Keyword::Source | Keyword::Let),
        None => false,
    }
}

/// Human readable name of a token kind for diagnostics.
pub fn describe_kind(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::EOF => "end of input",
        TokenKind::Error => "invalid token",
        TokenKind::Identifier => "identifier",
        TokenKind::Label => "label",
        TokenKind::Int => "integer literal",
        TokenKind::Float => "float literal",
        TokenKind::String => "string literal",
        TokenKind::True | TokenKind::False => "boolean literal",
        TokenKind::Null => "`null`",
        TokenKind::OpenBracket => "`[`",
        TokenKind::CloseBracket => "`]`",
        TokenKind::OpenCurly => "`{`",
        TokenKind::CloseCurly => "`}`",
        TokenKind::OpenParen => "`(`",
        TokenKind::CloseParen => "`)`",
        TokenKind::Assignment => "`=`",
        TokenKind::ColonEquals => "`:=`",
        TokenKind::PlusEquals => "`+=`",
        TokenKind::MinusEquals => "`-=`",
        TokenKind::StarEquals => "`*=`",
        TokenKind::SlashEquals => "`/=`",
        TokenKind::PercentEquals => "`%=`",
        TokenKind::Equals => "`==`",
        TokenKind::NotEquals => "`!=`",
        TokenKind::Less => "`<`",
        TokenKind::LessEquals => "`<=`",
        TokenKind::Greater => "`>`",
        TokenKind::GreaterEquals => "`>=`",
        TokenKind::Or => "`||`",
        TokenKind::And => "`&&`",
        TokenKind::Pipe => "`|>`",
        TokenKind::QuestionQuestion => "`??`",
        TokenKind::Not => "`!`",
        TokenKind::BangBang => "`!!`",
        TokenKind::Question => "`?`",
        TokenKind::Caret => "`^`",
        TokenKind::Tilde => "`~`",
        TokenKind::Ampersand => "`&`",
        TokenKind::Bar => "`|`",
        TokenKind::At => "`@`",
        TokenKind::Dot => "`.`",
        TokenKind::DotDot => "`..`",
        TokenKind::Semicolon => "`;`",
        TokenKind::Colon => "`:`",
        TokenKind::ColonColon => "`::`",
        TokenKind::Comma => "`,`",
        TokenKind::Arrow => "`->`",
        TokenKind::FatArrow => "`=>`",
        TokenKind::PlusPlus => "`++`",
        TokenKind::MinusMinus => "`--`",
        TokenKind::Plus => "`+`",
        TokenKind::Dash => "`-`",
        TokenKind::Slash => "`/`",
        TokenKind::Star => "`*`",
        TokenKind::Percent => "`%`",
    }
}

pub fn describe_token(token: &Token) -> String {
    match token.kind {
        TokenKind::EOF => String::from("end of input"),
        TokenKind::Identifier | TokenKind::Label | TokenKind::Int | TokenKind::Float | TokenKind::String => {
            format!("`{}`", token.value)
        }
        kind => describe_kind(kind).to_string(),
    }
}

/// Which terminator closes a statement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtListEnd {
    /// `}` of a block or module body.
    Curly,
    /// End of input.
    Eof,
}

/// Parses statements until the closer of the list. A final expression with
/// no `;` directly before the closer is returned separately as the list's
/// value when `allow_tail` is set.
pub fn parse_stmt_list(
    parser: &mut Parser,
    end: StmtListEnd,
    allow_tail: bool,
) -> (Vec<Stmt>, Option<Expr>) {
    let closer = match end {
        StmtListEnd::Curly => TokenKind::CloseCurly,
        StmtListEnd::Eof => TokenKind::EOF,
    };
    let mode = match end {
        StmtListEnd::Curly => SyncMode::Block,
        StmtListEnd::Eof => SyncMode::TopLevel,
    };

    let mut stmts = vec![];
    let mut tail = None;

    while parser.has_tokens() && parser.current_token_kind() != closer {
        let stmt = parse_stmt_recovering(parser, mode);

        let stmt = match stmt {
            Stmt::Expr(ExpressionStmt {
                expression,
                has_semicolon: false,
                span,
            }) => {
                let at_closer = parser.current_token_kind() == closer;
                if at_closer && allow_tail {
                    tail = Some(expression);
                    break;
                }
                // Lists without a tail, such as module bodies, still need the
                // `;` right before the closer.
                if !expression.is_block_like() {
                    let error = match end {
                        StmtListEnd::Eof => Error::new(
                            ErrorImpl::TrailingGarbage {
                                token: parser.current_token().value.clone(),
                            },
                            parser.current_token().span,
                        ),
                        StmtListEnd::Curly => parser.expected("`;`"),
                    };
                    parser.report(error);
                }
                Stmt::Expr(ExpressionStmt {
                    expression,
                    has_semicolon: false,
                    span,
                })
            }
            stmt => stmt,
        };

        stmts.push(stmt);
    }

    (stmts, tail)
}

/// Parses one statement; on failure records the diagnostic, resynchronises
/// and returns an error statement covering the skipped tokens.
pub fn parse_stmt_recovering(parser: &mut Parser, mode: SyncMode) -> Stmt {
    let start = parser.get_position();
    match parse_stmt(parser) {
        Ok(stmt) => stmt,
        Err(error) => {
            parser.report(error);
            parser.synchronize(mode);
            Stmt::Error(ErrorNode {
                span: parser.span_from(start),
            })
        }
    }
}

/// Parses `{ stmt* expr? }`. A block missing its `}` is closed at end of
/// input with a diagnostic pointing at the opener.
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    ensure_sufficient_stack(|| {
        let open = parser.expect(TokenKind::OpenCurly)?;

        let (stmts, tail) = parser.with_struct_literals(true, |parser| {
            Ok(parse_stmt_list(parser, StmtListEnd::Curly, true))
        })?;

        close_curly(parser, &open);

        Ok(Block {
            label: None,
            stmts,
            tail: tail.map(Box::new),
            span: parser.span_from(open.span.start),
        })
    })
}

/// Consumes the `}` matching `open`, or reports it missing at end of input.
pub fn close_curly(parser: &mut Parser, open: &Token) {
    if parser.eat(TokenKind::CloseCurly) {
        return;
    }
    let error = Error::new(
        ErrorImpl::UnclosedDelimiter {
            delimiter: String::from("}"),
        },
        parser.current_token().span,
    )
    .with_related(open.span, "unclosed `{` opened here");
    parser.report(error);
}

fn is_allowed_in_library(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Decl(_) | Stmt::Use(_) | Stmt::Source(_) | Stmt::Empty(_) | Stmt::Error(_))
}

fn construct_name(stmt: &Stmt) -> &'static str {
    match stmt {
        Stmt::Let(_) => "a `let` statement",
        Stmt::Expr(_) => "an expression",
        Stmt::On(_) => "an `on` handler",
        Stmt::Catch(_) => "a `catch` handler",
        _ => "this statement",
    }
}

/// Reports statements a library unit may not contain at its top level.
pub fn check_top_level(parser: &mut Parser, stmts: &[Stmt]) {
    if parser.get_options().script_mode {
        return;
    }
    for stmt in stmts.iter().filter(|stmt| !is_allowed_in_library(stmt)) {
        parser.report(Error::new(
            ErrorImpl::NotAllowedAtTopLevel {
                construct: construct_name(stmt).to_string(),
            },
            stmt.get_span(),
        ));
    }
}

fn parse_unit(parser: &mut Parser) -> (Vec<Stmt>, Option<Expr>) {
    let script_mode = parser.get_options().script_mode;
    let (mut items, result) = parse_stmt_list(parser, StmtListEnd::Eof, true);

    let result = match result {
        Some(expr) if !script_mode => {
            let span = expr.get_span();
            items.push(Stmt::Expr(ExpressionStmt {
                expression: expr,
                has_semicolon: false,
                span,
            }));
            None
        }
        result => result,
    };

    check_top_level(parser, &items);
    (items, result)
}

/// Parses a stream of tokens into a [`Unit`].
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables and parses statements until EOF. Parsing
/// never fails: problems end up as error nodes plus diagnostics.
pub fn parse(tokens: Vec<Token>, file: Arc<str>, options: ParseOptions) -> (Unit, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens, Arc::clone(&file), options);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    debug!(file = %file, script_mode = options.script_mode, "parse start");
    let (items, result) = parse_unit(&mut parser);
    let (tokens, diagnostics, complete) = parser.finish();

    let end = tokens
        .last()
        .map(|token| token.span.end)
        .unwrap_or_else(Position::null);
    debug!(items = items.len(), diagnostics = diagnostics.len(), complete, "parse done");

    let unit = Unit {
        file,
        items,
        result,
        tokens,
        span: Span::new(Position::null(), end),
        complete,
    };

    (unit, diagnostics)
}
