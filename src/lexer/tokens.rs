use std::fmt::Display;

use crate::Span;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Error,

    Identifier,
    Label, // #:name

    // Literals
    Int,
    Float,
    String,
    True,
    False,
    Null,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment,  // =
    ColonEquals, // :=
    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,

    Equals,    // ==
    NotEquals, // !=
    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,               // ||
    And,              // &&
    Pipe,             // |>
    QuestionQuestion, // ??

    Not,      // !
    BangBang, // !!
    Question, // ?
    Caret,    // ^
    Tilde,    // ~
    Ampersand,
    Bar, // |
    At,

    Dot,
    DotDot,
    Semicolon,
    Colon,
    ColonColon,
    Comma,
    Arrow,    // ->
    FatArrow, // =>

    PlusPlus,
    MinusMinus,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,
}

impl TokenKind {
    /// Literal token kinds, the ones that carry a decoded [`LiteralValue`].
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::String
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// Tokens that may only appear between two operands, never at the start
    /// of an expression.
    pub fn is_infix_only(&self) -> bool {
        matches!(
            self,
            TokenKind::Assignment
                | TokenKind::ColonEquals
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::StarEquals
                | TokenKind::SlashEquals
                | TokenKind::PercentEquals
                | TokenKind::Equals
                | TokenKind::NotEquals
                | TokenKind::Less
                | TokenKind::LessEquals
                | TokenKind::Greater
                | TokenKind::GreaterEquals
                | TokenKind::Or
                | TokenKind::And
                | TokenKind::Pipe
                | TokenKind::QuestionQuestion
                | TokenKind::Dot
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::Question
        )
    }

    /// Whether an expression may begin with this token.
    pub fn can_start_expr(&self) -> bool {
        self.is_literal()
            || matches!(
                self,
                TokenKind::Identifier
                    | TokenKind::Label
                    | TokenKind::OpenParen
                    | TokenKind::OpenBracket
                    | TokenKind::OpenCurly
                    | TokenKind::Dash
                    | TokenKind::Plus
                    | TokenKind::Tilde
                    | TokenKind::Not
                    | TokenKind::BangBang
                    | TokenKind::Error
            )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Width suffix of an integer literal, `i8` through `u256`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntSuffix {
    pub signed: bool,
    pub bits: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatSuffix {
    F32,
    F64,
}

/// Decoded value of a literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `value` is `None` when the literal does not fit in 128 bits.
    Int {
        value: Option<u128>,
        suffix: Option<IntSuffix>,
    },
    Float {
        value: f64,
        suffix: Option<FloatSuffix>,
    },
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaKind {
    Whitespace,
    LineComment,
    BlockComment,
    DocLineComment,
    DocBlockComment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub value: String,
    pub span: Span,
}

impl Trivia {
    pub fn is_doc(&self) -> bool {
        matches!(
            self.kind,
            TriviaKind::DocLineComment | TriviaKind::DocBlockComment
        )
    }
}

/// Why the lexer produced an [`TokenKind::Error`] token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    UnrecognisedCharacter,
    UnterminatedString,
    UnterminatedBlockComment,
    InvalidEscape(String),
    MalformedNumber,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text of the token.
    pub value: String,
    pub span: Span,
    pub literal: Option<LiteralValue>,
    pub leading_trivia: Vec<Trivia>,
    pub error: Option<LexErrorKind>,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.value == word
    }

    /// One line per token for `--tokens` output.
    pub fn debug_line(&self) -> String {
        let position = format!("{}:{}", self.span.start.line, self.span.start.column);
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::Int,
            TokenKind::Float,
            TokenKind::Label,
            TokenKind::Error,
        ]) {
            format!("{:<8} {} ({})", position, self.kind, self.value)
        } else {
            format!("{:<8} {}", position, self.kind)
        }
    }
}
