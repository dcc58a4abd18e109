use crate::{lexer::tokens::LiteralValue, Span};

use super::{
    ast::{ErrorNode, ExprType, Ident, Label, Node, NodeRef, Path, Variant},
    patterns::Pattern,
    statements::Stmt,
};

// LITERALS

/// A literal with its decoded value and the text it was written as.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub raw: String,
    pub span: Span,
}

/// `{ stmt* expr? }`. `tail` is the block's value: a final expression with
/// no terminating `;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub label: Option<Label>,
    pub stmts: Vec<Stmt>,
    pub tail: Option<Box<Expr>>,
    pub span: Span,
}

impl Block {
    pub(crate) fn push_children<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        out.extend(self.stmts.iter().map(NodeRef::Stmt));
        if let Some(tail) = &self.tail {
            out.push(NodeRef::Expr(tail));
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Block(Block),
    If(IfExpr),
    For(ForExpr),
    ParFor(ForExpr),
    While(WhileExpr),
    Loop(LoopExpr),
    DoWhile(DoWhileExpr),
    Match(MatchExpr),
    StructLiteral(StructLiteralExpr),
    EnumerableLiteral(EnumerableLiteralExpr),
    MapLiteral(MapLiteralExpr),
    Path(Path),
    Literal(Literal),
    Group(GroupExpr),
    Tuple(TupleExpr),
    Try(TryExpr),
    Return(ReturnExpr),
    Throw(ThrowExpr),
    Break(BreakExpr),
    Continue(ContinueExpr),
    Yield(YieldExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Assignment(AssignmentExpr),
    Postfix(PostfixExpr),
    Member(MemberExpr),
    Call(CallExpr),
    MethodCall(MethodCallExpr),
    Error(ErrorNode),
}

impl Expr {
    pub fn get_expr_type(&self) -> ExprType {
        match self {
            Expr::Block(_) => ExprType::Block,
            Expr::If(_) => ExprType::If,
            Expr::For(_) => ExprType::For,
            Expr::ParFor(_) => ExprType::ParFor,
            Expr::While(_) => ExprType::While,
            Expr::Loop(_) => ExprType::Loop,
            Expr::DoWhile(_) => ExprType::DoWhile,
            Expr::Match(_) => ExprType::Match,
            Expr::StructLiteral(_) => ExprType::StructLiteral,
            Expr::EnumerableLiteral(_) => ExprType::EnumerableLiteral,
            Expr::MapLiteral(_) => ExprType::MapLiteral,
            Expr::Path(_) => ExprType::Path,
            Expr::Literal(_) => ExprType::Literal,
            Expr::Group(_) => ExprType::Group,
            Expr::Tuple(_) => ExprType::Tuple,
            Expr::Try(_) => ExprType::Try,
            Expr::Return(_) => ExprType::Return,
            Expr::Throw(_) => ExprType::Throw,
            Expr::Break(_) => ExprType::Break,
            Expr::Continue(_) => ExprType::Continue,
            Expr::Yield(_) => ExprType::Yield,
            Expr::Unary(_) => ExprType::Unary,
            Expr::Binary(_) => ExprType::Binary,
            Expr::Assignment(_) => ExprType::Assignment,
            Expr::Postfix(_) => ExprType::Postfix,
            Expr::Member(_) => ExprType::Member,
            Expr::Call(_) => ExprType::Call,
            Expr::MethodCall(_) => ExprType::MethodCall,
            Expr::Error(_) => ExprType::Error,
        }
    }

    pub fn get_span(&self) -> Span {
        match self {
            Expr::Block(e) => e.span,
            Expr::If(e) => e.span,
            Expr::For(e) | Expr::ParFor(e) => e.span,
            Expr::While(e) => e.span,
            Expr::Loop(e) => e.span,
            Expr::DoWhile(e) => e.span,
            Expr::Match(e) => e.span,
            Expr::StructLiteral(e) => e.span,
            Expr::EnumerableLiteral(e) => e.span,
            Expr::MapLiteral(e) => e.span,
            Expr::Path(e) => e.span,
            Expr::Literal(e) => e.span,
            Expr::Group(e) => e.span,
            Expr::Tuple(e) => e.span,
            Expr::Try(e) => e.span,
            Expr::Return(e) => e.span,
            Expr::Throw(e) => e.span,
            Expr::Break(e) => e.span,
            Expr::Continue(e) => e.span,
            Expr::Yield(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Assignment(e) => e.span,
            Expr::Postfix(e) => e.span,
            Expr::Member(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::MethodCall(e) => e.span,
            Expr::Error(e) => e.span,
        }
    }

    /// Block-like expressions end in `}` and may stand as statements without
    /// a terminating `;`.
    pub fn is_block_like(&self) -> bool {
        matches!(
            self,
            Expr::Block(_)
                | Expr::If(_)
                | Expr::For(_)
                | Expr::ParFor(_)
                | Expr::While(_)
                | Expr::Loop(_)
                | Expr::Match(_)
                | Expr::Try(_)
        )
    }
}

impl Node for Expr {
    fn get_variant(&self) -> Variant {
        Variant::Expr(self.get_expr_type())
    }

    fn get_span(&self) -> Span {
        Expr::get_span(self)
    }

    fn get_children(&self) -> Vec<NodeRef<'_>> {
        let mut out = Vec::new();
        match self {
            Expr::Block(block) => block.push_children(&mut out),
            Expr::If(e) => {
                out.push(NodeRef::Expr(&e.condition));
                e.then_branch.push_children(&mut out);
                if let Some(else_branch) = &e.else_branch {
                    out.push(NodeRef::Expr(else_branch));
                }
            }
            Expr::For(e) | Expr::ParFor(e) => {
                out.push(NodeRef::Pattern(&e.pattern));
                out.push(NodeRef::Expr(&e.iterable));
                e.body.push_children(&mut out);
            }
            Expr::While(e) => {
                out.push(NodeRef::Expr(&e.condition));
                e.body.push_children(&mut out);
            }
            Expr::Loop(e) => e.body.push_children(&mut out),
            Expr::DoWhile(e) => {
                e.body.push_children(&mut out);
                out.push(NodeRef::Expr(&e.condition));
            }
            Expr::Match(e) => {
                out.push(NodeRef::Expr(&e.scrutinee));
                for arm in &e.arms {
                    out.push(NodeRef::Pattern(&arm.pattern));
                    if let Some(guard) = &arm.guard {
                        out.push(NodeRef::Expr(guard));
                    }
                    out.push(NodeRef::Expr(&arm.body));
                }
            }
            Expr::StructLiteral(e) => {
                e.path.push_children(&mut out);
                for field in &e.fields {
                    if let Some(value) = &field.value {
                        out.push(NodeRef::Expr(value));
                    }
                }
                if let Some(base) = &e.base {
                    out.push(NodeRef::Expr(base));
                }
            }
            Expr::EnumerableLiteral(e) => out.extend(e.elements.iter().map(NodeRef::Expr)),
            Expr::MapLiteral(e) => {
                for entry in &e.entries {
                    out.push(NodeRef::Expr(&entry.key));
                    out.push(NodeRef::Expr(&entry.value));
                }
            }
            Expr::Path(path) => path.push_children(&mut out),
            Expr::Group(e) => out.push(NodeRef::Expr(&e.inner)),
            Expr::Tuple(e) => out.extend(e.elements.iter().map(NodeRef::Expr)),
            Expr::Try(e) => e.body.push_children(&mut out),
            Expr::Return(ReturnExpr { value, .. })
            | Expr::Yield(YieldExpr { value, .. })
            | Expr::Break(BreakExpr { value, .. }) => {
                if let Some(value) = value {
                    out.push(NodeRef::Expr(value));
                }
            }
            Expr::Throw(e) => out.push(NodeRef::Expr(&e.value)),
            Expr::Unary(e) => out.push(NodeRef::Expr(&e.operand)),
            Expr::Binary(e) => {
                out.push(NodeRef::Expr(&e.left));
                out.push(NodeRef::Expr(&e.right));
            }
            Expr::Assignment(e) => {
                out.push(NodeRef::Expr(&e.assignee));
                out.push(NodeRef::Expr(&e.value));
            }
            Expr::Postfix(e) => out.push(NodeRef::Expr(&e.operand)),
            Expr::Member(e) => out.push(NodeRef::Expr(&e.object)),
            Expr::Call(e) => {
                out.push(NodeRef::Expr(&e.callee));
                out.extend(e.args.iter().map(|arg| NodeRef::Expr(&arg.value)));
            }
            Expr::MethodCall(e) => {
                out.push(NodeRef::Expr(&e.receiver));
                out.extend(e.args.iter().map(|arg| NodeRef::Expr(&arg.value)));
            }
            Expr::Literal(_) | Expr::Continue(_) | Expr::Error(_) => {}
        }
        out
    }
}

// CONTROL FLOW

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub then_branch: Block,
    /// Either a block or another `if`.
    pub else_branch: Option<Box<Expr>>,
    pub span: Span,
}

/// `for pattern in iterable { }`, also used for `par for`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForExpr {
    pub label: Option<Label>,
    pub pattern: Pattern,
    pub iterable: Box<Expr>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileExpr {
    pub label: Option<Label>,
    pub condition: Box<Expr>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopExpr {
    pub label: Option<Label>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileExpr {
    pub label: Option<Label>,
    pub body: Block,
    pub condition: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpr {
    pub scrutinee: Box<Expr>,
    pub arms: Vec<MatchArm>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryExpr {
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnExpr {
    pub value: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowExpr {
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakExpr {
    pub label: Option<Label>,
    pub value: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueExpr {
    pub label: Option<Label>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldExpr {
    pub value: Option<Box<Expr>>,
    pub span: Span,
}

// COMPOUND LITERALS

/// `Point { x: 1, y, ..base }`
#[derive(Debug, Clone, PartialEq)]
pub struct StructLiteralExpr {
    pub path: Path,
    pub fields: Vec<FieldInit>,
    pub base: Option<Box<Expr>>,
    pub span: Span,
}

/// `value` is `None` for the shorthand `{ x }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumerableLiteralExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLiteralExpr {
    pub entries: Vec<MapEntry>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Expr,
    pub value: Expr,
    pub span: Span,
}

/// `(x)`: parentheses without a trailing comma.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupExpr {
    pub inner: Box<Expr>,
    pub span: Span,
}

/// `()`, `(x,)`, `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

// OPERATORS

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    BitNot,
    Not,
    Move,
    Copy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Pipe,
    Nullish,
    Or,
    And,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub operator: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub operator: AssignOp,
    pub assignee: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Increment,
    Decrement,
    /// `x!`
    Unwrap,
    /// `x?`
    Propagate,
    /// `x.await`
    Await,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostfixExpr {
    pub operator: PostfixOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// Field access `object.member`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub member: Ident,
    pub span: Span,
}

/// A call argument, optionally named: `f(1, verbose: true)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<Ident>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Argument>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCallExpr {
    pub receiver: Box<Expr>,
    pub method: Ident,
    pub args: Vec<Argument>,
    pub span: Span,
}
