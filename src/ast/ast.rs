use std::{fmt::Debug, sync::Arc};

use crate::{lexer::tokens::Token, stack::ensure_sufficient_stack, Span};

use super::{
    expressions::Expr,
    patterns::Pattern,
    statements::{Decl, Stmt},
    types::TypeExpr,
};

/// An identifier together with where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// A `#:name` label. `name` excludes the `#:` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    pub span: Span,
}

/// Stand-in for input that could not be parsed. Every node category has an
/// `Error` variant wrapping one of these so the tree stays well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNode {
    pub span: Span,
}

/// `a::b[T]::c`. Generic arguments hang off the segment they follow.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub segments: Vec<PathSegment>,
    pub span: Span,
}

impl Path {
    /// A lone identifier without generic arguments.
    pub fn as_single_ident(&self) -> Option<&Ident> {
        match self.segments.as_slice() {
            [segment] if segment.generics.is_none() => Some(&segment.name),
            _ => None,
        }
    }

    pub fn to_path_string(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.name.name.as_str())
            .collect::<Vec<_>>()
            .join("::")
    }

    pub(crate) fn push_children<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        for segment in &self.segments {
            if let Some(generics) = &segment.generics {
                for arg in &generics.args {
                    out.push(arg.as_node_ref());
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub name: Ident,
    pub generics: Option<GenericArgs>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericArgs {
    pub args: Vec<GenericArg>,
    pub span: Span,
}

/// A generic argument is a type when it parses cleanly as one, otherwise an
/// expression (`Array[i32]` vs `Array[1]`).
#[derive(Debug, Clone, PartialEq)]
pub enum GenericArg {
    Type(TypeExpr),
    Expr(Expr),
}

impl GenericArg {
    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            GenericArg::Type(ty) => NodeRef::Type(ty),
            GenericArg::Expr(expr) => NodeRef::Expr(expr),
        }
    }
}

/// The parse root.
///
/// Built once per parse and never mutated afterwards. Besides the tree it
/// keeps the full token stream, which together with the tokens' trivia is
/// enough to rebuild the source text exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub file: Arc<str>,
    pub items: Vec<Stmt>,
    /// Script-mode result expression.
    pub result: Option<Expr>,
    pub tokens: Vec<Token>,
    pub span: Span,
    pub(crate) complete: bool,
}

impl Unit {
    /// False when error recovery ran into the end of input without finding
    /// a place to resynchronise.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Top-level nodes in source order.
    pub fn get_children(&self) -> Vec<NodeRef<'_>> {
        let mut out: Vec<NodeRef<'_>> = self.items.iter().map(NodeRef::Stmt).collect();
        if let Some(result) = &self.result {
            out.push(NodeRef::Expr(result));
        }
        out
    }

    /// Concatenates every token with its leading trivia.
    pub fn reconstruct(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            for trivia in &token.leading_trivia {
                out.push_str(&trivia.value);
            }
            out.push_str(&token.value);
        }
        out
    }

    /// Indented outline of the tree, one node per line.
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        for child in self.get_children() {
            walk(child, 0, &mut |node, depth| {
                let span = node.get_span();
                out.push_str(&format!(
                    "{}{:?} {}:{}..{}:{}\n",
                    "  ".repeat(depth),
                    node.get_variant(),
                    span.start.line,
                    span.start.column,
                    span.end.line,
                    span.end.column
                ));
            });
        }
        out
    }
}

/// Node categories, the grammar's supertypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Stmt,
    Decl,
    Expr,
    Type,
    Pattern,
}

/// Statement Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StmtType {
    Decl,
    Let,
    Expr,
    Use,
    Source,
    On,
    Catch,
    Empty,
    Error,
}

/// Declaration Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclType {
    Func,
    Class,
    Trait,
    Struct,
    Record,
    TypeAlias,
    Service,
    Event,
    Enum,
    Module,
    Extend,
    Constructor,
    Destructor,
    Property,
    Field,
    Error,
}

/// Expression Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprType {
    Block,
    If,
    For,
    ParFor,
    While,
    Loop,
    DoWhile,
    Match,
    StructLiteral,
    EnumerableLiteral,
    MapLiteral,
    Path,
    Literal,
    Group,
    Tuple,
    Try,
    Return,
    Throw,
    Break,
    Continue,
    Yield,
    Unary,
    Binary,
    Assignment,
    Postfix,
    Member,
    Call,
    MethodCall,
    Error,
}

/// Type Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeType {
    Ref,
    Option,
    Future,
    Reactive,
    Enumerable,
    Array,
    Func,
    Group,
    Tuple,
    Named,
    Union,
    Fallible,
    Error,
}

/// Pattern Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternType {
    Bind,
    Wildcard,
    Literal,
    Tuple,
    Group,
    StructCase,
    TupleCase,
    StructFields,
    Path,
    Error,
}

/// Category and variant tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Stmt(StmtType),
    Decl(DeclType),
    Expr(ExprType),
    Type(TypeType),
    Pattern(PatternType),
}

impl Variant {
    pub fn category(&self) -> Category {
        match self {
            Variant::Stmt(_) => Category::Stmt,
            Variant::Decl(_) => Category::Decl,
            Variant::Expr(_) => Category::Expr,
            Variant::Type(_) => Category::Type,
            Variant::Pattern(_) => Category::Pattern,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Variant::Stmt(StmtType::Error)
                | Variant::Decl(DeclType::Error)
                | Variant::Expr(ExprType::Error)
                | Variant::Type(TypeType::Error)
                | Variant::Pattern(PatternType::Error)
        )
    }
}

/// Node Trait
///
/// The traversal interface shared by every node category. External tools
/// (linters, highlighters) can walk the tree through it without knowing the
/// concrete node structs.
pub trait Node: Debug {
    /// Returns the category and variant tag of the node.
    fn get_variant(&self) -> Variant;
    /// Returns the category of the node.
    fn get_category(&self) -> Category {
        self.get_variant().category()
    }
    /// Returns the span of the node.
    fn get_span(&self) -> Span;
    /// Returns the direct children in source order.
    fn get_children(&self) -> Vec<NodeRef<'_>>;
}

/// A borrowed node of any category.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Stmt(&'a Stmt),
    Decl(&'a Decl),
    Expr(&'a Expr),
    Type(&'a TypeExpr),
    Pattern(&'a Pattern),
}

impl<'a> NodeRef<'a> {
    pub fn get_variant(&self) -> Variant {
        self.as_node().get_variant()
    }

    pub fn get_category(&self) -> Category {
        self.get_variant().category()
    }

    pub fn get_span(&self) -> Span {
        self.as_node().get_span()
    }

    /// Same as [`Node::get_children`] but keeps the tree's lifetime.
    pub fn get_children(self) -> Vec<NodeRef<'a>> {
        match self {
            NodeRef::Stmt(node) => node.get_children(),
            NodeRef::Decl(node) => node.get_children(),
            NodeRef::Expr(node) => node.get_children(),
            NodeRef::Type(node) => node.get_children(),
            NodeRef::Pattern(node) => node.get_children(),
        }
    }

    fn as_node(&self) -> &'a dyn Node {
        match *self {
            NodeRef::Stmt(node) => node,
            NodeRef::Decl(node) => node,
            NodeRef::Expr(node) => node,
            NodeRef::Type(node) => node,
            NodeRef::Pattern(node) => node,
        }
    }
}

/// Pre-order walk calling `visit` with each node and its depth.
pub fn walk<'a, F>(node: NodeRef<'a>, depth: usize, visit: &mut F)
where
    F: FnMut(NodeRef<'a>, usize),
{
    ensure_sufficient_stack(|| {
        visit(node, depth);
        for child in node.get_children() {
            walk(child, depth + 1, visit);
        }
    })
}
