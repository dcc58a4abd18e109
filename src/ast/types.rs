use crate::Span;

use super::{
    ast::{ErrorNode, Node, NodeRef, Path, TypeType, Variant},
    expressions::Expr,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Ref(RefType),
    /// `?T`
    Option(WrappedType),
    /// `^T`
    Future(WrappedType),
    /// `~T`, `~mut T`
    Reactive(ReactiveType),
    /// `[T]`
    Enumerable(WrappedType),
    /// `[T; N]`
    Array(ArrayType),
    Func(FuncType),
    Group(WrappedType),
    Tuple(TupleType),
    Named(Path),
    /// `A | B`
    Union(UnionType),
    /// `T !! E`
    Fallible(UnionType),
    Error(ErrorNode),
}

impl TypeExpr {
    pub fn get_type_type(&self) -> TypeType {
        match self {
            TypeExpr::Ref(_) => TypeType::Ref,
            TypeExpr::Option(_) => TypeType::Option,
            TypeExpr::Future(_) => TypeType::Future,
            TypeExpr::Reactive(_) => TypeType::Reactive,
            TypeExpr::Enumerable(_) => TypeType::Enumerable,
            TypeExpr::Array(_) => TypeType::Array,
            TypeExpr::Func(_) => TypeType::Func,
            TypeExpr::Group(_) => TypeType::Group,
            TypeExpr::Tuple(_) => TypeType::Tuple,
            TypeExpr::Named(_) => TypeType::Named,
            TypeExpr::Union(_) => TypeType::Union,
            TypeExpr::Fallible(_) => TypeType::Fallible,
            TypeExpr::Error(_) => TypeType::Error,
        }
    }

    pub fn get_span(&self) -> Span {
        match self {
            TypeExpr::Ref(t) => t.span,
            TypeExpr::Option(t)
            | TypeExpr::Future(t)
            | TypeExpr::Enumerable(t)
            | TypeExpr::Group(t) => t.span,
            TypeExpr::Reactive(t) => t.span,
            TypeExpr::Array(t) => t.span,
            TypeExpr::Func(t) => t.span,
            TypeExpr::Tuple(t) => t.span,
            TypeExpr::Named(t) => t.span,
            TypeExpr::Union(t) | TypeExpr::Fallible(t) => t.span,
            TypeExpr::Error(t) => t.span,
        }
    }
}

impl Node for TypeExpr {
    fn get_variant(&self) -> Variant {
        Variant::Type(self.get_type_type())
    }

    fn get_span(&self) -> Span {
        TypeExpr::get_span(self)
    }

    fn get_children(&self) -> Vec<NodeRef<'_>> {
        let mut out = Vec::new();
        match self {
            TypeExpr::Ref(t) => out.push(NodeRef::Type(&t.inner)),
            TypeExpr::Option(t)
            | TypeExpr::Future(t)
            | TypeExpr::Enumerable(t)
            | TypeExpr::Group(t) => out.push(NodeRef::Type(&t.inner)),
            TypeExpr::Reactive(t) => out.push(NodeRef::Type(&t.inner)),
            TypeExpr::Array(t) => {
                out.push(NodeRef::Type(&t.element));
                out.push(NodeRef::Expr(&t.size));
            }
            TypeExpr::Func(t) => {
                out.extend(t.params.iter().map(NodeRef::Type));
                if let Some(return_type) = &t.return_type {
                    out.push(NodeRef::Type(return_type));
                }
            }
            TypeExpr::Tuple(t) => out.extend(t.elements.iter().map(NodeRef::Type)),
            TypeExpr::Named(path) => path.push_children(&mut out),
            TypeExpr::Union(t) | TypeExpr::Fallible(t) => {
                out.extend(t.members.iter().map(NodeRef::Type))
            }
            TypeExpr::Error(_) => {}
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// `&T`
    Ref,
    /// `&mut T`
    RefMut,
    /// `*T`
    Pointer,
    /// `borrow T`
    Borrow,
    /// `unique T`
    Unique,
    /// `shared T`
    Shared,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefType {
    pub kind: RefKind,
    pub inner: Box<TypeExpr>,
    pub span: Span,
}

/// A type constructor with a single operand.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedType {
    pub inner: Box<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReactiveType {
    pub mutable: bool,
    pub inner: Box<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element: Box<TypeExpr>,
    pub size: Box<Expr>,
    pub span: Span,
}

/// `func(A, B) -> R`
#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub params: Vec<TypeExpr>,
    pub return_type: Option<Box<TypeExpr>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleType {
    pub elements: Vec<TypeExpr>,
    pub span: Span,
}

/// Two or more members joined by `|` or `!!`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    pub members: Vec<TypeExpr>,
    pub span: Span,
}
