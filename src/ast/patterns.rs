use crate::Span;

use super::{
    ast::{ErrorNode, Ident, Node, NodeRef, Path, PatternType, Variant},
    expressions::Literal,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Bind(BindPattern),
    Wildcard(Span),
    Literal(LiteralPattern),
    Tuple(TuplePattern),
    Group(GroupPattern),
    StructCase(StructCasePattern),
    TupleCase(TupleCasePattern),
    StructFields(StructFieldsPattern),
    Path(Path),
    Error(ErrorNode),
}

impl Pattern {
    pub fn get_pattern_type(&self) -> PatternType {
        match self {
            Pattern::Bind(_) => PatternType::Bind,
            Pattern::Wildcard(_) => PatternType::Wildcard,
            Pattern::Literal(_) => PatternType::Literal,
            Pattern::Tuple(_) => PatternType::Tuple,
            Pattern::Group(_) => PatternType::Group,
            Pattern::StructCase(_) => PatternType::StructCase,
            Pattern::TupleCase(_) => PatternType::TupleCase,
            Pattern::StructFields(_) => PatternType::StructFields,
            Pattern::Path(_) => PatternType::Path,
            Pattern::Error(_) => PatternType::Error,
        }
    }

    pub fn get_span(&self) -> Span {
        match self {
            Pattern::Bind(p) => p.span,
            Pattern::Wildcard(span) => *span,
            Pattern::Literal(p) => p.span,
            Pattern::Tuple(p) => p.span,
            Pattern::Group(p) => p.span,
            Pattern::StructCase(p) => p.span,
            Pattern::TupleCase(p) => p.span,
            Pattern::StructFields(p) => p.span,
            Pattern::Path(p) => p.span,
            Pattern::Error(p) => p.span,
        }
    }
}

fn push_fields<'a>(fields: &'a [FieldPattern], out: &mut Vec<NodeRef<'a>>) {
    for field in fields {
        if let Some(pattern) = &field.pattern {
            out.push(NodeRef::Pattern(pattern));
        }
    }
}

impl Node for Pattern {
    fn get_variant(&self) -> Variant {
        Variant::Pattern(self.get_pattern_type())
    }

    fn get_span(&self) -> Span {
        Pattern::get_span(self)
    }

    fn get_children(&self) -> Vec<NodeRef<'_>> {
        let mut out = Vec::new();
        match self {
            Pattern::Tuple(p) => out.extend(p.elements.iter().map(NodeRef::Pattern)),
            Pattern::Group(p) => out.push(NodeRef::Pattern(&p.inner)),
            Pattern::StructCase(p) => {
                p.path.push_children(&mut out);
                push_fields(&p.fields, &mut out);
            }
            Pattern::TupleCase(p) => {
                p.path.push_children(&mut out);
                out.extend(p.elements.iter().map(NodeRef::Pattern));
            }
            Pattern::StructFields(p) => push_fields(&p.fields, &mut out),
            Pattern::Path(path) => path.push_children(&mut out),
            Pattern::Bind(_) | Pattern::Wildcard(_) | Pattern::Literal(_) | Pattern::Error(_) => {}
        }
        out
    }
}

/// `name`, `ref name`, `mut name`.
#[derive(Debug, Clone, PartialEq)]
pub struct BindPattern {
    pub by_ref: bool,
    pub mutable: bool,
    pub name: Ident,
    pub span: Span,
}

/// A literal, optionally negated when numeric: `-1`.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralPattern {
    pub negative: bool,
    pub literal: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TuplePattern {
    pub elements: Vec<Pattern>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupPattern {
    pub inner: Box<Pattern>,
    pub span: Span,
}

/// `Shape::Rect { w, h: height, .. }`
#[derive(Debug, Clone, PartialEq)]
pub struct StructCasePattern {
    pub path: Path,
    pub fields: Vec<FieldPattern>,
    pub rest: bool,
    pub span: Span,
}

/// `Some(x)`
#[derive(Debug, Clone, PartialEq)]
pub struct TupleCasePattern {
    pub path: Path,
    pub elements: Vec<Pattern>,
    pub span: Span,
}

/// `{ x, y: other }` without a leading path.
#[derive(Debug, Clone, PartialEq)]
pub struct StructFieldsPattern {
    pub fields: Vec<FieldPattern>,
    pub rest: bool,
    pub span: Span,
}

/// `pattern` is `None` for the shorthand form that binds the field's name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPattern {
    pub name: Ident,
    pub pattern: Option<Pattern>,
    pub span: Span,
}
