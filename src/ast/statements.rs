use crate::Span;

use super::{
    ast::{DeclType, ErrorNode, Ident, Node, NodeRef, Path, StmtType, Variant},
    expressions::{Block, Expr},
    patterns::Pattern,
    types::TypeExpr,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Decl(Decl),
    Let(LetStmt),
    Expr(ExpressionStmt),
    Use(UseStmt),
    Source(SourceStmt),
    On(OnStmt),
    Catch(CatchStmt),
    /// A lone `;`.
    Empty(Span),
    Error(ErrorNode),
}

impl Stmt {
    pub fn get_stmt_type(&self) -> StmtType {
        match self {
            Stmt::Decl(_) => StmtType::Decl,
            Stmt::Let(_) => StmtType::Let,
            Stmt::Expr(_) => StmtType::Expr,
            Stmt::Use(_) => StmtType::Use,
            Stmt::Source(_) => StmtType::Source,
            Stmt::On(_) => StmtType::On,
            Stmt::Catch(_) => StmtType::Catch,
            Stmt::Empty(_) => StmtType::Empty,
            Stmt::Error(_) => StmtType::Error,
        }
    }

    pub fn get_span(&self) -> Span {
        match self {
            Stmt::Decl(s) => s.span,
            Stmt::Let(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::Use(s) => s.span,
            Stmt::Source(s) => s.span,
            Stmt::On(s) => s.span,
            Stmt::Catch(s) => s.span,
            Stmt::Empty(span) => *span,
            Stmt::Error(s) => s.span,
        }
    }
}

impl Node for Stmt {
    fn get_variant(&self) -> Variant {
        Variant::Stmt(self.get_stmt_type())
    }

    fn get_span(&self) -> Span {
        Stmt::get_span(self)
    }

    fn get_children(&self) -> Vec<NodeRef<'_>> {
        let mut out = Vec::new();
        match self {
            Stmt::Decl(decl) => out.push(NodeRef::Decl(decl)),
            Stmt::Let(s) => {
                out.push(NodeRef::Pattern(&s.pattern));
                if let Some(ty) = &s.ty {
                    out.push(NodeRef::Type(ty));
                }
                if let Some(value) = &s.value {
                    out.push(NodeRef::Expr(value));
                }
            }
            Stmt::Expr(s) => out.push(NodeRef::Expr(&s.expression)),
            Stmt::On(s) => {
                s.event.push_children(&mut out);
                out.extend(s.binds.iter().map(|bind| NodeRef::Pattern(&bind.pattern)));
                s.body.push_children(&mut out);
            }
            Stmt::Catch(s) => {
                if let Some(ty) = &s.ty {
                    out.push(NodeRef::Type(ty));
                }
                s.body.push_children(&mut out);
            }
            Stmt::Use(_) | Stmt::Source(_) | Stmt::Empty(_) | Stmt::Error(_) => {}
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub pattern: Pattern,
    pub ty: Option<TypeExpr>,
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub has_semicolon: bool,
    pub span: Span,
}

/// `use a::b;`, `use a::b as c;`, `use a::{b, c as d};`
#[derive(Debug, Clone, PartialEq)]
pub struct UseStmt {
    pub path: Vec<Ident>,
    pub items: Option<Vec<UseItem>>,
    pub alias: Option<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UseItem {
    pub name: Ident,
    pub alias: Option<Ident>,
    pub span: Span,
}

/// `source "path";`
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStmt {
    pub path: String,
    pub span: Span,
}

/// Event handler: `on Clicked(pos, button: b) { }`
#[derive(Debug, Clone, PartialEq)]
pub struct OnStmt {
    pub event: Path,
    pub binds: Vec<EventBind>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventBind {
    pub name: Option<Ident>,
    pub pattern: Pattern,
    pub span: Span,
}

/// `catch err: IoError { }`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchStmt {
    pub name: Ident,
    pub ty: Option<TypeExpr>,
    pub body: Block,
    pub span: Span,
}

// DECLARATIONS

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    Public,
    Private,
    Extern,
    Static,
    Async,
    Unique,
    Shared,
}

impl ModifierKind {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "public" => Some(ModifierKind::Public),
            "private" => Some(ModifierKind::Private),
            "extern" => Some(ModifierKind::Extern),
            "static" => Some(ModifierKind::Static),
            "async" => Some(ModifierKind::Async),
            "unique" => Some(ModifierKind::Unique),
            "shared" => Some(ModifierKind::Shared),
            _ => None,
        }
    }

    /// Modifiers that only mean something on a class.
    pub fn is_class_only(&self) -> bool {
        matches!(
            self,
            ModifierKind::Async | ModifierKind::Unique | ModifierKind::Shared
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub modifiers: Vec<Modifier>,
    pub kind: DeclKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Func(FuncDecl),
    Class(TypeDecl),
    Trait(TypeDecl),
    Struct(TypeDecl),
    Service(TypeDecl),
    Record(RecordDecl),
    TypeAlias(TypeAliasDecl),
    Event(EventDecl),
    Enum(EnumDecl),
    Module(ModuleDecl),
    Extend(ExtendDecl),
    Constructor(ConstructorDecl),
    Destructor(DestructorDecl),
    Property(PropertyDecl),
    Field(FieldDecl),
    Error(ErrorNode),
}

impl Decl {
    pub fn get_decl_type(&self) -> DeclType {
        match &self.kind {
            DeclKind::Func(_) => DeclType::Func,
            DeclKind::Class(_) => DeclType::Class,
            DeclKind::Trait(_) => DeclType::Trait,
            DeclKind::Struct(_) => DeclType::Struct,
            DeclKind::Service(_) => DeclType::Service,
            DeclKind::Record(_) => DeclType::Record,
            DeclKind::TypeAlias(_) => DeclType::TypeAlias,
            DeclKind::Event(_) => DeclType::Event,
            DeclKind::Enum(_) => DeclType::Enum,
            DeclKind::Module(_) => DeclType::Module,
            DeclKind::Extend(_) => DeclType::Extend,
            DeclKind::Constructor(_) => DeclType::Constructor,
            DeclKind::Destructor(_) => DeclType::Destructor,
            DeclKind::Property(_) => DeclType::Property,
            DeclKind::Field(_) => DeclType::Field,
            DeclKind::Error(_) => DeclType::Error,
        }
    }

    /// Declared name, if the declaration has one.
    pub fn get_name(&self) -> Option<&Ident> {
        match &self.kind {
            DeclKind::Func(d) => Some(&d.name),
            DeclKind::Class(d) | DeclKind::Trait(d) | DeclKind::Struct(d) | DeclKind::Service(d) => {
                Some(&d.name)
            }
            DeclKind::Record(d) => Some(&d.name),
            DeclKind::TypeAlias(d) => Some(&d.name),
            DeclKind::Event(d) => Some(&d.name),
            DeclKind::Enum(d) => Some(&d.name),
            DeclKind::Module(d) => Some(&d.name),
            DeclKind::Property(d) => Some(&d.name),
            DeclKind::Field(d) => Some(&d.name),
            DeclKind::Extend(_)
            | DeclKind::Constructor(_)
            | DeclKind::Destructor(_)
            | DeclKind::Error(_) => None,
        }
    }

    pub fn has_modifier(&self, kind: ModifierKind) -> bool {
        self.modifiers.iter().any(|modifier| modifier.kind == kind)
    }
}

fn push_generics<'a>(generics: &'a Option<GenericParams>, out: &mut Vec<NodeRef<'a>>) {
    if let Some(generics) = generics {
        for param in &generics.params {
            if let Some(bound) = &param.bound {
                out.push(NodeRef::Type(bound));
            }
        }
    }
}

fn push_params<'a>(params: &'a ParamList, out: &mut Vec<NodeRef<'a>>) {
    let list = match params {
        ParamList::List(list) => list,
        ParamList::Error(error) => {
            out.push(NodeRef::Pattern(error));
            return;
        }
    };

    let named = list.named.iter().flat_map(|named| named.params.iter());
    for param in list.positional.iter().chain(named) {
        out.push(NodeRef::Pattern(&param.pattern));
        if let Some(ty) = &param.ty {
            out.push(NodeRef::Type(ty));
        }
        if let Some(default) = &param.default {
            out.push(NodeRef::Expr(default));
        }
    }
}

fn push_body<'a>(body: &'a Body, out: &mut Vec<NodeRef<'a>>) {
    if let Body::Block(block) = body {
        block.push_children(out);
    }
}

fn push_members<'a>(members: &'a Members, out: &mut Vec<NodeRef<'a>>) {
    if let Members::List { members, .. } = members {
        out.extend(members.iter().map(NodeRef::Decl));
    }
}

impl Node for Decl {
    fn get_variant(&self) -> Variant {
        Variant::Decl(self.get_decl_type())
    }

    fn get_span(&self) -> Span {
        self.span
    }

    fn get_children(&self) -> Vec<NodeRef<'_>> {
        let mut out = Vec::new();
        match &self.kind {
            DeclKind::Func(d) => {
                push_generics(&d.generics, &mut out);
                push_params(&d.params, &mut out);
                if let Some(return_type) = &d.return_type {
                    out.push(NodeRef::Type(return_type));
                }
                push_body(&d.body, &mut out);
            }
            DeclKind::Class(d) | DeclKind::Trait(d) | DeclKind::Struct(d) | DeclKind::Service(d) => {
                push_generics(&d.generics, &mut out);
                out.extend(d.supertypes.iter().map(NodeRef::Type));
                push_members(&d.members, &mut out);
            }
            DeclKind::Record(d) => {
                push_generics(&d.generics, &mut out);
                push_params(&d.params, &mut out);
                out.extend(d.supertypes.iter().map(NodeRef::Type));
                push_members(&d.members, &mut out);
            }
            DeclKind::TypeAlias(d) => {
                push_generics(&d.generics, &mut out);
                out.push(NodeRef::Type(&d.ty));
            }
            DeclKind::Event(d) => {
                push_generics(&d.generics, &mut out);
                push_params(&d.params, &mut out);
            }
            DeclKind::Enum(d) => {
                push_generics(&d.generics, &mut out);
                for variant in &d.variants {
                    match &variant.payload {
                        VariantPayload::Unit => {}
                        VariantPayload::Tuple(types) => out.extend(types.iter().map(NodeRef::Type)),
                        VariantPayload::Struct(fields) => {
                            out.extend(fields.iter().map(|field| NodeRef::Type(&field.ty)))
                        }
                    }
                    if let Some(discriminant) = &variant.discriminant {
                        out.push(NodeRef::Expr(discriminant));
                    }
                }
            }
            DeclKind::Module(d) => {
                if let Some(items) = &d.items {
                    out.extend(items.iter().map(NodeRef::Stmt));
                }
            }
            DeclKind::Extend(d) => {
                out.push(NodeRef::Type(&d.target));
                out.extend(d.supertypes.iter().map(NodeRef::Type));
                push_members(&d.members, &mut out);
            }
            DeclKind::Constructor(d) => {
                push_params(&d.params, &mut out);
                push_body(&d.body, &mut out);
            }
            DeclKind::Destructor(d) => push_body(&d.body, &mut out),
            DeclKind::Property(d) => {
                out.push(NodeRef::Type(&d.ty));
                for accessor in d.accessors.iter().flatten() {
                    if let Some(param) = &accessor.param {
                        out.push(NodeRef::Pattern(param));
                    }
                    push_body(&accessor.body, &mut out);
                }
            }
            DeclKind::Field(d) => {
                if let Some(ty) = &d.ty {
                    out.push(NodeRef::Type(ty));
                }
                if let Some(value) = &d.value {
                    out.push(NodeRef::Expr(value));
                }
            }
            DeclKind::Error(_) => {}
        }
        out
    }
}

/// A declaration body: a block, or `;` for a declaration without one.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Block(Block),
    Stub(Span),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Members {
    List { members: Vec<Decl>, span: Span },
    Stub(Span),
}

/// A parameter list, or an error node when it could not be parsed. The
/// error is a `Pattern::Error` spanning the whole list so tree walks see it
/// like any other malformed parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamList {
    List(Params),
    Error(Pattern),
}

impl ParamList {
    pub fn get_span(&self) -> Span {
        match self {
            ParamList::List(params) => params.span,
            ParamList::Error(error) => error.get_span(),
        }
    }
}

/// `(a, b: T = 1, { named: T })`
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub positional: Vec<Param>,
    pub named: Option<NamedParams>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedParams {
    pub params: Vec<Param>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub pattern: Pattern,
    pub ty: Option<TypeExpr>,
    pub default: Option<Expr>,
    pub span: Span,
}

/// `[T, U: Bound]`
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParams {
    pub params: Vec<GenericParam>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericParam {
    pub name: Ident,
    pub bound: Option<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncKind {
    Func,
    Method,
    Trans,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub kind: FuncKind,
    pub name: Ident,
    pub generics: Option<GenericParams>,
    pub params: ParamList,
    pub return_type: Option<TypeExpr>,
    pub body: Body,
}

/// Shared by `class`, `trait`, `struct` and `service`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: Ident,
    pub generics: Option<GenericParams>,
    pub supertypes: Vec<TypeExpr>,
    pub members: Members,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub name: Ident,
    pub generics: Option<GenericParams>,
    pub params: ParamList,
    pub supertypes: Vec<TypeExpr>,
    pub members: Members,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: Ident,
    pub generics: Option<GenericParams>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDecl {
    pub name: Ident,
    pub generics: Option<GenericParams>,
    pub params: ParamList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Ident,
    pub generics: Option<GenericParams>,
    pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: Ident,
    pub payload: VariantPayload,
    pub discriminant: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantPayload {
    Unit,
    Tuple(Vec<TypeExpr>),
    Struct(Vec<EnumField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumField {
    pub name: Ident,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `module name { … }`, or `module name;` with `items` unset.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: Ident,
    pub items: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendDecl {
    pub target: TypeExpr,
    pub supertypes: Vec<TypeExpr>,
    pub members: Members,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub params: ParamList,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestructorDecl {
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: Ident,
    pub ty: TypeExpr,
    /// `None` for `prop name: T;`.
    pub accessors: Option<Vec<Accessor>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub param: Option<Pattern>,
    pub body: Body,
    pub span: Span,
}

/// Member field: `let mut count: i32 = 0;`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub mutable: bool,
    pub name: Ident,
    pub ty: Option<TypeExpr>,
    pub value: Option<Expr>,
}
