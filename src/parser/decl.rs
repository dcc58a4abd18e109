//! Declarations and class members.

use tracing::debug;

use crate::{
    ast::{
        ast::{DeclType, ErrorNode},
        statements::{
            Accessor, AccessorKind, Body, ConstructorDecl, Decl, DeclKind, DestructorDecl,
            EnumDecl, EnumField, EnumVariant, EventDecl, ExtendDecl, FieldDecl, FuncDecl,
            FuncKind, GenericParam, GenericParams, Members, Modifier, ModuleDecl, NamedParams, Param,
            ParamList, Params, PropertyDecl, RecordDecl, TypeAliasDecl, TypeDecl, VariantPayload,
        },
        patterns::Pattern,
        types::TypeExpr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    stack::ensure_sufficient_stack,
    Position,
};

use super::{
    expr::parse_expr,
    lookups::BindingPower,
    parser::{
        check_top_level, close_curly, parse_block, parse_stmt_list, Parser, StmtListEnd, SyncMode,
    },
    patterns::parse_pattern,
    resolver::{keyword_at, parse_delimited, parse_ident, Keyword},
    types::parse_type,
};

/// Where a declaration appears. Constructors, destructors, properties and
/// fields only exist inside a member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclContext {
    Item,
    Member,
}

pub fn parse_decl(parser: &mut Parser, context: DeclContext) -> Result<Decl, Error> {
    ensure_sufficient_stack(|| parse_decl_inner(parser, context))
}

fn parse_decl_inner(parser: &mut Parser, context: DeclContext) -> Result<Decl, Error> {
    let start = parser.get_position();
    let mut modifiers = vec![];

    while let Some(modifier) = keyword_at(parser, 0).and_then(|keyword| keyword.modifier()) {
        let span = parser.advance().span;
        modifiers.push(Modifier {
            kind: modifier,
            span,
        });
    }

    let kind = match keyword_at(parser, 0) {
        Some(Keyword::Func) => parse_func_decl(parser, FuncKind::Func)?,
        Some(Keyword::Method) => parse_func_decl(parser, FuncKind::Method)?,
        Some(Keyword::Trans) => parse_func_decl(parser, FuncKind::Trans)?,
        Some(Keyword::Class) => DeclKind::Class(parse_type_decl(parser)?),
        Some(Keyword::Trait) => DeclKind::Trait(parse_type_decl(parser)?),
        Some(Keyword::Struct) => DeclKind::Struct(parse_type_decl(parser)?),
        Some(Keyword::Service) => DeclKind::Service(parse_type_decl(parser)?),
        Some(Keyword::Record) => parse_record_decl(parser)?,
        Some(Keyword::Extend) => parse_extend_decl(parser)?,
        Some(Keyword::Enum) => parse_enum_decl(parser)?,
        Some(Keyword::Type) => parse_type_alias_decl(parser)?,
        Some(Keyword::Event) => parse_event_decl(parser)?,
        Some(Keyword::Module) => parse_module_decl(parser)?,
        Some(Keyword::New) if context == DeclContext::Member => parse_constructor_decl(parser)?,
        Some(Keyword::Drop) if context == DeclContext::Member => parse_destructor_decl(parser)?,
        Some(Keyword::Prop) if context == DeclContext::Member => parse_property_decl(parser)?,
        Some(Keyword::Let) if context == DeclContext::Member => parse_field_decl(parser)?,
        _ => {
            let expected = match context {
                DeclContext::Item => "a declaration",
                DeclContext::Member => "a member declaration",
            };
            return Err(parser.expected(expected));
        }
    };

    let decl = Decl {
        modifiers,
        kind,
        span: parser.span_from(start),
    };
    check_modifiers(parser, &decl);
    Ok(decl)
}

fn declaration_name(decl_type: DeclType) -> &'static str {
    match decl_type {
        DeclType::Func => "a function",
        DeclType::Class => "a class",
        DeclType::Trait => "a trait",
        DeclType::Struct => "a struct",
        DeclType::Record => "a record",
        DeclType::TypeAlias => "a type alias",
        DeclType::Service => "a service",
        DeclType::Event => "an event",
        DeclType::Enum => "an enum",
        DeclType::Module => "a module",
        DeclType::Extend => "an extension",
        DeclType::Constructor => "a constructor",
        DeclType::Destructor => "a destructor",
        DeclType::Property => "a property",
        DeclType::Field => "a field",
        DeclType::Error => "this declaration",
    }
}

/// `async`, `unique` and `shared` only mean something on a class; elsewhere
/// they are kept but reported with a warning.
fn check_modifiers(parser: &mut Parser, decl: &Decl) {
    let decl_type = decl.get_decl_type();
    if decl_type == DeclType::Class {
        return;
    }
    for modifier in decl.modifiers.iter().filter(|modifier| modifier.kind.is_class_only()) {
        parser.report(Error::new(
            ErrorImpl::ModifierNotAllowed {
                modifier: format!("{:?}", modifier.kind).to_lowercase(),
                declaration: declaration_name(decl_type).to_string(),
            },
            modifier.span,
        ));
    }
}

/// `[T, U: Bound]`
fn parse_generic_params(parser: &mut Parser) -> Result<Option<GenericParams>, Error> {
    if parser.current_token_kind() != TokenKind::OpenBracket {
        return Ok(None);
    }
    let start = parser.advance().span.start;

    let params = parse_delimited(parser, TokenKind::CloseBracket, |parser| {
        let name = parse_ident(parser)?;
        let bound = if parser.eat(TokenKind::Colon) {
            Some(parse_type(parser)?)
        } else {
            None
        };
        Ok(GenericParam {
            span: parser.span_from(name.span.start),
            name,
            bound,
        })
    })?;

    Ok(Some(GenericParams {
        params,
        span: parser.span_from(start),
    }))
}

/// Parses a parameter list. A malformed list is recovered locally: it is
/// replaced by an error node and parsing resumes after the closing `)`, or
/// before a `{` or `;` that probably starts the body.
pub fn parse_param_list(parser: &mut Parser) -> Result<ParamList, Error> {
    let open = parser.expect(TokenKind::OpenParen)?;
    let checkpoint = parser.checkpoint();

    match parse_params(parser, open.span.start) {
        Ok(params) => Ok(ParamList::List(params)),
        Err(error) => {
            parser.rewind(checkpoint);
            parser.report(error);
            skip_params(parser);
            debug!(offset = open.span.start.offset, "recovered parameter list");
            Ok(ParamList::Error(Pattern::Error(ErrorNode {
                span: parser.span_from(open.span.start),
            })))
        }
    }
}

fn skip_params(parser: &mut Parser) {
    let mut depth = 0usize;
    loop {
        match parser.current_token_kind() {
            TokenKind::EOF => break,
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen if depth == 0 => {
                parser.advance();
                break;
            }
            TokenKind::CloseParen => depth -= 1,
            TokenKind::OpenCurly | TokenKind::Semicolon if depth == 0 => break,
            _ => {}
        }
        parser.advance();
    }
}

fn parse_params(parser: &mut Parser, start: Position) -> Result<Params, Error> {
    let mut positional = vec![];
    let mut named = None;

    while parser.current_token_kind() != TokenKind::CloseParen {
        if parser.current_token_kind() == TokenKind::OpenCurly {
            let named_start = parser.advance().span.start;
            let params = parse_delimited(parser, TokenKind::CloseCurly, parse_param)?;
            named = Some(NamedParams {
                params,
                span: parser.span_from(named_start),
            });
            parser.eat(TokenKind::Comma);
            break;
        }

        positional.push(parse_param(parser)?);
        if parser.current_token_kind() == TokenKind::CloseParen {
            break;
        }
        parser.expect(TokenKind::Comma)?;
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(Params {
        positional,
        named,
        span: parser.span_from(start),
    })
}

/// `pattern (: T)? (= default)?`
fn parse_param(parser: &mut Parser) -> Result<Param, Error> {
    let start = parser.get_position();
    let pattern = parse_pattern(parser)?;

    let ty = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let default = if parser.eat(TokenKind::Assignment) {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    Ok(Param {
        pattern,
        ty,
        default,
        span: parser.span_from(start),
    })
}

/// A block, or `;` for a declaration without a body.
fn parse_body(parser: &mut Parser) -> Result<Body, Error> {
    match parser.current_token_kind() {
        TokenKind::Semicolon => Ok(Body::Stub(parser.advance().span)),
        TokenKind::OpenCurly => Ok(Body::Block(parse_block(parser)?)),
        _ => Err(parser.expected("a block or `;`")),
    }
}

/// `(: T, …)?`
fn parse_supertypes(parser: &mut Parser) -> Result<Vec<TypeExpr>, Error> {
    let mut supertypes = vec![];
    if !parser.eat(TokenKind::Colon) {
        return Ok(supertypes);
    }
    supertypes.push(parse_type(parser)?);
    while parser.eat(TokenKind::Comma) {
        supertypes.push(parse_type(parser)?);
    }
    Ok(supertypes)
}

/// `{ member* }` or `;`. A failed member is replaced by an error member and
/// the list resynchronises; a list missing its `}` is closed at end of
/// input.
fn parse_members(parser: &mut Parser) -> Result<Members, Error> {
    if parser.current_token_kind() == TokenKind::Semicolon {
        return Ok(Members::Stub(parser.advance().span));
    }

    let open = parser.expect(TokenKind::OpenCurly)?;
    let mut members = vec![];

    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        if parser.eat(TokenKind::Semicolon) {
            continue;
        }

        let start = parser.get_position();
        match parse_decl(parser, DeclContext::Member) {
            Ok(member) => members.push(member),
            Err(error) => {
                parser.report(error);
                parser.synchronize(SyncMode::Block);
                let span = parser.span_from(start);
                members.push(Decl {
                    modifiers: vec![],
                    kind: DeclKind::Error(ErrorNode { span }),
                    span,
                });
            }
        }
    }

    close_curly(parser, &open);

    Ok(Members::List {
        members,
        span: parser.span_from(open.span.start),
    })
}

/// `func|method|trans name[G](params) (-> T)? body`
fn parse_func_decl(parser: &mut Parser, kind: FuncKind) -> Result<DeclKind, Error> {
    parser.advance();
    let name = parse_ident(parser)?;
    let generics = parse_generic_params(parser)?;
    let params = parse_param_list(parser)?;

    let return_type = if parser.eat(TokenKind::Arrow) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_body(parser)?;

    Ok(DeclKind::Func(FuncDecl {
        kind,
        name,
        generics,
        params,
        return_type,
        body,
    }))
}

/// `class|trait|struct|service name[G] (: T, …)? members`
fn parse_type_decl(parser: &mut Parser) -> Result<TypeDecl, Error> {
    parser.advance();
    let name = parse_ident(parser)?;
    let generics = parse_generic_params(parser)?;
    let supertypes = parse_supertypes(parser)?;
    let members = parse_members(parser)?;

    Ok(TypeDecl {
        name,
        generics,
        supertypes,
        members,
    })
}

/// `record name[G](params) (: T, …)? (members | ;)`
fn parse_record_decl(parser: &mut Parser) -> Result<DeclKind, Error> {
    parser.advance();
    let name = parse_ident(parser)?;
    let generics = parse_generic_params(parser)?;
    let params = parse_param_list(parser)?;
    let supertypes = parse_supertypes(parser)?;
    let members = parse_members(parser)?;

    Ok(DeclKind::Record(RecordDecl {
        name,
        generics,
        params,
        supertypes,
        members,
    }))
}

/// `extend T (: T, …)? members`
fn parse_extend_decl(parser: &mut Parser) -> Result<DeclKind, Error> {
    parser.advance();
    let target = parse_type(parser)?;
    let supertypes = parse_supertypes(parser)?;
    let members = parse_members(parser)?;

    Ok(DeclKind::Extend(ExtendDecl {
        target,
        supertypes,
        members,
    }))
}

/// `enum name[G] { A, B(T), C { x: T }, D = 4 }`
fn parse_enum_decl(parser: &mut Parser) -> Result<DeclKind, Error> {
    parser.advance();
    let name = parse_ident(parser)?;
    let generics = parse_generic_params(parser)?;
    parser.expect(TokenKind::OpenCurly)?;
    let variants = parse_delimited(parser, TokenKind::CloseCurly, parse_enum_variant)?;

    Ok(DeclKind::Enum(EnumDecl {
        name,
        generics,
        variants,
    }))
}

fn parse_enum_variant(parser: &mut Parser) -> Result<EnumVariant, Error> {
    let name = parse_ident(parser)?;

    let payload = match parser.current_token_kind() {
        TokenKind::OpenParen => {
            parser.advance();
            VariantPayload::Tuple(parse_delimited(parser, TokenKind::CloseParen, parse_type)?)
        }
        TokenKind::OpenCurly => {
            parser.advance();
            VariantPayload::Struct(parse_delimited(parser, TokenKind::CloseCurly, |parser| {
                let name = parse_ident(parser)?;
                parser.expect(TokenKind::Colon)?;
                let ty = parse_type(parser)?;
                Ok(EnumField {
                    span: parser.span_from(name.span.start),
                    name,
                    ty,
                })
            })?)
        }
        _ => VariantPayload::Unit,
    };

    let discriminant = if parser.eat(TokenKind::Assignment) {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    Ok(EnumVariant {
        span: parser.span_from(name.span.start),
        name,
        payload,
        discriminant,
    })
}

/// `type name[G] = T;`
fn parse_type_alias_decl(parser: &mut Parser) -> Result<DeclKind, Error> {
    parser.advance();
    let name = parse_ident(parser)?;
    let generics = parse_generic_params(parser)?;
    parser.expect(TokenKind::Assignment)?;
    let ty = parse_type(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(DeclKind::TypeAlias(TypeAliasDecl { name, generics, ty }))
}

/// `event name[G](params);`
fn parse_event_decl(parser: &mut Parser) -> Result<DeclKind, Error> {
    parser.advance();
    let name = parse_ident(parser)?;
    let generics = parse_generic_params(parser)?;
    let params = parse_param_list(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(DeclKind::Event(EventDecl {
        name,
        generics,
        params,
    }))
}

/// `module name { items }` or `module name;`
fn parse_module_decl(parser: &mut Parser) -> Result<DeclKind, Error> {
    parser.advance();
    let name = parse_ident(parser)?;

    if parser.eat(TokenKind::Semicolon) {
        return Ok(DeclKind::Module(ModuleDecl { name, items: None }));
    }

    let open = parser.expect(TokenKind::OpenCurly)?;
    let (items, _) = parse_stmt_list(parser, StmtListEnd::Curly, false);
    check_top_level(parser, &items);
    close_curly(parser, &open);

    Ok(DeclKind::Module(ModuleDecl {
        name,
        items: Some(items),
    }))
}

/// `new(params) body`
fn parse_constructor_decl(parser: &mut Parser) -> Result<DeclKind, Error> {
    parser.advance();
    let params = parse_param_list(parser)?;
    let body = parse_body(parser)?;

    Ok(DeclKind::Constructor(ConstructorDecl { params, body }))
}

/// `drop body`
fn parse_destructor_decl(parser: &mut Parser) -> Result<DeclKind, Error> {
    parser.advance();
    let body = parse_body(parser)?;

    Ok(DeclKind::Destructor(DestructorDecl { body }))
}

/// `prop name: T { get body set(value) body }` or `prop name: T;`
fn parse_property_decl(parser: &mut Parser) -> Result<DeclKind, Error> {
    parser.advance();
    let name = parse_ident(parser)?;
    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser)?;

    if parser.eat(TokenKind::Semicolon) {
        return Ok(DeclKind::Property(PropertyDecl {
            name,
            ty,
            accessors: None,
        }));
    }

    parser.expect(TokenKind::OpenCurly)?;
    let mut accessors = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        accessors.push(parse_accessor(parser)?);
    }
    parser.expect(TokenKind::CloseCurly)?;

    Ok(DeclKind::Property(PropertyDecl {
        name,
        ty,
        accessors: Some(accessors),
    }))
}

fn parse_accessor(parser: &mut Parser) -> Result<Accessor, Error> {
    let start = parser.get_position();
    let kind = if parser.current_token().is_word("get") {
        AccessorKind::Get
    } else if parser.current_token().is_word("set") {
        AccessorKind::Set
    } else {
        return Err(parser.expected("`get` or `set`"));
    };
    parser.advance();

    let param = if kind == AccessorKind::Set && parser.eat(TokenKind::OpenParen) {
        let pattern = parse_pattern(parser)?;
        parser.expect(TokenKind::CloseParen)?;
        Some(pattern)
    } else {
        None
    };

    let body = parse_body(parser)?;

    Ok(Accessor {
        kind,
        param,
        body,
        span: parser.span_from(start),
    })
}

/// `let mut? name (: T)? (= value)? ;`
fn parse_field_decl(parser: &mut Parser) -> Result<DeclKind, Error> {
    parser.advance();
    let mutable =
        parser.current_token().is_word("mut") && parser.peek_kind(1) == TokenKind::Identifier;
    if mutable {
        parser.advance();
    }
    let name = parse_ident(parser)?;

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

    Ok(DeclKind::Field(FieldDecl {
        mutable,
        name,
        ty,
        value,
    }))
}
