//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs:
//! - Expression precedence and associativity
//! - Positional keywords and the ambiguity rules
//! - Types and patterns
//! - Declarations and class members
//! - Error recovery

use crate::{
    ast::{
        ast::{walk, DeclType, GenericArg, PatternType, Unit, Variant},
        expressions::{AssignOp, BinaryOp, Expr, Literal, PostfixOp, UnaryOp},
        patterns::Pattern,
        statements::{
            AccessorKind, Body, DeclKind, FuncKind, Members, ParamList, Stmt, VariantPayload,
        },
        types::{RefKind, TypeExpr},
    },
    errors::errors::Severity,
    lexer::tokens::LiteralValue,
    parse, parse_with_options, ParseOptions,
};

fn parse_clean(source: &str) -> Unit {
    let (unit, diagnostics) = parse(source, "test.som");
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:#?}", diagnostics);
    unit
}

fn result(source: &str) -> Expr {
    parse_clean(source).result.expect("expected a result expression")
}

fn int(expr: &Expr) -> u128 {
    match expr {
        Expr::Literal(Literal {
            value: LiteralValue::Int { value: Some(value), .. },
            ..
        }) => *value,
        other => panic!("expected an integer literal, got {:?}", other),
    }
}

fn name(expr: &Expr) -> String {
    match expr {
        Expr::Path(path) => path.to_path_string(),
        other => panic!("expected a path, got {:?}", other),
    }
}

fn let_type(ty: &str) -> TypeExpr {
    let unit = parse_clean(&format!("let v: {} = x;", ty));
    match unit.items.into_iter().next() {
        Some(Stmt::Let(stmt)) => stmt.ty.expect("expected a type annotation"),
        other => panic!("expected a let statement, got {:?}", other),
    }
}

fn first_decl(unit: &Unit) -> &DeclKind {
    match unit.items.first() {
        Some(Stmt::Decl(decl)) => &decl.kind,
        other => panic!("expected a declaration, got {:?}", other),
    }
}

// EXPRESSIONS

#[test]
fn test_multiplication_binds_tighter() {
    let Expr::Binary(add) = result("1 + 2 * 3") else {
        panic!("expected a binary expression");
    };
    assert_eq!(add.operator, BinaryOp::Add);
    assert_eq!(int(&add.left), 1);

    let Expr::Binary(mul) = &*add.right else {
        panic!("expected a binary expression");
    };
    assert_eq!(mul.operator, BinaryOp::Mul);
    assert_eq!(int(&mul.left), 2);
    assert_eq!(int(&mul.right), 3);
}

#[test]
fn test_assignment_is_right_associative() {
    let Expr::Assignment(outer) = result("a := b := c") else {
        panic!("expected an assignment");
    };
    assert_eq!(outer.operator, AssignOp::Assign);
    assert_eq!(name(&outer.assignee), "a");

    let Expr::Assignment(inner) = &*outer.value else {
        panic!("expected a nested assignment");
    };
    assert_eq!(name(&inner.assignee), "b");
    assert_eq!(name(&inner.value), "c");
}

#[test]
fn test_subtraction_is_left_associative() {
    let Expr::Binary(outer) = result("a - b - c") else {
        panic!("expected a binary expression");
    };
    assert_eq!(outer.operator, BinaryOp::Sub);
    assert_eq!(name(&outer.right), "c");

    let Expr::Binary(inner) = &*outer.left else {
        panic!("expected a nested subtraction");
    };
    assert_eq!(name(&inner.left), "a");
    assert_eq!(name(&inner.right), "b");
}

#[test]
fn test_compound_assignment() {
    let Expr::Assignment(assign) = result("total += 1 + 2") else {
        panic!("expected an assignment");
    };
    assert_eq!(assign.operator, AssignOp::AddAssign);
    assert!(matches!(*assign.value, Expr::Binary(_)));
}

#[test]
fn test_low_precedence_ladder() {
    // pipe < nullish < or
    let Expr::Binary(pipe) = result("a |> f ?? b || c") else {
        panic!("expected a binary expression");
    };
    assert_eq!(pipe.operator, BinaryOp::Pipe);

    let Expr::Binary(nullish) = &*pipe.right else {
        panic!("expected a nullish expression");
    };
    assert_eq!(nullish.operator, BinaryOp::Nullish);

    let Expr::Binary(or) = &*nullish.right else {
        panic!("expected an or expression");
    };
    assert_eq!(or.operator, BinaryOp::Or);
}

#[test]
fn test_comparison_below_additive() {
    let Expr::Binary(and) = result("a + 1 < b && c") else {
        panic!("expected a binary expression");
    };
    assert_eq!(and.operator, BinaryOp::And);

    let Expr::Binary(less) = &*and.left else {
        panic!("expected a comparison");
    };
    assert_eq!(less.operator, BinaryOp::Less);
    assert!(matches!(&*less.left, Expr::Binary(add) if add.operator == BinaryOp::Add));
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    let Expr::Binary(mul) = result("-a * b") else {
        panic!("expected a binary expression");
    };
    assert_eq!(mul.operator, BinaryOp::Mul);
    assert!(matches!(&*mul.left, Expr::Unary(neg) if neg.operator == UnaryOp::Neg));
}

#[test]
fn test_move_and_copy_are_prefix_words() {
    let Expr::Unary(unary) = result("move value") else {
        panic!("expected a unary expression");
    };
    assert_eq!(unary.operator, UnaryOp::Move);
    assert_eq!(name(&unary.operand), "value");

    assert!(matches!(result("copy x"), Expr::Unary(u) if u.operator == UnaryOp::Copy));
}

#[test]
fn test_double_bang_splits() {
    let Expr::Unary(outer) = result("!!x") else {
        panic!("expected a unary expression");
    };
    assert_eq!(outer.operator, UnaryOp::Not);
    assert!(matches!(&*outer.operand, Expr::Unary(inner) if inner.operator == UnaryOp::Not));

    let Expr::Postfix(outer) = result("x!!") else {
        panic!("expected a postfix expression");
    };
    assert_eq!(outer.operator, PostfixOp::Unwrap);
    assert!(matches!(&*outer.operand, Expr::Postfix(inner) if inner.operator == PostfixOp::Unwrap));
}

#[test]
fn test_postfix_chain() {
    let Expr::Postfix(await_expr) = result("client.fetch(url)?.await") else {
        panic!("expected a postfix expression");
    };
    assert_eq!(await_expr.operator, PostfixOp::Await);

    let Expr::Postfix(propagate) = &*await_expr.operand else {
        panic!("expected `?`");
    };
    assert_eq!(propagate.operator, PostfixOp::Propagate);

    let Expr::MethodCall(call) = &*propagate.operand else {
        panic!("expected a method call");
    };
    assert_eq!(call.method.name, "fetch");
    assert_eq!(name(&call.receiver), "client");
    assert_eq!(call.args.len(), 1);
}

#[test]
fn test_await_followed_by_paren_is_a_method() {
    assert!(matches!(result("x.await()"), Expr::MethodCall(call) if call.method.name == "await"));
    assert!(matches!(result("x.len"), Expr::Member(member) if member.member.name == "len"));
}

#[test]
fn test_call_with_named_arguments() {
    let Expr::Call(call) = result("draw(1, color: red,)") else {
        panic!("expected a call");
    };
    assert_eq!(call.args.len(), 2);
    assert!(call.args[0].name.is_none());
    assert_eq!(call.args[1].name.as_ref().map(|n| n.name.as_str()), Some("color"));
    assert_eq!(name(&call.args[1].value), "red");
}

#[test]
fn test_trailing_comma_rule() {
    assert!(matches!(result("(1)"), Expr::Group(group) if int(&group.inner) == 1));
    assert!(matches!(result("(1,)"), Expr::Tuple(tuple) if tuple.elements.len() == 1));
    assert!(matches!(result("(1, 2)"), Expr::Tuple(tuple) if tuple.elements.len() == 2));
    assert!(matches!(result("()"), Expr::Tuple(tuple) if tuple.elements.is_empty()));
}

#[test]
fn test_block_tail() {
    let Expr::Block(block) = result("{ let x = 1; x + 1 }") else {
        panic!("expected a block");
    };
    assert_eq!(block.stmts.len(), 1);
    assert!(matches!(block.tail.as_deref(), Some(Expr::Binary(_))));

    let unit = parse_clean("{ let x = 1; x + 1; }");
    let Some(Expr::Block(block)) = unit.result else {
        panic!("expected a block");
    };
    assert_eq!(block.stmts.len(), 2);
    assert!(block.tail.is_none());
}

#[test]
fn test_enumerable_and_map_literals() {
    assert!(matches!(result("[]"), Expr::EnumerableLiteral(e) if e.elements.is_empty()));
    assert!(matches!(result("[1, 2,]"), Expr::EnumerableLiteral(e) if e.elements.len() == 2));
    assert!(matches!(result("[:]"), Expr::MapLiteral(m) if m.entries.is_empty()));

    let Expr::MapLiteral(map) = result("[\"a\": 1, \"b\": 2]") else {
        panic!("expected a map literal");
    };
    assert_eq!(map.entries.len(), 2);
    assert_eq!(int(&map.entries[1].value), 2);
}

#[test]
fn test_struct_literal() {
    let Expr::StructLiteral(literal) = result("Point { x: 1, y, ..base }") else {
        panic!("expected a struct literal");
    };
    assert_eq!(literal.path.to_path_string(), "Point");
    assert_eq!(literal.fields.len(), 2);
    assert!(literal.fields[1].value.is_none());
    assert!(literal.base.is_some());
}

#[test]
fn test_no_struct_literal_in_condition() {
    let Expr::If(if_expr) = result("if a { b } else if c { d } else { e }") else {
        panic!("expected an if expression");
    };
    assert_eq!(name(&if_expr.condition), "a");
    assert_eq!(if_expr.then_branch.tail.as_deref().map(name), Some("b".to_string()));

    let Some(Expr::If(else_if)) = if_expr.else_branch.as_deref() else {
        panic!("expected `else if`");
    };
    assert!(matches!(else_if.else_branch.as_deref(), Some(Expr::Block(_))));
}

#[test]
fn test_struct_literal_inside_parens_in_condition() {
    let Expr::If(if_expr) = result("if (p == Point { x: 1 }) { }") else {
        panic!("expected an if expression");
    };
    let Expr::Group(group) = &*if_expr.condition else {
        panic!("expected a group");
    };
    assert!(matches!(&*group.inner, Expr::Binary(b) if matches!(*b.right, Expr::StructLiteral(_))));
}

#[test]
fn test_generic_argument_type_or_expression() {
    let Expr::Path(path) = result("Array[i32]") else {
        panic!("expected a path");
    };
    let args = &path.segments[0].generics.as_ref().expect("generic arguments").args;
    assert!(matches!(args[0], GenericArg::Type(TypeExpr::Named(_))));

    let Expr::Path(path) = result("Array[1]") else {
        panic!("expected a path");
    };
    let args = &path.segments[0].generics.as_ref().expect("generic arguments").args;
    assert!(matches!(&args[0], GenericArg::Expr(e) if int(e) == 1));

    let Expr::Path(path) = result("Matrix[f64, N + 1]") else {
        panic!("expected a path");
    };
    let args = &path.segments[0].generics.as_ref().expect("generic arguments").args;
    assert!(matches!(args[0], GenericArg::Type(_)));
    assert!(matches!(args[1], GenericArg::Expr(Expr::Binary(_))));
}

#[test]
fn test_keywords_are_positional() {
    let unit = parse_clean("let match = 1; match");
    assert_eq!(unit.result.as_ref().map(name), Some("match".to_string()));

    let Expr::Assignment(assign) = result("if := 2") else {
        panic!("expected an assignment");
    };
    assert_eq!(name(&assign.assignee), "if");

    let unit = parse_clean("let source = 1;");
    assert!(matches!(unit.items[0], Stmt::Let(_)));
}

#[test]
fn test_loops() {
    assert!(matches!(result("for x in xs { }"), Expr::For(_)));
    assert!(matches!(result("par for x in xs { }"), Expr::ParFor(_)));
    assert!(matches!(result("while i < 10 { i += 1; }"), Expr::While(_)));

    let unit = parse_clean("do { step(); } while running;");
    let Stmt::Expr(stmt) = &unit.items[0] else {
        panic!("expected an expression statement");
    };
    assert!(matches!(stmt.expression, Expr::DoWhile(_)));
    assert!(stmt.has_semicolon);
}

#[test]
fn test_labeled_loop_and_break() {
    let Expr::Loop(loop_expr) = result("#:outer loop { break #:outer 1; }") else {
        panic!("expected a loop");
    };
    assert_eq!(loop_expr.label.as_ref().map(|l| l.name.as_str()), Some("outer"));
    assert_eq!(loop_expr.span.start.offset, 0);

    let Stmt::Expr(stmt) = &loop_expr.body.stmts[0] else {
        panic!("expected an expression statement");
    };
    let Expr::Break(break_expr) = &stmt.expression else {
        panic!("expected break");
    };
    assert_eq!(break_expr.label.as_ref().map(|l| l.name.as_str()), Some("outer"));
    assert_eq!(break_expr.value.as_deref().map(int), Some(1));
}

#[test]
fn test_jumps_without_values() {
    let unit = parse_clean("func f() { return; }");
    let DeclKind::Func(func) = first_decl(&unit) else {
        panic!("expected a function");
    };
    let Body::Block(body) = &func.body else {
        panic!("expected a body");
    };
    let Stmt::Expr(stmt) = &body.stmts[0] else {
        panic!("expected an expression statement");
    };
    assert!(matches!(&stmt.expression, Expr::Return(r) if r.value.is_none()));
}

#[test]
fn test_match_arms() {
    let source = "match v { Some(x) if x > 0 => x, -1 => 0, Color::Red => { 1 } _ => 2 }";
    let Expr::Match(match_expr) = result(source) else {
        panic!("expected a match");
    };
    assert_eq!(match_expr.arms.len(), 4);
    assert!(matches!(match_expr.arms[0].pattern, Pattern::TupleCase(_)));
    assert!(match_expr.arms[0].guard.is_some());
    assert!(matches!(&match_expr.arms[1].pattern, Pattern::Literal(l) if l.negative));
    assert!(matches!(match_expr.arms[2].pattern, Pattern::Path(_)));
    assert!(matches!(match_expr.arms[3].pattern, Pattern::Wildcard(_)));
}

#[test]
fn test_match_can_continue_as_expression() {
    let unit = parse_clean("match x { _ => a }.len();");
    let Stmt::Expr(stmt) = &unit.items[0] else {
        panic!("expected an expression statement");
    };
    assert!(matches!(&stmt.expression, Expr::MethodCall(call) if matches!(*call.receiver, Expr::Match(_))));
}

#[test]
fn test_block_arm_ends_at_its_brace() {
    let Expr::Match(match_expr) = result("match p { (0, 0) => { origin() } (x, y) => other(x, y) }") else {
        panic!("expected a match");
    };
    assert_eq!(match_expr.arms.len(), 2);
    assert!(matches!(match_expr.arms[0].body, Expr::Block(_)));
    assert!(matches!(&match_expr.arms[1].pattern, Pattern::Tuple(t) if t.elements.len() == 2));

    let Expr::Match(match_expr) = result("match x { 0 => { a } -1 => b }") else {
        panic!("expected a match");
    };
    assert_eq!(match_expr.arms.len(), 2);
    assert!(matches!(match_expr.arms[0].body, Expr::Block(_)));
    assert!(matches!(&match_expr.arms[1].pattern, Pattern::Literal(l) if l.negative));
}

#[test]
fn test_block_arm_continues_with_infix_operator() {
    let Expr::Match(match_expr) = result("match x { _ => { a }.len() }") else {
        panic!("expected a match");
    };
    assert!(matches!(match_expr.arms[0].body, Expr::MethodCall(_)));
}

// PATTERNS

#[test]
fn test_patterns() {
    let unit = parse_clean("let (a, mut b, _) = t; let Point { x, y: (c,), .. } = p; let ref r = q;");

    let Stmt::Let(first) = &unit.items[0] else {
        panic!("expected let");
    };
    let Pattern::Tuple(tuple) = &first.pattern else {
        panic!("expected a tuple pattern");
    };
    assert!(matches!(&tuple.elements[0], Pattern::Bind(b) if !b.mutable));
    assert!(matches!(&tuple.elements[1], Pattern::Bind(b) if b.mutable && b.name.name == "b"));
    assert!(matches!(tuple.elements[2], Pattern::Wildcard(_)));

    let Stmt::Let(second) = &unit.items[1] else {
        panic!("expected let");
    };
    let Pattern::StructCase(case) = &second.pattern else {
        panic!("expected a struct case pattern");
    };
    assert!(case.rest);
    assert_eq!(case.fields.len(), 2);
    assert!(matches!(&case.fields[1].pattern, Some(Pattern::Tuple(t)) if t.elements.len() == 1));

    let Stmt::Let(third) = &unit.items[2] else {
        panic!("expected let");
    };
    assert!(matches!(&third.pattern, Pattern::Bind(b) if b.by_ref));
}

#[test]
fn test_pattern_trailing_comma_rule() {
    let unit = parse_clean("let (g) = t; let (h,) = t; let () = t;");
    let patterns: Vec<&Pattern> = unit
        .items
        .iter()
        .map(|item| match item {
            Stmt::Let(stmt) => &stmt.pattern,
            other => panic!("expected let, got {:?}", other),
        })
        .collect();

    assert!(matches!(patterns[0], Pattern::Group(g) if matches!(&*g.inner, Pattern::Bind(b) if b.name.name == "g")));
    assert!(matches!(patterns[1], Pattern::Tuple(t) if t.elements.len() == 1));
    assert!(matches!(patterns[2], Pattern::Tuple(t) if t.elements.is_empty()));
}

// TYPES

#[test]
fn test_union_and_fallible_types_flatten() {
    assert!(matches!(let_type("A | B | C"), TypeExpr::Union(u) if u.members.len() == 3));
    assert!(matches!(let_type("T !! E1 !! E2"), TypeExpr::Fallible(u) if u.members.len() == 3));

    let TypeExpr::Fallible(fallible) = let_type("A | B !! E") else {
        panic!("expected a fallible type");
    };
    assert!(matches!(fallible.members[0], TypeExpr::Union(_)));
}

#[test]
fn test_prefix_types() {
    let TypeExpr::Ref(outer) = let_type("&&mut T") else {
        panic!("expected a reference");
    };
    assert_eq!(outer.kind, RefKind::Ref);
    assert!(matches!(&*outer.inner, TypeExpr::Ref(inner) if inner.kind == RefKind::RefMut));

    assert!(matches!(let_type("??T"), TypeExpr::Option(o) if matches!(*o.inner, TypeExpr::Option(_))));
    assert!(matches!(let_type("^T"), TypeExpr::Future(_)));
    assert!(matches!(let_type("~mut i32"), TypeExpr::Reactive(r) if r.mutable));
    assert!(matches!(let_type("*u8"), TypeExpr::Ref(r) if r.kind == RefKind::Pointer));
    assert!(matches!(let_type("borrow Node"), TypeExpr::Ref(r) if r.kind == RefKind::Borrow));
}

#[test]
fn test_composite_types() {
    assert!(matches!(let_type("[i32]"), TypeExpr::Enumerable(_)));
    assert!(matches!(let_type("[i32; 4]"), TypeExpr::Array(_)));
    assert!(matches!(let_type("(i32)"), TypeExpr::Group(_)));
    assert!(matches!(let_type("(i32,)"), TypeExpr::Tuple(t) if t.elements.len() == 1));

    let TypeExpr::Func(func) = let_type("func(i32, bool) -> String") else {
        panic!("expected a function type");
    };
    assert_eq!(func.params.len(), 2);
    assert!(func.return_type.is_some());
}

// DECLARATIONS

#[test]
fn test_function_declaration() {
    let unit = parse_clean("func find[T: Eq](xs: [T], x: T = y, { strict: bool }) -> ?T;");
    let DeclKind::Func(func) = first_decl(&unit) else {
        panic!("expected a function");
    };
    assert_eq!(func.kind, FuncKind::Func);
    assert_eq!(func.name.name, "find");
    assert!(func.generics.as_ref().is_some_and(|g| g.params[0].bound.is_some()));
    assert!(matches!(func.return_type, Some(TypeExpr::Option(_))));
    assert!(matches!(func.body, Body::Stub(_)));

    let ParamList::List(params) = &func.params else {
        panic!("expected parameters");
    };
    assert_eq!(params.positional.len(), 2);
    assert!(params.positional[1].default.is_some());
    assert_eq!(params.named.as_ref().map(|n| n.params.len()), Some(1));
}

#[test]
fn test_class_members() {
    let source = "public class Counter[T]: Base, Show {
        let mut count: i32 = 0;
        new(start: i32) { count := start; }
        drop { }
        prop value: i32 {
            get { count }
            set(v) { count := v; }
        }
        method inc() { count += 1; }
    }";
    let unit = parse_clean(source);
    let DeclKind::Class(class) = first_decl(&unit) else {
        panic!("expected a class");
    };
    assert_eq!(class.supertypes.len(), 2);

    let Members::List { members, .. } = &class.members else {
        panic!("expected members");
    };
    let kinds: Vec<_> = members.iter().map(|m| m.get_decl_type()).collect();
    assert_eq!(
        kinds,
        vec![
            DeclType::Field,
            DeclType::Constructor,
            DeclType::Destructor,
            DeclType::Property,
            DeclType::Func,
        ]
    );

    let DeclKind::Property(prop) = &members[3].kind else {
        panic!("expected a property");
    };
    let accessors = prop.accessors.as_ref().expect("accessors");
    assert_eq!(accessors[0].kind, AccessorKind::Get);
    assert_eq!(accessors[1].kind, AccessorKind::Set);
    assert!(accessors[1].param.is_some());
}

#[test]
fn test_type_declarations() {
    let unit = parse_clean(
        "enum Shape { Circle(f64), Rect { w: f64, h: f64 }, Empty = 0, }
         record Point(x: i32, y: i32);
         type Id = i64;
         event Clicked(x: i32);
         module util { func helper() { } }
         extend Point: Show { func show() { } }
         trait Show;",
    );

    let DeclKind::Enum(shape) = first_decl(&unit) else {
        panic!("expected an enum");
    };
    assert_eq!(shape.variants.len(), 3);
    assert!(matches!(shape.variants[0].payload, VariantPayload::Tuple(_)));
    assert!(matches!(&shape.variants[1].payload, VariantPayload::Struct(f) if f.len() == 2));
    assert!(shape.variants[2].discriminant.is_some());

    let kinds: Vec<_> = unit
        .items
        .iter()
        .map(|item| match item {
            Stmt::Decl(decl) => decl.get_decl_type(),
            other => panic!("expected a declaration, got {:?}", other),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            DeclType::Enum,
            DeclType::Record,
            DeclType::TypeAlias,
            DeclType::Event,
            DeclType::Module,
            DeclType::Extend,
            DeclType::Trait,
        ]
    );
}

#[test]
fn test_extend_needs_members_or_supertypes() {
    let unit = parse_clean("extend(foo);");
    assert!(matches!(&unit.items[0], Stmt::Expr(s) if matches!(s.expression, Expr::Call(_))));

    let unit = parse_clean("extend Array[T] { } extend &Point: Show;");
    let kinds: Vec<_> = unit
        .items
        .iter()
        .map(|item| match item {
            Stmt::Decl(decl) => decl.get_decl_type(),
            other => panic!("expected a declaration, got {:?}", other),
        })
        .collect();
    assert_eq!(kinds, vec![DeclType::Extend, DeclType::Extend]);
}

#[test]
fn test_class_only_modifier_warns() {
    let (_, diagnostics) = parse("async func f() { }", "test.som");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, "ModifierNotAllowed");
    assert_eq!(diagnostics[0].severity, Severity::Warning);

    let (_, diagnostics) = parse("shared async class Actor { }", "test.som");
    assert!(diagnostics.is_empty());
}

// STATEMENTS

#[test]
fn test_directives_and_handlers() {
    let unit = parse_clean(
        "use std::io::{read, write as put};
         use std::fmt as f;
         source \"lib.som\";
         on Clicked(pos, button: b) { }
         catch e: IoError { }",
    );

    let Stmt::Use(first) = &unit.items[0] else {
        panic!("expected use");
    };
    assert_eq!(first.path.len(), 2);
    let items = first.items.as_ref().expect("use items");
    assert!(items[1].alias.is_some());

    let Stmt::Use(second) = &unit.items[1] else {
        panic!("expected use");
    };
    assert_eq!(second.alias.as_ref().map(|a| a.name.as_str()), Some("f"));

    assert!(matches!(&unit.items[2], Stmt::Source(s) if s.path == "lib.som"));
    assert!(matches!(&unit.items[3], Stmt::On(on) if on.binds.len() == 2 && on.binds[1].name.is_some()));
    assert!(matches!(&unit.items[4], Stmt::Catch(c) if c.ty.is_some()));
}

// RECOVERY

#[test]
fn test_malformed_parameter_list() {
    let (unit, diagnostics) = parse("func f( { }", "test.som");

    assert_eq!(diagnostics.len(), 1, "{:#?}", diagnostics);
    assert_eq!(unit.items.len(), 1);
    let DeclKind::Func(func) = first_decl(&unit) else {
        panic!("expected a function");
    };
    assert!(matches!(func.params, ParamList::Error(_)));
    assert!(matches!(func.body, Body::Block(_)));
    assert!(unit.is_complete());
}

#[test]
fn test_malformed_parameter_list_is_walkable() {
    let (unit, _) = parse("func f( { }", "test.som");

    let mut errors = vec![];
    for child in unit.get_children() {
        walk(child, 0, &mut |node, _| {
            if node.get_variant().is_error() {
                errors.push((node.get_variant(), node.get_span()));
            }
        });
    }

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, Variant::Pattern(PatternType::Error));
    assert_eq!(errors[0].1.start.offset, 6);
}

#[test]
fn test_statement_recovery() {
    let (unit, diagnostics) = parse("let a = ); let b = 2;", "test.som");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, "ExpectedToken");
    assert!(matches!(unit.items[0], Stmt::Error(_)));
    assert!(matches!(unit.items[1], Stmt::Let(_)));
}

#[test]
fn test_member_recovery() {
    let (unit, diagnostics) = parse("class A { 42; func ok() { } }", "test.som");

    assert_eq!(diagnostics.len(), 1);
    let DeclKind::Class(class) = first_decl(&unit) else {
        panic!("expected a class");
    };
    let Members::List { members, .. } = &class.members else {
        panic!("expected members");
    };
    assert!(matches!(members[0].kind, DeclKind::Error(_)));
    assert!(matches!(members[1].kind, DeclKind::Func(_)));
}

#[test]
fn test_missing_semicolon_in_block() {
    let (_, diagnostics) = parse("func f() { a b }", "test.som");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "expected `;`, found `b`");
}

#[test]
fn test_missing_semicolon_in_module_body() {
    let (unit, diagnostics) = parse("module m { 1 }", "test.som");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "expected `;`, found `}`");
    assert!(matches!(first_decl(&unit), DeclKind::Module(m) if m.items.as_ref().map(Vec::len) == Some(1)));
}

#[test]
fn test_unclosed_block() {
    let (unit, diagnostics) = parse("func f() {\n  let x = 1;\n", "test.som");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, "UnclosedDelimiter");
    assert_eq!(diagnostics[0].secondary[0].span.start.offset, 9);
    assert!(matches!(first_decl(&unit), DeclKind::Func(_)));
}

#[test]
fn test_incomplete_parse() {
    let (unit, diagnostics) = parse("let a = (1 2 3", "test.som");

    assert!(!unit.is_complete());
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[1].name, "IncompleteParse");
    assert_eq!(diagnostics[1].severity, Severity::Warning);
}

#[test]
fn test_trailing_garbage_in_script() {
    let (unit, diagnostics) = parse("1 2", "test.som");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, "TrailingGarbage");
    assert_eq!(unit.result.as_ref().map(int), Some(2));
}

#[test]
fn test_lexer_errors_are_not_reported_twice() {
    let (unit, diagnostics) = parse("let a = $;", "test.som");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, "UnrecognisedToken");
    assert!(matches!(&unit.items[0], Stmt::Let(l) if matches!(l.value, Some(Expr::Error(_)))));
}

#[test]
fn test_library_mode() {
    let (unit, diagnostics) = parse_with_options(
        "use a; let x = 1; func f() { } f()",
        "test.som",
        ParseOptions::library(),
    );

    assert!(unit.result.is_none());
    assert_eq!(unit.items.len(), 4);
    let names: Vec<_> = diagnostics.iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["NotAllowedAtTopLevel", "NotAllowedAtTopLevel"]);
}

// NESTING

/// Runs `f` on a thread with a main-thread sized stack; dropping a deeply
/// nested tree recurses even though parsing does not.
fn on_large_stack(f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(f)
        .expect("failed to spawn test thread")
        .join()
        .expect("test thread panicked");
}

#[test]
fn test_deeply_nested_expressions() {
    on_large_stack(|| {
        let depth = 3000;
        for (open, close) in [("(", ")"), ("[", "]"), ("{", "}")] {
            let source = format!("{}1{}", open.repeat(depth), close.repeat(depth));
            let (unit, diagnostics) = parse(&source, "test.som");

            assert!(diagnostics.is_empty(), "{} nesting: {:?}", open, diagnostics);
            assert!(unit.result.is_some());

            let mut deepest = 0;
            for child in unit.get_children() {
                walk(child, 0, &mut |_, depth| deepest = deepest.max(depth));
            }
            assert!(deepest >= depth - 1, "{} nesting reached depth {}", open, deepest);
        }
    });
}

#[test]
fn test_deeply_nested_types_and_patterns() {
    on_large_stack(|| {
        let depth = 2000;
        let source = format!(
            "let {}a{}: {}i32{} = 1;",
            "(".repeat(depth),
            ")".repeat(depth),
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let (unit, diagnostics) = parse(&source, "test.som");

        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert!(matches!(&unit.items[0], Stmt::Let(l) if matches!(l.pattern, Pattern::Group(_)) && matches!(l.ty, Some(TypeExpr::Group(_)))));
    });
}

#[test]
fn test_deeply_nested_unclosed_parens_recover() {
    on_large_stack(|| {
        let source = "(".repeat(3000);
        let (unit, diagnostics) = parse(&source, "test.som");

        assert!(!diagnostics.is_empty());
        assert!(!unit.is_complete());
    });
}
