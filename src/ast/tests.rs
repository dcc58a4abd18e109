//! Unit tests for the syntax tree helpers.

use crate::{
    ast::{
        ast::{walk, Category, DeclType, ExprType, NodeRef, PatternType, StmtType, TypeType, Variant},
        expressions::Expr,
        statements::{DeclKind, ModifierKind, Stmt},
    },
    parse, parse_with_options, ParseOptions,
};

fn variants(source: &str) -> Vec<Variant> {
    let (unit, diagnostics) = parse(source, "test.som");
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);

    let mut out = vec![];
    for child in unit.get_children() {
        walk(child, 0, &mut |node, _| out.push(node.get_variant()));
    }
    out
}

#[test]
fn test_walk_visits_in_source_order() {
    assert_eq!(
        variants("let x: i32 = a + 1;"),
        vec![
            Variant::Stmt(StmtType::Let),
            Variant::Pattern(PatternType::Bind),
            Variant::Type(TypeType::Named),
            Variant::Expr(ExprType::Binary),
            Variant::Expr(ExprType::Path),
            Variant::Expr(ExprType::Literal),
        ]
    );
}

#[test]
fn test_walk_reaches_members() {
    let found = variants("class A { new() { } let n: i32; }");

    assert!(found.contains(&Variant::Decl(DeclType::Class)));
    assert!(found.contains(&Variant::Decl(DeclType::Constructor)));
    assert!(found.contains(&Variant::Decl(DeclType::Field)));
}

#[test]
fn test_variant_category() {
    assert_eq!(Variant::Expr(ExprType::Call).category(), Category::Expr);
    assert_eq!(Variant::Decl(DeclType::Enum).category(), Category::Decl);
    assert!(Variant::Pattern(PatternType::Error).is_error());
    assert!(!Variant::Stmt(StmtType::Empty).is_error());
}

#[test]
fn test_path_helpers() {
    let (unit, _) = parse("a::b::c", "test.som");

    match &unit.result {
        Some(Expr::Path(path)) => {
            assert_eq!(path.to_path_string(), "a::b::c");
            assert!(path.as_single_ident().is_none());
        }
        other => panic!("expected a path, got {:?}", other),
    }

    let (unit, _) = parse("a", "test.som");
    match &unit.result {
        Some(Expr::Path(path)) => {
            assert_eq!(path.as_single_ident().map(|ident| ident.name.as_str()), Some("a"));
        }
        other => panic!("expected a path, got {:?}", other),
    }
}

#[test]
fn test_decl_helpers() {
    let (unit, diagnostics) = parse_with_options(
        "public static func f() { }",
        "test.som",
        ParseOptions::library(),
    );
    assert!(diagnostics.is_empty());

    let Stmt::Decl(decl) = &unit.items[0] else {
        panic!("expected a declaration");
    };
    assert_eq!(decl.get_decl_type(), DeclType::Func);
    assert_eq!(decl.get_name().map(|name| name.name.as_str()), Some("f"));
    assert!(decl.has_modifier(ModifierKind::Public));
    assert!(decl.has_modifier(ModifierKind::Static));
    assert!(!decl.has_modifier(ModifierKind::Extern));
    assert!(matches!(decl.kind, DeclKind::Func(_)));
}

#[test]
fn test_node_spans_nest() {
    let source = "func f(a: i32) -> i32 {\n    let b = a * 2;\n    b + 1\n}\n";
    let (unit, diagnostics) = parse(source, "test.som");
    assert!(diagnostics.is_empty());

    fn check(node: NodeRef<'_>) {
        let span = node.get_span();
        let mut last = span.start.offset;
        for child in node.get_children() {
            let child_span = child.get_span();
            assert!(span.contains(&child_span), "{:?} escapes its parent", child.get_variant());
            assert!(child_span.start.offset >= last, "{:?} out of order", child.get_variant());
            last = child_span.start.offset;
            check(child);
        }
    }

    for child in unit.get_children() {
        assert!(unit.span.contains(&child.get_span()));
        check(child);
    }
}

#[test]
fn test_reconstruct() {
    let source = "// header\nfunc main() {\n    let x = 1; /* note */\n}\n";
    let (unit, _) = parse(source, "test.som");

    assert_eq!(unit.reconstruct(), source);
}

#[test]
fn test_dump_tree() {
    let (unit, _) = parse("x := 1;", "test.som");

    assert_eq!(
        unit.dump_tree(),
        "Stmt(Expr) 1:1..1:8\n  Expr(Assignment) 1:1..1:7\n    Expr(Path) 1:1..1:2\n    Expr(Literal) 1:6..1:7\n"
    );
}
