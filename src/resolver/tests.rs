use std::rc::Rc;

use super::{resolver::resolve, scope::ScopeStack};
use crate::{
    ast::{
        ast::{Decl, Initializer, Program},
        expressions::{Expr, ExprKind},
        statements::Stmt,
        symbol::{Symbol, SymbolKind, SymbolRef},
        types::{Param, Type},
    },
    parse_source,
};

fn symbol(name: &str) -> SymbolRef {
    Symbol::new(SymbolKind::Global, 0, name.to_string(), Type::Integer).into_ref()
}

fn body_of(decl: &Decl) -> &Vec<Stmt> {
    match &decl.body {
        Some(Stmt::Block(statements)) => statements,
        other => panic!("Expected block body, found {:?}", other),
    }
}

fn returned_symbol(stmt: &Stmt) -> SymbolRef {
    match stmt {
        Stmt::Return {
            value: Some(expr), ..
        } => expr.symbol().expect("name was not resolved"),
        other => panic!("Expected return of a name, found {:?}", other),
    }
}

#[test]
fn test_scope_lookup_walks_outwards() {
    let mut scopes = ScopeStack::new();
    let outer = symbol("x");
    scopes.bind("x", outer.clone());

    scopes.enter();
    assert_eq!(scopes.depth(), 2);
    assert!(Rc::ptr_eq(&scopes.lookup("x").unwrap(), &outer));
    assert!(scopes.lookup_current("x").is_none());

    let inner = symbol("x");
    scopes.bind("x", inner.clone());
    assert!(Rc::ptr_eq(&scopes.lookup("x").unwrap(), &inner));

    scopes.exit();
    assert!(Rc::ptr_eq(&scopes.lookup("x").unwrap(), &outer));
    assert!(scopes.lookup("y").is_none());
}

#[test]
fn test_bind_overwrites_in_current_scope() {
    let mut scopes = ScopeStack::new();
    let first = symbol("x");
    let second = symbol("x");

    scopes.bind("x", first);
    scopes.bind("x", second.clone());

    assert!(Rc::ptr_eq(&scopes.lookup_current("x").unwrap(), &second));
}

#[test]
#[should_panic]
fn test_exit_global_scope_panics() {
    let mut scopes = ScopeStack::new();
    scopes.exit();
}

#[test]
fn test_well_formed_program_binds_every_name() {
    let mut program = parse_source(
        r#"
        x: integer = 3;
        add: function integer (a: integer, b: integer) = {
            c: integer = a + b;
            return c + x;
        }
        "#,
        "test.cminor",
    )
    .unwrap();

    let resolver = resolve(&mut program);
    assert_eq!(resolver.error_count(), 0);

    let add = &program.declarations[1];
    let add_symbol = add.symbol.as_ref().unwrap().borrow();
    assert_eq!(add_symbol.kind, SymbolKind::Global);
    assert_eq!(add_symbol.param_count, 2);
    assert_eq!(add_symbol.local_count, 1);
    assert!(!add_symbol.is_prototype_only);

    let trace: Vec<String> = resolver
        .resolutions()
        .iter()
        .map(|(name, symbol)| format!("{} resolves to {}", name, symbol.borrow()))
        .collect();
    assert_eq!(
        trace,
        vec![
            "a resolves to param 0",
            "b resolves to param 1",
            "c resolves to local 0",
            "x resolves to global x",
        ]
    );
}

#[test]
fn test_redeclaration_is_one_error() {
    let mut program = parse_source("x: integer; x: string;", "test.cminor").unwrap();
    let resolver = resolve(&mut program);

    assert_eq!(resolver.error_count(), 1);
    assert_eq!(resolver.errors()[0].get_error_name(), "DuplicateDeclaration");
    assert!(resolver.errors()[0].to_string().contains("integer"));
    assert!(resolver.errors()[0].to_string().contains("string"));

    // The duplicate keeps the first symbol
    assert!(Rc::ptr_eq(
        program.declarations[0].symbol.as_ref().unwrap(),
        program.declarations[1].symbol.as_ref().unwrap()
    ));
}

#[test]
fn test_prototype_then_definition() {
    let mut program = parse_source(
        r#"
        square: function integer (n: integer);
        main: function integer () = { return square(4); }
        square: function integer (n: integer) = { m: integer = n * n; return m; }
        "#,
        "test.cminor",
    )
    .unwrap();

    assert!(program.declarations[0].symbol.is_none());

    let resolver = resolve(&mut program);
    assert_eq!(resolver.error_count(), 0);

    let prototype = program.declarations[0].symbol.as_ref().unwrap();
    let definition = program.declarations[2].symbol.as_ref().unwrap();
    assert!(Rc::ptr_eq(prototype, definition));

    let symbol = definition.borrow();
    assert!(!symbol.is_prototype_only);
    assert_eq!(symbol.local_count, 1);
    assert_eq!(symbol.param_count, 1);
}

#[test]
fn test_prototype_only_function() {
    let mut program = parse_source("f: function void ();", "test.cminor").unwrap();
    resolve(&mut program);

    assert!(program.declarations[0]
        .symbol
        .as_ref()
        .unwrap()
        .borrow()
        .is_prototype_only);
}

#[test]
fn test_second_prototype_is_a_duplicate() {
    let mut program = parse_source(
        "f: function void (a: integer); f: function void (a: integer);",
        "test.cminor",
    )
    .unwrap();
    let resolver = resolve(&mut program);

    assert_eq!(resolver.error_count(), 1);
    assert_eq!(resolver.errors()[0].get_error_name(), "DuplicateDeclaration");

    let symbol = program.declarations[0].symbol.as_ref().unwrap();
    assert!(symbol.borrow().is_prototype_only);
}

#[test]
fn test_function_redefinition_is_an_error() {
    let mut program = parse_source(
        "f: function void () = { } f: function void () = { }",
        "test.cminor",
    )
    .unwrap();

    assert_eq!(resolve(&mut program).error_count(), 1);
}

#[test]
fn test_shadowing_binds_inner_symbol() {
    let mut program = parse_source(
        r#"
        x: integer = 1;
        f: function integer () = {
            x: integer = 2;
            {
                x: integer = 3;
                return x;
            }
            return x;
        }
        "#,
        "test.cminor",
    )
    .unwrap();

    let resolver = resolve(&mut program);
    assert_eq!(resolver.error_count(), 0);

    let statements = body_of(&program.declarations[1]);
    let outer_local = match &statements[0] {
        Stmt::Decl(decl) => decl.symbol.clone().unwrap(),
        other => panic!("Expected declaration, found {:?}", other),
    };
    let inner_block = match &statements[1] {
        Stmt::Block(statements) => statements,
        other => panic!("Expected block, found {:?}", other),
    };

    let inner = returned_symbol(&inner_block[1]);
    assert_eq!(inner.borrow().kind, SymbolKind::Local);
    assert_eq!(inner.borrow().which, 1);

    let outer = returned_symbol(&statements[2]);
    assert!(Rc::ptr_eq(&outer, &outer_local));
    assert_eq!(outer.borrow().which, 0);

    let function = program.declarations[1].symbol.as_ref().unwrap().borrow();
    assert_eq!(function.local_count, 2);
}

#[test]
fn test_undefined_names() {
    let mut program = parse_source(
        "f: function integer () = { y = z; return g(w); }",
        "test.cminor",
    )
    .unwrap();

    let resolver = resolve(&mut program);
    let names: Vec<String> = resolver
        .errors()
        .iter()
        .map(|error| error.to_string())
        .collect();

    assert_eq!(resolver.error_count(), 4);
    assert!(names.iter().all(|name| name.starts_with("name error:")));
    assert!(names[0].contains("y is not declared"));
}

#[test]
fn test_unresolved_name_keeps_no_symbol() {
    let mut program = Program::new(vec![
        Decl::new("f", Type::function(Type::Integer, vec![]))
            .with_body(vec![Stmt::return_value(Some(Expr::name("missing")))]),
    ]);

    assert_eq!(resolve(&mut program).error_count(), 1);

    let statements = body_of(&program.declarations[0]);
    match &statements[0] {
        Stmt::Return {
            value: Some(expr), ..
        } => assert!(matches!(expr.kind, ExprKind::Name { symbol: None, .. })),
        other => panic!("Expected return, found {:?}", other),
    }
}

#[test]
fn test_duplicate_parameter() {
    let mut program = Program::new(vec![Decl::new(
        "f",
        Type::function(
            Type::Void,
            vec![Param::new("a", Type::Integer), Param::new("a", Type::Integer)],
        ),
    )]);

    let resolver = resolve(&mut program);
    assert_eq!(resolver.error_count(), 1);
    assert_eq!(resolver.errors()[0].get_error_name(), "DuplicateParameter");
}

#[test]
fn test_initializer_resolved_in_declaring_scope() {
    let mut program = Program::new(vec![
        Decl::new("a", Type::Integer).with_initializer(Expr::integer(1)),
        Decl::new("b", Type::array(Type::Integer, Some(Expr::integer(1)))),
    ]);
    program.declarations[1].initializer = Some(Initializer::List(
        vec![Initializer::Expr(Expr::name("a"))],
        crate::Span::null(),
    ));

    let resolver = resolve(&mut program);
    assert_eq!(resolver.error_count(), 0);
    assert_eq!(resolver.resolutions().len(), 1);
}
