use super::type_checker::{expr_type, type_check, TypeChecker};
use crate::{
    ast::{
        ast::Program,
        expressions::{BinaryOp, Expr, UnaryOp},
        types::Type,
    },
    errors::errors::Error,
    parse_source,
    resolver::resolver::resolve,
};

fn resolved(source: &str) -> Program {
    let mut program = parse_source(source, "test.cminor").unwrap();
    let resolver = resolve(&mut program);
    assert_eq!(resolver.error_count(), 0, "{:?}", resolver.errors());
    program
}

fn type_errors(source: &str) -> Vec<Error> {
    type_check(&resolved(source)).into_errors()
}

fn error_names(source: &str) -> Vec<String> {
    type_errors(source)
        .iter()
        .map(|error| error.get_error_name().to_string())
        .collect()
}

#[test]
fn test_integer_addition() {
    let mut checker = TypeChecker::new();
    let sum = Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(2));

    assert_eq!(checker.check_expr(&sum), Type::Integer);
    assert_eq!(checker.error_count(), 0);
}

#[test]
fn test_boolean_plus_integer() {
    let mut checker = TypeChecker::new();
    let sum = Expr::binary(BinaryOp::Add, Expr::boolean(true), Expr::integer(1));

    assert_eq!(checker.check_expr(&sum), Type::Integer);
    assert_eq!(checker.error_count(), 1);
    assert_eq!(checker.errors()[0].to_string(),
        "type error: operator + expects integer operands, found boolean and integer");
}

#[test]
fn test_expression_types() {
    assert_eq!(
        expr_type(&Expr::binary(BinaryOp::Lt, Expr::integer(1), Expr::integer(2))),
        Type::Boolean
    );
    assert_eq!(
        expr_type(&Expr::binary(BinaryOp::Eq, Expr::string("a"), Expr::string("b"))),
        Type::Boolean
    );
    assert_eq!(
        expr_type(&Expr::unary(UnaryOp::Not, Expr::boolean(false))),
        Type::Boolean
    );
    assert_eq!(expr_type(&Expr::character(b'c')), Type::Character);
    // Unresolved names have no type to offer
    assert_eq!(expr_type(&Expr::name("nobody")), Type::Void);
}

#[test]
fn test_comparing_different_kinds() {
    let mut checker = TypeChecker::new();
    let comparison = Expr::binary(BinaryOp::Eq, Expr::integer(1), Expr::character(b'1'));

    assert_eq!(checker.check_expr(&comparison), Type::Boolean);
    assert_eq!(checker.errors()[0].get_error_name(), "NotComparable");
}

#[test]
fn test_global_initialized_from_variable() {
    let errors = type_errors("y: integer = 1; x: integer = y;");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "NonConstantGlobalInitializer");
}

#[test]
fn test_global_negative_constant() {
    assert!(type_errors("x: integer = -5;").is_empty());
}

#[test]
fn test_initializer_type_mismatch() {
    assert_eq!(error_names("x: integer = \"five\";"), vec!["TypeMatchError"]);
    assert_eq!(
        error_names("f: function void () = { s: string = 'c'; }"),
        vec!["TypeMatchError"]
    );
}

#[test]
fn test_void_variable() {
    assert_eq!(error_names("v: void;"), vec!["VoidDeclaration"]);
    assert_eq!(
        error_names("f: function void (v: void);"),
        vec!["VoidDeclaration"]
    );
}

#[test]
fn test_array_declarations() {
    assert!(type_errors("a: array [3] integer = {1, 2, 3};").is_empty());
    assert_eq!(error_names("a: array [] integer;"), vec!["MissingArraySize"]);
    assert_eq!(error_names("a: array [0] integer;"), vec!["NonPositiveArraySize"]);
    assert_eq!(error_names("a: array [-2] integer;"), vec!["NonPositiveArraySize"]);
    assert_eq!(
        error_names("n: integer = 2; a: array [n] integer;"),
        vec!["NonConstantArraySize"]
    );
    assert_eq!(error_names("a: array [2] void;"), vec!["InvalidArrayElement"]);
    assert_eq!(
        error_names("a: array [2] integer = {1, 2, 3};"),
        vec!["ArrayInitializerLength"]
    );
    assert_eq!(
        error_names("a: array [2] integer = {1, true};"),
        vec!["TypeMatchError"]
    );
}

#[test]
fn test_nested_array_initializer() {
    assert!(type_errors("m: array [2] array [2] integer = {{1, 2}, {3, 4}};").is_empty());
    assert_eq!(
        error_names("m: array [2] array [2] integer = {{1, 2}, {3}};"),
        vec!["ArrayInitializerLength"]
    );
}

#[test]
fn test_array_parameters_may_omit_size() {
    let source = r#"
        sum: function integer (a: array [] integer, n: integer) = {
            return a[0] + a[n];
        }
    "#;
    assert!(type_errors(source).is_empty());
}

#[test]
fn test_indexing() {
    assert_eq!(
        error_names("f: function void (s: string) = { s[0] = 'c'; }"),
        vec!["NotIndexable", "TypeMatchError"]
    );
    assert_eq!(
        error_names("f: function void (a: array [] integer) = { a[true] = 1; }"),
        vec!["InvalidSubscript"]
    );
}

#[test]
fn test_invalid_return_type() {
    assert_eq!(
        error_names("f: function array [2] integer ();"),
        vec!["InvalidReturnType"]
    );
}

#[test]
fn test_calls() {
    let source = r#"
        f: function integer (a: integer, b: string);
        g: function void () = {
            x: integer = f(1, "s");
            x = f(1);
            x = f("s", "t");
            x();
        }
    "#;

    assert_eq!(
        error_names(source),
        vec!["ArgumentCount", "ArgumentTypeMatchError", "NotCallable"]
    );
}

#[test]
fn test_assignment_checks() {
    assert_eq!(
        error_names("f: function void () = { x: integer; x = \"s\"; }"),
        vec!["TypeMatchError"]
    );
    assert_eq!(
        error_names("f: function void () = { x: integer; 3 = x; }"),
        vec!["NotAnLvalue"]
    );
    assert_eq!(
        error_names("g: function void (); f: function void () = { g = g; }"),
        vec!["NotAnLvalue"]
    );
}

#[test]
fn test_increment_checks() {
    assert!(type_errors("f: function void () = { i: integer; i++; i--; }").is_empty());
    assert_eq!(
        error_names("f: function void () = { b: boolean; b++; }"),
        vec!["InvalidOperand"]
    );
    assert_eq!(
        error_names("f: function void () = { b: boolean; (b && b)--; }"),
        vec!["NotAnLvalue", "InvalidOperand"]
    );
}

#[test]
fn test_conditions_must_be_boolean() {
    let source = r#"
        f: function void () = {
            i: integer;
            if (i) print i;
            for (i = 0; i; i++) ;
            for (;;) return;
        }
    "#;

    assert_eq!(
        error_names(source),
        vec!["ConditionNotBoolean", "ConditionNotBoolean"]
    );
}

#[test]
fn test_print_rejects_unprintable_values() {
    let source = r#"
        g: function void ();
        f: function void (a: array [] integer) = {
            print 1, true, 'c', "s";
            print a, g;
        }
    "#;

    assert_eq!(error_names(source), vec!["NotPrintable", "NotPrintable"]);
}

#[test]
fn test_return_checks() {
    assert!(type_errors("f: function integer () = { return 1; }").is_empty());
    assert!(type_errors("f: function void () = { return; }").is_empty());
    assert_eq!(
        error_names("f: function integer () = { return true; }"),
        vec!["ReturnTypeMismatch"]
    );
    assert_eq!(
        error_names("f: function integer () = { return; }"),
        vec!["MissingReturnValue"]
    );
}

#[test]
fn test_prototype_must_match_definition() {
    assert!(type_errors(
        "f: function integer (a: integer); f: function integer (b: integer) = { return b; }"
    )
    .is_empty());

    assert_eq!(
        error_names(
            "f: function integer (a: integer); f: function integer (a: string) = { return 1; }"
        ),
        vec!["ConflictingDeclaration"]
    );
}

#[test]
fn test_nested_function() {
    assert_eq!(
        error_names("f: function void () = { g: function void (); }"),
        vec!["NestedFunction"]
    );
}

#[test]
fn test_errors_accumulate() {
    let source = r#"
        f: function integer () = {
            a: integer = true;
            b: boolean = 1 < "two";
            return 'c';
        }
    "#;

    let errors = type_errors(source);
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|error| error.to_string().starts_with("type error:")));
}
