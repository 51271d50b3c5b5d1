use super::{
    expressions::{BinaryOp, Expr, UnaryOp},
    symbol::{Symbol, SymbolKind},
    types::{Param, Type},
};

#[test]
fn test_array_equality_ignores_size() {
    let small = Type::array(Type::Integer, Some(Expr::integer(3)));
    let large = Type::array(Type::Integer, Some(Expr::integer(300)));
    let unsized_array = Type::array(Type::Integer, None);
    let strings = Type::array(Type::String, Some(Expr::integer(3)));

    assert_eq!(small, large);
    assert_eq!(small, unsized_array);
    assert_ne!(small, strings);
}

#[test]
fn test_function_equality_ignores_params() {
    let unary = Type::function(Type::Integer, vec![Param::new("a", Type::Integer)]);
    let binary = Type::function(
        Type::Integer,
        vec![Param::new("a", Type::String), Param::new("b", Type::Boolean)],
    );
    let returns_void = Type::function(Type::Void, vec![]);

    assert_eq!(unary, binary);
    assert_ne!(unary, returns_void);
    assert!(!unary.signature_matches(&binary));
    assert!(unary.signature_matches(&Type::function(
        Type::Integer,
        vec![Param::new("renamed", Type::Integer)]
    )));
}

#[test]
fn test_kind_mismatch() {
    assert_ne!(Type::Integer, Type::Character);
    assert_ne!(Type::Boolean, Type::Integer);
    assert_ne!(Type::array(Type::Integer, None), Type::Integer);
    assert_eq!(Type::Void, Type::Void);
}

#[test]
fn test_type_display() {
    let function = Type::function(
        Type::Boolean,
        vec![
            Param::new("x", Type::Integer),
            Param::new("s", Type::array(Type::Character, None)),
        ],
    );

    assert_eq!(
        function.to_string(),
        "function boolean (x: integer, s: array [] char)"
    );
    assert_eq!(
        Type::array(Type::String, Some(Expr::integer(4))).to_string(),
        "array [4] string"
    );
}

#[test]
fn test_symbol_display() {
    let global = Symbol::new(SymbolKind::Global, 0, "x".to_string(), Type::Integer);
    let local = Symbol::new(SymbolKind::Local, 3, "y".to_string(), Type::Integer);
    let param = Symbol::new(SymbolKind::Param, 1, "z".to_string(), Type::String);

    assert_eq!(global.to_string(), "global x");
    assert_eq!(local.to_string(), "local 3");
    assert_eq!(param.to_string(), "param 1");
}

#[test]
fn test_function_symbol_counts_params() {
    let symbol = Symbol::new(
        SymbolKind::Global,
        0,
        "f".to_string(),
        Type::function(
            Type::Void,
            vec![Param::new("a", Type::Integer), Param::new("b", Type::Integer)],
        ),
    );

    assert!(symbol.is_function());
    assert_eq!(symbol.param_count, 2);
    assert_eq!(symbol.local_count, 0);
}

#[test]
fn test_expression_display_parenthesizes() {
    let sum = Expr::binary(BinaryOp::Add, Expr::name("a"), Expr::name("b"));
    let product = Expr::binary(BinaryOp::Mul, sum.clone(), Expr::name("c"));
    assert_eq!(product.to_string(), "(a + b) * c");

    let nested = Expr::binary(
        BinaryOp::Sub,
        Expr::name("a"),
        Expr::binary(BinaryOp::Sub, Expr::name("b"), Expr::name("c")),
    );
    assert_eq!(nested.to_string(), "a - (b - c)");

    let negated = Expr::unary(UnaryOp::Neg, Expr::unary(UnaryOp::Neg, Expr::name("x")));
    assert_eq!(negated.to_string(), "-(-x)");

    let call = Expr::call("f", vec![Expr::integer(1), Expr::string("hi\n")]);
    assert_eq!(call.to_string(), "f(1, \"hi\\n\")");

    let increment = Expr::unary(UnaryOp::Inc, Expr::name("i"));
    assert_eq!(increment.to_string(), "i++");
}

#[test]
fn test_constants() {
    assert!(Expr::integer(4).is_constant());
    assert!(Expr::string("s").is_constant());
    assert!(Expr::unary(UnaryOp::Neg, Expr::integer(4)).is_constant());
    assert!(!Expr::name("y").is_constant());
    assert!(!Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(2)).is_constant());

    assert_eq!(
        Expr::unary(UnaryOp::Neg, Expr::integer(4)).integer_constant(),
        Some(-4)
    );
    assert_eq!(Expr::boolean(true).constant_word(), Some(1));
    assert_eq!(Expr::character(b'A').constant_word(), Some(65));
    assert_eq!(Expr::character(b'A').integer_constant(), None);
}

#[test]
fn test_lvalues() {
    assert!(Expr::name("x").is_lvalue());
    assert!(Expr::index(Expr::name("a"), Expr::integer(0)).is_lvalue());
    assert!(!Expr::integer(3).is_lvalue());
    assert!(!Expr::call("f", vec![]).is_lvalue());
}
