use std::collections::HashMap;

use log::debug;

use crate::{
    ast::{
        ast::{Decl, Initializer, Program},
        expressions::{BinaryOp, Expr, ExprKind, UnaryOp},
        statements::Stmt,
        symbol::SymbolKind,
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

#[derive(Debug, Default)]
pub struct TypeChecker {
    errors: Vec<Error>,
    /// Global function types seen so far, for prototype agreement.
    functions: HashMap<String, Type>,
    /// How many function bodies enclose the current node.
    function_depth: usize,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    fn error(&mut self, error: ErrorImpl, position: Position) {
        let error = Error::new(error, position);
        debug!("{}", error);
        self.errors.push(error);
    }

    pub fn check_program(&mut self, program: &Program) {
        debug!("type checking {} declarations", program.declarations.len());

        for decl in &program.declarations {
            self.check_decl(decl);
        }

        debug!("type checking finished with {} error(s)", self.error_count());
    }

    pub fn check_decl(&mut self, decl: &Decl) {
        let position = decl.span.start.clone();
        let is_global = match &decl.symbol {
            Some(symbol) => symbol.borrow().kind == SymbolKind::Global,
            None => self.function_depth == 0,
        };

        if decl.declared_type == Type::Void {
            self.error(
                ErrorImpl::VoidDeclaration {
                    name: decl.name.clone(),
                },
                position.clone(),
            );
        }
        self.check_type(&decl.name, &decl.declared_type, false, &position);

        if decl.declared_type.is_function() {
            if !is_global {
                self.error(
                    ErrorImpl::NestedFunction {
                        name: decl.name.clone(),
                    },
                    position.clone(),
                );
            } else if let Some(previous) = self.functions.get(&decl.name) {
                if !decl.declared_type.signature_matches(previous) {
                    let previous = previous.to_string();
                    self.error(
                        ErrorImpl::ConflictingDeclaration {
                            name: decl.name.clone(),
                            declared: decl.declared_type.to_string(),
                            previous,
                        },
                        position.clone(),
                    );
                }
            } else {
                self.functions
                    .insert(decl.name.clone(), decl.declared_type.clone());
            }
        }

        if let Some(initializer) = &decl.initializer {
            self.check_initializer(decl, initializer, is_global);
        }

        if let Some(body) = &decl.body {
            let return_type = decl
                .declared_type
                .return_type()
                .cloned()
                .unwrap_or(Type::Void);

            self.function_depth += 1;
            self.check_stmt(body, &return_type);
            self.function_depth -= 1;
        }
    }

    fn check_initializer(&mut self, decl: &Decl, initializer: &Initializer, is_global: bool) {
        let position = initializer.span().start.clone();

        if is_global && !initializer.is_constant() {
            // Reported once; the value's type is not checked as well.
            self.error(
                ErrorImpl::NonConstantGlobalInitializer {
                    name: decl.name.clone(),
                },
                position,
            );
            return;
        }

        match initializer {
            Initializer::Expr(expr) => {
                let received = self.check_expr(expr);
                if !decl.declared_type.is_array() && received != decl.declared_type {
                    self.error(
                        ErrorImpl::TypeMatchError {
                            expected: decl.declared_type.to_string(),
                            received: received.to_string(),
                        },
                        position,
                    );
                }
            }
            Initializer::List(items, _) => {
                if decl.declared_type.is_array() {
                    self.check_array_initializer(&decl.name, items, &decl.declared_type, &position);
                } else {
                    self.error(
                        ErrorImpl::TypeMatchError {
                            expected: decl.declared_type.to_string(),
                            received: String::from("an initializer list"),
                        },
                        position,
                    );
                }
            }
        }
    }

    fn check_array_initializer(
        &mut self,
        name: &str,
        items: &[Initializer],
        array_type: &Type,
        position: &Position,
    ) {
        let (element, size) = match array_type {
            Type::Array { element, size } => (element.as_ref(), size),
            _ => return,
        };

        if let Some(expected) = size.as_ref().and_then(|size| size.integer_constant()) {
            if expected != items.len() as i64 {
                self.error(
                    ErrorImpl::ArrayInitializerLength {
                        name: name.to_string(),
                        expected,
                        received: items.len(),
                    },
                    position.clone(),
                );
            }
        }

        for item in items {
            match item {
                Initializer::Expr(expr) => {
                    let received = self.check_expr(expr);
                    if received != *element {
                        self.error(
                            ErrorImpl::TypeMatchError {
                                expected: element.to_string(),
                                received: received.to_string(),
                            },
                            expr.span.start.clone(),
                        );
                    }
                }
                Initializer::List(inner, span) if element.is_array() => {
                    self.check_array_initializer(name, inner, element, &span.start);
                }
                Initializer::List(_, span) => {
                    self.error(
                        ErrorImpl::TypeMatchError {
                            expected: element.to_string(),
                            received: String::from("an initializer list"),
                        },
                        span.start.clone(),
                    );
                }
            }
        }
    }

    /// Validates the shape of a declared type. Parameters may leave array
    /// sizes out; everything else must give a positive literal size.
    fn check_type(&mut self, name: &str, declared: &Type, is_param: bool, position: &Position) {
        match declared {
            Type::Array { element, size } => {
                match size {
                    None if !is_param => self.error(
                        ErrorImpl::MissingArraySize {
                            name: name.to_string(),
                        },
                        position.clone(),
                    ),
                    None => {}
                    Some(size) => match size.integer_constant() {
                        None => self.error(
                            ErrorImpl::NonConstantArraySize {
                                name: name.to_string(),
                            },
                            size.span.start.clone(),
                        ),
                        Some(value) if value <= 0 => self.error(
                            ErrorImpl::NonPositiveArraySize {
                                name: name.to_string(),
                                size: value,
                            },
                            size.span.start.clone(),
                        ),
                        Some(_) => {}
                    },
                }

                if matches!(**element, Type::Void | Type::Function { .. }) {
                    self.error(
                        ErrorImpl::InvalidArrayElement {
                            element: element.to_string(),
                        },
                        position.clone(),
                    );
                }
                self.check_type(name, element, is_param, position);
            }
            Type::Function {
                return_type,
                params,
            } => {
                if return_type.is_array() || return_type.is_function() {
                    self.error(
                        ErrorImpl::InvalidReturnType {
                            return_type: return_type.to_string(),
                        },
                        position.clone(),
                    );
                }

                for param in params {
                    if param.param_type == Type::Void {
                        self.error(
                            ErrorImpl::VoidDeclaration {
                                name: param.name.clone(),
                            },
                            param.span.start.clone(),
                        );
                    }
                    self.check_type(&param.name, &param.param_type, true, &param.span.start);
                }
            }
            _ => {}
        }
    }

    pub fn check_stmt(&mut self, stmt: &Stmt, return_type: &Type) {
        match stmt {
            Stmt::Decl(decl) => self.check_decl(decl),
            Stmt::Expr(expr) => {
                self.check_expr(expr);
            }
            Stmt::IfElse {
                condition,
                then_body,
                else_body,
            } => {
                self.check_condition("if", condition);
                self.check_stmt(then_body, return_type);
                if let Some(else_body) = else_body {
                    self.check_stmt(else_body, return_type);
                }
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
            } => {
                if let Some(init) = init {
                    self.check_expr(init);
                }
                if let Some(condition) = condition {
                    self.check_condition("for", condition);
                }
                if let Some(step) = step {
                    self.check_expr(step);
                }
                self.check_stmt(body, return_type);
            }
            Stmt::Print(arguments) => {
                for argument in arguments {
                    let received = self.check_expr(argument);
                    if !received.is_printable() {
                        self.error(
                            ErrorImpl::NotPrintable {
                                received: received.to_string(),
                            },
                            argument.span.start.clone(),
                        );
                    }
                }
            }
            Stmt::Return { value, span } => match value {
                Some(value) => {
                    let received = self.check_expr(value);
                    if received != *return_type {
                        self.error(
                            ErrorImpl::ReturnTypeMismatch {
                                expected: return_type.to_string(),
                                received: received.to_string(),
                            },
                            value.span.start.clone(),
                        );
                    }
                }
                None if *return_type != Type::Void => self.error(
                    ErrorImpl::MissingReturnValue {
                        expected: return_type.to_string(),
                    },
                    span.start.clone(),
                ),
                None => {}
            },
            Stmt::Block(statements) => {
                for statement in statements {
                    self.check_stmt(statement, return_type);
                }
            }
            Stmt::Empty => {}
        }
    }

    fn check_condition(&mut self, statement: &str, condition: &Expr) {
        let received = self.check_expr(condition);
        if received != Type::Boolean {
            self.error(
                ErrorImpl::ConditionNotBoolean {
                    statement: statement.to_string(),
                    received: received.to_string(),
                },
                condition.span.start.clone(),
            );
        }
    }

    /// Computes the type of `expr`, recording a diagnostic for every violation
    /// and substituting the operator's result type so checking can go on.
    pub fn check_expr(&mut self, expr: &Expr) -> Type {
        let position = expr.span.start.clone();

        match &expr.kind {
            ExprKind::Name { symbol, .. } => symbol
                .as_ref()
                .map(|symbol| symbol.borrow().symbol_type.clone())
                .unwrap_or(Type::Void),
            ExprKind::BooleanLiteral(_) => Type::Boolean,
            ExprKind::IntegerLiteral(_) => Type::Integer,
            ExprKind::CharacterLiteral(_) => Type::Character,
            ExprKind::StringLiteral(_) => Type::String,
            ExprKind::Assign { target, value } => {
                let target_type = self.check_expr(target);
                let value_type = self.check_expr(value);

                if !target.is_lvalue() || target_type.is_function() {
                    self.error(
                        ErrorImpl::NotAnLvalue {
                            expression: target.to_string(),
                        },
                        target.span.start.clone(),
                    );
                } else if target_type != value_type {
                    self.error(
                        ErrorImpl::TypeMatchError {
                            expected: target_type.to_string(),
                            received: value_type.to_string(),
                        },
                        value.span.start.clone(),
                    );
                }

                value_type
            }
            ExprKind::Binary {
                operator,
                left,
                right,
            } => {
                let left_type = self.check_expr(left);
                let right_type = self.check_expr(right);
                self.check_binary(*operator, left_type, right_type, position)
            }
            ExprKind::Unary { operator, operand } => {
                let operand_type = self.check_expr(operand);

                let (expected, result) = match operator {
                    UnaryOp::Not => (Type::Boolean, Type::Boolean),
                    UnaryOp::Neg | UnaryOp::Inc | UnaryOp::Dec => (Type::Integer, Type::Integer),
                };

                if operator.is_postfix() && !operand.is_lvalue() {
                    self.error(
                        ErrorImpl::NotAnLvalue {
                            expression: operand.to_string(),
                        },
                        operand.span.start.clone(),
                    );
                }
                if operand_type != expected {
                    self.error(
                        ErrorImpl::InvalidOperand {
                            operator: operator.symbol().to_string(),
                            expected: expected.to_string(),
                            received: operand_type.to_string(),
                        },
                        position,
                    );
                }

                result
            }
            ExprKind::Call { callee, arguments } => self.check_call(callee, arguments, position),
            ExprKind::Index { base, index } => {
                let base_type = self.check_expr(base);
                let index_type = self.check_expr(index);

                if index_type != Type::Integer {
                    self.error(
                        ErrorImpl::InvalidSubscript {
                            received: index_type.to_string(),
                        },
                        index.span.start.clone(),
                    );
                }

                match base_type {
                    Type::Array { element, .. } => *element,
                    other => {
                        self.error(
                            ErrorImpl::NotIndexable {
                                received: other.to_string(),
                            },
                            base.span.start.clone(),
                        );
                        index_type
                    }
                }
            }
        }
    }

    fn check_binary(
        &mut self,
        operator: BinaryOp,
        left: Type,
        right: Type,
        position: Position,
    ) -> Type {
        if operator.is_equality() {
            if left != right || left.is_array() || left.is_function() {
                self.error(
                    ErrorImpl::NotComparable {
                        left: left.to_string(),
                        right: right.to_string(),
                    },
                    position,
                );
            }
            return Type::Boolean;
        }

        let (operand, result) = if operator.is_logical() {
            (Type::Boolean, Type::Boolean)
        } else if operator.is_ordering() {
            (Type::Integer, Type::Boolean)
        } else {
            (Type::Integer, Type::Integer)
        };

        if left != operand || right != operand {
            self.error(
                ErrorImpl::InvalidOperands {
                    operator: operator.symbol().to_string(),
                    expected: operand.to_string(),
                    left: left.to_string(),
                    right: right.to_string(),
                },
                position,
            );
        }

        result
    }

    fn check_call(&mut self, callee: &Expr, arguments: &[Expr], position: Position) -> Type {
        let argument_types: Vec<Type> = arguments.iter().map(|a| self.check_expr(a)).collect();

        let function_type = callee
            .symbol()
            .map(|symbol| symbol.borrow().symbol_type.clone())
            .filter(Type::is_function);

        let function_type = match function_type {
            Some(function_type) => function_type,
            None => {
                self.error(
                    ErrorImpl::NotCallable {
                        name: callee.to_string(),
                    },
                    position,
                );
                return Type::Void;
            }
        };

        let params = function_type.params();
        if params.len() != arguments.len() {
            self.error(
                ErrorImpl::ArgumentCount {
                    function: callee.to_string(),
                    expected: params.len(),
                    received: arguments.len(),
                },
                position,
            );
        }

        for (i, (param, received)) in params.iter().zip(&argument_types).enumerate() {
            if param.param_type != *received {
                self.error(
                    ErrorImpl::ArgumentTypeMatchError {
                        function: callee.to_string(),
                        position: i + 1,
                        expected: param.param_type.to_string(),
                        received: received.to_string(),
                    },
                    arguments[i].span.start.clone(),
                );
            }
        }

        function_type.return_type().cloned().unwrap_or(Type::Void)
    }
}

/// Type checks a resolved program, returning the pass with its diagnostics.
pub fn type_check(program: &Program) -> TypeChecker {
    let mut checker = TypeChecker::new();
    checker.check_program(program);
    checker
}

/// The type of `expr`, recomputed from scratch with diagnostics discarded.
pub fn expr_type(expr: &Expr) -> Type {
    TypeChecker::new().check_expr(expr)
}
