//! The name resolution pass.
//!
//! Walks a program in source order, creating a [`Symbol`] for every
//! declaration and attaching it to the declaration and to every name that
//! refers to it. Problems are collected rather than returned, so a single
//! run reports every duplicate and undefined name in the program.

use std::mem;

use log::{debug, trace};

use crate::{
    ast::{
        ast::{Decl, Initializer, Program},
        expressions::{Expr, ExprKind},
        statements::Stmt,
        symbol::{Symbol, SymbolKind, SymbolRef},
        types::{Param, Type},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::scope::ScopeStack;

pub struct Resolver {
    scopes: ScopeStack,
    errors: Vec<Error>,
    resolutions: Vec<(String, SymbolRef)>,
    /// Next free local slot of the function being resolved.
    next_local: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            scopes: ScopeStack::new(),
            errors: vec![],
            resolutions: vec![],
            next_local: 0,
        }
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

    /// Every successful lookup, in the order it happened.
    pub fn resolutions(&self) -> &[(String, SymbolRef)] {
        &self.resolutions
    }

    fn error(&mut self, error: ErrorImpl, position: Position) {
        let error = Error::new(error, position);
        debug!("{}", error);
        self.errors.push(error);
    }

    pub fn resolve_program(&mut self, program: &mut Program) {
        debug!("resolving {} declarations", program.declarations.len());

        for decl in program.declarations.iter_mut() {
            self.resolve_decl(decl);
        }

        debug!("name resolution finished with {} error(s)", self.error_count());
    }

    pub fn resolve_decl(&mut self, decl: &mut Decl) {
        self.resolve_type(&mut decl.declared_type);

        match self.scopes.lookup_current(&decl.name) {
            Some(existing)
                if existing.borrow().is_prototype_only
                    && decl.declared_type.is_function()
                    && decl.body.is_some() =>
            {
                trace!("{} completes an earlier prototype", decl.name);
                decl.symbol = Some(existing.clone());

                let local_count = self.resolve_function_scope(decl);
                let mut symbol = existing.borrow_mut();
                symbol.is_prototype_only = false;
                symbol.local_count = local_count;
                symbol.param_count = decl.declared_type.params().len();
                symbol.symbol_type = decl.declared_type.clone();
            }
            Some(existing) => {
                let previous = existing.borrow().symbol_type.to_string();
                self.error(
                    ErrorImpl::DuplicateDeclaration {
                        name: decl.name.clone(),
                        declared: decl.declared_type.to_string(),
                        previous,
                    },
                    decl.span.start.clone(),
                );
                decl.symbol = Some(existing);

                // Names inside a rejected declaration still get diagnosed.
                self.resolve_function_scope(decl);
            }
            None => {
                let symbol = if self.scopes.is_global() {
                    Symbol::new(
                        SymbolKind::Global,
                        0,
                        decl.name.clone(),
                        decl.declared_type.clone(),
                    )
                } else {
                    let which = self.next_local;
                    self.next_local += 1;
                    Symbol::new(
                        SymbolKind::Local,
                        which,
                        decl.name.clone(),
                        decl.declared_type.clone(),
                    )
                };

                let symbol = symbol.into_ref();
                symbol.borrow_mut().is_prototype_only =
                    decl.declared_type.is_function() && decl.body.is_none();
                trace!("declared {} as {}", decl.name, symbol.borrow());

                self.scopes.bind(&decl.name, symbol.clone());
                decl.symbol = Some(symbol.clone());

                let local_count = self.resolve_function_scope(decl);
                if decl.declared_type.is_function() {
                    symbol.borrow_mut().local_count = local_count;
                }
            }
        }

        if let Some(initializer) = &mut decl.initializer {
            self.resolve_initializer(initializer);
        }
    }

    /// Resolves a declaration's parameters and body in a fresh scope and
    /// returns the number of local slots the body used.
    fn resolve_function_scope(&mut self, decl: &mut Decl) -> usize {
        let saved_locals = mem::replace(&mut self.next_local, 0);
        self.scopes.enter();

        if let Type::Function { params, .. } = &mut decl.declared_type {
            self.resolve_params(params);
        }

        if let Some(body) = &mut decl.body {
            self.resolve_stmt(body);
        }

        self.scopes.exit();
        mem::replace(&mut self.next_local, saved_locals)
    }

    fn resolve_params(&mut self, params: &mut [Param]) {
        for (which, param) in params.iter_mut().enumerate() {
            if self.scopes.lookup_current(&param.name).is_some() {
                self.error(
                    ErrorImpl::DuplicateParameter {
                        name: param.name.clone(),
                    },
                    param.span.start.clone(),
                );
            }

            let symbol = Symbol::new(
                SymbolKind::Param,
                which,
                param.name.clone(),
                param.param_type.clone(),
            )
            .into_ref();

            self.scopes.bind(&param.name, symbol.clone());
            param.symbol = Some(symbol);
        }
    }

    // Array sizes are expressions and may name things, however wrongly.
    fn resolve_type(&mut self, declared_type: &mut Type) {
        match declared_type {
            Type::Array { element, size } => {
                if let Some(size) = size {
                    self.resolve_expr(size);
                }
                self.resolve_type(element);
            }
            Type::Function {
                return_type,
                params,
            } => {
                self.resolve_type(return_type);
                for param in params.iter_mut() {
                    self.resolve_type(&mut param.param_type);
                }
            }
            _ => {}
        }
    }

    fn resolve_initializer(&mut self, initializer: &mut Initializer) {
        match initializer {
            Initializer::Expr(expr) => self.resolve_expr(expr),
            Initializer::List(items, _) => {
                for item in items.iter_mut() {
                    self.resolve_initializer(item);
                }
            }
        }
    }

    pub fn resolve_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.resolve_decl(decl),
            Stmt::Expr(expr) => self.resolve_expr(expr),
            Stmt::IfElse {
                condition,
                then_body,
                else_body,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_body);
                if let Some(else_body) = else_body {
                    self.resolve_stmt(else_body);
                }
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
            } => {
                for expr in [init, condition, step].into_iter().flatten() {
                    self.resolve_expr(expr);
                }
                self.resolve_stmt(body);
            }
            Stmt::Print(arguments) => {
                for argument in arguments.iter_mut() {
                    self.resolve_expr(argument);
                }
            }
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
            Stmt::Block(statements) => {
                self.scopes.enter();
                for statement in statements.iter_mut() {
                    self.resolve_stmt(statement);
                }
                self.scopes.exit();
            }
            Stmt::Empty => {}
        }
    }

    pub fn resolve_expr(&mut self, expr: &mut Expr) {
        match &mut expr.kind {
            ExprKind::Name { name, symbol } => match self.scopes.lookup(name) {
                Some(found) => {
                    trace!("{} resolves to {}", name, found.borrow());
                    self.resolutions.push((name.clone(), found.clone()));
                    *symbol = Some(found);
                }
                None => {
                    let name = name.clone();
                    self.error(ErrorImpl::UndefinedName { name }, expr.span.start.clone());
                }
            },
            ExprKind::BooleanLiteral(_)
            | ExprKind::IntegerLiteral(_)
            | ExprKind::CharacterLiteral(_)
            | ExprKind::StringLiteral(_) => {}
            ExprKind::Assign { target, value } => {
                self.resolve_expr(target);
                self.resolve_expr(value);
            }
            ExprKind::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),
            ExprKind::Call { callee, arguments } => {
                self.resolve_expr(callee);
                for argument in arguments.iter_mut() {
                    self.resolve_expr(argument);
                }
            }
            ExprKind::Index { base, index } => {
                self.resolve_expr(base);
                self.resolve_expr(index);
            }
        }
    }
}

/// Resolves every name in `program`, returning the pass with its diagnostics.
pub fn resolve(program: &mut Program) -> Resolver {
    let mut resolver = Resolver::new();
    resolver.resolve_program(program);
    resolver
}
