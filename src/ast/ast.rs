//! Program and declaration nodes.
//!
//! A [`Program`] is the ordered list of top-level declarations. The same
//! [`Decl`] node is used for globals, locals and functions; which one it is
//! follows from its declared type and where it appears.

use std::fmt::{self, Display};

use crate::Span;

use super::{
    expressions::Expr,
    statements::Stmt,
    symbol::SymbolRef,
    types::Type,
};

/// The right-hand side of a declaration. Arrays may be initialized with a
/// brace list, nested for nested arrays.
#[derive(Debug, Clone)]
pub enum Initializer {
    Expr(Expr),
    List(Vec<Initializer>, Span),
}

impl Initializer {
    pub fn is_constant(&self) -> bool {
        match self {
            Initializer::Expr(expr) => expr.is_constant(),
            Initializer::List(items, _) => items.iter().all(Initializer::is_constant),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Initializer::Expr(expr) => &expr.span,
            Initializer::List(_, span) => span,
        }
    }
}

impl Display for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Initializer::Expr(expr) => write!(f, "{}", expr),
            Initializer::List(items, _) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    write!(f, "{}{}", if i == 0 { "" } else { ", " }, item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Decl {
    pub name: String,
    pub declared_type: Type,
    pub initializer: Option<Initializer>,
    pub body: Option<Stmt>,
    pub symbol: Option<SymbolRef>,
    pub span: Span,
}

impl Decl {
    pub fn new(name: &str, declared_type: Type) -> Self {
        Decl {
            name: name.to_string(),
            declared_type,
            initializer: None,
            body: None,
            symbol: None,
            span: Span::null(),
        }
    }

    pub fn with_initializer(mut self, initializer: Expr) -> Self {
        self.initializer = Some(Initializer::Expr(initializer));
        self
    }

    pub fn with_body(mut self, statements: Vec<Stmt>) -> Self {
        self.body = Some(Stmt::Block(statements));
        self
    }

    pub fn is_function(&self) -> bool {
        self.declared_type.is_function()
    }

    pub fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.declared_type)?;
        if let Some(initializer) = &self.initializer {
            write!(f, " = {}", initializer)?;
        }
        match &self.body {
            Some(body) => {
                write!(f, " = ")?;
                body.write_indented(f, depth)
            }
            None => write!(f, ";"),
        }
    }
}

impl Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Root node: the declarations of one source file, in order.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub declarations: Vec<Decl>,
}

impl Program {
    pub fn new(declarations: Vec<Decl>) -> Self {
        Program { declarations }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decl in &self.declarations {
            decl.write_indented(f, 0)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
