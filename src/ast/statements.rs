//! Statement nodes.
//!
//! Each variant carries only the fields its kind needs. Printing is
//! indentation-aware, so statements render through [`Stmt::write_indented`]
//! rather than a bare `Display` impl.

use std::fmt::{self, Display};

use crate::Span;

use super::{ast::Decl, expressions::Expr};

#[derive(Debug, Clone)]
pub enum Stmt {
    Decl(Box<Decl>),
    Expr(Expr),
    IfElse {
        condition: Expr,
        then_body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
    },
    For {
        init: Option<Expr>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
    },
    Print(Vec<Expr>),
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Block(Vec<Stmt>),
    Empty,
}

pub(crate) fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        write!(f, "\t")?;
    }
    Ok(())
}

impl Stmt {
    pub fn decl(decl: Decl) -> Self {
        Stmt::Decl(Box::new(decl))
    }

    pub fn if_else(condition: Expr, then_body: Stmt, else_body: Option<Stmt>) -> Self {
        Stmt::IfElse {
            condition,
            then_body: Box::new(then_body),
            else_body: else_body.map(Box::new),
        }
    }

    pub fn for_loop(
        init: Option<Expr>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Stmt,
    ) -> Self {
        Stmt::For {
            init,
            condition,
            step,
            body: Box::new(body),
        }
    }

    pub fn return_value(value: Option<Expr>) -> Self {
        Stmt::Return {
            value,
            span: Span::null(),
        }
    }

    /// Writes the statement starting at the current column, with nested
    /// lines indented `depth + 1` tabs. The caller writes leading indentation.
    pub fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Stmt::Decl(decl) => decl.write_indented(f, depth),
            Stmt::Expr(expr) => write!(f, "{};", expr),
            Stmt::IfElse {
                condition,
                then_body,
                else_body,
            } => {
                write!(f, "if ({}) ", condition)?;
                then_body.write_body(f, depth)?;
                if let Some(else_body) = else_body {
                    if matches!(**then_body, Stmt::Block(_)) {
                        write!(f, " else ")?;
                    } else {
                        writeln!(f)?;
                        indent(f, depth)?;
                        write!(f, "else ")?;
                    }
                    else_body.write_body(f, depth)?;
                }
                Ok(())
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
            } => {
                write!(f, "for (")?;
                if let Some(init) = init {
                    write!(f, "{}", init)?;
                }
                write!(f, ";")?;
                if let Some(condition) = condition {
                    write!(f, " {}", condition)?;
                }
                write!(f, ";")?;
                if let Some(step) = step {
                    write!(f, " {}", step)?;
                }
                write!(f, ") ")?;
                body.write_body(f, depth)
            }
            Stmt::Print(arguments) => {
                write!(f, "print")?;
                for (i, argument) in arguments.iter().enumerate() {
                    write!(f, "{}{}", if i == 0 { " " } else { ", " }, argument)?;
                }
                write!(f, ";")
            }
            Stmt::Return { value, .. } => match value {
                Some(value) => write!(f, "return {};", value),
                None => write!(f, "return;"),
            },
            Stmt::Block(statements) => {
                writeln!(f, "{{")?;
                for statement in statements {
                    indent(f, depth + 1)?;
                    statement.write_indented(f, depth + 1)?;
                    writeln!(f)?;
                }
                indent(f, depth)?;
                write!(f, "}}")
            }
            Stmt::Empty => write!(f, ";"),
        }
    }

    // Blocks stay on the header line, single statements move to the next one.
    fn write_body(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Stmt::Block(_) | Stmt::IfElse { .. } => self.write_indented(f, depth),
            _ => {
                writeln!(f)?;
                indent(f, depth + 1)?;
                self.write_indented(f, depth + 1)
            }
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
