//! Expression nodes.
//!
//! Every expression is an [`Expr`] carrying an [`ExprKind`] and the span it
//! was parsed from. Name expressions gain a symbol during resolution; all
//! other information (types, registers) is computed by later passes and is
//! never stored in the tree.

use std::fmt::Display;

use crate::Span;

use super::symbol::SymbolRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Exp,
    Mod,
    And,
    Or,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    Inc,
    Dec,
}

/// Printing precedence, higher binds tighter.
pub mod precedence {
    pub const ASSIGN: u8 = 1;
    pub const OR: u8 = 2;
    pub const AND: u8 = 3;
    pub const COMPARISON: u8 = 4;
    pub const ADDITIVE: u8 = 5;
    pub const MULTIPLICATIVE: u8 = 6;
    pub const EXPONENT: u8 = 7;
    pub const PREFIX: u8 = 8;
    pub const POSTFIX: u8 = 9;
    pub const PRIMARY: u8 = 10;
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Exp => "^",
            BinaryOp::Mod => "%",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => precedence::OR,
            BinaryOp::And => precedence::AND,
            BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::Eq
            | BinaryOp::Ne => precedence::COMPARISON,
            BinaryOp::Add | BinaryOp::Sub => precedence::ADDITIVE,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => precedence::MULTIPLICATIVE,
            BinaryOp::Exp => precedence::EXPONENT,
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Exp | BinaryOp::Mod
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_ordering(&self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne)
    }
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Inc => "++",
            UnaryOp::Dec => "--",
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::Inc | UnaryOp::Dec)
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Name {
        name: String,
        symbol: Option<SymbolRef>,
    },
    BooleanLiteral(bool),
    IntegerLiteral(i64),
    CharacterLiteral(u8),
    StringLiteral(String),
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Binary {
        operator: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    fn unspanned(kind: ExprKind) -> Self {
        Expr::new(kind, Span::null())
    }

    pub fn name(name: &str) -> Self {
        Expr::unspanned(ExprKind::Name {
            name: name.to_string(),
            symbol: None,
        })
    }

    pub fn boolean(value: bool) -> Self {
        Expr::unspanned(ExprKind::BooleanLiteral(value))
    }

    pub fn integer(value: i64) -> Self {
        Expr::unspanned(ExprKind::IntegerLiteral(value))
    }

    pub fn character(value: u8) -> Self {
        Expr::unspanned(ExprKind::CharacterLiteral(value))
    }

    pub fn string(value: &str) -> Self {
        Expr::unspanned(ExprKind::StringLiteral(value.to_string()))
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::unspanned(ExprKind::Assign {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn binary(operator: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::unspanned(ExprKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(operator: UnaryOp, operand: Expr) -> Self {
        Expr::unspanned(ExprKind::Unary {
            operator,
            operand: Box::new(operand),
        })
    }

    pub fn call(callee: &str, arguments: Vec<Expr>) -> Self {
        Expr::unspanned(ExprKind::Call {
            callee: Box::new(Expr::name(callee)),
            arguments,
        })
    }

    pub fn index(base: Expr, index: Expr) -> Self {
        Expr::unspanned(ExprKind::Index {
            base: Box::new(base),
            index: Box::new(index),
        })
    }

    pub fn is_lvalue(&self) -> bool {
        matches!(self.kind, ExprKind::Name { .. } | ExprKind::Index { .. })
    }

    /// Literals and negated literals, the only initializers allowed for globals.
    pub fn is_constant(&self) -> bool {
        match &self.kind {
            ExprKind::BooleanLiteral(_)
            | ExprKind::IntegerLiteral(_)
            | ExprKind::CharacterLiteral(_)
            | ExprKind::StringLiteral(_) => true,
            ExprKind::Unary {
                operator: UnaryOp::Neg,
                operand,
            } => operand.is_constant(),
            _ => false,
        }
    }

    /// The value of an integer literal, or of a negated one.
    pub fn integer_constant(&self) -> Option<i64> {
        match &self.kind {
            ExprKind::IntegerLiteral(value) => Some(*value),
            ExprKind::Unary {
                operator: UnaryOp::Neg,
                operand,
            } => operand.integer_constant().map(i64::wrapping_neg),
            _ => None,
        }
    }

    /// The 64-bit word a scalar constant occupies in memory.
    pub fn constant_word(&self) -> Option<i64> {
        match &self.kind {
            ExprKind::BooleanLiteral(value) => Some(*value as i64),
            ExprKind::CharacterLiteral(value) => Some(*value as i64),
            _ => self.integer_constant(),
        }
    }

    pub fn symbol(&self) -> Option<SymbolRef> {
        match &self.kind {
            ExprKind::Name { symbol, .. } => symbol.clone(),
            _ => None,
        }
    }

    pub fn precedence(&self) -> u8 {
        match &self.kind {
            ExprKind::Assign { .. } => precedence::ASSIGN,
            ExprKind::Binary { operator, .. } => operator.precedence(),
            ExprKind::Unary { operator, .. } if operator.is_postfix() => precedence::POSTFIX,
            ExprKind::Unary { .. } => precedence::PREFIX,
            _ => precedence::PRIMARY,
        }
    }

    fn fmt_operand(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        parent: u8,
        inclusive: bool,
    ) -> std::fmt::Result {
        let own = self.precedence();
        if own < parent || (inclusive && own == parent) {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

pub fn escape_char(c: u8) -> String {
    match c {
        b'\n' => "\\n".to_string(),
        0 => "\\0".to_string(),
        b'\\' => "\\\\".to_string(),
        b'"' => "\\\"".to_string(),
        b'\'' => "\\'".to_string(),
        c => (c as char).to_string(),
    }
}

pub fn escape_string(value: &str) -> String {
    value.bytes().map(escape_char).collect()
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Name { name, .. } => write!(f, "{}", name),
            ExprKind::BooleanLiteral(value) => write!(f, "{}", value),
            ExprKind::IntegerLiteral(value) => write!(f, "{}", value),
            ExprKind::CharacterLiteral(value) => write!(f, "'{}'", escape_char(*value)),
            ExprKind::StringLiteral(value) => write!(f, "\"{}\"", escape_string(value)),
            ExprKind::Assign { target, value } => {
                target.fmt_operand(f, precedence::ASSIGN, true)?;
                write!(f, " = ")?;
                value.fmt_operand(f, precedence::ASSIGN, false)
            }
            ExprKind::Binary {
                operator,
                left,
                right,
            } => {
                let level = operator.precedence();
                // ^ groups to the right, everything else to the left
                let right_assoc = *operator == BinaryOp::Exp;
                left.fmt_operand(f, level, right_assoc)?;
                write!(f, " {} ", operator.symbol())?;
                right.fmt_operand(f, level, !right_assoc)
            }
            ExprKind::Unary { operator, operand } if operator.is_postfix() => {
                operand.fmt_operand(f, precedence::POSTFIX, false)?;
                write!(f, "{}", operator.symbol())
            }
            ExprKind::Unary { operator, operand } => {
                write!(f, "{}", operator.symbol())?;
                operand.fmt_operand(f, precedence::PREFIX, true)
            }
            ExprKind::Call { callee, arguments } => {
                write!(f, "{}(", callee)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    argument.fmt_operand(f, precedence::ASSIGN, false)?;
                }
                write!(f, ")")
            }
            ExprKind::Index { base, index } => {
                base.fmt_operand(f, precedence::PRIMARY, false)?;
                write!(f, "[{}]", index)
            }
        }
    }
}
