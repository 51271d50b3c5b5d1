//! Type system definitions for the AST.
//!
//! This module defines the types of C-minor:
//!
//! - Primitive types (boolean, char, integer, string, void)
//! - Arrays, whose size is an expression checked by the type checker
//! - Functions, with an ordered parameter list
//!
//! Types are plain values. They are cloned per use site and compared
//! structurally, see the `PartialEq` implementation for the exact rules.

use std::{fmt::Display, mem};

use crate::Span;

use super::{expressions::Expr, symbol::SymbolRef};

#[derive(Debug, Clone)]
pub enum Type {
    Boolean,
    Character,
    Integer,
    String,
    Void,
    Array {
        element: Box<Type>,
        size: Option<Box<Expr>>,
    },
    Function {
        return_type: Box<Type>,
        params: Vec<Param>,
    },
}

/// A named function parameter. The symbol is filled in by name resolution.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub param_type: Type,
    pub symbol: Option<SymbolRef>,
    pub span: Span,
}

impl Param {
    pub fn new(name: &str, param_type: Type) -> Self {
        Param {
            name: name.to_string(),
            param_type,
            symbol: None,
            span: Span::null(),
        }
    }
}

impl PartialEq for Type {
    /// Kinds must match. Arrays also compare element types but never sizes;
    /// functions compare return types but never parameter lists.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Array { element: a, .. }, Type::Array { element: b, .. }) => a == b,
            (Type::Function { return_type: a, .. }, Type::Function { return_type: b, .. }) => {
                a == b
            }
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl Type {
    pub fn array(element: Type, size: Option<Expr>) -> Self {
        Type::Array {
            element: Box::new(element),
            size: size.map(Box::new),
        }
    }

    pub fn function(return_type: Type, params: Vec<Param>) -> Self {
        Type::Function {
            return_type: Box::new(return_type),
            params,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    /// Whether `print` has a runtime routine for values of this type.
    pub fn is_printable(&self) -> bool {
        matches!(
            self,
            Type::Boolean | Type::Character | Type::Integer | Type::String
        )
    }

    pub fn return_type(&self) -> Option<&Type> {
        match self {
            Type::Function { return_type, .. } => Some(return_type),
            _ => None,
        }
    }

    pub fn params(&self) -> &[Param] {
        match self {
            Type::Function { params, .. } => params,
            _ => &[],
        }
    }

    /// Strict comparison used when a definition completes a prototype:
    /// return types and every parameter type must agree positionally.
    pub fn signature_matches(&self, other: &Type) -> bool {
        match (self, other) {
            (
                Type::Function {
                    return_type: a,
                    params: a_params,
                },
                Type::Function {
                    return_type: b,
                    params: b_params,
                },
            ) => {
                a == b
                    && a_params.len() == b_params.len()
                    && a_params
                        .iter()
                        .zip(b_params)
                        .all(|(x, y)| x.param_type == y.param_type)
            }
            _ => self == other,
        }
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.param_type)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Boolean => write!(f, "boolean"),
            Type::Character => write!(f, "char"),
            Type::Integer => write!(f, "integer"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
            Type::Array { element, size } => match size {
                Some(size) => write!(f, "array [{}] {}", size, element),
                None => write!(f, "array [] {}", element),
            },
            Type::Function {
                return_type,
                params,
            } => {
                write!(f, "function {} (", return_type)?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ")")
            }
        }
    }
}
