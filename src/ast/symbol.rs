//! Symbols produced by name resolution.
//!
//! A symbol is created once per declaration and shared, through a
//! [`SymbolRef`], between the declaration node and every name expression
//! that refers to it.

use std::{cell::RefCell, fmt::Display, rc::Rc};

use super::types::Type;

pub type SymbolRef = Rc<RefCell<Symbol>>;

/// Where a symbol's storage lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Global,
    Local,
    Param,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// Slot index for locals and parameters. Always 0 for globals.
    pub which: usize,
    pub name: String,
    pub symbol_type: Type,
    pub param_count: usize,
    pub local_count: usize,
    pub is_prototype_only: bool,
}

impl Symbol {
    pub fn new(kind: SymbolKind, which: usize, name: String, symbol_type: Type) -> Self {
        let param_count = match &symbol_type {
            Type::Function { params, .. } => params.len(),
            _ => 0,
        };

        Symbol {
            kind,
            which,
            name,
            symbol_type,
            param_count,
            local_count: 0,
            is_prototype_only: false,
        }
    }

    pub fn into_ref(self) -> SymbolRef {
        Rc::new(RefCell::new(self))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.symbol_type, Type::Function { .. })
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            SymbolKind::Global => write!(f, "global {}", self.name),
            SymbolKind::Local => write!(f, "local {}", self.which),
            SymbolKind::Param => write!(f, "param {}", self.which),
        }
    }
}
