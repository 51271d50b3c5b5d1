use std::collections::HashMap;

use log::trace;

use crate::ast::symbol::SymbolRef;

type SymbolTable = HashMap<String, SymbolRef>;

/// A stack of name tables, innermost last.
///
/// The global table is created with the stack and can never be popped, so
/// `depth()` is always at least 1.
#[derive(Debug)]
pub struct ScopeStack {
    tables: Vec<SymbolTable>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            tables: vec![SymbolTable::new()],
        }
    }

    pub fn enter(&mut self) {
        self.tables.push(SymbolTable::new());
        trace!("entered scope at depth {}", self.depth());
    }

    /// Pops the innermost table.
    ///
    /// # Panics
    ///
    /// Panics when asked to pop the global scope; enter/exit calls must pair up.
    pub fn exit(&mut self) {
        assert!(self.depth() > 1, "attempted to exit the global scope");
        self.tables.pop();
        trace!("exited to scope depth {}", self.depth());
    }

    pub fn depth(&self) -> usize {
        self.tables.len()
    }

    pub fn is_global(&self) -> bool {
        self.depth() == 1
    }

    /// Binds `name` in the innermost table, replacing any previous binding there.
    pub fn bind(&mut self, name: &str, symbol: SymbolRef) {
        if let Some(table) = self.tables.last_mut() {
            table.insert(name.to_string(), symbol);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolRef> {
        self.tables
            .iter()
            .rev()
            .find_map(|table| table.get(name))
            .cloned()
    }

    pub fn lookup_current(&self, name: &str) -> Option<SymbolRef> {
        self.tables.last().and_then(|table| table.get(name)).cloned()
    }
}
