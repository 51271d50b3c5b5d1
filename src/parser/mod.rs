//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`Program`](crate::ast::ast::Program). It uses a Pratt parser for
//! expressions with proper operator precedence and handles:
//!
//! - Declarations (`name: type;`, initializers, function bodies, prototypes)
//! - Statements (if/else, for, print, return, blocks)
//! - Expression parsing (binary ops, unary ops, calls, subscripts, literals)
//! - Type parsing for type annotations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
