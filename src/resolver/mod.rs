//! Name resolution.
//!
//! This module binds every identifier in a program to the symbol of the
//! declaration it refers to. It includes:
//!
//! - The scope stack used to track nested lexical scopes
//! - The resolver pass, which creates symbols, numbers parameters and
//!   locals, and reports duplicate or undefined names
//! - A trace of every successful lookup, used by the `-resolve` driver mode

pub mod resolver;
pub mod scope;

#[cfg(test)]
mod tests;
