//! Code generation module for the compiler.
//!
//! This module lowers a resolved, type-checked program into x86-64
//! assembly text (AT&T syntax, System V calling convention). It handles:
//!
//! - Scratch register allocation for expression temporaries
//! - Global data and string literals
//! - Function frames, prologues and epilogues
//! - Expression and statement lowering
//! - Calls into the runtime library

pub mod compiler;
pub mod expr;
pub mod registers;
pub mod stdlib;
pub mod stmt;

#[cfg(test)]
mod tests;
