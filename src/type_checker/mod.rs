//! Type checking and semantic analysis module.
//!
//! This module performs type checking on a resolved program. It:
//!
//! - Computes the type of every expression from its operands and symbols
//! - Validates declarations (array sizes, element and return types,
//!   global initializers, prototype agreement)
//! - Validates statements (conditions, printable values, return types)
//! - Collects every violation instead of stopping at the first one
//!
//! Expression types are never stored in the tree; [`type_checker::expr_type`]
//! recomputes them on demand for the code generator.

pub mod type_checker;

#[cfg(test)]
mod tests;
