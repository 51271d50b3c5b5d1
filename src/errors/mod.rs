//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Diagnostics with source position information (scan, parse, name and type errors)
//! - The fatal code generation error type
//! - The pipeline error returned by the driver helpers

pub mod errors;
