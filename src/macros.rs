//! Utility macros for the compiler.
//!
//! This module defines helper macros used throughout the compiler:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed-text tokens
//! - `EMIT!` - Writes one formatted instruction through a code generator
//!
//! These macros reduce boilerplate in the lexer and the code generator.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::IntegerLiteral, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for fixed-text tokens.
///
/// Generates a handler function that pushes a token with the given kind
/// and advances the lexer position by the token's length.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\+\\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _matched: String| -> Result<(), Error> {
            let span = lexer.span_of($value.len());
            lexer.push($crate::MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
            Ok(())
        }
    };
}

/// Writes one tab-indented instruction line through a code generator.
///
/// # Example
///
/// ```ignore
/// EMIT!(self, "addq {}, {}", right, left)?;
/// ```
#[macro_export]
macro_rules! EMIT {
    ($generator:expr, $($arg:tt)*) => {
        $generator.emit(format_args!($($arg)*))
    };
}
