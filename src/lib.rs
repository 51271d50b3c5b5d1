#![allow(clippy::module_inception)]

//! cminor: semantic analysis and x86-64 code generation for C-minor.
//!
//! ```text
//! source ── lexer ──▶ tokens ── parser ──▶ Program
//!                                             │
//!                         resolver (symbols, name errors)
//!                                             │
//!                         type_checker (type errors)
//!                                             │
//!                         compiler (x86-64 assembly text)
//! ```

use std::rc::Rc;

use crate::{
    ast::ast::Program,
    compiler::compiler::{generate, Target},
    errors::errors::{CompileError, Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    resolver::resolver::resolve,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod resolver;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Span for nodes built by hand rather than parsed from source.
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Lexes and parses `source` into a program.
pub fn parse_source(source: &str, file: &str) -> Result<Program, Error> {
    let tokens = tokenize(source.to_string(), Some(file.to_string()))?;
    parse(tokens, Rc::new(file.to_string()))
}

/// Runs the whole pipeline, stopping after the first stage that reports errors.
pub fn compile_source(source: &str, file: &str, target: Target) -> Result<String, CompileError> {
    let mut program = parse_source(source, file).map_err(CompileError::Syntax)?;
    compile_program(&mut program, target)
}

/// Resolves, type checks and generates code for an already-built program.
pub fn compile_program(program: &mut Program, target: Target) -> Result<String, CompileError> {
    let resolver = resolve(program);
    if resolver.error_count() > 0 {
        return Err(CompileError::Name(resolver.into_errors()));
    }

    let checker = type_check(program);
    if checker.error_count() > 0 {
        return Err(CompileError::Type(checker.into_errors()));
    }

    Ok(generate(program, target)?)
}

/// Finds the line containing byte `position`.
///
/// Returns the 1-based line number, the line's text and the offset of
/// `position` within that line. A position at the very end of the source
/// maps onto the last line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // Offset one past the last byte (end-of-file diagnostics).
    let last = source.split_inclusive('\n').last().unwrap_or("");
    Some((line_number.saturating_sub(1).max(1), last.to_string(), last.len()))
}

/// Renders a diagnostic with the offending source line underneath.
///
/// ```text
/// type error: operator + expects integer operands, found boolean and integer
/// -> test.cminor
///   |
/// 3 | x: integer = true + 1;
///   | -------------^
/// ```
pub fn format_error(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let mut rendered = match error.get_tip() {
        ErrorTip::None => format!("{}\n", error),
        tip => format!("{} ({})\n", error, tip),
    };
    rendered.push_str(&format!("-> {}\n", position.1));

    if let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) {
        let line_string = line.to_string();
        let padding = line_string.len() + 2;

        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
        let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

        rendered.push_str(&format!("{:>padding$}\n", "|"));
        rendered.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));
        rendered.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    }

    rendered
}

pub fn display_error(error: &Error, source: &str) {
    eprint!("{}", format_error(error, source));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        errors::errors::{Error, ErrorImpl},
        Position,
    };

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nsecond\n\nTesting { }\n";
        let (line_number, line, line_pos) = super::get_line_at_position(source, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(source, 30).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);

        assert!(super::get_line_at_position(source, 500).is_none());
    }

    #[test]
    fn test_format_error_points_at_column() {
        let source = "x: integer = 1;\n  y: integer = @;\n";
        let error = Error::new(
            ErrorImpl::UnrecognisedToken {
                token: "@".to_string(),
            },
            Position(31, Rc::new("test.cminor".to_string())),
        );

        let rendered = super::format_error(&error, source);
        assert!(rendered.starts_with("scan error: unrecognised token \"@\""));
        assert!(rendered.contains("-> test.cminor"));
        assert!(rendered.contains("2 | y: integer = @;"));
        assert!(rendered.contains("  | -------------^"));
    }
}
