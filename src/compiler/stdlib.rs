//! The runtime library ABI.
//!
//! Generated code calls a handful of support routines by name, using the
//! System V integer calling convention. Their implementation is linked in
//! separately; this module only names them and the registers involved.

use crate::ast::types::Type;

pub const PRINT_INTEGER: &str = "print_integer";
pub const PRINT_BOOLEAN: &str = "print_boolean";
pub const PRINT_CHARACTER: &str = "print_character";
pub const PRINT_STRING: &str = "print_string";
/// `integer_power(base, exponent)`
pub const INTEGER_POWER: &str = "integer_power";
/// `string_cmp(a, b)`, 1 iff the strings are equal.
pub const STRING_CMP: &str = "string_cmp";

/// Routines returning a C `int`: only `%eax` holds the result.
pub const INT_RESULT_FUNCTIONS: [&str; 2] = [INTEGER_POWER, STRING_CMP];

/// Integer argument registers, in parameter order.
pub const ARGUMENT_REGISTERS: [&str; 6] = ["%rdi", "%rsi", "%rdx", "%rcx", "%r8", "%r9"];

/// Scratch registers a function must preserve for its caller.
pub const CALLEE_SAVED_REGISTERS: [&str; 5] = ["%rbx", "%r12", "%r13", "%r14", "%r15"];

/// Scratch registers a callee may clobber; saved around every call.
pub const CALLER_SAVED_REGISTERS: [&str; 2] = ["%r10", "%r11"];

/// The routine `print` uses for a value of type `value_type`.
pub fn print_function(value_type: &Type) -> Option<&'static str> {
    match value_type {
        Type::Integer => Some(PRINT_INTEGER),
        Type::Boolean => Some(PRINT_BOOLEAN),
        Type::Character => Some(PRINT_CHARACTER),
        Type::String => Some(PRINT_STRING),
        _ => None,
    }
}
