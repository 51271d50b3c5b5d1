use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Which stage of the compiler produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Scan,
    Parse,
    Name,
    Type,
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Scan => write!(f, "scan"),
            ErrorCategory::Parse => write!(f, "parse"),
            ErrorCategory::Name => write!(f, "name"),
            ErrorCategory::Type => write!(f, "type"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedLiteral { .. }
            | ErrorImpl::UnterminatedComment
            | ErrorImpl::IdentifierTooLong { .. }
            | ErrorImpl::StringTooLong { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorCategory::Scan,
            ErrorImpl::UnexpectedToken { .. } | ErrorImpl::UnexpectedTokenDetailed { .. } => {
                ErrorCategory::Parse
            }
            ErrorImpl::DuplicateDeclaration { .. }
            | ErrorImpl::DuplicateParameter { .. }
            | ErrorImpl::UndefinedName { .. } => ErrorCategory::Name,
            _ => ErrorCategory::Type,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedLiteral { .. } => "UnterminatedLiteral",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::IdentifierTooLong { .. } => "IdentifierTooLong",
            ErrorImpl::StringTooLong { .. } => "StringTooLong",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::DuplicateParameter { .. } => "DuplicateParameter",
            ErrorImpl::UndefinedName { .. } => "UndefinedName",
            ErrorImpl::VoidDeclaration { .. } => "VoidDeclaration",
            ErrorImpl::MissingArraySize { .. } => "MissingArraySize",
            ErrorImpl::NonConstantArraySize { .. } => "NonConstantArraySize",
            ErrorImpl::NonPositiveArraySize { .. } => "NonPositiveArraySize",
            ErrorImpl::InvalidArrayElement { .. } => "InvalidArrayElement",
            ErrorImpl::InvalidReturnType { .. } => "InvalidReturnType",
            ErrorImpl::NestedFunction { .. } => "NestedFunction",
            ErrorImpl::ConflictingDeclaration { .. } => "ConflictingDeclaration",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::NonConstantGlobalInitializer { .. } => "NonConstantGlobalInitializer",
            ErrorImpl::ArrayInitializerLength { .. } => "ArrayInitializerLength",
            ErrorImpl::NotAnLvalue { .. } => "NotAnLvalue",
            ErrorImpl::InvalidOperands { .. } => "InvalidOperands",
            ErrorImpl::InvalidOperand { .. } => "InvalidOperand",
            ErrorImpl::NotComparable { .. } => "NotComparable",
            ErrorImpl::NotIndexable { .. } => "NotIndexable",
            ErrorImpl::InvalidSubscript { .. } => "InvalidSubscript",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::ArgumentCount { .. } => "ArgumentCount",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::ConditionNotBoolean { .. } => "ConditionNotBoolean",
            ErrorImpl::NotPrintable { .. } => "NotPrintable",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::MissingReturnValue { .. } => "MissingReturnValue",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. } => {
                ErrorTip::Suggestion(String::from("did you miss a semicolon?"))
            }
            ErrorImpl::NumberParseError { .. } => {
                ErrorTip::Suggestion(String::from("is it above the integer limit?"))
            }
            ErrorImpl::UndefinedName { name } => {
                ErrorTip::Suggestion(format!("declare `{}` before using it", name))
            }
            ErrorImpl::NonConstantGlobalInitializer { .. } => ErrorTip::Suggestion(String::from(
                "globals may only be initialized with literals",
            )),
            ErrorImpl::NonConstantArraySize { .. } => ErrorTip::Suggestion(String::from(
                "array sizes must be integer literals",
            )),
            ErrorImpl::NestedFunction { .. } => ErrorTip::Suggestion(String::from(
                "functions may only be declared at global scope",
            )),
            ErrorImpl::ArgumentCount {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "expected {} arguments, received {}",
                expected, received
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {}", self.category(), self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// Types are carried as their printed form so diagnostics stay cheap to clone.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Scanning
    #[error("unrecognised token {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated literal {token:?}")]
    UnterminatedLiteral { token: String },
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("identifier {identifier:?} is longer than {limit} characters")]
    IdentifierTooLong { identifier: String, limit: usize },
    #[error("string literal of {length} characters is longer than {limit} characters")]
    StringTooLong { length: usize, limit: usize },
    #[error("error parsing number {token:?}")]
    NumberParseError { token: String },

    // Parsing
    #[error("unexpected token {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token {token:?}, {message}")]
    UnexpectedTokenDetailed { token: String, message: String },

    // Name resolution
    #[error("{name} is already declared as {previous}, cannot redeclare it as {declared}")]
    DuplicateDeclaration {
        name: String,
        declared: String,
        previous: String,
    },
    #[error("parameter {name} is declared more than once")]
    DuplicateParameter { name: String },
    #[error("{name} is not declared")]
    UndefinedName { name: String },

    // Declarations
    #[error("{name} cannot be declared void")]
    VoidDeclaration { name: String },
    #[error("array {name} has no size")]
    MissingArraySize { name: String },
    #[error("array {name} has a non-constant size")]
    NonConstantArraySize { name: String },
    #[error("array {name} has size {size}, sizes must be positive")]
    NonPositiveArraySize { name: String, size: i64 },
    #[error("arrays cannot hold elements of type {element}")]
    InvalidArrayElement { element: String },
    #[error("functions cannot return {return_type}")]
    InvalidReturnType { return_type: String },
    #[error("function {name} is not declared at global scope")]
    NestedFunction { name: String },
    #[error("{name} is declared as {declared} but its prototype is {previous}")]
    ConflictingDeclaration {
        name: String,
        declared: String,
        previous: String,
    },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMatchError { expected: String, received: String },
    #[error("global {name} must be initialized with a constant")]
    NonConstantGlobalInitializer { name: String },
    #[error("array {name} is declared with {expected} elements but initialized with {received}")]
    ArrayInitializerLength {
        name: String,
        expected: i64,
        received: usize,
    },

    // Expressions
    #[error("{expression} cannot be assigned to")]
    NotAnLvalue { expression: String },
    #[error("operator {operator} expects {expected} operands, found {left} and {right}")]
    InvalidOperands {
        operator: String,
        expected: String,
        left: String,
        right: String,
    },
    #[error("operator {operator} expects an {expected} operand, found {received}")]
    InvalidOperand {
        operator: String,
        expected: String,
        received: String,
    },
    #[error("cannot compare {left} with {right}")]
    NotComparable { left: String, right: String },
    #[error("cannot index into a value of type {received}")]
    NotIndexable { received: String },
    #[error("array subscripts must be integer, found {received}")]
    InvalidSubscript { received: String },
    #[error("{name} is not callable")]
    NotCallable { name: String },
    #[error("{function} expects {expected} arguments, received {received}")]
    ArgumentCount {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("argument {position} of {function} must be {expected}, received {received}")]
    ArgumentTypeMatchError {
        function: String,
        position: usize,
        expected: String,
        received: String,
    },

    // Statements
    #[error("{statement} condition must be boolean, found {received}")]
    ConditionNotBoolean { statement: String, received: String },
    #[error("cannot print a value of type {received}")]
    NotPrintable { received: String },
    #[error("return type mismatch: expected {expected}, received {received}")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("missing return value, function returns {expected}")]
    MissingReturnValue { expected: String },
}

/// Constructs the code generator cannot lower. These stop code generation
/// immediately instead of being collected.
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("expression too complex: all {0} scratch registers are in use")]
    RegistersExhausted(usize),
    #[error("cannot generate code for {0}: arrays are not supported by the code generator")]
    ArrayUnsupported(String),
    #[error("function {name} declares {count} parameters, at most {limit} are supported")]
    TooManyParameters {
        name: String,
        count: usize,
        limit: usize,
    },
    #[error("call to {name} passes {count} arguments, at most {limit} are supported")]
    TooManyArguments {
        name: String,
        count: usize,
        limit: usize,
    },
    #[error("cannot print a value of type {0}")]
    UnprintableType(String),
    #[error("global {0} has a non-constant initializer")]
    NonConstantGlobal(String),
    #[error("{0} cannot be assigned to")]
    InvalidAssignmentTarget(String),
    #[error("{0} was never resolved to a symbol")]
    UnresolvedName(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a run of the pipeline stopped.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{0}")]
    Syntax(Error),
    #[error("encountered {} name error(s)", .0.len())]
    Name(Vec<Error>),
    #[error("encountered {} type error(s)", .0.len())]
    Type(Vec<Error>),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl CompileError {
    /// The collected diagnostics, if this failure carries any.
    pub fn diagnostics(&self) -> &[Error] {
        match self {
            CompileError::Syntax(error) => std::slice::from_ref(error),
            CompileError::Name(errors) | CompileError::Type(errors) => errors,
            CompileError::Codegen(_) => &[],
        }
    }
}
