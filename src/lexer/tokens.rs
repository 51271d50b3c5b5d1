use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("array", TokenKind::Array);
        map.insert("boolean", TokenKind::Boolean);
        map.insert("char", TokenKind::Char);
        map.insert("else", TokenKind::Else);
        map.insert("false", TokenKind::False);
        map.insert("for", TokenKind::For);
        map.insert("function", TokenKind::Function);
        map.insert("if", TokenKind::If);
        map.insert("integer", TokenKind::Integer);
        map.insert("print", TokenKind::Print);
        map.insert("return", TokenKind::Return);
        map.insert("string", TokenKind::String);
        map.insert("true", TokenKind::True);
        map.insert("void", TokenKind::Void);
        map.insert("while", TokenKind::While);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    IntegerLiteral,
    CharLiteral,
    StringLiteral,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Semicolon,
    Colon,
    Comma,

    PlusPlus,
    MinusMinus,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,
    Caret,

    // Reserved
    Array,
    Boolean,
    Char,
    Else,
    False,
    For,
    Function,
    If,
    Integer,
    Print,
    Return,
    String,
    True,
    Void,
    While,
}

impl TokenKind {
    /// The upper-case name printed by the scanner dump.
    pub fn manifest_name(&self) -> &'static str {
        match self {
            TokenKind::EOF => "EOF",
            TokenKind::IntegerLiteral => "INTEGER_LITERAL",
            TokenKind::CharLiteral => "CHAR_LITERAL",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::OpenBracket => "LBRACKET",
            TokenKind::CloseBracket => "RBRACKET",
            TokenKind::OpenCurly => "LEFTCURLYBRACKET",
            TokenKind::CloseCurly => "RIGHTCURLYBRACKET",
            TokenKind::OpenParen => "LPAREN",
            TokenKind::CloseParen => "RPAREN",
            TokenKind::Assignment => "ASSIGN",
            TokenKind::Equals => "EQ",
            TokenKind::Not => "NOT",
            TokenKind::NotEquals => "NE",
            TokenKind::Less => "LT",
            TokenKind::LessEquals => "LE",
            TokenKind::Greater => "GT",
            TokenKind::GreaterEquals => "GE",
            TokenKind::Or => "LOR",
            TokenKind::And => "LAND",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::PlusPlus => "INC",
            TokenKind::MinusMinus => "DEC",
            TokenKind::Plus => "PLUS",
            TokenKind::Dash => "MINUS",
            TokenKind::Slash => "DIV",
            TokenKind::Star => "MULT",
            TokenKind::Percent => "MOD",
            TokenKind::Caret => "EXP",
            TokenKind::Array => "ARRAY",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Char => "CHAR",
            TokenKind::Else => "ELSE",
            TokenKind::False => "FALSE",
            TokenKind::For => "FOR",
            TokenKind::Function => "FUNCTION",
            TokenKind::If => "IF",
            TokenKind::Integer => "INTEGER",
            TokenKind::Print => "PRINT",
            TokenKind::Return => "RETURN",
            TokenKind::String => "STRING",
            TokenKind::True => "TRUE",
            TokenKind::Void => "VOID",
            TokenKind::While => "WHILE",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text for most tokens; the decoded contents for character and
    /// string literals.
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    /// One line of the scanner dump, e.g. `INTEGER_LITERAL 5`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_one_of_many(&[
            TokenKind::IntegerLiteral,
            TokenKind::CharLiteral,
            TokenKind::StringLiteral,
            TokenKind::Identifier,
        ]) {
            write!(f, "{} {}", self.kind.manifest_name(), self.value)
        } else {
            write!(f, "{}", self.kind.manifest_name())
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }
}
