use std::rc::Rc;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub const MAX_IDENTIFIER_LENGTH: usize = 256;
pub const MAX_STRING_LENGTH: usize = 256;

pub type RegexHandler = fn(&mut Lexer, String) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

macro_rules! pattern {
    ($regex:literal, $handler:expr) => {
        RegexPattern {
            regex: Regex::new(concat!("^", $regex)).expect("invalid token pattern"),
            handler: $handler,
        }
    };
}

lazy_static! {
    // Order matters: the first pattern matching at the cursor wins, so
    // longer operators precede their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern!("\\s+", skip_handler),
        pattern!("//[^\\n]*", skip_handler),
        pattern!("/\\*(?s:.*?)\\*/", skip_handler),
        pattern!("/\\*", unterminated_comment_handler),
        pattern!("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern!("[0-9]+", integer_handler),
        pattern!("'(\\\\.|[^\\\\'\\n])'", char_handler),
        pattern!("'[^\\n]?", unterminated_literal_handler),
        pattern!("\"(\\\\.|[^\\\\\"\\n])*\"", string_handler),
        pattern!("\"[^\\n]*", unterminated_literal_handler),
        pattern!("\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern!("\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern!("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern!("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern!("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern!("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern!("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern!("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern!("!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern!("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern!("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern!("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern!(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern!(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern!("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern!("&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern!(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern!(":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern!(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern!("\\+\\+", MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++")),
        pattern!("--", MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--")),
        pattern!("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern!("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern!("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern!("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern!("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern!("\\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Span of the next `len` bytes.
    pub fn span_of(&self, len: usize) -> Span {
        Span::new(
            self.position(),
            Position((self.pos + len) as u32, Rc::clone(&self.file)),
        )
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn error(&self, error: ErrorImpl) -> Error {
        Error::new(error, self.position())
    }
}

/// Decodes `\n`, `\0` and `\c` (any other character stands for itself).
fn unescape(body: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(body.len());
    let mut bytes = body.bytes();

    while let Some(byte) = bytes.next() {
        if byte != b'\\' {
            result.push(byte);
            continue;
        }

        match bytes.next() {
            Some(b'n') => result.push(b'\n'),
            Some(b'0') => result.push(0),
            Some(other) => result.push(other),
            None => result.push(b'\\'),
        }
    }

    result
}

fn skip_handler(lexer: &mut Lexer, matched: String) -> Result<(), Error> {
    lexer.advance_n(matched.len());
    Ok(())
}

fn unterminated_comment_handler(lexer: &mut Lexer, _matched: String) -> Result<(), Error> {
    Err(lexer.error(ErrorImpl::UnterminatedComment))
}

fn unterminated_literal_handler(lexer: &mut Lexer, matched: String) -> Result<(), Error> {
    Err(lexer.error(ErrorImpl::UnterminatedLiteral { token: matched }))
}

fn integer_handler(lexer: &mut Lexer, matched: String) -> Result<(), Error> {
    if matched.parse::<i64>().is_err() {
        return Err(lexer.error(ErrorImpl::NumberParseError { token: matched }));
    }

    let span = lexer.span_of(matched.len());
    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::IntegerLiteral, matched, span));
    Ok(())
}

fn char_handler(lexer: &mut Lexer, matched: String) -> Result<(), Error> {
    let decoded = unescape(&matched[1..matched.len() - 1]);
    let value = decoded.first().copied().unwrap_or(0);

    let span = lexer.span_of(matched.len());
    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(
        TokenKind::CharLiteral,
        (value as char).to_string(),
        span
    ));
    Ok(())
}

fn string_handler(lexer: &mut Lexer, matched: String) -> Result<(), Error> {
    let decoded = unescape(&matched[1..matched.len() - 1]);
    if decoded.len() > MAX_STRING_LENGTH {
        return Err(lexer.error(ErrorImpl::StringTooLong {
            length: decoded.len(),
            limit: MAX_STRING_LENGTH,
        }));
    }

    let span = lexer.span_of(matched.len());
    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(
        TokenKind::StringLiteral,
        String::from_utf8_lossy(&decoded).into_owned(),
        span
    ));
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, matched: String) -> Result<(), Error> {
    let span = lexer.span_of(matched.len());

    if let Some(kind) = RESERVED_LOOKUP.get(matched.as_str()) {
        lexer.push(MK_TOKEN!(*kind, matched.clone(), span));
    } else if matched.len() > MAX_IDENTIFIER_LENGTH {
        return Err(lexer.error(ErrorImpl::IdentifierTooLong {
            identifier: matched,
            limit: MAX_IDENTIFIER_LENGTH,
        }));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, matched.clone(), span));
    }

    lexer.advance_n(matched.len());
    Ok(())
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in PATTERNS.iter() {
            if let Some(found) = pattern.regex.find(lex.remainder()) {
                let text = found.as_str().to_string();
                (pattern.handler)(&mut lex, text)?;
                matched = true;
                break;
            }
        }

        if !matched {
            let token = lex.remainder().chars().next().unwrap_or_default();
            return Err(lex.error(ErrorImpl::UnrecognisedToken {
                token: token.to_string(),
            }));
        }
    }

    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    debug!("scanned {} tokens from {}", lex.tokens.len(), lex.file);

    Ok(lex.tokens)
}
