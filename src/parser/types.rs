//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. Every C-minor type
//! starts with a keyword, so each keyword gets a handler in the type lookup
//! table:
//!
//! - Primitive types (`integer`, `boolean`, `char`, `string`, `void`)
//! - Array types: `array [size] element`, size optional for parameters
//! - Function types: `function return_type (name: type, ...)`

use std::collections::HashMap;

use crate::{
    ast::types::{Param, Type},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser};

/// Type alias for type handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for the type lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Integer, parse_primitive_type);
    parser.type_nud(TokenKind::Boolean, parse_primitive_type);
    parser.type_nud(TokenKind::Char, parse_primitive_type);
    parser.type_nud(TokenKind::String, parse_primitive_type);
    parser.type_nud(TokenKind::Void, parse_primitive_type);
    parser.type_nud(TokenKind::Array, parse_array_type);
    parser.type_nud(TokenKind::Function, parse_function_type);
}

pub fn parse_primitive_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.advance();
    Ok(match token.kind {
        TokenKind::Integer => Type::Integer,
        TokenKind::Boolean => Type::Boolean,
        TokenKind::Char => Type::Character,
        TokenKind::String => Type::String,
        _ => Type::Void,
    })
}

pub fn parse_array_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Array)?;
    parser.expect(TokenKind::OpenBracket)?;

    let size = if parser.current_token_kind() == TokenKind::CloseBracket {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    parser.expect(TokenKind::CloseBracket)?;
    let element = parse_type(parser)?;

    Ok(Type::array(element, size))
}

pub fn parse_function_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Function)?;
    let return_type = parse_type(parser)?;

    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        params.push(parse_param(parser)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            params.push(parse_param(parser)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Type::function(return_type, params))
}

fn parse_param(parser: &mut Parser) -> Result<Param, Error> {
    let error = parser.unexpected_detailed("expected parameter name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;
    parser.expect(TokenKind::Colon)?;
    let param_type = parse_type(parser)?;

    Ok(Param {
        name: name.value,
        param_type,
        symbol: None,
        span: parser.span_from(name.span.start),
    })
}

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let token_kind = parser.current_token_kind();
    match parser.get_type_nud_lookup().get(&token_kind) {
        Some(handler) => {
            let handler = *handler;
            handler(parser)
        }
        None => Err(parser.unexpected_detailed("expected a type")),
    }
}
