use crate::{
    ast::{
        ast::{Decl, Initializer},
        expressions::Expr,
        statements::Stmt,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if parser.current_token_kind() == TokenKind::Identifier && parser.peek_kind(1) == TokenKind::Colon
    {
        return Ok(Stmt::decl(parse_decl(parser)?));
    }

    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()) {
        let handler = *handler;
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expr(expr))
}

/// `name: type;`, `name: type = initializer;` or `name: function T (...) = { ... }`.
pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let error = parser.unexpected_detailed("expected identifier at start of declaration");
    let name_token = parser.expect_error(TokenKind::Identifier, Some(error))?;
    parser.expect(TokenKind::Colon)?;

    let declared_type = parse_type(parser)?;

    let mut initializer = None;
    let mut body = None;

    if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();

        if declared_type.is_function() {
            if parser.current_token_kind() != TokenKind::OpenCurly {
                return Err(parser.unexpected_detailed("expected function body"));
            }
            body = Some(parse_block_stmt(parser)?);
        } else {
            initializer = Some(parse_initializer(parser)?);
            parser.expect(TokenKind::Semicolon)?;
        }
    } else {
        parser.expect(TokenKind::Semicolon)?;
    }

    Ok(Decl {
        name: name_token.value,
        declared_type,
        initializer,
        body,
        symbol: None,
        span: parser.span_from(name_token.span.start),
    })
}

fn parse_initializer(parser: &mut Parser) -> Result<Initializer, Error> {
    if parser.current_token_kind() != TokenKind::OpenCurly {
        return Ok(Initializer::Expr(parse_expr(parser, BindingPower::Default)?));
    }

    let start = parser.advance().span.start;
    let mut items = vec![];

    if parser.current_token_kind() != TokenKind::CloseCurly {
        items.push(parse_initializer(parser)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            items.push(parse_initializer(parser)?);
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Initializer::List(items, parser.span_from(start)))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let then_body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_stmt(parser)?)
    } else {
        None
    };

    Ok(Stmt::if_else(condition, then_body, else_body))
}

fn parse_optional_expr(parser: &mut Parser, terminator: TokenKind) -> Result<Option<Expr>, Error> {
    let expr = if parser.current_token_kind() == terminator {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    parser.expect(terminator)?;
    Ok(expr)
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    parser.expect(TokenKind::OpenParen)?;

    let init = parse_optional_expr(parser, TokenKind::Semicolon)?;
    let condition = parse_optional_expr(parser, TokenKind::Semicolon)?;
    let step = parse_optional_expr(parser, TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(Stmt::for_loop(init, condition, step, body))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::Semicolon {
        arguments.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            arguments.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Print(arguments))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let value = parse_optional_expr(parser, TokenKind::Semicolon)?;

    Ok(Stmt::Return {
        value,
        span: parser.span_from(start),
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected_detailed("expected '}' to close block"));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Stmt::Block(statements))
}

pub fn parse_empty_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    Ok(Stmt::Empty)
}
