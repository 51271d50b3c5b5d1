use crate::{
    ast::expressions::{BinaryOp, Expr, ExprKind, UnaryOp},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected_detailed("expected an expression")),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    let kind = match token.kind {
        TokenKind::IntegerLiteral => match token.value.parse() {
            Ok(value) => ExprKind::IntegerLiteral(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::CharLiteral => {
            ExprKind::CharacterLiteral(token.value.bytes().next().unwrap_or(0))
        }
        TokenKind::StringLiteral => ExprKind::StringLiteral(token.value),
        TokenKind::True => ExprKind::BooleanLiteral(true),
        TokenKind::False => ExprKind::BooleanLiteral(false),
        TokenKind::Identifier => ExprKind::Name {
            name: token.value,
            symbol: None,
        },
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(Expr::new(kind, token.span))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Dash => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Caret => BinaryOp::Exp,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEquals => BinaryOp::Le,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEquals => BinaryOp::Ge,
        TokenKind::Equals => BinaryOp::Eq,
        TokenKind::NotEquals => BinaryOp::Ne,
        _ => return None,
    })
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator = match binary_operator(parser.current_token_kind()) {
        Some(operator) => operator,
        None => return Err(parser.unexpected()),
    };
    parser.advance();

    // ^ is right associative: let another ^ bind on the right
    let right_bp = if operator == BinaryOp::Exp {
        BindingPower::Multiplicative
    } else {
        bp
    };
    let right = parse_expr(parser, right_bp)?;

    let span = Span::new(left.span.start.clone(), right.span.end.clone());
    Ok(Expr::new(
        ExprKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let operator = if operator_token.kind == TokenKind::Not {
        UnaryOp::Not
    } else {
        UnaryOp::Neg
    };
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let span = Span::new(operator_token.span.start, operand.span.end.clone());
    Ok(Expr::new(
        ExprKind::Unary {
            operator,
            operand: Box::new(operand),
        },
        span,
    ))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let operator = if operator_token.kind == TokenKind::PlusPlus {
        UnaryOp::Inc
    } else {
        UnaryOp::Dec
    };

    let span = Span::new(left.span.start.clone(), operator_token.span.end);
    Ok(Expr::new(
        ExprKind::Unary {
            operator,
            operand: Box::new(left),
        },
        span,
    ))
}

pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    // Assignment is right associative
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = Span::new(left.span.start.clone(), value.span.end.clone());
    Ok(Expr::new(
        ExprKind::Assign {
            target: Box::new(left),
            value: Box::new(value),
        },
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    if !matches!(left.kind, ExprKind::Name { .. }) {
        return Err(parser.unexpected_detailed("only named functions can be called"));
    }
    parser.advance();

    let mut arguments = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            arguments.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let span = parser.span_from(left.span.start.clone());
    Ok(Expr::new(
        ExprKind::Call {
            callee: Box::new(left),
            arguments,
        },
        span,
    ))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    let span = parser.span_from(left.span.start.clone());
    Ok(Expr::new(
        ExprKind::Index {
            base: Box::new(left),
            index: Box::new(index),
        },
        span,
    ))
}
