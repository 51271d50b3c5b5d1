use std::io::Write;

use crate::{
    ast::{
        expressions::{BinaryOp, Expr, ExprKind, UnaryOp},
        symbol::SymbolRef,
        types::Type,
    },
    errors::errors::CodegenError,
    type_checker::type_checker::expr_type,
    EMIT,
};

use super::{
    compiler::CodeGenerator,
    registers::Register,
    stdlib::{ARGUMENT_REGISTERS, INTEGER_POWER, STRING_CMP},
};

/// Generates code for `expression` and returns the register holding its
/// value. The caller owns that register and must free it.
pub fn gen_expression<W: Write>(
    generator: &mut CodeGenerator<W>,
    expression: &Expr,
) -> Result<Register, CodegenError> {
    match &expression.kind {
        ExprKind::IntegerLiteral(value) => load_immediate(generator, *value),
        ExprKind::BooleanLiteral(value) => load_immediate(generator, *value as i64),
        ExprKind::CharacterLiteral(value) => load_immediate(generator, *value as i64),
        ExprKind::StringLiteral(value) => {
            let label = generator.emit_string_literal(value)?;
            let register = generator.registers.alloc()?;
            EMIT!(generator, "leaq {}(%rip), {}", label, register)?;
            Ok(register)
        }
        ExprKind::Name { name, symbol } => {
            let symbol = resolved(name, symbol)?;
            let symbol = symbol.borrow();
            if symbol.symbol_type.is_array() {
                return Err(CodegenError::ArrayUnsupported(name.clone()));
            }

            let register = generator.registers.alloc()?;
            if symbol.is_function() {
                let label = generator.target().mangle(&symbol.name);
                EMIT!(generator, "leaq {}(%rip), {}", label, register)?;
            } else {
                let address = generator.symbol_address(&symbol);
                EMIT!(generator, "movq {}, {}", address, register)?;
            }
            Ok(register)
        }
        ExprKind::Assign { target, value } => {
            let address = variable_address(generator, target)?;
            let register = gen_expression(generator, value)?;
            EMIT!(generator, "movq {}, {}", register, address)?;
            Ok(register)
        }
        ExprKind::Binary {
            operator,
            left,
            right,
        } => gen_binary(generator, *operator, left, right),
        ExprKind::Unary { operator, operand } => gen_unary(generator, *operator, operand),
        ExprKind::Call { callee, arguments } => {
            let name = match &callee.kind {
                ExprKind::Name { name, .. } => name.clone(),
                _ => return Err(CodegenError::UnresolvedName(callee.to_string())),
            };

            if arguments.len() > ARGUMENT_REGISTERS.len() {
                return Err(CodegenError::TooManyArguments {
                    name,
                    count: arguments.len(),
                    limit: ARGUMENT_REGISTERS.len(),
                });
            }

            let mut registers = Vec::with_capacity(arguments.len());
            for argument in arguments {
                registers.push(gen_expression(generator, argument)?);
            }
            generator.call(&name, registers)
        }
        ExprKind::Index { base, .. } => Err(CodegenError::ArrayUnsupported(base.to_string())),
    }
}

fn load_immediate<W: Write>(
    generator: &mut CodeGenerator<W>,
    value: i64,
) -> Result<Register, CodegenError> {
    let register = generator.registers.alloc()?;
    EMIT!(generator, "movq ${}, {}", value, register)?;
    Ok(register)
}

fn resolved(name: &str, symbol: &Option<SymbolRef>) -> Result<SymbolRef, CodegenError> {
    symbol
        .clone()
        .ok_or_else(|| CodegenError::UnresolvedName(name.to_string()))
}

/// The memory operand an assignment or increment writes to.
fn variable_address<W: Write>(
    generator: &CodeGenerator<W>,
    target: &Expr,
) -> Result<String, CodegenError> {
    match &target.kind {
        ExprKind::Name { name, symbol } => {
            let symbol = resolved(name, symbol)?;
            let symbol = symbol.borrow();
            if symbol.symbol_type.is_array() {
                return Err(CodegenError::ArrayUnsupported(name.clone()));
            }
            if symbol.is_function() {
                return Err(CodegenError::InvalidAssignmentTarget(name.clone()));
            }
            Ok(generator.symbol_address(&symbol))
        }
        ExprKind::Index { base, .. } => Err(CodegenError::ArrayUnsupported(base.to_string())),
        _ => Err(CodegenError::InvalidAssignmentTarget(target.to_string())),
    }
}

fn gen_binary<W: Write>(
    generator: &mut CodeGenerator<W>,
    operator: BinaryOp,
    left: &Expr,
    right: &Expr,
) -> Result<Register, CodegenError> {
    if operator.is_logical() {
        return gen_logical(generator, operator, left, right);
    }

    let left_register = gen_expression(generator, left)?;
    let right_register = gen_expression(generator, right)?;

    match operator {
        BinaryOp::Add => EMIT!(generator, "addq {}, {}", right_register, left_register)?,
        BinaryOp::Sub => EMIT!(generator, "subq {}, {}", right_register, left_register)?,
        BinaryOp::Mul => {
            EMIT!(generator, "movq {}, %rax", left_register)?;
            EMIT!(generator, "imulq {}", right_register)?;
            EMIT!(generator, "movq %rax, {}", left_register)?;
        }
        BinaryOp::Div | BinaryOp::Mod => {
            EMIT!(generator, "movq {}, %rax", left_register)?;
            EMIT!(generator, "cqto")?;
            EMIT!(generator, "idivq {}", right_register)?;
            let result = if operator == BinaryOp::Div { "%rax" } else { "%rdx" };
            EMIT!(generator, "movq {}, {}", result, left_register)?;
        }
        BinaryOp::Exp => return generator.call(INTEGER_POWER, vec![left_register, right_register]),
        BinaryOp::Eq | BinaryOp::Ne if expr_type(left) == Type::String => {
            let result = generator.call(STRING_CMP, vec![left_register, right_register])?;
            if operator == BinaryOp::Ne {
                EMIT!(generator, "xorq $1, {}", result)?;
            }
            return Ok(result);
        }
        _ => {
            let jump = match operator {
                BinaryOp::Lt => "jl",
                BinaryOp::Le => "jle",
                BinaryOp::Gt => "jg",
                BinaryOp::Ge => "jge",
                BinaryOp::Eq => "je",
                _ => "jne",
            };
            let is_true = generator.next_label();
            let done = generator.next_label();

            EMIT!(generator, "cmpq {}, {}", right_register, left_register)?;
            EMIT!(generator, "{} {}", jump, is_true)?;
            EMIT!(generator, "movq $0, {}", left_register)?;
            EMIT!(generator, "jmp {}", done)?;
            generator.emit_label(&is_true)?;
            EMIT!(generator, "movq $1, {}", left_register)?;
            generator.emit_label(&done)?;
        }
    }

    generator.registers.free(right_register);
    Ok(left_register)
}

/// `&&` and `||`. The right operand only runs when the left one does not
/// already decide the result.
fn gen_logical<W: Write>(
    generator: &mut CodeGenerator<W>,
    operator: BinaryOp,
    left: &Expr,
    right: &Expr,
) -> Result<Register, CodegenError> {
    let done = generator.next_label();
    let result = gen_expression(generator, left)?;

    EMIT!(generator, "cmpq $0, {}", result)?;
    match operator {
        BinaryOp::And => EMIT!(generator, "je {}", done)?,
        _ => EMIT!(generator, "jne {}", done)?,
    }

    let right_register = gen_expression(generator, right)?;
    EMIT!(generator, "movq {}, {}", right_register, result)?;
    generator.registers.free(right_register);

    generator.emit_label(&done)?;
    Ok(result)
}

fn gen_unary<W: Write>(
    generator: &mut CodeGenerator<W>,
    operator: UnaryOp,
    operand: &Expr,
) -> Result<Register, CodegenError> {
    match operator {
        UnaryOp::Neg => {
            let register = gen_expression(generator, operand)?;
            EMIT!(generator, "negq {}", register)?;
            Ok(register)
        }
        UnaryOp::Not => {
            let register = gen_expression(generator, operand)?;
            EMIT!(generator, "xorq $1, {}", register)?;
            Ok(register)
        }
        UnaryOp::Inc | UnaryOp::Dec => {
            let address = variable_address(generator, operand)?;
            let value = gen_expression(generator, operand)?;
            let previous = generator.registers.alloc()?;

            EMIT!(generator, "movq {}, {}", value, previous)?;
            match operator {
                UnaryOp::Inc => EMIT!(generator, "incq {}", value)?,
                _ => EMIT!(generator, "decq {}", value)?,
            }
            EMIT!(generator, "movq {}, {}", value, address)?;

            generator.registers.free(value);
            Ok(previous)
        }
    }
}
