use std::io::Write;

use log::trace;

use crate::{
    ast::{ast::Initializer, statements::Stmt},
    errors::errors::CodegenError,
    type_checker::type_checker::expr_type,
    EMIT,
};

use super::{compiler::CodeGenerator, expr::gen_expression, stdlib::print_function};

pub fn gen_statement<W: Write>(
    generator: &mut CodeGenerator<W>,
    statement: &Stmt,
) -> Result<(), CodegenError> {
    match statement {
        Stmt::Decl(decl) => {
            if decl.declared_type.is_array() {
                return Err(CodegenError::ArrayUnsupported(decl.name.clone()));
            }

            let symbol = decl
                .symbol
                .as_ref()
                .ok_or_else(|| CodegenError::UnresolvedName(decl.name.clone()))?;

            match &decl.initializer {
                Some(Initializer::Expr(value)) => {
                    let address = generator.symbol_address(&symbol.borrow());
                    let register = gen_expression(generator, value)?;
                    EMIT!(generator, "movq {}, {}", register, address)?;
                    generator.registers.free(register);
                }
                Some(Initializer::List(..)) => {
                    return Err(CodegenError::ArrayUnsupported(decl.name.clone()))
                }
                None => {}
            }
        }
        Stmt::Expr(expression) => {
            let register = gen_expression(generator, expression)?;
            generator.registers.free(register);
        }
        Stmt::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            let otherwise = generator.next_label();
            let done = generator.next_label();

            let register = gen_expression(generator, condition)?;
            EMIT!(generator, "cmpq $0, {}", register)?;
            generator.registers.free(register);
            EMIT!(generator, "je {}", otherwise)?;

            gen_statement(generator, then_body)?;
            EMIT!(generator, "jmp {}", done)?;

            generator.emit_label(&otherwise)?;
            if let Some(else_body) = else_body {
                gen_statement(generator, else_body)?;
            }
            generator.emit_label(&done)?;
        }
        Stmt::For {
            init,
            condition,
            step,
            body,
        } => {
            let top = generator.next_label();
            let done = generator.next_label();

            if let Some(init) = init {
                let register = gen_expression(generator, init)?;
                generator.registers.free(register);
            }

            generator.emit_label(&top)?;
            if let Some(condition) = condition {
                let register = gen_expression(generator, condition)?;
                EMIT!(generator, "cmpq $0, {}", register)?;
                generator.registers.free(register);
                EMIT!(generator, "je {}", done)?;
            }

            gen_statement(generator, body)?;

            if let Some(step) = step {
                let register = gen_expression(generator, step)?;
                generator.registers.free(register);
            }
            EMIT!(generator, "jmp {}", top)?;
            generator.emit_label(&done)?;
        }
        Stmt::Print(values) => {
            for value in values {
                let value_type = expr_type(value);
                let function = print_function(&value_type)
                    .ok_or_else(|| CodegenError::UnprintableType(value_type.to_string()))?;
                trace!("print {} via {}", value, function);

                let register = gen_expression(generator, value)?;
                let result = generator.call(function, vec![register])?;
                generator.registers.free(result);
            }
        }
        Stmt::Return { value, .. } => {
            trace!("return from {}", generator.current_function().unwrap_or("<none>"));
            if let Some(value) = value {
                let register = gen_expression(generator, value)?;
                EMIT!(generator, "movq {}, %rax", register)?;
                generator.registers.free(register);
            }
            generator.emit_epilogue()?;
        }
        Stmt::Block(statements) => {
            for statement in statements {
                gen_statement(generator, statement)?;
            }
        }
        Stmt::Empty => {}
    }

    Ok(())
}
