//! Main code generator module.
//!
//! This module contains the [`CodeGenerator`] structure, which walks a
//! resolved and type-checked program and writes x86-64 assembly (AT&T
//! syntax) to any [`Write`] sink. It owns every piece of per-run state:
//! the scratch register table, the label counter and the string literal
//! counter, so two generators never share numbering.

use std::{env, fmt, io::Write, str::FromStr};

use log::{debug, info, warn};

use crate::{
    ast::{
        ast::{Decl, Initializer, Program},
        expressions::ExprKind,
        symbol::{Symbol, SymbolKind},
        types::Type,
    },
    errors::errors::CodegenError,
    EMIT,
};

use super::{
    registers::{Register, RegisterAllocator},
    stdlib::{
        ARGUMENT_REGISTERS, CALLEE_SAVED_REGISTERS, CALLER_SAVED_REGISTERS, INT_RESULT_FUNCTIONS,
    },
    stmt::gen_statement,
};

/// Environment variable overriding the host-detected target.
pub const TARGET_ENV: &str = "CMINOR_TARGET";

/// The platform whose symbol naming the output follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Linux,
    MacOs,
}

impl Target {
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Target::MacOs
        } else {
            Target::Linux
        }
    }

    /// Reads `CMINOR_TARGET`, falling back to the host when it is unset or
    /// not recognised.
    pub fn from_env() -> Self {
        match env::var(TARGET_ENV) {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                warn!("ignoring unknown {} value {:?}", TARGET_ENV, value);
                Target::host()
            }),
            Err(_) => Target::host(),
        }
    }

    /// The assembly-level name of a C-minor function or global.
    pub fn mangle(&self, name: &str) -> String {
        match self {
            Target::Linux => name.to_string(),
            Target::MacOs => format!("_{}", name),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Target::Linux),
            "macos" | "darwin" => Ok(Target::MacOs),
            other => Err(format!("unknown target {:?}", other)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Linux => write!(f, "linux"),
            Target::MacOs => write!(f, "macos"),
        }
    }
}

/// Layout of the function currently being emitted.
#[derive(Debug, Clone)]
struct Frame {
    name: String,
    param_count: usize,
}

pub struct CodeGenerator<W: Write> {
    out: W,
    target: Target,
    pub registers: RegisterAllocator,
    label_count: usize,
    string_count: usize,
    frame: Option<Frame>,
}

impl<W: Write> CodeGenerator<W> {
    pub fn new(out: W, target: Target) -> Self {
        CodeGenerator {
            out,
            target,
            registers: RegisterAllocator::new(),
            label_count: 0,
            string_count: 0,
            frame: None,
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes one tab-indented instruction. Usually called through `EMIT!`.
    pub fn emit(&mut self, args: fmt::Arguments) -> Result<(), CodegenError> {
        writeln!(self.out, "\t{}", args)?;
        Ok(())
    }

    /// Writes a section directive or anything else that sits at column 0.
    pub fn emit_directive(&mut self, directive: &str) -> Result<(), CodegenError> {
        writeln!(self.out, "{}", directive)?;
        Ok(())
    }

    pub fn emit_label(&mut self, label: &str) -> Result<(), CodegenError> {
        writeln!(self.out, "{}:", label)?;
        Ok(())
    }

    pub fn next_label(&mut self) -> String {
        let label = format!(".L{}", self.label_count);
        self.label_count += 1;
        label
    }

    /// Places `value` in the data section under a fresh `.LSn` label and
    /// returns that label.
    pub fn emit_string_literal(&mut self, value: &str) -> Result<String, CodegenError> {
        let label = format!(".LS{}", self.string_count);
        self.string_count += 1;

        self.emit_directive(".data")?;
        self.emit_label(&label)?;
        EMIT!(self, ".string \"{}\"", escape_assembly_string(value))?;
        self.emit_directive(".text")?;
        Ok(label)
    }

    /// The memory operand holding a variable.
    pub fn symbol_address(&self, symbol: &Symbol) -> String {
        match symbol.kind {
            SymbolKind::Global => format!("{}(%rip)", self.target.mangle(&symbol.name)),
            SymbolKind::Param => format!("-{}(%rbp)", 8 + 8 * symbol.which),
            SymbolKind::Local => {
                let param_count = self.frame.as_ref().map_or(0, |frame| frame.param_count);
                format!("-{}(%rbp)", 8 + 8 * param_count + 8 * symbol.which)
            }
        }
    }

    pub fn current_function(&self) -> Option<&str> {
        self.frame.as_ref().map(|frame| frame.name.as_str())
    }

    /// Calls `name` with the values held in `arguments`, freeing them, and
    /// returns a fresh register holding the result.
    pub fn call(&mut self, name: &str, arguments: Vec<Register>) -> Result<Register, CodegenError> {
        if arguments.len() > ARGUMENT_REGISTERS.len() {
            return Err(CodegenError::TooManyArguments {
                name: name.to_string(),
                count: arguments.len(),
                limit: ARGUMENT_REGISTERS.len(),
            });
        }

        for register in CALLER_SAVED_REGISTERS {
            EMIT!(self, "pushq {}", register)?;
        }
        for (argument, destination) in arguments.into_iter().zip(ARGUMENT_REGISTERS) {
            EMIT!(self, "movq {}, {}", argument, destination)?;
            self.registers.free(argument);
        }

        let label = self.target.mangle(name);
        EMIT!(self, "call {}", label)?;
        if INT_RESULT_FUNCTIONS.iter().any(|function| *function == name) {
            EMIT!(self, "cltq")?;
        }
        for register in CALLER_SAVED_REGISTERS.iter().rev() {
            EMIT!(self, "popq {}", register)?;
        }

        let result = self.registers.alloc()?;
        EMIT!(self, "movq %rax, {}", result)?;
        Ok(result)
    }

    pub fn emit_epilogue(&mut self) -> Result<(), CodegenError> {
        EMIT!(self, "addq $8, %rsp")?;
        for register in CALLEE_SAVED_REGISTERS.iter().rev() {
            EMIT!(self, "popq {}", register)?;
        }
        EMIT!(self, "movq %rbp, %rsp")?;
        EMIT!(self, "popq %rbp")?;
        EMIT!(self, "ret")
    }

    pub fn gen_program(&mut self, program: &Program) -> Result<(), CodegenError> {
        info!(
            "generating {} code for {} declaration(s)",
            self.target,
            program.declarations.len()
        );

        for decl in &program.declarations {
            if decl.is_function() {
                self.gen_function(decl)?;
            } else {
                self.gen_global(decl)?;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn gen_global(&mut self, decl: &Decl) -> Result<(), CodegenError> {
        if decl.declared_type.is_array() {
            return Err(CodegenError::ArrayUnsupported(decl.name.clone()));
        }

        let value = match (&decl.declared_type, &decl.initializer) {
            (_, None) => "0".to_string(),
            (Type::String, Some(Initializer::Expr(expr))) => match &expr.kind {
                ExprKind::StringLiteral(text) => self.emit_string_literal(text)?,
                _ => return Err(CodegenError::NonConstantGlobal(decl.name.clone())),
            },
            (_, Some(Initializer::Expr(expr))) => expr
                .constant_word()
                .ok_or_else(|| CodegenError::NonConstantGlobal(decl.name.clone()))?
                .to_string(),
            (_, Some(Initializer::List(..))) => {
                return Err(CodegenError::ArrayUnsupported(decl.name.clone()))
            }
        };

        debug!("emitting global {} = {}", decl.name, value);
        let label = self.target.mangle(&decl.name);
        self.emit_directive(".data")?;
        self.emit_label(&label)?;
        EMIT!(self, ".quad {}", value)
    }

    fn gen_function(&mut self, decl: &Decl) -> Result<(), CodegenError> {
        let body = match &decl.body {
            Some(body) => body,
            None => {
                debug!("skipping prototype {}", decl.name);
                return Ok(());
            }
        };

        let symbol = decl
            .symbol
            .as_ref()
            .ok_or_else(|| CodegenError::UnresolvedName(decl.name.clone()))?;
        let local_count = symbol.borrow().local_count;
        let param_count = decl.declared_type.params().len();

        if param_count > ARGUMENT_REGISTERS.len() {
            return Err(CodegenError::TooManyParameters {
                name: decl.name.clone(),
                count: param_count,
                limit: ARGUMENT_REGISTERS.len(),
            });
        }

        debug!(
            "emitting function {} ({} param(s), {} local(s))",
            decl.name, param_count, local_count
        );

        self.registers.reset();
        self.frame = Some(Frame {
            name: decl.name.clone(),
            param_count,
        });

        let label = self.target.mangle(&decl.name);
        self.emit_directive(".text")?;
        EMIT!(self, ".globl {}", label)?;
        self.emit_label(&label)?;

        EMIT!(self, "pushq %rbp")?;
        EMIT!(self, "movq %rsp, %rbp")?;
        let frame_size = (8 * (param_count + local_count)).next_multiple_of(16);
        if frame_size > 0 {
            EMIT!(self, "subq ${}, %rsp", frame_size)?;
        }
        for (position, register) in ARGUMENT_REGISTERS.iter().take(param_count).enumerate() {
            EMIT!(self, "movq {}, -{}(%rbp)", register, 8 + 8 * position)?;
        }
        for register in CALLEE_SAVED_REGISTERS {
            EMIT!(self, "pushq {}", register)?;
        }
        EMIT!(self, "subq $8, %rsp")?;

        gen_statement(self, body)?;

        EMIT!(self, "movq $0, %rax")?;
        self.emit_epilogue()?;

        self.frame = None;
        Ok(())
    }
}

/// Escapes a string for a `.string` directive. Bytes outside printable
/// ASCII are written as octal escapes.
pub fn escape_assembly_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'"' => escaped.push_str("\\\""),
            b'\\' => escaped.push_str("\\\\"),
            b'\n' => escaped.push_str("\\n"),
            b'\t' => escaped.push_str("\\t"),
            0x20..=0x7e => escaped.push(byte as char),
            _ => escaped.push_str(&format!("\\{:03o}", byte)),
        }
    }
    escaped
}

/// Writes the assembly for `program` to `out`.
pub fn generate_to<W: Write>(program: &Program, target: Target, out: W) -> Result<W, CodegenError> {
    let mut generator = CodeGenerator::new(out, target);
    generator.gen_program(program)?;
    Ok(generator.into_inner())
}

/// Generates the assembly for `program` as a string.
pub fn generate(program: &Program, target: Target) -> Result<String, CodegenError> {
    let buffer = generate_to(program, target, Vec::new())?;
    String::from_utf8(buffer)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}
