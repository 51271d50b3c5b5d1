//! Scratch register allocation.
//!
//! Expression temporaries live in a fixed pool of seven registers. There is
//! no spilling: running out of registers stops code generation.

use std::fmt::Display;

use log::trace;

use crate::errors::errors::CodegenError;

/// The scratch pool, in allocation order. None of these carry arguments or
/// take part in multiply/divide.
pub const SCRATCH_REGISTERS: [&str; 7] = ["%rbx", "%r10", "%r11", "%r12", "%r13", "%r14", "%r15"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register(usize);

impl Register {
    pub fn name(&self) -> &'static str {
        SCRATCH_REGISTERS[self.0]
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Default)]
pub struct RegisterAllocator {
    in_use: [bool; SCRATCH_REGISTERS.len()],
}

impl RegisterAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first free register.
    pub fn alloc(&mut self) -> Result<Register, CodegenError> {
        match self.in_use.iter().position(|used| !used) {
            Some(index) => {
                self.in_use[index] = true;
                trace!("allocated {}", SCRATCH_REGISTERS[index]);
                Ok(Register(index))
            }
            None => Err(CodegenError::RegistersExhausted(SCRATCH_REGISTERS.len())),
        }
    }

    pub fn free(&mut self, register: Register) {
        debug_assert!(self.in_use[register.0], "freed {} twice", register);
        self.in_use[register.0] = false;
        trace!("freed {}", register);
    }

    pub fn reset(&mut self) {
        self.in_use = [false; SCRATCH_REGISTERS.len()];
    }

    pub fn live_count(&self) -> usize {
        self.in_use.iter().filter(|used| **used).count()
    }
}
