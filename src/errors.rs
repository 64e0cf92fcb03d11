use thiserror::Error;

use crate::memory::TypeAddr;

pub type Result<T> = std::result::Result<T, ChipError>;

/// Faults that halt the machine. `pc` is always the address of the
/// instruction that raised the fault, not the already-advanced counter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipError {
    #[error("unknown opcode {opcode:#06X} at pc {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: TypeAddr },

    #[error("call stack overflow at pc {pc:#05X}")]
    StackOverflow { pc: TypeAddr },

    #[error("return with empty call stack at pc {pc:#05X}")]
    StackUnderflow { pc: TypeAddr },

    #[error("memory access out of bounds at {addr:#05X} (pc {pc:#05X})")]
    OutOfBounds { addr: TypeAddr, pc: TypeAddr },
}
