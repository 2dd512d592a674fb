//! The fault taxonomy of the machine. Every error is fatal to the run that raised it.

use thiserror::Error;

use crate::bytecode::{RegisterIndex, Word};

/// A word whose opcode nibble names no operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
  #[error("unrecognized opcode {opcode} in word {word:#06x}")]
  UnknownOpcode {
    opcode: u8,
    word: Word,
  },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
  #[error("instruction pointer {ip} is outside the program (length {len})")]
  OutOfBounds {
    ip: usize,
    len: usize,
  },
}

/// Failures raised while an already decoded instruction runs against the register file.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecError {
  #[error("register index {index} is out of range")]
  RegisterOutOfRange {
    index: RegisterIndex,
  },

  #[error("division by zero: divisor register r{divisor} holds 0")]
  DivisionByZero {
    divisor: RegisterIndex,
  },

  #[error("branch at {ip} with offset {offset} moves before the start of the program")]
  BranchUnderflow {
    ip: usize,
    offset: usize,
  },
}

/// The reason a run ended in the `Faulted` state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
  #[error("fetch failed: {0}")]
  Fetch(#[from] FetchError),

  #[error("decode failed: {0}")]
  Decode(#[from] DecodeError),

  #[error("execution failed: {0}")]
  Exec(#[from] ExecError),

  #[error("cycle limit of {limit} reached without halting")]
  CycleLimitExceeded {
    limit: u64,
  },
}
