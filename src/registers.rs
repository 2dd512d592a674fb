//! The register file: three word-sized registers and the instruction pointer, with the
//! bounds checks that turn a stray register nibble into a fault.

use std::fmt::{Display, Formatter};

use crate::bytecode::{RegisterIndex, Word};
use crate::config::REGISTER_COUNT;
use crate::error::ExecError;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegisterFile {
  registers : [Word; REGISTER_COUNT],
  /// Index of the next word to fetch.
  ip        : usize,
}

impl Default for RegisterFile {
  fn default() -> Self {
    RegisterFile::new()
  }
}

impl RegisterFile {

  pub fn new() -> RegisterFile {
    RegisterFile {
      registers : [0; REGISTER_COUNT],
      ip        : 0,
    }
  }

  /// Converts a decoded register nibble into an index into the register array.
  fn slot(index: RegisterIndex) -> Result<usize, ExecError> {
    match (index as usize) < REGISTER_COUNT {
      true  => Ok(index as usize),
      false => Err(ExecError::RegisterOutOfRange { index })
    }
  }

  /// Fails with `RegisterOutOfRange` unless `index` names a register.
  pub fn require_register(index: RegisterIndex) -> Result<(), ExecError> {
    RegisterFile::slot(index).map(|_| ())
  }

  pub fn read(&self, index: RegisterIndex) -> Result<Word, ExecError> {
    Ok(self.registers[RegisterFile::slot(index)?])
  }

  pub fn write(&mut self, index: RegisterIndex, value: Word) -> Result<(), ExecError> {
    self.registers[RegisterFile::slot(index)?] = value;
    Ok(())
  }

  /// A copy of every register, `r0` first.
  pub fn values(&self) -> [Word; REGISTER_COUNT] {
    self.registers
  }

  pub fn ip(&self) -> usize {
    self.ip
  }

  pub fn set_ip(&mut self, value: usize) {
    self.ip = value;
  }

  pub fn advance_ip(&mut self, delta: usize) {
    self.ip += delta;
  }

  /**
    Moves the instruction pointer back by `offset`. The instruction pointer never goes
    below zero, so a branch further back than the start of the program is a fault.
  */
  pub fn rewind_ip(&mut self, offset: usize) -> Result<(), ExecError> {
    match self.ip.checked_sub(offset) {
      Some(ip) => {
        self.ip = ip;
        Ok(())
      }
      None     => Err(ExecError::BranchUnderflow { ip: self.ip, offset })
    }
  }

}

impl Display for RegisterFile {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    for (i, value) in self.registers.iter().enumerate() {
      write!(f, "r{}={} ", i, value)?;
    }
    write!(f, "ip={}", self.ip)
  }
}
