//! Per-instruction semantics. Execution only ever touches the register file; the
//! program buffer is out of reach here.

use crate::bytecode::{Instruction, Word};
use crate::error::ExecError;
use crate::registers::RegisterFile;

/// What the run loop should do after an instruction has executed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ControlSignal {
  Continue,
  Halt,
}

/**
  Applies one decoded instruction to the register file.

  Every register index an instruction names is checked before anything is written, so a
  failing instruction leaves the register file exactly as it found it. The normal advance
  of the instruction pointer is the run loop's business; the only instruction pointer
  change made here is the backward jump of a taken `bez`.
*/
pub fn execute(
  instruction: &Instruction,
  registers: &mut RegisterFile
) -> Result<ControlSignal, ExecError> {
  match *instruction {

    Instruction::Halt => {
      return Ok(ControlSignal::Halt);
    }

    Instruction::Load { destination, value } => {
      registers.write(destination, value as Word)?;
    }

    Instruction::Swap { destination, source, temp } => {
      let old_source      = registers.read(source)?;
      let old_destination = registers.read(destination)?;
      RegisterFile::require_register(temp)?;

      // `temp` is scratch storage and keeps the old source value afterward.
      registers.write(temp, old_source)?;
      registers.write(source, old_destination)?;
      registers.write(destination, old_source)?;
    }

    Instruction::Mod { dividend, divisor, destination } => {
      let numerator   = registers.read(dividend)?;
      let denominator = registers.read(divisor)?;
      RegisterFile::require_register(destination)?;

      if denominator == 0 {
        return Err(ExecError::DivisionByZero { divisor });
      }
      registers.write(destination, numerator % denominator)?;
    }

    Instruction::Bez { register, offset } => {
      if registers.read(register)? == 0 {
        registers.rewind_ip(offset as usize)?;
      }
    }

  }

  Ok(ControlSignal::Continue)
}
