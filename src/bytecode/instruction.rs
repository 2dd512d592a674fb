use std::fmt::{Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};

/// A register index exactly as it was unpacked from a nibble. Only `0..REGISTER_COUNT`
/// names a real register; anything else is caught by the register file at execute time.
pub type RegisterIndex = u8;

/**
  Opcodes of the virtual machine.

  The discriminant of each variant is its 4 bit code in the top nibble of a word, so the
  order the opcodes are listed below is significant. Codes 5 through 15 are unassigned
  and fail to decode.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Opcode {
  Halt,  // halt
  Load,  // load( register, immediate )
  Swap,  // swap( register, register, register )
  Mod,   // mod( register, register, register )
  Bez,   // bez( register, offset )
}

impl Opcode {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }
}

/// Holds the unencoded components of an instruction. Each variant carries only the
/// register indices and immediates its opcode uses.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [OpCode:4][Ignored:12]
  Halt,
  /// [OpCode:4][Destination:4][Value:8]
  Load {
    destination: RegisterIndex,
    value: u8
  },
  /// [OpCode:4][Destination:4][Source:4][Temp:4]
  Swap {
    destination: RegisterIndex,
    source: RegisterIndex,
    temp: RegisterIndex
  },
  /// [OpCode:4][Dividend:4][Divisor:4][Destination:4]
  Mod {
    dividend: RegisterIndex,
    divisor: RegisterIndex,
    destination: RegisterIndex
  },
  /// [OpCode:4][Register:4][Offset:8]
  Bez {
    register: RegisterIndex,
    offset: u8
  },
}

impl Instruction {
  pub fn opcode(&self) -> Opcode {
    match self {
      Instruction::Halt         => Opcode::Halt,
      Instruction::Load { .. }  => Opcode::Load,
      Instruction::Swap { .. }  => Opcode::Swap,
      Instruction::Mod  { .. }  => Opcode::Mod,
      Instruction::Bez  { .. }  => Opcode::Bez,
    }
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let opcode = self.opcode();
    match self {

      Instruction::Halt => {
        write!(f, "{}", opcode)
      }

      Instruction::Load { destination, value } => {
        write!(f, "{} r{}, {}", opcode, destination, value)
      }

      Instruction::Swap { destination, source, temp } => {
        write!(f, "{} r{}, r{}, r{}", opcode, destination, source, temp)
      }

      Instruction::Mod { dividend, divisor, destination } => {
        write!(f, "{} r{}, r{}, r{}", opcode, dividend, divisor, destination)
      }

      Instruction::Bez { register, offset } => {
        write!(f, "{} r{}, {}", opcode, register, offset)
      }

    }
  }
}
