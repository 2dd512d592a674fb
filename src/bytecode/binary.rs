/*!
  This module is responsible for the encoding and decoding of binary instructions.

*/
use std::convert::TryFrom;

use super::{Instruction, Opcode, RegisterIndex};
use crate::error::DecodeError;

// If you change this you must also change `encode` and `decode`.
pub type Word = u16;

const NIBBLE: Word = 0xF;
const BYTE: Word = 0xFF;

/// Extracts the opcode nibble. Note that this function does not check that the nibble
/// names an assigned opcode.
pub fn opcode_of(word: Word) -> u8 {
  (word >> 12) as u8
}

fn field1(word: Word) -> RegisterIndex {
  ((word >> 8) & NIBBLE) as RegisterIndex
}

fn field2(word: Word) -> RegisterIndex {
  ((word >> 4) & NIBBLE) as RegisterIndex
}

fn field3(word: Word) -> RegisterIndex {
  (word & NIBBLE) as RegisterIndex
}

fn immediate8(word: Word) -> u8 {
  (word & BYTE) as u8
}

/**
  Unpacks a word into an `Instruction`. Register fields are not checked against the
  register file; that happens when the instruction is executed.
*/
pub fn decode(word: Word) -> Result<Instruction, DecodeError> {
  let opcode = match Opcode::try_from(opcode_of(word)) {
    Ok(opcode) => opcode,
    Err(_)     => {
      return Err(DecodeError::UnknownOpcode { opcode: opcode_of(word), word });
    }
  };

  let instruction =
    match opcode {
      // [OpCode:4]
      Opcode::Halt => Instruction::Halt,

      // [OpCode:4][Register:4][Immediate:8]
      Opcode::Load => Instruction::Load {
        destination: field1(word),
        value: immediate8(word),
      },
      Opcode::Bez => Instruction::Bez {
        register: field1(word),
        offset: immediate8(word),
      },

      // [OpCode:4][Register:4][Register:4][Register:4]
      Opcode::Swap => Instruction::Swap {
        destination: field1(word),
        source: field2(word),
        temp: field3(word),
      },
      Opcode::Mod => Instruction::Mod {
        dividend: field1(word),
        divisor: field2(word),
        destination: field3(word),
      },
    };

  Ok(instruction)
}

fn pack(opcode: Opcode, field1: RegisterIndex, low_byte: Word) -> Word {
  ((opcode.code() as Word) << 12)
    | (((field1 as Word) & NIBBLE) << 8)
    | (low_byte & BYTE)
}

fn pack_nibbles(opcode: Opcode, a: RegisterIndex, b: RegisterIndex, c: RegisterIndex) -> Word {
  pack(
    opcode,
    a,
    (((b as Word) & NIBBLE) << 4) | ((c as Word) & NIBBLE)
  )
}

/**
  Encodes the instruction into bytecode. Register indices are truncated to their nibble,
  so only instructions whose indices fit in 4 bits survive a trip through `decode`.
*/
pub fn encode(instruction: &Instruction) -> Word {
  match *instruction {

    Instruction::Halt => pack(Opcode::Halt, 0, 0),

    Instruction::Load { destination, value } => {
      pack(Opcode::Load, destination, value as Word)
    }

    Instruction::Bez { register, offset } => {
      pack(Opcode::Bez, register, offset as Word)
    }

    Instruction::Swap { destination, source, temp } => {
      pack_nibbles(Opcode::Swap, destination, source, temp)
    }

    Instruction::Mod { dividend, divisor, destination } => {
      pack_nibbles(Opcode::Mod, dividend, divisor, destination)
    }

  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn decode_each_layout() {
    assert_eq!(decode(0x0000), Ok(Instruction::Halt));
    assert_eq!(decode(0x100C), Ok(Instruction::Load { destination: 0, value: 12 }));
    assert_eq!(decode(0x11FF), Ok(Instruction::Load { destination: 1, value: 255 }));
    assert_eq!(
      decode(0x2102),
      Ok(Instruction::Swap { destination: 1, source: 0, temp: 2 })
    );
    assert_eq!(
      decode(0x3012),
      Ok(Instruction::Mod { dividend: 0, divisor: 1, destination: 2 })
    );
    assert_eq!(decode(0x4105), Ok(Instruction::Bez { register: 1, offset: 5 }));
  }

  #[test]
  fn halt_ignores_low_nibbles() {
    assert_eq!(decode(0x0ABC), Ok(Instruction::Halt));
    assert_eq!(decode(0x0FFF), Ok(Instruction::Halt));
  }

  #[test]
  fn register_nibbles_are_not_range_checked() {
    assert_eq!(
      decode(0x3F9E),
      Ok(Instruction::Mod { dividend: 15, divisor: 9, destination: 14 })
    );
  }

  #[test]
  fn unassigned_opcodes_fail() {
    for opcode in 5u16..=15 {
      for low in [0x000u16, 0x123, 0xFFF].iter() {
        let word = (opcode << 12) | low;
        assert_eq!(
          decode(word),
          Err(DecodeError::UnknownOpcode { opcode: opcode as u8, word })
        );
      }
    }
  }

  #[test]
  fn every_word_decodes_without_panicking() {
    let failures = (0..=Word::MAX).filter(|&w| decode(w).is_err()).count();
    // Opcodes 5 through 15 own 11 of the 16 top nibbles.
    assert_eq!(failures, 11 * 0x1000);
  }

  #[test]
  fn encode_inverts_decode() {
    // Halt only round-trips from its canonical all-zero form.
    for word in (0x1000..0x5000u16).chain(std::iter::once(0x0000)) {
      let instruction = decode(word).unwrap();
      assert_eq!(encode(&instruction), word, "word {:#06x}", word);
    }
  }

  #[test]
  fn encode_masks_wide_register_indices() {
    let word = encode(&Instruction::Swap { destination: 0x12, source: 0, temp: 1 });
    assert_eq!(word, 0x2201);
  }

  #[test]
  fn opcode_nibble() {
    assert_eq!(opcode_of(0x4105), 4);
    assert_eq!(opcode_of(0xF000), 15);
  }
}
