/*!

  The VM uses a 16 bit word size. Every instruction is exactly one word, and a program
  is nothing more than a slice of words indexed by the instruction pointer. Words are
  split into nibbles, most significant nibble first:

    [Opcode:4][Field1:4][Field2:4][Field3:4]

  The opcode nibble always comes first. Three-operand instructions (`swap`, `mod`) read
  each remaining nibble as a register index. `load` and `bez` read the second nibble as
  a register index and the low byte as a single 8 bit immediate:

    [Opcode:4][Register:4][Immediate:8]

  `halt` ignores everything below the opcode.

  Decoding is a pure bit-unpacking step. It knows nothing about the size of the register
  file, so a register nibble of 3 through 15 decodes happily and only fails once the
  instruction is executed.

*/

mod binary;
mod instruction;

pub use binary::{decode, encode, opcode_of, Word};
pub use instruction::{Instruction, Opcode, RegisterIndex};
