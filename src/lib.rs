/*!
  A three-register virtual machine. Programs are slices of 16 bit words, each word one
  instruction, executed by a plain fetch-decode-execute loop until a `halt` hands back the
  value of `r0` or a fault stops the run.

  ```
  // load r0, 12 ; load r1, 15 ; mod r1, r0, r0 ; halt
  let words = [0x100C, 0x110F, 0x3100, 0x0000];
  assert_eq!(nibblevm::run(&words), Ok(3));
  ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod config;
pub mod error;
pub mod execution;
pub mod machine;
pub mod program;
pub mod registers;

pub use bytecode::{decode, encode, Instruction, Opcode, Word};
pub use config::{MachineConfig, DEFAULT_CYCLE_LIMIT, REGISTER_COUNT};
pub use error::{DecodeError, ExecError, Fault, FetchError};
pub use execution::{execute, ControlSignal};
pub use machine::{new_vm, run, Machine, MachineState};
pub use program::Program;
pub use registers::RegisterFile;
