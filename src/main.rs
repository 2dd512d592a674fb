use log::info;

use nibblevm::{Machine, Program, Word};

/// Euclid's algorithm on 12 and 15, three rounds of `mod` and `swap`. Each round replaces
/// `(r0, r1)` with `(r1, r0 % r1)`; once `r1` reaches zero `r0` holds the divisor.
const GCD_12_15: [Word; 9] = [
  0x100C, // load r0, 12
  0x110F, // load r1, 15
  0x3010, // mod  r0, r1, r0
  0x2010, // swap r0, r1, r0
  0x3010, // mod  r0, r1, r0
  0x2010, // swap r0, r1, r0
  0x3010, // mod  r0, r1, r0
  0x2010, // swap r0, r1, r0
  0x0000, // halt
];

fn main() {
  env_logger::init();

  let program = Program::new(&GCD_12_15);
  info!("Program:\n{}", program);

  let mut machine = Machine::new(program);
  match machine.run() {
    Ok(value) => {
      println!("{}", value);
    }
    Err(fault) => {
      eprintln!("Error: {}\n{}", fault, machine);
      std::process::exit(1);
    }
  }
}
