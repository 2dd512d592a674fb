//! The fetch-decode-execute loop and the state machine around it.

use std::fmt::{Display, Formatter};

use log::{debug, info, warn};
#[cfg(feature = "trace_computation")]
use log::trace;
use prettytable::{format as TableFormat, Table};

use crate::bytecode::{decode, Word};
use crate::config::MachineConfig;
use crate::error::Fault;
use crate::execution::{execute, ControlSignal};
use crate::program::Program;
use crate::registers::RegisterFile;

/// Where a machine is in its life. `Halted` and `Faulted` are terminal.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MachineState {
  Running,
  /// Carries the value of `r0` at the moment `halt` executed.
  Halted(Word),
  Faulted(Fault),
}

impl MachineState {
  pub fn is_terminal(&self) -> bool {
    !matches!(self, MachineState::Running)
  }
}

impl Display for MachineState {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      MachineState::Running => {
        write!(f, "Running")
      },
      MachineState::Halted(value) => {
        write!(f, "Halted({})", value)
      },
      MachineState::Faulted(fault) => {
        write!(f, "Faulted({})", fault)
      }
    }
  }
}

/**
  One run of one program. The machine owns its register file outright and borrows the
  program, so it can never outlive the words it executes.
*/
pub struct Machine<'p> {
  program   : Program<'p>,
  registers : RegisterFile,
  state     : MachineState,
  config    : MachineConfig,
  /// Cycles started so far, faulting ones included.
  cycles    : u64,
}

impl<'p> Machine<'p> {

  // region Display methods

  fn make_register_table<T> (
      name      : char,
      registers : &[T],
      highlight : Option<usize>,
    ) -> Table
    where T: Display
  {

    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (i, cell) in registers.iter().enumerate() {
      match Some(i) == highlight {

        true  => {
          table.add_row(
            row![r->format!("* --> {}[{}] =", name, i), format!("{}", cell)]
          );
        }

        false => {
          table.add_row(
            row![r->format!("{}[{}] =", name, i), format!("{}", cell)]
          );
        }

      } // end match on highlight
    } // end for
    table
  }

  // endregion

  // region Construction and accessors

  pub fn new(program: Program<'p>) -> Machine<'p> {
    Machine::with_config(program, MachineConfig::default())
  }

  pub fn with_config(program: Program<'p>, config: MachineConfig) -> Machine<'p> {
    Machine {
      program,
      registers : RegisterFile::new(),
      state     : MachineState::Running,
      config,
      cycles    : 0,
    }
  }

  pub fn state(&self) -> MachineState {
    self.state
  }

  pub fn registers(&self) -> &RegisterFile {
    &self.registers
  }

  pub fn program(&self) -> Program<'p> {
    self.program
  }

  pub fn config(&self) -> &MachineConfig {
    &self.config
  }

  pub fn cycles(&self) -> u64 {
    self.cycles
  }

  // endregion

  // region Execution

  /**
    Runs a single fetch-decode-execute cycle. Returns `Some(r0)` once the machine halts.

    A machine that has already halted or faulted does nothing and reports its terminal
    outcome again; faults are never retried.
  */
  pub fn step(&mut self) -> Result<Option<Word>, Fault> {
    match self.state {
      MachineState::Running        => {},
      MachineState::Halted(value)  => return Ok(Some(value)),
      MachineState::Faulted(fault) => return Err(fault),
    }

    match self.cycle() {

      Ok(ControlSignal::Continue) => {
        self.registers.advance_ip(1);
        Ok(None)
      }

      Ok(ControlSignal::Halt) => {
        let value = self.registers.values()[0];
        info!("halted at ip {} after {} cycles with r0 = {}", self.registers.ip(), self.cycles, value);
        self.state = MachineState::Halted(value);
        Ok(Some(value))
      }

      Err(fault) => {
        warn!("faulted at ip {} after {} cycles: {}", self.registers.ip(), self.cycles, fault);
        self.state = MachineState::Faulted(fault);
        Err(fault)
      }

    }
  }

  /// Steps until the machine halts, returning `r0`, or faults.
  pub fn run(&mut self) -> Result<Word, Fault> {
    loop {
      if let Some(value) = self.step()? {
        return Ok(value);
      }
    }
  }

  /// Every cycle that gets past the cycle limit is counted, including one that faults in
  /// fetch, decode or execute.
  fn cycle(&mut self) -> Result<ControlSignal, Fault> {
    if let Some(limit) = self.config.cycle_limit {
      if self.cycles >= limit {
        return Err(Fault::CycleLimitExceeded { limit });
      }
    }
    self.cycles += 1;

    let ip          = self.registers.ip();
    let word        = self.program.fetch(ip)?;
    let instruction = decode(word)?;
    debug!("[{:04}] {:#06x}  {}", ip, word, instruction);

    let signal = execute(&instruction, &mut self.registers)?;

    #[cfg(feature = "trace_computation")] trace!("\n{}", self);

    Ok(signal)
  }

  // endregion

}

/// Builds a machine with the default configuration over `program`.
pub fn new_vm(program: &[Word]) -> Machine<'_> {
  Machine::new(Program::new(program))
}

/// Runs `program` to completion with the default configuration.
pub fn run(program: &[Word]) -> Result<Word, Fault> {
  new_vm(program).run()
}

lazy_static! {
  pub(crate) static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl<'p> Display for Machine<'p> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let listing = self.program.listing();

    let r_table    = Machine::make_register_table('r', &self.registers.values(), None);
    let code_table = Machine::make_register_table('C', &listing, Some(self.registers.ip()));

    let mut combined_table = table!([r_table, code_table]);

    combined_table.set_titles(row![ub->"Registers", ub->"Code"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(
      f,
      "State: {}\tip: {}\tcycles: {}\n{}",
      self.state, self.registers.ip(), self.cycles, combined_table
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::{DecodeError, ExecError, FetchError};
  use pretty_assertions::assert_eq;

  #[test]
  fn lone_halt_returns_zero() {
    let mut machine = new_vm(&[0x0000]);
    assert_eq!(machine.run(), Ok(0));
    assert_eq!(machine.state(), MachineState::Halted(0));
    assert_eq!(machine.cycles(), 1);
  }

  #[test]
  fn step_advances_one_instruction_at_a_time() {
    let words = [0x1007, 0x1109, 0x0000];
    let mut machine = new_vm(&words);

    assert_eq!(machine.step(), Ok(None));
    assert_eq!(machine.registers().ip(), 1);
    assert_eq!(machine.registers().values(), [7, 0, 0]);

    assert_eq!(machine.step(), Ok(None));
    assert_eq!(machine.registers().values(), [7, 9, 0]);

    assert_eq!(machine.step(), Ok(Some(7)));
    assert!(machine.state().is_terminal());
  }

  #[test]
  fn terminal_states_are_sticky() {
    let mut halted = new_vm(&[0x1005, 0x0000]);
    assert_eq!(halted.run(), Ok(5));
    assert_eq!(halted.step(), Ok(Some(5)));
    assert_eq!(halted.cycles(), 2);

    let mut faulted = new_vm(&[0x1005]);
    let fault = faulted.run().unwrap_err();
    assert_eq!(faulted.step(), Err(fault));
    assert_eq!(faulted.state(), MachineState::Faulted(fault));
  }

  #[test]
  fn faulting_cycles_are_counted() {
    let mut fetch_fault = new_vm(&[0x1001]);
    assert!(fetch_fault.run().is_err());
    assert_eq!(fetch_fault.cycles(), 2);

    let mut decode_fault = new_vm(&[0x1001, 0x5000]);
    assert!(decode_fault.run().is_err());
    assert_eq!(decode_fault.cycles(), 2);

    let mut exec_fault = new_vm(&[0x1001, 0x3012]);
    assert!(exec_fault.run().is_err());
    assert_eq!(exec_fault.cycles(), 2);
  }

  #[test]
  fn running_off_the_end_faults() {
    assert_eq!(
      run(&[0x1001, 0x1102]),
      Err(Fault::Fetch(FetchError::OutOfBounds { ip: 2, len: 2 }))
    );
  }

  #[test]
  fn bad_opcode_faults() {
    assert_eq!(
      run(&[0x1001, 0x9ABC]),
      Err(Fault::Decode(DecodeError::UnknownOpcode { opcode: 9, word: 0x9ABC }))
    );
  }

  #[test]
  fn bad_register_faults_at_execute() {
    let mut machine = new_vm(&[0x1301, 0x0000]);
    assert_eq!(
      machine.run(),
      Err(Fault::Exec(ExecError::RegisterOutOfRange { index: 3 }))
    );
    assert_eq!(machine.registers().ip(), 0);
  }

  #[test]
  fn modulus_by_zero_faults() {
    // load r0, 15 ; mod r0, r1, r2
    assert_eq!(
      run(&[0x100F, 0x3012, 0x0000]),
      Err(Fault::Exec(ExecError::DivisionByZero { divisor: 1 }))
    );
  }

  #[test]
  fn taken_branch_moves_by_one_minus_offset() {
    // load r1, 1 ; load r0, 4 ; bez r2, 1 (taken at ip 2)
    let words = [0x1101, 0x1004, 0x4201, 0x0000];
    let mut machine = new_vm(&words);
    machine.step().unwrap();
    machine.step().unwrap();
    assert_eq!(machine.registers().ip(), 2);

    machine.step().unwrap();
    assert_eq!(machine.registers().ip(), 2);
  }

  #[test]
  fn untaken_branch_moves_by_one() {
    // load r1, 1 ; bez r1, 1 ; halt
    let mut machine = new_vm(&[0x1101, 0x4101, 0x0000]);
    machine.step().unwrap();
    machine.step().unwrap();
    assert_eq!(machine.registers().ip(), 2);
    assert_eq!(machine.run(), Ok(0));
  }

  #[test]
  fn branch_before_start_faults() {
    assert_eq!(
      run(&[0x4003]),
      Err(Fault::Exec(ExecError::BranchUnderflow { ip: 0, offset: 3 }))
    );
  }

  #[test]
  fn self_loop_hits_cycle_limit() {
    // load r0, 1 ; bez r2, 1 (lands on itself forever)
    let words = [0x1001, 0x4201];
    let config = MachineConfig::default().with_cycle_limit(50);
    let mut machine = Machine::with_config(Program::new(&words), config);

    assert_eq!(machine.run(), Err(Fault::CycleLimitExceeded { limit: 50 }));
    assert_eq!(machine.cycles(), 50);
    assert_eq!(machine.registers().ip(), 1);
  }

  #[test]
  fn unlimited_machines_have_no_ceiling() {
    let words = [0x0000];
    let machine = Machine::with_config(Program::new(&words), MachineConfig::unlimited());
    assert_eq!(machine.config().cycle_limit, None);
  }

  #[test]
  fn display_shows_registers_and_code() {
    let mut machine = new_vm(&[0x1003, 0x0000]);
    machine.step().unwrap();
    let text = machine.to_string();

    assert!(text.starts_with("State: Running\tip: 1\tcycles: 1"));
    assert!(text.contains("r[0] ="));
    assert!(text.contains("* --> C[1] ="));
    assert!(text.contains("load r0, 3"));
  }

  #[cfg(feature = "trace_computation")]
  #[test]
  fn traced_run_dumps_every_cycle() {
    let _ = env_logger::builder()
      .is_test(true)
      .filter_level(log::LevelFilter::Trace)
      .try_init();

    // load r0, 6 ; load r1, 4 ; mod r0, r1, r0 ; halt
    let mut machine = new_vm(&[0x1006, 0x1104, 0x3010, 0x0000]);
    assert_eq!(machine.run(), Ok(2));
    assert_eq!(machine.cycles(), 4);
  }
}
