//! Central configuration and constants for the machine.

/// Number of general purpose registers, `r0` through `r2`.
pub const REGISTER_COUNT: usize = 3;

/// Cycles a run may take before it is stopped. The instruction set has no bound on
/// iteration, so a `bez` that keeps landing on itself would otherwise spin forever.
pub const DEFAULT_CYCLE_LIMIT: u64 = 1_000_000;

/// Options fixed for the lifetime of a `Machine`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MachineConfig {
  /// `None` lets a run go on until it halts or faults.
  pub cycle_limit: Option<u64>,
}

impl Default for MachineConfig {
  fn default() -> Self {
    MachineConfig {
      cycle_limit: Some(DEFAULT_CYCLE_LIMIT),
    }
  }
}

impl MachineConfig {
  pub fn unlimited() -> Self {
    MachineConfig { cycle_limit: None }
  }

  pub fn with_cycle_limit(mut self, limit: u64) -> Self {
    self.cycle_limit = Some(limit);
    self
  }
}
