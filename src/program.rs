//! A read-only view over the caller's encoded words.

use std::fmt::{Display, Formatter};

use prettytable::Table;

use crate::bytecode::{decode, Word};
use crate::error::FetchError;
use crate::machine::TABLE_DISPLAY_FORMAT;

/**
  The instruction memory of one run. The words are borrowed, never copied or modified,
  so any number of machines may execute the same buffer at once, on any thread, as long
  as the buffer outlives them.
*/
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Program<'a> {
  words: &'a [Word],
}

impl<'a> Program<'a> {

  pub fn new(words: &'a [Word]) -> Program<'a> {
    Program { words }
  }

  pub fn fetch(&self, ip: usize) -> Result<Word, FetchError> {
    match self.words.get(ip) {
      Some(word) => Ok(*word),
      None       => Err(FetchError::OutOfBounds { ip, len: self.words.len() })
    }
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  pub fn words(&self) -> &'a [Word] {
    self.words
  }

  /// Lists every word with its address and decoded form. Words that do not decode are
  /// listed with the decode error in place of the instruction.
  pub fn disassemble(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubr->"Word", ubl->"Instruction"]);

    for (address, (word, text)) in self.words.iter().zip(self.listing()).enumerate() {
      table.add_row(row![r->address, r->format!("{:#06x}", word), text]);
    }
    table
  }

  /// The decoded form of every word, in program order. Words that do not decode are
  /// given as the decode error in angle brackets.
  pub fn listing(&self) -> Vec<String> {
    self.words
        .iter()
        .map(|word| match decode(*word) {
          Ok(instruction) => instruction.to_string(),
          Err(error)      => format!("<{}>", error)
        })
        .collect()
  }

}

impl<'a> From<&'a [Word]> for Program<'a> {
  fn from(words: &'a [Word]) -> Self {
    Program::new(words)
  }
}

impl<'a> Display for Program<'a> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.disassemble())
  }
}
