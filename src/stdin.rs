use std::io::{self, IsTerminal, Read, StdinLock};

use crate::git::Utf8String;

/// Standard input when a diff is piped into the process (`git diff | gitiax`).
///
/// `None` when standard input is a terminal so an interactive run never
/// blocks waiting for input.
pub fn piped() -> Option<StdinLock<'static>> {
  let stdin = io::stdin();
  if stdin.is_terminal() {
    return None;
  }

  Some(stdin.lock())
}

pub fn read_all(mut reader: impl Read) -> io::Result<String> {
  let mut buf = Vec::new();
  reader.read_to_end(&mut buf)?;
  log::debug!("[stdin] Read {} bytes", buf.len());
  Ok(buf.to_utf8())
}
