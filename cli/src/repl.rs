use std::io::{
  BufRead,
  Write,
};

use anyhow::Result;
use bitbuddy::{
  Buddy,
  BuddyError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  Alloc,
  Free,
  Print,
  Quit,
  Help,
}

/// Commands are matched on the first non-whitespace character, the
/// rest of the line is ignored.
pub fn parse_command(line: &str) -> Command {
  match line.trim_start().chars().next() {
    Some('a') | Some('A') => Command::Alloc,
    Some('f') | Some('F') => Command::Free,
    Some('p') | Some('P') => Command::Print,
    Some('q') | Some('Q') => Command::Quit,
    _ => Command::Help,
  }
}

/// Addresses come back from the `A` command as `0x`-prefixed hex; bare
/// decimal is accepted too.
pub fn parse_addr(text: &str) -> Option<usize> {
  let text = text.trim();
  if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
    usize::from_str_radix(hex, 16).ok()
  } else {
    text.parse().ok()
  }
}

pub fn run<R, W>(buddy: &mut Buddy, mut input: R, mut out: W) -> Result<()>
where
  R: BufRead,
  W: Write,
{
  writeln!(
    out,
    "configured for {} levels which provides {} allocation cells",
    buddy.levels(),
    Buddy::cells(buddy.levels())
  )?;

  loop {
    write!(out, ">")?;
    out.flush()?;

    let Some(line) = read_line(&mut input)? else {
      return Ok(());
    };

    match parse_command(&line) {
      Command::Quit => return Ok(()),
      Command::Alloc => {
        write!(out, "how many?\n>")?;
        out.flush()?;
        let Some(line) = read_line(&mut input)? else {
          return Ok(());
        };
        match line.trim().parse::<usize>() {
          Ok(want) => match buddy.allocate(want) {
            Ok(ptr) => writeln!(out, "alloc @ {:p}", ptr.as_ptr())?,
            Err(BuddyError::OutOfMemory { requested }) => {
              eprintln!("out of memory for a {requested} byte request");
            }
            Err(err) => eprintln!("allocation failed: {err:?}"),
          },
          Err(_) => eprintln!("not a size: {}", line.trim()),
        }
      }
      Command::Free => {
        write!(out, "which addr?\n>")?;
        out.flush()?;
        let Some(line) = read_line(&mut input)? else {
          return Ok(());
        };
        match parse_addr(&line) {
          Some(addr) => match buddy.deallocate(addr as *mut u8) {
            Ok(()) => {}
            Err(BuddyError::NullFree) => eprintln!("free on null requested"),
            Err(BuddyError::OutOfRange { addr }) => {
              eprintln!("free on {addr:#x} outside the arena");
            }
            Err(BuddyError::UnknownPointer { offset }) => {
              eprintln!("no allocation starts at arena offset {offset}");
            }
            Err(err) => eprintln!("free failed: {err:?}"),
          },
          None => eprintln!("not an address: {}", line.trim()),
        }
      }
      Command::Print => writeln!(out, "{}", buddy.inspect())?,
      Command::Help => {
        writeln!(out, "Q to quit, A to allocate, F to free, P to print")?;
      }
    }
  }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
  let mut line = String::new();
  if input.read_line(&mut line)? == 0 {
    return Ok(None);
  }
  Ok(Some(line))
}
