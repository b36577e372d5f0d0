use core::fmt;

use bitbuddy_field::Field;

use crate::stats::Stats;

/// Full observable state of an allocator: arena binding, counters and
/// the packed bitfield bytes.
///
/// The `Display` rendering is one header line followed by the field
/// bytes in reverse byte order, each byte as 8 ASCII bits MSB first.
pub struct Inspect<'field> {
  pub(crate) base: *const u8,
  pub(crate) size: usize,
  pub(crate) stats: Stats,
  pub(crate) field: &'field Field,
}

impl Inspect<'_> {
  #[inline(always)]
  pub fn base(&self) -> *const u8 {
    self.base
  }

  #[inline(always)]
  pub const fn size(&self) -> usize {
    self.size
  }

  #[inline(always)]
  pub const fn stats(&self) -> Stats {
    self.stats
  }

  pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
    (0..self.field.byte_len()).map(|index| self.field.byte(index).unwrap_or(0))
  }
}

impl fmt::Display for Inspect<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "start @{:p}\tsize:{}\tinuse:{}\trequested:{}\tunused:{}",
      self.base,
      self.size,
      self.stats.inuse(),
      self.stats.requested(),
      self.stats.unused(),
    )?;
    for index in (0..self.field.byte_len()).rev() {
      write!(f, "[{:08b}],", self.field.byte(index).unwrap_or(0))?;
    }
    Ok(())
  }
}
