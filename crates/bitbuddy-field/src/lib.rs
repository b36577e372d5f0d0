#![cfg_attr(not(test), no_std)]

use core::{
  ptr::NonNull,
  sync::atomic::{
    AtomicU8,
    Ordering,
  },
};


#[derive(Debug, PartialEq)]
pub enum FieldError {
  InsufficientSize { have: usize, need: usize },
  OutOfBounds { cell: usize, cells: usize },
  Corrupt { cell: usize },
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Backing word of the field. A byte so the packing stays byte-oriented
/// and the reversed debug rendering stays meaningful; atomic so mutators
/// can take `&self`.
pub type FieldWord = AtomicU8;

const CELL_BITS: usize = 2;
const BYTE_BITS: usize = 8;

/// Tag carried by one tree cell: two bits, low bit set only for `Full`,
/// high bit set for anything non-`Free`. The encoding `01` is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
  Free,
  Split,
  Full,
}

impl CellState {
  const fn bits(self) -> u8 {
    match self {
      CellState::Free => 0b00,
      CellState::Split => 0b10,
      CellState::Full => 0b11,
    }
  }
}

/// Two bits per cell over caller-provided storage. Cells are addressed
/// with the 1-based heap numbering of the tree they describe.
///
/// The field borrows its words at construction and records only the
/// start pointer: the cell count fixes the number of bytes in play, so
/// no separate length is tracked. The storage must outlive the field.
#[derive(Debug)]
pub struct Field {
  words: NonNull<FieldWord>,
  cells: usize,
}

// shared access is sound, the words are atomic; single-owner callers
// that need to move across threads wrap the whole allocator anyway
unsafe impl Send for Field {}
unsafe impl Sync for Field {}

impl Field {
  #[inline(always)]
  pub const fn bytes(cells: usize) -> usize {
    (cells * CELL_BITS).div_ceil(BYTE_BITS)
  }

  #[inline(always)]
  pub const fn cells(&self) -> usize {
    self.cells
  }

  #[inline(always)]
  pub const fn byte_len(&self) -> usize {
    Self::bytes(self.cells)
  }

  /// Byte index and in-byte shift of the cell's bit pair. Both bits of
  /// a pair start on an even bit position, so they never straddle a
  /// byte boundary.
  const fn position(&self, cell: usize) -> FieldResult<(usize, u32)> {
    if cell == 0 || cell > self.cells {
      return Err(FieldError::OutOfBounds {
        cell,
        cells: self.cells,
      });
    }
    let low = (cell - 1) * CELL_BITS;
    Ok((low / BYTE_BITS, (low % BYTE_BITS) as u32))
  }

  /// The words actually covered by the tracked cells.
  #[inline(always)]
  fn slice(&self) -> &[FieldWord] {
    unsafe { core::slice::from_raw_parts(self.words.as_ptr(), Self::bytes(self.cells)) }
  }

  pub fn zero(store: &[FieldWord], cells: usize) -> FieldResult<Field> {
    let need = Self::bytes(cells);
    if store.len() < need {
      return Err(FieldError::InsufficientSize {
        have: store.len(),
        need,
      });
    }

    let field = Field {
      words: NonNull::from(store).cast::<FieldWord>(),
      cells,
    };
    field.clear_all();
    Ok(field)
  }

  pub fn state(&self, cell: usize) -> FieldResult<CellState> {
    let (index, shift) = self.position(cell)?;
    let byte = self.slice()[index].load(Ordering::Relaxed);
    match (byte >> shift) & 0b11 {
      0b00 => Ok(CellState::Free),
      0b10 => Ok(CellState::Split),
      0b11 => Ok(CellState::Full),
      _ => Err(FieldError::Corrupt { cell }),
    }
  }

  pub fn set(&self, cell: usize, state: CellState) -> FieldResult<()> {
    let (index, shift) = self.position(cell)?;
    let word = &self.slice()[index];
    word.fetch_and(!(0b11 << shift), Ordering::Relaxed);
    word.fetch_or(state.bits() << shift, Ordering::Relaxed);
    Ok(())
  }

  #[inline]
  pub fn is_free(&self, cell: usize) -> FieldResult<bool> {
    Ok(self.state(cell)? == CellState::Free)
  }

  #[inline]
  pub fn is_split(&self, cell: usize) -> FieldResult<bool> {
    Ok(self.state(cell)? == CellState::Split)
  }

  #[inline]
  pub fn is_full(&self, cell: usize) -> FieldResult<bool> {
    Ok(self.state(cell)? == CellState::Full)
  }

  pub fn clear_all(&self) {
    for word in self.slice() {
      word.store(0, Ordering::Relaxed);
    }
  }

  pub fn is_clear(&self) -> bool {
    self
      .slice()
      .iter()
      .all(|word| word.load(Ordering::Relaxed) == 0)
  }

  /// Raw byte of the packed field, for rendering and state snapshots.
  pub fn byte(&self, index: usize) -> Option<u8> {
    if index >= self.byte_len() {
      return None;
    }
    Some(self.slice()[index].load(Ordering::Relaxed))
  }
}
