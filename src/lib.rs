#![cfg_attr(not(test), no_std)]

//! A binary-buddy allocator whose entire state lives in a fixed-size
//! two-bit-per-cell bitfield. No free lists, no per-allocation
//! metadata: allocation walks the implicit tree down to the smallest
//! fitting block, and free rediscovers the allocated block from the
//! arena offset alone.

mod buddy;
mod inspect;
mod stats;


pub use bitbuddy_field::{
  CellState,
  Field,
  FieldError,
  FieldResult,
  FieldWord,
};

pub use crate::{
  buddy::{
    Buddy,
    BuddyError,
    BuddyResult,
  },
  inspect::Inspect,
  stats::Stats,
};
