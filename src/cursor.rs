// Axel '0vercl0k' Souchet - October 16 2026
//! This implements a forward-only cursor over the dump bytes. Every read is
//! bounds checked and either fully succeeds & moves the cursor forward, or
//! fails and leaves the cursor where it was.
//!
//! # Examples
//!
//! ```
//! use bidmp_parser::Cursor;
//! let data = [0x37, 0x13, 0, 0, 0xaa];
//! let mut cursor = Cursor::new(&data);
//! assert_eq!(cursor.read::<u32>().unwrap(), 0x1337);
//! assert!(cursor.read::<u32>().is_err());
//! assert_eq!(cursor.position(), 4);
//! ```
use std::fmt::{self, Debug};

use tracing::trace;

use crate::error::{Error, Result};

/// A fixed-width integer that is stored little-endian in the dump.
pub trait LeInt: Sized + Copy {
    /// How many bytes it takes in the dump.
    const SIZE: usize;

    /// Decode it out of exactly [`LeInt::SIZE`] bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_le_int {
    ($($ty:ident),*) => {
        $(impl LeInt for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut raw = [0; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);

                $ty::from_le_bytes(raw)
            }
        })*
    };
}

impl_le_int!(u8, u16, u32, i32, u64, i64);

/// A `(position, end)` pair over an immutable buffer of bytes.
///
/// It is [`Copy`] on purpose: composite decoders work on a copy and only
/// write it back once they fully succeeded (cf [`Cursor::transaction`]).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'data> {
    data: &'data [u8],
    pos: usize,
}

impl Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("pos", &self.pos)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<'data> Cursor<'data> {
    /// Create a cursor that starts at the beginning of `data`.
    #[must_use]
    pub fn new(data: &'data [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Where is the cursor at, relative to the beginning of the buffer?
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// How many bytes are left to read?
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Has the whole buffer been consumed?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read `len` bytes. The returned slice borrows from the underlying buffer
    /// and the cursor is left untouched if there isn't enough data.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'data [u8]> {
        let left = self.remaining();
        if len > left {
            return Err(Error::Truncated {
                offset: self.pos,
                wanted: len,
                left,
            });
        }

        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;

        Ok(bytes)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0; N];
        array.copy_from_slice(self.read_bytes(N)?);

        Ok(array)
    }

    /// Read a little-endian integer.
    pub fn read<T: LeInt>(&mut self) -> Result<T> {
        self.read_bytes(T::SIZE).map(T::from_le_slice)
    }

    /// Run `decoder` against a copy of the cursor and only commit its new
    /// position if it succeeded. This is what guarantees that a decoder
    /// failing halfway never leaves the cursor in between two fields.
    pub fn transaction<T>(
        &mut self,
        decoder: impl FnOnce(&mut Cursor<'data>) -> Result<T>,
    ) -> Result<T> {
        let mut local = *self;
        match decoder(&mut local) {
            Ok(t) => {
                *self = local;
                Ok(t)
            }
            Err(e) => {
                trace!("rolling back to {:#x} after {e}", self.pos);
                Err(e)
            }
        }
    }
}
