// Axel '0vercl0k' Souchet - October 16 2026
//! This is the error type used across the codebase.
use thiserror::Error;

use crate::structs::{CONTEXT_SIZE, FORMAT_VERSION, MAGIC};

pub type Result<R> = std::result::Result<R, Error>;

/// Everything that can go wrong while decoding a dump.
///
/// All of those are fatal: the dump is rejected as a whole and no partially
/// decoded [`crate::Dump`] ever makes it back to the caller. Failing to resolve
/// addresses isn't an error; it only turns the annotations off (cf
/// [`crate::Reference::Unavailable`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("header's magic looks wrong: {0:x?} vs {:x?}", MAGIC)]
    MagicMismatch([u8; 4]),
    #[error("header's format version looks wrong: {0} vs {}", FORMAT_VERSION)]
    VersionMismatch(i32),
    #[error("truncated: wanted {wanted} bytes at offset {offset:#x} but only {left} are left")]
    Truncated {
        offset: usize,
        wanted: usize,
        left: usize,
    },
    #[error("context size looks wrong: {0:#x} vs {:#x}", CONTEXT_SIZE)]
    SizeMismatch(i32),
    #[error("invalid length for {what}: {length}")]
    InvalidLength { what: &'static str, length: i32 },
    #[error("{0} bytes are left after the stack")]
    TrailingData(usize),
}
