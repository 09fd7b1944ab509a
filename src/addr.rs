// Axel '0vercl0k' Souchet - October 16 2026
//! This contains strong types for the two kinds of 32-bit addresses the
//! report deals with: absolute Virtual Addresses ([`Va`]) as they were in the
//! crashed process, and Relative Virtual Addresses ([`Rva`]) that don't depend
//! on where the module got loaded.
//!
//! Both display as exactly 8 upper-case hexadecimal digits without prefix.
//!
//! # Examples
//!
//! ```
//! use bidmp_parser::{Rva, Va};
//! let va = Va::new(0x40_10_00);
//! assert_eq!(va.to_string(), "00401000");
//! let rva = Rva::new(0x10_00);
//! assert_eq!(rva.to_string(), "00001000");
//! ```
use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

/// Strong type for absolute Virtual Addresses.
///
/// # Examples
///
/// ```
/// # use bidmp_parser::Va;
/// # fn main() {
/// let va: Va = "0x0018_7177".replace('_', "").parse().unwrap();
/// assert_eq!(va.u32(), 0x18_71_77);
/// let va: Va = "00187177".parse().unwrap();
/// assert_eq!(va, Va::new(0x18_71_77));
/// # }
/// ```
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Default, PartialOrd, Ord)]
pub struct Va(u32);

impl Va {
    /// Create a new [`Va`].
    #[must_use]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Get the underlying [`u32`].
    #[must_use]
    pub const fn u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Va {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Va> for u32 {
    fn from(value: Va) -> Self {
        value.0
    }
}

/// Format a [`Va`] as a string.
impl Display for Va {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// Parse a [`Va`] from an hexadecimal string; `0x` and windbg's backticks are
/// accepted.
impl FromStr for Va {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.replace('`', "");
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(&s);

        Ok(Va::new(u32::from_str_radix(s, 16)?))
    }
}

/// Strong type for Relative Virtual Addresses.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Default, PartialOrd, Ord)]
pub struct Rva(u32);

impl Rva {
    /// Create a new [`Rva`].
    #[must_use]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Get the underlying [`u32`].
    #[must_use]
    pub const fn u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Rva {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Rva> for u32 {
    fn from(value: Rva) -> Self {
        value.0
    }
}

/// Format a [`Rva`] as a string.
impl Display for Rva {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}
