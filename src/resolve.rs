// Axel '0vercl0k' Souchet - October 16 2026
//! This turns absolute addresses from the crashed process back into addresses
//! relative to the module.
//!
//! The dump doesn't say where the module got loaded, but it records where a
//! well known function was at crash time ([`crate::CodeRegion::func`]).
//! Comparing it with where that same function sits in a given build of the
//! module gives the `adjust` to subtract from any code address.
use std::ops::Range;

use tracing::{debug, warn};

use crate::{Dump, Rva};

/// Where the reference function lives in a specific build of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownFunction {
    /// Lower-cased file name of the module.
    pub file: &'static str,
    pub version: i32,
    pub build: i32,
    pub addr: u32,
}

/// Every build we know about.
pub const KNOWN_FUNCTIONS: &[KnownFunction] = &[KnownFunction {
    file: "arma2oaserver.exe",
    version: 163,
    build: 131_129,
    addr: 0x00_18_71_77,
}];

/// Look for the reference function of a module; the file name is matched
/// case-insensitively.
#[must_use]
pub fn known_function(file: &str, version: i32, build: i32) -> Option<u32> {
    let file = file.to_lowercase();

    KNOWN_FUNCTIONS
        .iter()
        .find(|k| k.file == file && k.version == version && k.build == build)
        .map(|k| k.addr)
}

/// Where the reference address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// Found in [`KNOWN_FUNCTIONS`].
    Table(u32),
    /// Supplied by the caller.
    Supplied(u32),
    /// Nothing to compare against; no annotation will be produced.
    Unavailable,
}

/// Maps values from the dump to [`Rva`]s when they fall inside the module's
/// code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    reference: Reference,
    adjust: i32,
    text: Range<u64>,
}

impl Resolver {
    /// Figure out the adjust for `dump`. [`KNOWN_FUNCTIONS`] wins over
    /// `known_func`, and a `known_func` of `0` counts as no address.
    #[must_use]
    pub fn new(dump: &Dump, known_func: Option<u32>) -> Self {
        let module = dump.module();
        let header = dump.header();
        let code = dump.code();

        let reference = match known_function(&module.file, header.version, header.build) {
            Some(addr) => Reference::Table(addr),
            None => match known_func {
                Some(addr) if addr != 0 => Reference::Supplied(addr),
                _ => Reference::Unavailable,
            },
        };

        let adjust = match reference {
            Reference::Table(addr) | Reference::Supplied(addr) => {
                code.func.wrapping_sub(addr) as i32
            }
            Reference::Unavailable => {
                warn!(
                    "no reference function for {} {}.{}, addresses won't be resolved",
                    module.file, header.version, header.build
                );
                0
            }
        };

        // A zero adjust also happens when the module was loaded right where the
        // reference says it should be; there is no telling it apart from the
        // unavailable case, so annotations are off in both.
        if adjust == 0 && reference != Reference::Unavailable {
            debug!("adjust is zero, addresses won't be resolved");
        }

        // A negative size can't make it through the decoder, so this is only ever
        // an empty window if the region is empty.
        let base = u64::from(code.base);
        let size = u64::try_from(code.size).unwrap_or_default();

        Self {
            reference,
            adjust,
            text: base..base + size,
        }
    }

    /// Where did the reference address come from?
    #[must_use]
    pub fn reference(&self) -> Reference {
        self.reference
    }

    /// Distance between where the reference function was at crash time and
    /// where it lives in the module.
    #[must_use]
    pub fn adjust(&self) -> i32 {
        self.adjust
    }

    /// Is `value` inside the module's code?
    #[must_use]
    pub fn in_text(&self, value: u32) -> bool {
        self.text.contains(&u64::from(value))
    }

    /// Get the [`Rva`] of `value` if it points in the module's code and there
    /// is a non zero adjust.
    #[must_use]
    pub fn annotate(&self, value: u32) -> Option<Rva> {
        if self.adjust == 0 || !self.in_text(value) {
            return None;
        }

        Some(Rva::new(value.wrapping_sub(self.adjust as u32)))
    }
}
