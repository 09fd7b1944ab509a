// Axel '0vercl0k' Souchet - October 16 2026
#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]
mod addr;
mod cursor;
mod error;
mod parse;
mod render;
mod resolve;
mod structs;

pub use addr::{Rva, Va};
pub use cursor::{Cursor, LeInt};
pub use error::{Error, Result};
pub use parse::{parse, Dump};
pub use render::{render, Report};
pub use resolve::{known_function, KnownFunction, Reference, Resolver, KNOWN_FUNCTIONS};
pub use structs::{
    CodeRegion, Context, EFlags, FloatingSaveArea, Header, ModuleInfo, StackSnapshot,
    CONTEXT_SIZE, CRC_PAGE_SIZE, FORMAT_VERSION, MAGIC,
};
