// Axel '0vercl0k' Souchet - October 16 2026
//! This has all the parsing logic for `STK7` dumps.
use std::fmt::{self, Debug};

use tracing::debug;

use crate::error::{Error, Result};
use crate::render::Report;
use crate::structs::{CodeRegion, Context, Header, ModuleInfo, StackSnapshot};
use crate::Cursor;

/// A fully decoded dump. It is only ever handed out once every section
/// decoded successfully and the input was consumed to the last byte, and it
/// can't be modified afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Dump {
    /// Version / build of the binary that crashed.
    header: Header,
    /// Register state of the crashing thread.
    context: Box<Context>,
    /// Which module crashed.
    module: ModuleInfo,
    /// Where its code lived and the page checksums.
    code: CodeRegion,
    /// The captured stack.
    stack: StackSnapshot,
}

impl Debug for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dump")
            .field("header", &self.header)
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}

impl Dump {
    /// Parse a dump out of its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the sections is malformed or truncated, or
    /// if bytes are left over once the stack has been read.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let header = Header::decode(&mut cursor)?;
        let context = Box::new(Context::decode(&mut cursor)?);
        let module = ModuleInfo::decode(&mut cursor)?;
        let code = CodeRegion::decode(&mut cursor)?;
        let stack = StackSnapshot::decode(&mut cursor)?;

        // The stack is the last section; anything after it means the dump isn't
        // what we think it is.
        if !cursor.is_empty() {
            debug!(
                "{} trailing bytes at {:#x}",
                cursor.remaining(),
                cursor.position()
            );
            return Err(Error::TrailingData(cursor.remaining()));
        }

        Ok(Self {
            header,
            context,
            module,
            code,
            stack,
        })
    }

    /// Get the header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Get the context record.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Get the module information.
    pub fn module(&self) -> &ModuleInfo {
        &self.module
    }

    /// Get the code region.
    pub fn code(&self) -> &CodeRegion {
        &self.code
    }

    /// Get the stack snapshot.
    pub fn stack(&self) -> &StackSnapshot {
        &self.stack
    }

    /// Build a textual report of the dump. `known_func` is where the well
    /// known function lives in the module, and is only used if the module
    /// isn't in [`crate::KNOWN_FUNCTIONS`].
    pub fn report(&self, known_func: Option<u32>) -> Report<'_> {
        Report::new(self, known_func)
    }
}

/// Parse a dump out of its raw bytes; cf [`Dump::parse`].
pub fn parse(data: &[u8]) -> Result<Dump> {
    Dump::parse(data)
}
