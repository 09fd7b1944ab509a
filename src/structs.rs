// Axel '0vercl0k' Souchet - October 16 2026
//! This has all the structures that make up a `STK7` dump, as well as the
//! decoders that pull them out of a [`Cursor`].
//!
//! A dump is five sections laid out back to back, little-endian:
//!
//! ```text
//! [b"STK7"][i32 format version = 103][i32 version][i32 build]
//! [i32 context size = 0x2cc][context]
//! [i32 len][file][i32 len][source][i32 module size][2 bytes extension]
//! [u32 code base][i32 code size][u32 func][code size / 4096 x u32 crc]
//! [u32 stack base][i32 stack size][stack size bytes]
//! ```
use bitflags::bitflags;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::{Cursor, Va};

pub const MAGIC: [u8; 4] = *b"STK7";
pub const FORMAT_VERSION: i32 = 103;

/// Size of the 32-bit `CONTEXT` record stored in the dump.
pub const CONTEXT_SIZE: usize = 0x2_cc;

/// The code region is checksummed page per page.
pub const CRC_PAGE_SIZE: usize = 0x1_000;

/// Identity of the binary that crashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: i32,
    pub build: i32,
}

impl Header {
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        cursor.transaction(|c| {
            let magic = c.read_array::<4>()?;
            if magic != MAGIC {
                return Err(Error::MagicMismatch(magic));
            }

            let format_version = c.read::<i32>()?;
            if format_version != FORMAT_VERSION {
                return Err(Error::VersionMismatch(format_version));
            }

            let header = Self {
                version: c.read()?,
                build: c.read()?,
            };

            debug!("header: {}.{}", header.version, header.build);

            Ok(header)
        })
    }
}

/// The x87 state, `FLOATING_SAVE_AREA` in `winnt.h`.
#[derive(Clone, PartialEq, Eq)]
#[repr(C)]
pub struct FloatingSaveArea {
    pub control_word: u32,
    pub status_word: u32,
    pub tag_word: u32,
    pub error_offset: u32,
    pub error_selector: u32,
    pub data_offset: u32,
    pub data_selector: u32,
    pub register_area: [u8; 80],
    pub spare0: u32,
}

impl std::fmt::Debug for FloatingSaveArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingSaveArea")
            .field("control_word", &self.control_word)
            .field("status_word", &self.status_word)
            .field("tag_word", &self.tag_word)
            .field("error_offset", &self.error_offset)
            .field("error_selector", &self.error_selector)
            .field("data_offset", &self.data_offset)
            .field("data_selector", &self.data_selector)
            .field("spare0", &self.spare0)
            .finish_non_exhaustive()
    }
}

/// The 32-bit x86 `CONTEXT` record.
///
/// The layout is spelled out field by field (no padding anywhere) and is
/// decoded the same way on every host; `dr4` / `dr5` aren't part of it.
#[derive(Clone, PartialEq, Eq)]
#[repr(C)]
pub struct Context {
    pub context_flags: u32,
    pub dr0: u32,
    pub dr1: u32,
    pub dr2: u32,
    pub dr3: u32,
    pub dr6: u32,
    pub dr7: u32,
    pub float_save: FloatingSaveArea,
    pub seg_gs: u32,
    pub seg_fs: u32,
    pub seg_es: u32,
    pub seg_ds: u32,
    pub edi: u32,
    pub esi: u32,
    pub ebx: u32,
    pub edx: u32,
    pub ecx: u32,
    pub eax: u32,
    pub ebp: u32,
    pub eip: u32,
    pub seg_cs: u32,
    pub eflags: u32,
    pub esp: u32,
    pub seg_ss: u32,
    pub extended_registers: [u8; 512],
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("context_flags", &self.context_flags)
            .field("dr0", &self.dr0)
            .field("dr1", &self.dr1)
            .field("dr2", &self.dr2)
            .field("dr3", &self.dr3)
            .field("dr6", &self.dr6)
            .field("dr7", &self.dr7)
            .field("float_save", &self.float_save)
            .field("seg_gs", &self.seg_gs)
            .field("seg_fs", &self.seg_fs)
            .field("seg_es", &self.seg_es)
            .field("seg_ds", &self.seg_ds)
            .field("edi", &self.edi)
            .field("esi", &self.esi)
            .field("ebx", &self.ebx)
            .field("edx", &self.edx)
            .field("ecx", &self.ecx)
            .field("eax", &self.eax)
            .field("ebp", &self.ebp)
            .field("eip", &self.eip)
            .field("seg_cs", &self.seg_cs)
            .field("eflags", &self.eflags)
            .field("esp", &self.esp)
            .field("seg_ss", &self.seg_ss)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Read the size-prefixed context. The size has to match [`CONTEXT_SIZE`]
    /// exactly, and the record itself is grabbed in one go before being
    /// picked apart.
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        cursor.transaction(|c| {
            let size = c.read::<i32>()?;
            if usize::try_from(size).ok() != Some(CONTEXT_SIZE) {
                return Err(Error::SizeMismatch(size));
            }

            let raw = c.read_bytes(CONTEXT_SIZE)?;
            let context = Self::from_raw(&mut Cursor::new(raw))?;
            trace!("context: eip {:#x} esp {:#x}", context.eip, context.esp);

            Ok(context)
        })
    }

    fn from_raw(r: &mut Cursor) -> Result<Self> {
        Ok(Self {
            context_flags: r.read()?,
            dr0: r.read()?,
            dr1: r.read()?,
            dr2: r.read()?,
            dr3: r.read()?,
            dr6: r.read()?,
            dr7: r.read()?,
            float_save: FloatingSaveArea {
                control_word: r.read()?,
                status_word: r.read()?,
                tag_word: r.read()?,
                error_offset: r.read()?,
                error_selector: r.read()?,
                data_offset: r.read()?,
                data_selector: r.read()?,
                register_area: r.read_array()?,
                spare0: r.read()?,
            },
            seg_gs: r.read()?,
            seg_fs: r.read()?,
            seg_es: r.read()?,
            seg_ds: r.read()?,
            edi: r.read()?,
            esi: r.read()?,
            ebx: r.read()?,
            edx: r.read()?,
            ecx: r.read()?,
            eax: r.read()?,
            ebp: r.read()?,
            eip: r.read()?,
            seg_cs: r.read()?,
            eflags: r.read()?,
            esp: r.read()?,
            seg_ss: r.read()?,
            extended_registers: r.read_array()?,
        })
    }

    /// Get the decoded `EFLAGS` register.
    #[must_use]
    pub fn flags(&self) -> EFlags {
        EFlags::from_bits_retain(self.eflags)
    }
}

bitflags! {
    /// The status & control bits of `EFLAGS` that the report cares about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EFlags: u32 {
        const CF = 1 << 0;
        const PF = 1 << 2;
        const AF = 1 << 4;
        const ZF = 1 << 6;
        const SF = 1 << 7;
        const TF = 1 << 8;
        const IF = 1 << 9;
        const DF = 1 << 10;
        const OF = 1 << 11;
    }
}

/// Read an `i32` length that can't be negative.
fn read_len(c: &mut Cursor, what: &'static str) -> Result<usize> {
    let length = c.read::<i32>()?;

    usize::try_from(length).map_err(|_| Error::InvalidLength { what, length })
}

/// Read a length-prefixed string and strip its NUL terminator if it has one.
fn read_string(c: &mut Cursor, what: &'static str) -> Result<String> {
    let len = read_len(c, what)?;
    let mut bytes = c.read_bytes(len)?;
    if let [head @ .., 0] = bytes {
        bytes = head;
    }

    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Which module crashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Name of the executable, `arma2oaserver.exe` for example.
    pub file: String,
    pub source: String,
    /// Advisory; nothing checks it against the code region.
    pub size: i32,
    pub extension: [u8; 2],
}

impl ModuleInfo {
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        cursor.transaction(|c| {
            let info = Self {
                file: read_string(c, "module file")?,
                source: read_string(c, "module source")?,
                size: c.read()?,
                extension: c.read_array()?,
            };

            debug!("module: {:?} ({:?})", info.file, info.source);

            Ok(info)
        })
    }
}

/// The module's code as it was mapped in the crashed process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRegion {
    /// Where the code starts.
    pub base: u32,
    /// Length in bytes of the code.
    pub size: i32,
    /// Where a well known function was at crash time; this is what allows to
    /// compute where the module got loaded.
    pub func: u32,
    /// One checksum per full page of code.
    pub crc: Vec<u32>,
}

impl CodeRegion {
    /// How many checksums follow a code region of `size` bytes. Trailing
    /// partial pages aren't checksummed.
    #[must_use]
    pub fn crc_count(size: usize) -> usize {
        size / CRC_PAGE_SIZE
    }

    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        cursor.transaction(|c| {
            let base = c.read::<u32>()?;
            let size = c.read::<i32>()?;
            let func = c.read::<u32>()?;
            let len = usize::try_from(size).map_err(|_| Error::InvalidLength {
                what: "code size",
                length: size,
            })?;

            let count = Self::crc_count(len);
            // Make sure the checksums are all there before allocating room for them.
            if count > c.remaining() / 4 {
                return Err(Error::Truncated {
                    offset: c.position(),
                    wanted: count * 4,
                    left: c.remaining(),
                });
            }

            let crc = (0..count)
                .map(|_| c.read::<u32>())
                .collect::<Result<Vec<_>>>()?;

            debug!("code: base {base:#x} size {size:#x} func {func:#x}, {count} crcs");

            Ok(Self {
                base,
                size,
                func,
                crc,
            })
        })
    }
}

/// A snapshot of the crashing thread's stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSnapshot {
    /// The highest address of the snapshot.
    pub base: u32,
    pub data: Vec<u8>,
}

impl StackSnapshot {
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        cursor.transaction(|c| {
            let base = c.read::<u32>()?;
            let len = read_len(c, "stack size")?;
            let data = c.read_bytes(len)?.to_vec();

            debug!("stack: base {base:#x}, {len} bytes");

            Ok(Self { base, data })
        })
    }

    /// Address of the first (lowest) captured byte.
    #[must_use]
    pub fn start(&self) -> Va {
        // The data is bounded by an `i32` so it always fits.
        Va::new(self.base.wrapping_sub(self.data.len() as u32))
    }

    /// Walk the stack a 32-bit word at a time from the lowest address up.
    /// A trailing partial word is skipped.
    pub fn words(&self) -> impl Iterator<Item = (Va, u32)> + '_ {
        let start = self.start().u32();

        self.data.chunks_exact(4).enumerate().map(move |(idx, word)| {
            let addr = start.wrapping_add((idx * 4) as u32);
            let value = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);

            (Va::new(addr), value)
        })
    }
}
