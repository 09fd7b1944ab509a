// Axel '0vercl0k' Souchet - October 16 2026
//! This renders a [`Dump`] as a human readable report.
//!
//! ```text
//! arma2oaserver.exe 163.131129
//!
//! Adjust: 16 (00000010)
//! Func: 00187187
//!
//! Registers:
//!   EAX: 00400010 arma2oaserver.exe+00400000
//!   ..
//!
//! Flags:
//!   CF: 0
//!   ..
//!
//! Stack:
//!   0012FF00 00400010 arma2oaserver.exe+00400000
//!   ..
//! ```
use std::fmt::{self, Display, Write};

use crate::resolve::Resolver;
use crate::structs::EFlags;
use crate::{Dump, Va};

const INDENT: &str = "  ";

/// A report over a [`Dump`]; render it with [`Display`].
#[derive(Debug)]
pub struct Report<'dump> {
    dump: &'dump Dump,
    resolver: Resolver,
}

impl<'dump> Report<'dump> {
    /// Resolve the dump's addresses and get ready to render it.
    #[must_use]
    pub fn new(dump: &'dump Dump, known_func: Option<u32>) -> Self {
        Self {
            dump,
            resolver: Resolver::new(dump, known_func),
        }
    }

    /// Get the resolver used to annotate values.
    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Write `value` followed by its `file+rva` annotation if it has one.
    fn value(&self, f: &mut fmt::Formatter<'_>, value: u32) -> fmt::Result {
        write!(f, "{}", Va::new(value))?;
        if let Some(rva) = self.resolver.annotate(value) {
            write!(f, " {}+{rva}", self.dump.module().file)?;
        }

        Ok(())
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = self.dump;
        let header = dump.header();
        let context = dump.context();

        writeln!(
            f,
            "{} {}.{}",
            dump.module().file,
            header.version,
            header.build
        )?;
        f.write_char('\n')?;

        let adjust = self.resolver.adjust();
        if adjust != 0 {
            writeln!(f, "Adjust: {adjust} ({:08X})", adjust as u32)?;
        }

        writeln!(f, "Func: {}", Va::new(dump.code().func))?;
        f.write_char('\n')?;

        writeln!(f, "Registers:")?;
        let registers = [
            ("EAX", context.eax),
            ("EBX", context.ebx),
            ("ECX", context.ecx),
            ("EDX", context.edx),
            ("ESI", context.esi),
            ("EDI", context.edi),
            ("EBP", context.ebp),
            ("ESP", context.esp),
            ("EIP", context.eip),
        ];

        for (name, value) in registers {
            write!(f, "{INDENT}{name}: ")?;
            self.value(f, value)?;
            f.write_char('\n')?;
        }

        f.write_char('\n')?;

        writeln!(f, "Flags:")?;
        let eflags = context.flags();
        for (name, flag) in EFlags::all().iter_names() {
            writeln!(f, "{INDENT}{name}: {}", u8::from(eflags.contains(flag)))?;
        }

        f.write_char('\n')?;

        writeln!(f, "Stack:")?;
        for (addr, value) in dump.stack().words() {
            write!(f, "{INDENT}{addr} ")?;
            self.value(f, value)?;
            f.write_char('\n')?;
        }

        Ok(())
    }
}

/// Render the report of `dump` into a [`String`]; cf [`Report`].
#[must_use]
pub fn render(dump: &Dump, known_func: Option<u32>) -> String {
    Report::new(dump, known_func).to_string()
}
