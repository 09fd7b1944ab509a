// Axel '0vercl0k' Souchet - October 16 2026
//! Synthetic `STK7` dumps for testing.
//!
//! This intentionally doesn't reuse the crate's own layouts so that a wrong
//! change to the decoders gets caught.
#![allow(dead_code)]

use bidmp_parser::Dump;
use test_assembler::{Endian, Section};

/// Registers the report displays.
#[derive(Debug, Default, Clone, Copy)]
pub struct Registers {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
    pub esi: u32,
    pub edi: u32,
    pub ebp: u32,
    pub esp: u32,
    pub eip: u32,
    pub eflags: u32,
}

/// A writer of synthetic dumps; tweak the fields then call
/// [`SynthDump::finish`].
#[derive(Debug, Clone)]
pub struct SynthDump {
    pub magic: [u8; 4],
    pub format_version: i32,
    pub version: i32,
    pub build: i32,
    pub context_size: i32,
    pub registers: Registers,
    pub file: Vec<u8>,
    pub source: Vec<u8>,
    pub module_size: i32,
    pub code_base: u32,
    pub code_size: i32,
    pub code_func: u32,
    pub crc: Vec<u32>,
    pub stack_base: u32,
    pub stack: Vec<u8>,
    pub trailing: Vec<u8>,
}

impl Default for SynthDump {
    fn default() -> Self {
        Self {
            magic: *b"STK7",
            format_version: 103,
            version: 163,
            build: 131_129,
            context_size: 0x2cc,
            registers: Registers::default(),
            file: b"ArmA2OAServer.exe\0".to_vec(),
            source: b"server\0".to_vec(),
            module_size: 0x1_000,
            code_base: 0x40_0000,
            code_size: 0x1_000,
            code_func: 0x18_7177 + 16,
            crc: vec![0xdead_beef],
            stack_base: 0x13_0000,
            stack: Vec::new(),
            trailing: Vec::new(),
        }
    }
}

/// Populate a `CONTEXT` for x86 with the given registers.
pub fn x86_context(r: &Registers) -> Section {
    let section = Section::with_endian(Endian::Little)
        .D32(0x1_007f) // context_flags: CONTEXT_ALL
        .append_repeated(0, 4 * 6) // dr0,1,2,3,6,7, 4 bytes each
        .append_repeated(0, 0x70) // float_save
        .append_repeated(0, 4 * 4) // gs,fs,es,ds
        .D32(r.edi)
        .D32(r.esi)
        .D32(r.ebx)
        .D32(r.edx)
        .D32(r.ecx)
        .D32(r.eax)
        .D32(r.ebp)
        .D32(r.eip)
        .D32(0x23) // cs
        .D32(r.eflags)
        .D32(r.esp)
        .D32(0x2b) // ss
        .append_repeated(0, 512); // extended_registers
    assert_eq!(section.size(), 0x2cc);
    section
}

fn string(section: Section, s: &[u8]) -> Section {
    section.D32(s.len() as u32).append_bytes(s)
}

impl SynthDump {
    /// Grab a default dump and give it a stack.
    pub fn with_stack(stack_base: u32, words: &[u32]) -> Self {
        Self {
            stack_base,
            stack: words.iter().flat_map(|w| w.to_le_bytes()).collect(),
            ..Default::default()
        }
    }

    pub fn finish(&self) -> Vec<u8> {
        let mut section = Section::with_endian(Endian::Little)
            .append_bytes(&self.magic)
            .D32(self.format_version as u32)
            .D32(self.version as u32)
            .D32(self.build as u32)
            .D32(self.context_size as u32)
            .append_section(x86_context(&self.registers));

        section = string(section, &self.file);
        section = string(section, &self.source);
        section = section
            .D32(self.module_size as u32)
            .append_bytes(&[0, 0])
            .D32(self.code_base)
            .D32(self.code_size as u32)
            .D32(self.code_func);

        for crc in &self.crc {
            section = section.D32(*crc);
        }

        section
            .D32(self.stack_base)
            .D32(self.stack.len() as u32)
            .append_bytes(&self.stack)
            .append_bytes(&self.trailing)
            .get_contents()
            .expect("no unresolved labels")
    }
}

/// Write `dump` back following the on-disk layout, every field included.
pub fn encode(dump: &Dump) -> Vec<u8> {
    let header = dump.header();
    let c = dump.context();
    let fs = &c.float_save;
    let mut section = Section::with_endian(Endian::Little)
        .append_bytes(b"STK7")
        .D32(103)
        .D32(header.version as u32)
        .D32(header.build as u32)
        .D32(0x2cc);

    for dword in [c.context_flags, c.dr0, c.dr1, c.dr2, c.dr3, c.dr6, c.dr7] {
        section = section.D32(dword);
    }

    for dword in [
        fs.control_word,
        fs.status_word,
        fs.tag_word,
        fs.error_offset,
        fs.error_selector,
        fs.data_offset,
        fs.data_selector,
    ] {
        section = section.D32(dword);
    }

    section = section.append_bytes(&fs.register_area).D32(fs.spare0);
    for dword in [
        c.seg_gs, c.seg_fs, c.seg_es, c.seg_ds, c.edi, c.esi, c.ebx, c.edx, c.ecx, c.eax, c.ebp,
        c.eip, c.seg_cs, c.eflags, c.esp, c.seg_ss,
    ] {
        section = section.D32(dword);
    }

    section = section.append_bytes(&c.extended_registers);

    let module = dump.module();
    section = string(section, module.file.as_bytes());
    section = string(section, module.source.as_bytes());
    section = section
        .D32(module.size as u32)
        .append_bytes(&module.extension);

    let code = dump.code();
    section = section
        .D32(code.base)
        .D32(code.size as u32)
        .D32(code.func);
    for crc in &code.crc {
        section = section.D32(*crc);
    }

    let stack = dump.stack();
    section
        .D32(stack.base)
        .D32(stack.data.len() as u32)
        .append_bytes(&stack.data)
        .get_contents()
        .expect("no unresolved labels")
}
