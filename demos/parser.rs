// Axel '0vercl0k' Souchet - October 16 2026
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bidmp_parser::{Dump, Reference, Va, CRC_PAGE_SIZE};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The dump path.
    dump_path: PathBuf,
    /// Address of the reference function in the module, used when the build
    /// isn't a known one.
    #[arg(short, long)]
    known_func: Option<Va>,
    /// Dump the whole context record.
    #[arg(short, long)]
    context_record: bool,
    /// Dump the code checksums.
    #[arg(long, default_value_t = false)]
    crc: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let data = fs::read(&args.dump_path)
        .with_context(|| format!("failed to read {}", args.dump_path.display()))?;
    let dump = Dump::parse(&data).context("failed to parse the dump")?;
    let report = dump.report(args.known_func.map(u32::from));

    if report.resolver().reference() == Reference::Unavailable {
        eprintln!(
            "{} {}.{} isn't a known build, pass --known-func to resolve addresses",
            dump.module().file,
            dump.header().version,
            dump.header().build
        );
    }

    print!("{report}");

    if args.context_record {
        println!();
        println!("{:#x?}", dump.context());
    }

    if args.crc {
        println!();
        println!("Checksums:");
        let code = dump.code();
        for (idx, crc) in code.crc.iter().enumerate() {
            let page = code.base.wrapping_add((idx * CRC_PAGE_SIZE) as u32);
            println!("  {} {}", Va::new(page), Va::new(*crc));
        }
    }

    Ok(())
}
