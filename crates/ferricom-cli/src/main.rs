//! Headless front end: loads a ROM, runs the core, and optionally dumps the
//! per-instruction trace. Useful for conformance runs against known logs
//! (`ferricom nestest.nes --pc c000 --instructions 8991 --trace`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ferricom_core::Nes;

#[derive(Debug, Parser)]
#[command(name = "ferricom", about = "Headless NES emulator core runner")]
struct Args {
    /// Path to an iNES (mapper 0) ROM image.
    rom: PathBuf,

    /// Run this many frames (default when --instructions is absent).
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Run this many instructions instead of whole frames.
    #[arg(long)]
    instructions: Option<u64>,

    /// Print a trace line for every executed instruction.
    #[arg(long)]
    trace: bool,

    /// Force the program counter after reset (hex, e.g. c000).
    #[arg(long, value_parser = parse_hex16)]
    pc: Option<u16>,
}

fn parse_hex16(value: &str) -> Result<u16, String> {
    let digits = value.trim_start_matches("0x").trim_start_matches('$');
    u16::from_str_radix(digits, 16).map_err(|err| format!("invalid address {value:?}: {err}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();

    let mut nes = Nes::from_file(&args.rom)
        .with_context(|| format!("loading {}", args.rom.display()))?;
    if let Some(pc) = args.pc {
        nes.set_pc(pc);
    }

    if let Some(instructions) = args.instructions {
        for _ in 0..instructions {
            if args.trace {
                println!("{}", nes.trace_line());
            }
            nes.step_instruction()
                .context("emulation halted")?;
        }
    } else {
        for _ in 0..args.frames {
            nes.run_frame().context("emulation halted")?;
        }
    }

    let cpu = nes.cpu_snapshot();
    eprintln!(
        "done: {} cycles, {} frames, PC={:04X} A={:02X} X={:02X} Y={:02X} P={:02X} SP={:02X}",
        nes.cycles(),
        nes.frame_count(),
        cpu.pc,
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.p,
        cpu.s,
    );
    Ok(())
}
