use thiserror::Error;

use crate::cartridge::header::NES_HEADER_LEN;

/// Errors surfaced by the emulator core.
///
/// Load-time failures keep the emulator from starting; `UnknownOpcode` is the
/// one runtime error and halts the interpreter until the host resets.
#[derive(Debug, Error)]
pub enum Error {
    /// Provided buffer is shorter than the 16-byte iNES header.
    #[error("header expected {NES_HEADER_LEN} bytes, got {actual}")]
    HeaderTooShort { actual: usize },

    /// Magic number ("NES<EOF>") is missing.
    #[error("missing NES magic bytes")]
    InvalidMagic,

    /// A ROM section (trainer/PRG/CHR) is shorter than the header advertises.
    #[error("{section} section expected {expected} bytes, got {actual}")]
    SectionTooShort {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The image requires a mapper this core does not implement.
    #[error("unsupported mapper: {0}")]
    UnsupportedMapper(u8),

    /// Wrapper for I/O errors raised while reading ROMs from disk.
    #[error("i/o error while reading cartridge: {0}")]
    Io(#[from] std::io::Error),

    /// The CPU fetched an opcode with no implementation. The program counter
    /// and the offending byte are recorded so the host can report them.
    #[error("unknown opcode {opcode:#04X} at {pc:#06X}")]
    UnknownOpcode { pc: u16, opcode: u8 },
}
