//! Mapper 0 (NROM).
//!
//! The simplest board: no banking at all. PRG ROM is 16 KiB (mirrored across
//! `$8000-$FFFF`) or 32 KiB (linear); CHR is one 8 KiB ROM bank or, when the
//! header declares none, 8 KiB of writable CHR RAM. Everything below `$8000`
//! is left unmapped, so those reads fall through to the bus open-bus rule.

use crate::cartridge::header::{CHR_BANK_SIZE, Header, Mirroring};
use crate::cartridge::mapper::Mapper;
use crate::memory::cpu as cpu_mem;

/// CHR backing store: ROM from the image, or RAM allocated by the board.
#[derive(Debug, Clone)]
enum ChrStorage {
    Rom(Vec<u8>),
    Ram(Vec<u8>),
}

impl ChrStorage {
    fn read(&self, addr: u16) -> u8 {
        let bytes = match self {
            ChrStorage::Rom(bytes) | ChrStorage::Ram(bytes) => bytes,
        };
        if bytes.is_empty() {
            return 0;
        }
        bytes[addr as usize % bytes.len()]
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let ChrStorage::Ram(bytes) = self {
            if !bytes.is_empty() {
                let len = bytes.len();
                bytes[addr as usize % len] = value;
            }
        }
    }
}

/// Mapper 0 state.
#[derive(Debug, Clone)]
pub struct Mapper0 {
    prg_rom: Vec<u8>,
    chr: ChrStorage,
    mirroring: Mirroring,
}

impl Mapper0 {
    pub fn new(header: &Header, prg_rom: Vec<u8>, chr_rom: Vec<u8>) -> Self {
        let chr = if chr_rom.is_empty() {
            ChrStorage::Ram(vec![0; CHR_BANK_SIZE])
        } else {
            ChrStorage::Rom(chr_rom)
        };
        Self {
            prg_rom,
            chr,
            mirroring: header.mirroring,
        }
    }

    fn read_prg_rom(&self, addr: u16) -> u8 {
        if self.prg_rom.is_empty() {
            return 0;
        }
        // The modulo handles NROM-128 mirroring: a 16 KiB image repeats at
        // $C000, a 32 KiB image maps linearly.
        let idx = (addr - cpu_mem::PRG_ROM_START) as usize % self.prg_rom.len();
        self.prg_rom[idx]
    }
}

impl Mapper for Mapper0 {
    fn cpu_read(&self, addr: u16) -> Option<u8> {
        if addr >= cpu_mem::PRG_ROM_START {
            Some(self.read_prg_rom(addr))
        } else {
            None
        }
    }

    fn cpu_write(&mut self, _addr: u16, _value: u8) {
        // Mask ROM: writes are dropped, matching the real board.
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        self.chr.read(addr & 0x1FFF)
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        self.chr.write(addr & 0x1FFF, value);
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
