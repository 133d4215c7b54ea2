//! Mapper capability surface.
//!
//! The CPU/PPU/bus cores never see cartridge internals; everything routes
//! through this narrow trait. Additional mappers slot in here without
//! touching the cores.

use std::fmt::Debug;

use crate::cartridge::header::{Header, Mirroring};
use crate::error::Error;

pub mod mapper0;

pub use mapper0::Mapper0;

pub trait Mapper: Debug {
    /// CPU-side read in `$4020-$FFFF`. `None` means the address is unmapped
    /// on this board and the bus should supply its open-bus value.
    fn cpu_read(&self, addr: u16) -> Option<u8>;

    /// CPU-side write in `$4020-$FFFF`. Mask-ROM boards ignore writes.
    fn cpu_write(&mut self, addr: u16, value: u8);

    /// PPU-side read in the pattern table window (`$0000-$1FFF`).
    fn ppu_read(&self, addr: u16) -> u8;

    /// PPU-side write in the pattern table window (CHR RAM boards only).
    fn ppu_write(&mut self, addr: u16, value: u8);

    /// Nametable arrangement this board wires up.
    fn mirroring(&self) -> Mirroring;
}

/// Instantiates the mapper named by the header.
pub fn build(header: &Header, prg_rom: Vec<u8>, chr_rom: Vec<u8>) -> Result<Box<dyn Mapper>, Error> {
    match header.mapper {
        0 => Ok(Box::new(Mapper0::new(header, prg_rom, chr_rom))),
        id => Err(Error::UnsupportedMapper(id)),
    }
}
