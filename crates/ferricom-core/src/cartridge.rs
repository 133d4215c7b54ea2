//! iNES cartridge loading and the mapper facade.

use std::{fs, path::Path};

use crate::cartridge::header::{Header, Mirroring, NES_HEADER_LEN, TRAINER_LEN};
use crate::cartridge::mapper::Mapper;
use crate::error::Error;

pub mod header;
pub mod mapper;

/// A loaded cartridge: parsed header plus the mapper that services accesses.
#[derive(Debug)]
pub struct Cartridge {
    header: Header,
    mapper: Box<dyn Mapper>,
}

impl Cartridge {
    /// Parses a cartridge from an in-memory iNES image.
    pub fn new(bytes: &[u8]) -> Result<Self, Error> {
        let header_bytes = bytes.get(..NES_HEADER_LEN).ok_or(Error::HeaderTooShort {
            actual: bytes.len(),
        })?;
        let header = Header::parse(header_bytes)?;

        let mut cursor = NES_HEADER_LEN;
        if header.trainer_present {
            // The trainer is legacy copier data; skip it.
            let _ = section(bytes, &mut cursor, TRAINER_LEN, "trainer")?;
        }
        let prg_rom = section(bytes, &mut cursor, header.prg_rom_size, "PRG ROM")?.to_vec();
        let chr_rom = section(bytes, &mut cursor, header.chr_rom_size, "CHR ROM")?.to_vec();

        let mapper = mapper::build(&header, prg_rom, chr_rom)?;
        tracing::debug!(
            mapper = header.mapper,
            mirroring = ?header.mirroring,
            prg = header.prg_rom_size,
            chr = header.chr_rom_size,
            "cartridge loaded"
        );
        Ok(Self { header, mapper })
    }

    /// Loads and parses a cartridge directly from disk.
    pub fn from_file<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let bytes = fs::read(path)?;
        Self::new(&bytes)
    }

    /// Parsed header fields.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// CPU-side read (`$4020-$FFFF`). `None` when the board leaves the
    /// address unmapped.
    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        self.mapper.cpu_read(addr)
    }

    /// CPU-side write (`$4020-$FFFF`).
    pub fn cpu_write(&mut self, addr: u16, value: u8) {
        self.mapper.cpu_write(addr, value);
    }

    /// PPU-side read in the pattern table window.
    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.mapper.ppu_read(addr)
    }

    /// PPU-side write in the pattern table window.
    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        self.mapper.ppu_write(addr, value);
    }

    /// Nametable mirroring declared by the board.
    pub fn mirroring(&self) -> Mirroring {
        self.mapper.mirroring()
    }
}

fn section<'a>(
    bytes: &'a [u8],
    cursor: &mut usize,
    len: usize,
    name: &'static str,
) -> Result<&'a [u8], Error> {
    let end = cursor.checked_add(len).ok_or(Error::SectionTooShort {
        section: name,
        expected: len,
        actual: bytes.len().saturating_sub(*cursor),
    })?;
    let slice = bytes.get(*cursor..end).ok_or(Error::SectionTooShort {
        section: name,
        expected: len,
        actual: bytes.len().saturating_sub(*cursor),
    })?;
    *cursor = end;
    Ok(slice)
}
