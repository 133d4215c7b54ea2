#![allow(dead_code)]

//! Shared helpers for the integration suites: in-memory NROM image builders
//! and tracing setup.

use ctor::ctor;
use ferricom_core::Nes;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[ctor]
fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// PRG byte backing a CPU address (16 KiB NROM mirrors `$8000`/`$C000`).
pub fn prg_offset(addr: u16) -> usize {
    (addr as usize - 0x8000) % 0x4000
}

/// Builds a mapper-0 image with one 16 KiB PRG bank (NOP-filled) and CHR RAM.
/// The closure patches the PRG contents before the image is assembled.
pub fn nrom_image(build: impl FnOnce(&mut [u8])) -> Vec<u8> {
    let mut prg = vec![0xEA; 16 * 1024];
    build(&mut prg);

    let mut image = vec![
        b'N', b'E', b'S', 0x1A, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    image.extend_from_slice(&prg);
    image
}

pub fn set_reset_vector(prg: &mut [u8], target: u16) {
    prg[prg_offset(0xFFFC)] = target as u8;
    prg[prg_offset(0xFFFD)] = (target >> 8) as u8;
}

pub fn set_nmi_vector(prg: &mut [u8], target: u16) {
    prg[prg_offset(0xFFFA)] = target as u8;
    prg[prg_offset(0xFFFB)] = (target >> 8) as u8;
}

pub fn write_code(prg: &mut [u8], addr: u16, bytes: &[u8]) {
    let start = prg_offset(addr);
    prg[start..start + bytes.len()].copy_from_slice(bytes);
}

/// Boots a console from a patched NROM image.
pub fn boot(build: impl FnOnce(&mut [u8])) -> Nes {
    Nes::from_ines_bytes(&nrom_image(build)).expect("valid test image")
}
