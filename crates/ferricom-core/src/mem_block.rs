//! Fixed-size memory blocks for the emulated hardware.
//!
//! Every RAM the console owns (CPU work RAM, CIRAM, palette RAM, OAM) has a
//! size fixed by the hardware. `MemBlock` wraps a plain array so those sizes
//! live in the type while call sites keep ordinary slice ergonomics.

use core::ops::{Deref, DerefMut};

#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemBlock<T, const N: usize>([T; N]);

/// CPU-side memory blocks.
pub mod cpu {
    use crate::memory::cpu as cpu_mem;

    pub type Ram = super::MemBlock<u8, { cpu_mem::INTERNAL_RAM_SIZE }>;
}

/// PPU-side memory blocks.
pub mod ppu {
    use crate::memory::ppu as ppu_mem;

    /// Internal nametable RAM (CIRAM), sized for four-screen layouts.
    pub type Ciram = super::MemBlock<u8, { ppu_mem::CIRAM_SIZE }>;
    pub type PaletteRam = super::MemBlock<u8, { ppu_mem::PALETTE_RAM_SIZE }>;
    pub type OamRam = super::MemBlock<u8, { ppu_mem::OAM_RAM_SIZE }>;
    pub type SecondaryOamRam = super::MemBlock<u8, { ppu_mem::SECONDARY_OAM_RAM_SIZE }>;
}

/// APU-side memory blocks.
pub mod apu {
    use crate::memory::apu as apu_mem;

    pub type RegisterRam = super::MemBlock<u8, { apu_mem::REGISTER_SPACE }>;
}

impl<T: Copy + Default, const N: usize> MemBlock<T, N> {
    pub fn new() -> Self {
        Self([T::default(); N])
    }
}

impl<T, const N: usize> MemBlock<T, N> {
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }
}

impl<T: Copy + Default, const N: usize> Default for MemBlock<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Deref for MemBlock<T, N> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> DerefMut for MemBlock<T, N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Copy, const N: usize> Copy for MemBlock<T, N> {}
