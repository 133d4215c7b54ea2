//! CPU-visible bus.
//!
//! `CpuBus` is a borrowed view over the devices the console owns; the `Nes`
//! container builds one per step, so no component ever holds a pointer to
//! another. The address decoder lives here, together with the OAM DMA latch
//! and the open-bus rule for unmapped reads.
//!
//! Address map:
//!
//! | Range            | Device                                        |
//! |------------------|-----------------------------------------------|
//! | `$0000-$1FFF`    | 2 KiB internal RAM, mirrored every 2 KiB      |
//! | `$2000-$3FFF`    | PPU registers, mirrored every 8 bytes         |
//! | `$4000-$4013`    | APU channel registers (stub)                  |
//! | `$4014`          | OAM DMA                                       |
//! | `$4015`          | APU status (stub)                             |
//! | `$4016`          | Controller 1 strobe/serial                    |
//! | `$4017`          | Controller 2 / frame counter (not implemented)|
//! | `$4020-$FFFF`    | Cartridge (mapper 0 maps `$8000-$FFFF` only)  |

use crate::apu::Apu;
use crate::cartridge::Cartridge;
use crate::controller::Controller;
use crate::mem_block::cpu as cpu_ram;
use crate::memory::{apu as apu_mem, cpu as cpu_mem, ppu as ppu_mem};
use crate::ppu::{PatternBus, Ppu};

/// Base cost of an OAM DMA transfer in CPU cycles; one more is added when the
/// triggering write lands on an odd cycle.
const OAM_DMA_BASE_CYCLES: u32 = 513;

/// Borrowed view of the hardware reachable from the CPU.
pub(crate) struct CpuBus<'a> {
    pub(crate) ram: &'a mut cpu_ram::Ram,
    pub(crate) ppu: &'a mut Ppu,
    pub(crate) apu: &'a mut Apu,
    pub(crate) cartridge: Option<&'a mut Cartridge>,
    pub(crate) controller: &'a mut Controller,
    /// CPU cycle counter at entry, used for the DMA alignment cost.
    pub(crate) cycles: u64,
    /// Stall cycles raised by a `$4014` write during the current step.
    pub(crate) dma_stall: Option<u32>,
}

impl<'a> CpuBus<'a> {
    pub(crate) fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize]
            }
            ppu_mem::REGISTER_BASE..=ppu_mem::REGISTER_MIRROR_END => {
                let mut pattern = PatternBus::new(self.cartridge.as_deref_mut());
                self.ppu.cpu_read(addr, &mut pattern)
            }
            apu_mem::REGISTER_BASE..=apu_mem::CHANNEL_REGISTER_END | apu_mem::STATUS => {
                self.apu.cpu_read(addr)
            }
            ppu_mem::OAM_DMA => 0,
            cpu_mem::CONTROLLER_PORT_1 => self.controller.read(),
            cpu_mem::CONTROLLER_PORT_2 => 0,
            cpu_mem::EXPANSION_START..=cpu_mem::CPU_ADDR_END => self
                .cartridge
                .as_deref()
                .and_then(|cart| cart.cpu_read(addr))
                .unwrap_or_else(|| open_bus(addr)),
            // $4018-$401F test-mode registers: nothing drives the bus.
            _ => open_bus(addr),
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize] = value;
            }
            ppu_mem::REGISTER_BASE..=ppu_mem::REGISTER_MIRROR_END => {
                let mut pattern = PatternBus::new(self.cartridge.as_deref_mut());
                self.ppu.cpu_write(addr, value, &mut pattern);
            }
            apu_mem::REGISTER_BASE..=apu_mem::CHANNEL_REGISTER_END | apu_mem::STATUS => {
                self.apu.cpu_write(addr, value);
            }
            ppu_mem::OAM_DMA => self.oam_dma(value),
            cpu_mem::CONTROLLER_PORT_1 => self.controller.write(value),
            cpu_mem::CONTROLLER_PORT_2 => {}
            cpu_mem::EXPANSION_START..=cpu_mem::CPU_ADDR_END => {
                if let Some(cart) = self.cartridge.as_deref_mut() {
                    cart.cpu_write(addr, value);
                }
            }
            _ => {}
        }
    }

    /// Little-endian 16-bit read (vectors and absolute operands).
    pub(crate) fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Consumes the stall cost of a DMA triggered during this step.
    pub(crate) fn take_dma_stall(&mut self) -> Option<u32> {
        self.dma_stall.take()
    }

    /// `$4014` write: copies page `$XX00-$XXFF` into OAM through the
    /// `$2004` port and records the CPU stall (513 cycles, 514 when the
    /// write happens on an odd cycle). The PPU keeps running during the
    /// stall; only the CPU is suspended.
    fn oam_dma(&mut self, page: u8) {
        let base = (page as u16) << 8;
        for offset in 0..ppu_mem::OAM_RAM_SIZE as u16 {
            let value = self.read(base | offset);
            let mut pattern = PatternBus::new(self.cartridge.as_deref_mut());
            self.ppu
                .cpu_write(ppu_mem::Register::OamData.addr(), value, &mut pattern);
        }
        self.dma_stall = Some(OAM_DMA_BASE_CYCLES + (self.cycles & 1) as u32);
    }
}

/// Value returned for reads nothing drives: the high byte of the address is
/// the conventional stand-in for residual bus contents.
fn open_bus(addr: u16) -> u8 {
    (addr >> 8) as u8
}
