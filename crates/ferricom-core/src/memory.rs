//! Shared definitions for the NES memory map.
//!
//! Centralizing address-related constants keeps the hardware layout in one
//! location and prevents magic numbers from sneaking into the bus, CPU, and
//! PPU modules.

/// CPU memory map details.
pub mod cpu {
    /// Internal RAM size (2 KiB, mirrored four times below `$2000`).
    pub const INTERNAL_RAM_SIZE: usize = 0x0800;
    /// Mask applied to internal RAM accesses (`addr & 0x07FF`).
    pub const INTERNAL_RAM_MASK: u16 = 0x07FF;
    /// Last address of the internal RAM mirror region.
    pub const INTERNAL_RAM_MIRROR_END: u16 = 0x1FFF;

    /// First address of the hardware stack page.
    pub const STACK_PAGE_START: u16 = 0x0100;

    /// First address of the cartridge expansion area (mapper-specific).
    pub const EXPANSION_START: u16 = 0x4020;
    /// First address of cartridge PRG ROM.
    pub const PRG_ROM_START: u16 = 0x8000;
    /// Last CPU address.
    pub const CPU_ADDR_END: u16 = 0xFFFF;

    /// NMI vector (`$FFFA-$FFFB`).
    pub const NMI_VECTOR: u16 = 0xFFFA;
    /// Reset vector (`$FFFC-$FFFD`).
    pub const RESET_VECTOR: u16 = 0xFFFC;
    /// IRQ/BRK vector (`$FFFE-$FFFF`).
    pub const IRQ_VECTOR: u16 = 0xFFFE;

    /// Controller 1 serial port.
    pub const CONTROLLER_PORT_1: u16 = 0x4016;
    /// Controller 2 / APU frame counter port (not implemented).
    pub const CONTROLLER_PORT_2: u16 = 0x4017;
}

/// PPU register layout and VRAM mirror rules.
pub mod ppu {
    /// First CPU-visible PPU register address.
    pub const REGISTER_BASE: u16 = 0x2000;
    /// Last address of the mirrored PPU register window.
    pub const REGISTER_MIRROR_END: u16 = 0x3FFF;
    /// Mask for decoding register mirrors (`addr & 0x0007`).
    pub const REGISTER_SELECT_MASK: u16 = 0x0007;

    /// Address mask applied to every VRAM access (14-bit space).
    pub const VRAM_MIRROR_MASK: u16 = 0x3FFF;

    /// Pattern table base address for table 0.
    pub const PATTERN_TABLE_0: u16 = 0x0000;
    /// Pattern table base address for table 1.
    pub const PATTERN_TABLE_1: u16 = 0x1000;

    /// Base address of nametable 0.
    pub const NAMETABLE_BASE: u16 = 0x2000;
    /// Size of a single nametable in bytes.
    pub const NAMETABLE_SIZE: u16 = 0x0400;
    /// Internal nametable RAM (sized for four-screen cartridges).
    pub const CIRAM_SIZE: usize = 0x1000;

    /// Palette RAM base address (`$3F00`).
    pub const PALETTE_BASE: u16 = 0x3F00;
    /// Palette RAM byte count (32 bytes mirrored every 32 bytes).
    pub const PALETTE_RAM_SIZE: usize = 0x20;

    /// Primary OAM byte count (64 sprites x 4 bytes).
    pub const OAM_RAM_SIZE: usize = 0x100;
    /// Secondary OAM byte count (8 sprites x 4 bytes).
    pub const SECONDARY_OAM_RAM_SIZE: usize = 0x20;

    /// DMA register used for transferring OAM data (`$4014`).
    pub const OAM_DMA: u16 = 0x4014;

    /// CPU-visible PPU register identifiers.
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Register {
        /// `$2000` - PPUCTRL
        Control = 0x2000,
        /// `$2001` - PPUMASK
        Mask = 0x2001,
        /// `$2002` - PPUSTATUS
        Status = 0x2002,
        /// `$2003` - OAMADDR
        OamAddr = 0x2003,
        /// `$2004` - OAMDATA
        OamData = 0x2004,
        /// `$2005` - PPUSCROLL
        Scroll = 0x2005,
        /// `$2006` - PPUADDR
        Addr = 0x2006,
        /// `$2007` - PPUDATA
        Data = 0x2007,
    }

    impl Register {
        /// Raw address backing the register.
        pub const fn addr(self) -> u16 {
            self as u16
        }

        /// Resolves the canonical register for a CPU address in `$2000-$3FFF`.
        pub const fn from_cpu_addr(addr: u16) -> Self {
            match addr & REGISTER_SELECT_MASK {
                0 => Self::Control,
                1 => Self::Mask,
                2 => Self::Status,
                3 => Self::OamAddr,
                4 => Self::OamData,
                5 => Self::Scroll,
                6 => Self::Addr,
                _ => Self::Data,
            }
        }
    }
}

/// Audio Processing Unit register layout (stubbed in this core).
pub mod apu {
    /// Start of the CPU-mapped APU register range.
    pub const REGISTER_BASE: u16 = 0x4000;
    /// Final channel register before the status and DMA bridges.
    pub const CHANNEL_REGISTER_END: u16 = 0x4013;
    /// Address of the status register (`$4015`).
    pub const STATUS: u16 = 0x4015;
    /// Total number of addresses exposed by the APU.
    pub const REGISTER_SPACE: usize = 0x18;
}
