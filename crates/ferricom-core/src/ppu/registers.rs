//! CPU-visible PPU register file.
//!
//! The three configuration/status bytes the CPU sees at `$2000-$2002` are
//! plain bit fields; they live here as `bitflags` types so call sites name
//! bits instead of masking. The scroll-related halves of the register
//! interface (`$2005/$2006` and the nametable bits of `$2000`) feed the
//! loopy state in [`crate::ppu::scroll`].

use bitflags::bitflags;

use crate::mem_block::ppu::OamRam;
use crate::memory::ppu as ppu_mem;
use crate::ppu::scroll::ScrollRegisters;

bitflags! {
    /// PPUCTRL (`$2000`): `N M T B s I n n`.
    ///
    /// `nn` selects the base nametable (also mirrored into the scroll `t`
    /// register), `I` the `$2007` step, `s`/`B` the sprite and background
    /// pattern tables, `T` 8x16 sprites, and `N` the NMI-on-VBlank enable.
    /// `M` (EXT master/slave) is stored but has no effect in this core.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct Control: u8 {
        const NAMETABLE_SELECT   = 0b0000_0011;
        const VRAM_STEP_32       = 0b0000_0100;
        const SPRITE_PATTERN_HI  = 0b0000_1000;
        const BG_PATTERN_HI      = 0b0001_0000;
        const TALL_SPRITES       = 0b0010_0000;
        const EXT_MASTER         = 0b0100_0000;
        const NMI_ENABLE         = 0b1000_0000;
    }
}

bitflags! {
    /// PPUMASK (`$2001`): `B G R s b s b g`.
    ///
    /// Enables for the two layers, their leftmost-column exceptions,
    /// grayscale, and the three emphasis bits (stored, not applied to the
    /// index framebuffer).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct Mask: u8 {
        const GRAYSCALE          = 0b0000_0001;
        const BG_LEFT_COLUMN     = 0b0000_0010;
        const SPRITE_LEFT_COLUMN = 0b0000_0100;
        const BG_ENABLE          = 0b0000_1000;
        const SPRITE_ENABLE      = 0b0001_0000;
        const EMPHASIS_RED       = 0b0010_0000;
        const EMPHASIS_GREEN     = 0b0100_0000;
        const EMPHASIS_BLUE      = 0b1000_0000;
    }
}

bitflags! {
    /// PPUSTATUS (`$2002`): `V S O` in the top three bits.
    ///
    /// Reading the register clears `V` and the shared write toggle; the low
    /// five bits are filled from the data-bus latch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct Status: u8 {
        const OVERFLOW    = 0b0010_0000;
        const SPRITE0_HIT = 0b0100_0000;
        const VBLANK      = 0b1000_0000;
    }
}

impl Control {
    pub(crate) fn nametable_select(self) -> u8 {
        self.bits() & Self::NAMETABLE_SELECT.bits()
    }

    /// Step applied to `v` after every `$2007` access.
    pub(crate) fn vram_step(self) -> u16 {
        if self.contains(Control::VRAM_STEP_32) {
            32
        } else {
            1
        }
    }

    /// Pattern table for 8x8 sprites (8x16 sprites pick theirs per tile).
    pub(crate) fn sprite_pattern_table(self) -> u16 {
        if self.contains(Control::SPRITE_PATTERN_HI) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    pub(crate) fn bg_pattern_table(self) -> u16 {
        if self.contains(Control::BG_PATTERN_HI) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    /// Sprite height in pixels (8 or 16).
    pub(crate) fn sprite_height(self) -> u8 {
        if self.contains(Control::TALL_SPRITES) {
            16
        } else {
            8
        }
    }

    pub(crate) fn nmi_enabled(self) -> bool {
        self.contains(Control::NMI_ENABLE)
    }
}

impl Mask {
    /// `true` when either layer renders; gates every `v` update and the
    /// sprite machinery.
    pub(crate) fn rendering_enabled(self) -> bool {
        self.intersects(Mask::BG_ENABLE | Mask::SPRITE_ENABLE)
    }
}

/// Everything the CPU reaches through `$2000-$2007`.
#[derive(Debug, Clone)]
pub(crate) struct Registers {
    pub(crate) control: Control,
    pub(crate) mask: Mask,
    pub(crate) status: Status,
    /// OAM pointer driven by `$2003`/`$2004`.
    pub(crate) oam_addr: u8,
    /// Primary sprite memory behind `$2004`.
    pub(crate) oam: OamRam,
    /// Loopy scroll state fed by `$2000/$2005/$2006`.
    pub(crate) scroll: ScrollRegisters,
    /// Delay buffer implementing the lagged `$2007` read.
    pub(crate) vram_buffer: u8,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub(crate) fn new() -> Self {
        Self {
            control: Control::default(),
            mask: Mask::default(),
            status: Status::default(),
            oam_addr: 0,
            oam: OamRam::new(),
            scroll: ScrollRegisters::default(),
            vram_buffer: 0,
        }
    }

    /// Restores all register values to their power-on defaults.
    pub(crate) fn reset(&mut self) {
        *self = Registers::new();
    }

    /// `$2000` write: the nametable bits also land in the scroll `t`.
    pub(crate) fn write_control(&mut self, value: u8) {
        self.control = Control::from_bits_retain(value);
        self.scroll
            .set_nametable_select(self.control.nametable_select());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_write_mirrors_nametable_bits_into_t() {
        let mut registers = Registers::new();
        registers.write_control(0b0000_0010);
        assert_eq!(registers.scroll.t >> 10, 0b10);
        registers.write_control(0b0000_0001);
        assert_eq!(registers.scroll.t >> 10, 0b01);
    }

    #[test]
    fn control_helpers_decode_their_bits() {
        let control = Control::from_bits_retain(0b1010_1100);
        assert_eq!(control.vram_step(), 32);
        assert_eq!(control.sprite_pattern_table(), 0x1000);
        assert_eq!(control.bg_pattern_table(), 0x0000);
        assert_eq!(control.sprite_height(), 16);
        assert!(control.nmi_enabled());
    }

    #[test]
    fn rendering_enabled_tracks_either_layer() {
        assert!(!Mask::GRAYSCALE.rendering_enabled());
        assert!(Mask::BG_ENABLE.rendering_enabled());
        assert!(Mask::SPRITE_ENABLE.rendering_enabled());
    }
}
