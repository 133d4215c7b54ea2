//! Per-scanline sprite slots.
//!
//! The PPU has room for eight sprites per scanline. Each slot holds the two
//! pattern bitplanes, the latched attributes, and an X counter that delays
//! the slot until the beam reaches the sprite's left edge; once the counter
//! expires the shifters emit one pixel per dot.

use crate::ppu::sprite::SpriteAttributes;

/// One sprite slot for the current scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct SpriteSlot {
    /// Pattern bitplane 0, shifted left once per dot after X expires.
    pattern_low: u8,
    /// Pattern bitplane 1, shifted left once per dot after X expires.
    pattern_high: u8,
    /// Latched attributes (palette select, priority, flips).
    attributes: SpriteAttributes,
    /// Dots left until the slot starts outputting.
    x_counter: u8,
    /// This slot holds OAM index 0 (sprite-zero hit source).
    sprite0: bool,
}

/// Sprite contribution for a single dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SpritePixel {
    /// Sprite palette select (0..=3).
    pub(crate) palette: u8,
    /// Color index within the palette (0 means transparent).
    pub(crate) color: u8,
    /// The sprite sits behind opaque background pixels.
    pub(crate) behind_background: bool,
    /// The pixel came from OAM index 0.
    pub(crate) is_sprite0: bool,
}

/// Sprite data staged for the next scanline by evaluation/fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SpriteLine {
    pub(crate) pattern_low: [u8; 8],
    pub(crate) pattern_high: [u8; 8],
    pub(crate) attributes: [u8; 8],
    pub(crate) x: [u8; 8],
    /// Number of sprites selected (0..=8).
    pub(crate) count: u8,
    /// OAM index 0 is among the selected sprites.
    pub(crate) sprite0: bool,
}

impl SpriteLine {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The eight sprite slots currently producing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SpritePipeline {
    slots: [SpriteSlot; 8],
    active: u8,
}

impl SpritePipeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Loads the staged sprite line at the start of a scanline.
    ///
    /// Pattern bytes are bit-reversed up front when horizontal flip is set so
    /// that shifting left always walks pixels left-to-right.
    pub(crate) fn load_line(&mut self, line: &SpriteLine) {
        self.clear();
        self.active = line.count.min(8);

        for i in 0..self.active as usize {
            let attributes = SpriteAttributes::from_bits_retain(line.attributes[i]);
            let mut low = line.pattern_low[i];
            let mut high = line.pattern_high[i];
            if attributes.contains(SpriteAttributes::FLIP_HORIZONTAL) {
                low = low.reverse_bits();
                high = high.reverse_bits();
            }

            self.slots[i] = SpriteSlot {
                pattern_low: low,
                pattern_high: high,
                attributes,
                x_counter: line.x[i],
                sprite0: line.sprite0 && i == 0,
            };
        }
    }

    /// Samples the highest-priority opaque sprite pixel for this dot and
    /// advances every active slot (X counters count down; expired slots
    /// shift).
    pub(crate) fn sample_and_shift(&mut self) -> SpritePixel {
        let mut chosen: Option<SpritePixel> = None;

        for slot in self.slots.iter_mut().take(self.active as usize) {
            if slot.x_counter > 0 {
                slot.x_counter -= 1;
                continue;
            }

            let bit0 = (slot.pattern_low >> 7) & 1;
            let bit1 = (slot.pattern_high >> 7) & 1;
            let color = (bit1 << 1) | bit0;

            // Lower OAM indices win regardless of what the later slots hold.
            if chosen.is_none() && color != 0 {
                chosen = Some(SpritePixel {
                    palette: slot.attributes.palette(),
                    color,
                    behind_background: slot
                        .attributes
                        .contains(SpriteAttributes::PRIORITY_BEHIND_BACKGROUND),
                    is_sprite0: slot.sprite0,
                });
            }

            slot.pattern_low <<= 1;
            slot.pattern_high <<= 1;
        }

        chosen.unwrap_or_default()
    }
}
