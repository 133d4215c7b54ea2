//! Standard NES controller (joypad) on port `$4016`.
//!
//! The pad is a parallel-in/serial-out shift register: writing bit 0 high
//! strobes the live button state into the register, writing it low latches,
//! and each read shifts one bit out in the order A, B, Select, Start, Up,
//! Down, Left, Right. Hardware returns 1s once the eight buttons have been
//! consumed.

use bitflags::bitflags;

bitflags! {
    /// Host-facing button mask. Bit order matches the serial read order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const A      = 0b0000_0001;
        const B      = 0b0000_0010;
        const SELECT = 0b0000_0100;
        const START  = 0b0000_1000;
        const UP     = 0b0001_0000;
        const DOWN   = 0b0010_0000;
        const LEFT   = 0b0100_0000;
        const RIGHT  = 0b1000_0000;
    }
}

/// Serially-readable controller state with latch/strobe behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controller {
    buttons: Buttons,
    strobe: bool,
    shift: u8,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the live button mask supplied by the host.
    pub fn set_buttons(&mut self, buttons: Buttons) {
        self.buttons = buttons;
        if self.strobe {
            self.shift = self.buttons.bits();
        }
    }

    /// Current live button mask.
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Handles a `$4016` write. While bit 0 stays high the shift register
    /// tracks the live state; dropping it latches.
    pub fn write(&mut self, value: u8) {
        self.strobe = value & 0x01 != 0;
        if self.strobe {
            self.shift = self.buttons.bits();
        }
    }

    /// Handles a `$4016` read, returning the serial data bit in bit 0.
    pub fn read(&mut self) -> u8 {
        if self.strobe {
            // Strobe held high: the register keeps reloading, so every read
            // observes the live A button.
            return self.buttons.bits() & 0x01;
        }
        let bit = self.shift & 0x01;
        // After eight reads hardware keeps returning 1s; shift them in.
        self.shift = (self.shift >> 1) | 0x80;
        bit
    }
}
