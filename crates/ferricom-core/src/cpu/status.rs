use bitflags::bitflags;

bitflags! {
    /// The 8-bit processor status register (P).
    ///
    /// Bit layout:
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// N V U B D I Z C
    /// ```
    ///
    /// Bit 5 (U) always reads as set. Bit 4 (B) only ever exists in copies of
    /// P pushed to the stack: BRK/PHP push it set, hardware interrupts push it
    /// clear, and PLP/RTI discard it on the way back in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct Status: u8 {
        /// Carry flag (C).
        const CARRY     = 0b0000_0001;

        /// Zero flag (Z).
        const ZERO      = 0b0000_0010;

        /// Interrupt disable flag (I). Masks IRQ, never NMI.
        const INTERRUPT = 0b0000_0100;

        /// Decimal mode flag (D). Storable but without arithmetic effect on
        /// the 2A03.
        const DECIMAL   = 0b0000_1000;

        /// Break command flag (B). See the type docs for push semantics.
        const BREAK     = 0b0001_0000;

        /// Unused bit, observed as 1.
        const UNUSED    = 0b0010_0000;

        /// Overflow flag (V).
        const OVERFLOW  = 0b0100_0000;

        /// Negative flag (N), mirroring bit 7 of the last result.
        const NEGATIVE  = 0b1000_0000;
    }
}

impl Status {
    /// Updates Z and N from a result byte.
    #[inline]
    pub(crate) fn set_zn(&mut self, value: u8) {
        self.set(Status::ZERO, value == 0);
        self.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    #[inline]
    pub(crate) fn set_c(&mut self, value: bool) {
        self.set(Status::CARRY, value);
    }

    #[inline]
    pub(crate) fn set_v(&mut self, value: bool) {
        self.set(Status::OVERFLOW, value);
    }

    #[inline]
    pub(crate) fn c(&self) -> bool {
        self.contains(Status::CARRY)
    }

    /// Reconstructs P from a byte pulled off the stack: the stored B bit is
    /// discarded and U is forced on.
    #[inline]
    pub(crate) fn from_pulled(value: u8) -> Self {
        (Status::from_bits_retain(value) - Status::BREAK) | Status::UNUSED
    }

    /// The byte BRK and PHP push: P with both B and U set.
    #[inline]
    pub(crate) fn to_pushed(self) -> u8 {
        (self | Status::BREAK | Status::UNUSED).bits()
    }

    /// The byte hardware interrupts push: P with U set and B clear.
    #[inline]
    pub(crate) fn to_pushed_irq(self) -> u8 {
        ((self | Status::UNUSED) - Status::BREAK).bits()
    }
}
