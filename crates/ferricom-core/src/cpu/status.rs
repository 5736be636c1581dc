use bitflags::bitflags;

bitflags! {
    /// The 6502 processor status register (P).
    ///
    /// Bit layout: `N V - B D I Z C`. Bits B and the unused bit 5 only
    /// exist on the stack copy; pushes set them per the push source
    /// (instruction vs interrupt) and pulls ignore them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Carry out of bit 7, or inverted borrow for subtraction.
        const CARRY     = 0b0000_0001;
        const ZERO      = 0b0000_0010;
        /// Masks IRQs while set; NMI is unaffected.
        const INTERRUPT = 0b0000_0100;
        /// Decimal mode flag; the 2A03 ignores it but stores it.
        const DECIMAL   = 0b0000_1000;
        /// Break flag as it appears on pushed copies.
        const BREAK     = 0b0001_0000;
        /// Always reads back as 1 on pushed copies.
        const UNUSED    = 0b0010_0000;
        /// Signed overflow.
        const OVERFLOW  = 0b0100_0000;
        /// Bit 7 of the last result.
        const NEGATIVE  = 0b1000_0000;
    }
}

impl Status {
    /// Power-on value: interrupt-disable and the unused bit set.
    pub fn power_on() -> Self {
        Status::INTERRUPT | Status::UNUSED
    }

    /// Updates Z and N from a result byte.
    pub fn set_zn(&mut self, value: u8) {
        self.set(Status::ZERO, value == 0);
        self.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    /// Restores flags from a stack byte: B is dropped, bit 5 forced on.
    pub fn from_stack_byte(byte: u8) -> Self {
        (Status::from_bits_truncate(byte) - Status::BREAK) | Status::UNUSED
    }
}
