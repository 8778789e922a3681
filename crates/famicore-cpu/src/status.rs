//! CPU Status Register (P register) flags.
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! N  V  U  B  D  I  Z  C
//! │  │  │  │  │  │  │  └─ Carry
//! │  │  │  │  │  │  └──── Zero
//! │  │  │  │  │  └─────── Interrupt Disable
//! │  │  │  │  └────────── Decimal Mode (no BCD on the 2A03, flag still latches)
//! │  │  │  └───────────── Break (1 when pushed from PHP/BRK, 0 from IRQ/NMI)
//! │  │  └──────────────── Unused (always 1 when pushed to stack)
//! │  └─────────────────── Overflow
//! └────────────────────── Negative
//! ```

use bitflags::bitflags;

bitflags! {
    /// CPU Status Register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// Carry flag.
        const C = 1 << 0;

        /// Zero flag - set if the result of the last operation was zero.
        const Z = 1 << 1;

        /// Interrupt Disable - when set, IRQ is ignored. NMI is unaffected.
        const I = 1 << 2;

        /// Decimal Mode flag.
        const D = 1 << 3;

        /// Break flag - distinguishes BRK/PHP pushes from IRQ/NMI pushes.
        const B = 1 << 4;

        /// Unused flag - always 1 when the status is pushed to the stack.
        const U = 1 << 5;

        /// Overflow flag - set on signed overflow.
        const V = 1 << 6;

        /// Negative flag - mirrors bit 7 of the result.
        const N = 1 << 7;
    }
}

impl Status {
    /// Status after RESET: I and U set, everything else clear.
    pub const RESET: Self = Self::I.union(Self::U);

    /// Update Z and N from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set(Self::Z, value == 0);
        self.set(Self::N, value & 0x80 != 0);
    }

    /// Byte pushed to the stack. U is always set; B reflects the push source.
    #[inline]
    #[must_use]
    pub const fn to_stack_byte(self, brk: bool) -> u8 {
        let mut value = self.bits() | Self::U.bits();
        if brk {
            value |= Self::B.bits();
        }
        value
    }

    /// Rebuild the register from a byte pulled off the stack.
    /// B is discarded and U forced on, as on hardware.
    #[inline]
    #[must_use]
    pub fn from_stack_byte(value: u8) -> Self {
        Self::from_bits_truncate((value & !Self::B.bits()) | Self::U.bits())
    }
}
