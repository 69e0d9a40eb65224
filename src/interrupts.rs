//! The IE/IF interrupt bit-sets. Both registers share the same 5-bit layout,
//! so one bitflags type backs both — only the owner (bus) differs.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InterruptFlags: u8 {
        const VBLANK  = 1 << 0;
        const LCDSTAT = 1 << 1;
        const TIMER   = 1 << 2;
        const SERIAL  = 1 << 3;
        const JOYPAD  = 1 << 4;
    }
}

impl InterruptFlags {
    /// Only the low 5 bits of IE/IF are architecturally meaningful.
    pub const MASK: u8 = 0x1F;

    pub fn from_byte(v: u8) -> Self {
        InterruptFlags::from_bits_truncate(v & Self::MASK)
    }

    /// The lowest set bit wins (VBlank highest priority, Joypad lowest).
    pub fn highest_priority(self) -> Option<InterruptKind> {
        for kind in InterruptKind::ALL {
            if self.contains(kind.flag()) {
                return Some(kind);
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl InterruptKind {
    pub const ALL: [InterruptKind; 5] = [
        InterruptKind::VBlank,
        InterruptKind::LcdStat,
        InterruptKind::Timer,
        InterruptKind::Serial,
        InterruptKind::Joypad,
    ];

    pub fn flag(self) -> InterruptFlags {
        match self {
            InterruptKind::VBlank => InterruptFlags::VBLANK,
            InterruptKind::LcdStat => InterruptFlags::LCDSTAT,
            InterruptKind::Timer => InterruptFlags::TIMER,
            InterruptKind::Serial => InterruptFlags::SERIAL,
            InterruptKind::Joypad => InterruptFlags::JOYPAD,
        }
    }

    pub fn vector(self) -> u16 {
        match self {
            InterruptKind::VBlank => 0x0040,
            InterruptKind::LcdStat => 0x0048,
            InterruptKind::Timer => 0x0050,
            InterruptKind::Serial => 0x0058,
            InterruptKind::Joypad => 0x0060,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_is_lowest_bit_first() {
        let pending = InterruptFlags::TIMER | InterruptFlags::JOYPAD;
        assert_eq!(pending.highest_priority(), Some(InterruptKind::Timer));
    }

    #[test]
    fn mask_clips_to_five_bits() {
        assert_eq!(InterruptFlags::from_byte(0xFF).bits(), 0x1F);
    }
}
