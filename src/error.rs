//! Error taxonomy for the core. Unknown opcodes and out-of-range ROM access
//! are programming/content errors, not recoverable runtime conditions, so
//! they carry a full diagnostic snapshot rather than a bare message.

use thiserror::Error;

/// Register snapshot attached to a fatal-opcode diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuSnapshot {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub f: u8,
    pub bc: u16,
    pub de: u16,
    pub hl: u16,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid ROM: {0}")]
    InvalidRom(String),

    #[error("unimplemented/undefined opcode 0x{opcode:02X} at pc=0x{pc:04X} (snapshot: {snapshot:?})")]
    UnimplementedOpcode {
        opcode: u8,
        pc: u16,
        snapshot: CpuSnapshot,
    },

    #[error("ROM read out of bounds: index {index} (len {len})")]
    RomOutOfBounds { index: usize, len: usize },

    #[error("corrupt save state: {0}")]
    CorruptSave(String),
}
