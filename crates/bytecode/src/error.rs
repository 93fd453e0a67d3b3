//! Decode and validation errors for the regex bytecode format.

use thiserror::Error;

/// Errors that occur while decoding a single instruction from a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Opcode byte is beyond every defined category range.
    #[error("illegal opcode at byte {0}: {1:#04x}")]
    IllegalOpcode(usize, u8),

    /// Opcode byte falls inside a known category range but has no opcode
    /// assigned to it.
    #[error("reserved opcode at byte {0}: {1:#04x}")]
    ReservedOpcode(usize, u8),

    /// Buffer ends before an instruction's operand bytes are fully present.
    #[error("truncated instruction at byte {at}: need {needed} more byte(s), found {found}")]
    Truncated {
        at: usize,
        needed: usize,
        found: usize,
    },

    /// A capture/backreference group index exceeds the fixed capture table width.
    #[error("group index {index} at byte {at} exceeds capture table width {max}")]
    GroupIndexOutOfRange { at: usize, index: u8, max: u8 },
}

impl DecodeError {
    /// The byte offset the error was detected at, when applicable.
    pub fn at(&self) -> usize {
        match self {
            DecodeError::IllegalOpcode(at, _) => *at,
            DecodeError::ReservedOpcode(at, _) => *at,
            DecodeError::Truncated { at, .. } => *at,
            DecodeError::GroupIndexOutOfRange { at, .. } => *at,
        }
    }
}

/// Errors that occur while validating a fully-decoded program as a whole.
///
/// Unlike [`DecodeError`], these are whole-program structural checks: they
/// can only be detected once every instruction has been decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// A control-flow operand (GOTO/SPLIT target, lookaround region) lands
    /// outside `[0, len(buffer)]`.
    #[error("jump from instruction at byte {at} targets out-of-range pc {target} (program length {len})")]
    JumpOutOfRange { at: usize, target: i64, len: usize },

    /// The program's last instruction is not MATCH.
    #[error("program does not end with a MATCH instruction")]
    MissingTerminalMatch,

    /// The program is empty (no instructions at all).
    #[error("program is empty")]
    EmptyProgram,

    /// A LOOKAHEAD/LOOKBEHIND has no matching `_END`, or a `_END` appears
    /// without an opener, before the end of the buffer.
    #[error("unbalanced lookaround region opened at byte {at}")]
    UnbalancedLookaround { at: usize },

    /// Decoding failed partway through validation.
    #[error("decode error during validation: {0}")]
    Decode(#[from] DecodeError),
}
