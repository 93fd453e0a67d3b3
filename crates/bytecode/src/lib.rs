//! Bytecode format for the regex engine: opcodes, instruction encoding,
//! and the compiled [`Program`] container.
//!
//! This crate owns the wire shape that `regex_core_compile` emits and
//! `regex_core_vm` executes. It has no opinion about regex syntax or
//! matching policy — only about how an instruction is laid out as bytes
//! and how a buffer of them is validated and rendered.
//!
//! - [`Opcode`] — the fixed 8-bit opcode set, grouped into categories.
//! - [`Instruction`] — the decoded, owned form of one instruction.
//! - [`Program`] — an owned, immutable byte buffer plus `validate`/`disassemble`.
//! - [`DecodeError`] / [`ValidateError`] — typed diagnostics, each carrying
//!   the byte offset at which the problem was detected.

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;

pub use error::{DecodeError, ValidateError};
pub use instruction::{Instruction, MAX_GROUPS};
pub use opcode::{Opcode, OpcodeByteError, OperandKind, ALL_OPCODES};
pub use program::Program;
