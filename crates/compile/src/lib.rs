//! Turns a pattern string into a compiled [`Program`].
//!
//! This crate is the only place in the workspace that knows how to lower
//! an [`regex_core_syntax::Ast`] to bytecode. The recursive walk lives in
//! [`codegen`]; [`label`] is the forward-jump bookkeeping it's built on.

mod char_tables;
mod codegen;
mod error;
mod label;

use regex_core_bytecode::{Instruction, Program};
use regex_core_syntax::MAX_CAPTURING_GROUPS;

pub use error::CompileError;

/// Knobs that change how a pattern lowers to bytecode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fold ASCII letter matching and backreferences case-insensitively.
    pub case_insensitive: bool,
}

/// Parses `pattern` and emits a [`Program`] for it.
///
/// The whole match is itself wrapped in the slot-0 capture pair, so
/// `program`'s capture table always has a well-defined entry 0 once a
/// match completes.
pub fn compile(pattern: &str, options: CompileOptions) -> Result<Program, CompileError> {
    let (ast, group_count) = regex_core_syntax::parse(pattern)?;
    if group_count > MAX_CAPTURING_GROUPS {
        return Err(CompileError::TooManyCaptures {
            max: MAX_CAPTURING_GROUPS,
        });
    }

    let mut cg = codegen::Codegen::new(options.case_insensitive);
    cg.writer.emit(Instruction::SaveStart(0));
    cg.emit(&ast);
    cg.writer.emit(Instruction::SaveEnd(0));
    cg.writer.emit(Instruction::Match);
    cg.writer.finalize()
}
