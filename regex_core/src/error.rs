//! The facade's top-level error type.

use thiserror::Error;

pub use regex_core_compile::CompileError;
pub use regex_core_vm::RuntimeError;

/// Everything that can go wrong between a pattern string and a match
/// result, collapsed into one type so callers can write
/// `fn f() -> Result<_, regex_core::Error>` and use `?` across the whole
/// pipeline without manually mapping each crate's own error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The pattern failed to compile; see the wrapped [`CompileError`].
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A compiled pattern failed to execute against a haystack; see the
    /// wrapped [`RuntimeError`].
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
