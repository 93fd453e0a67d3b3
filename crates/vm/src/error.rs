//! Runtime errors raised while executing a compiled program against input.
//!
//! Unlike [`regex_core_bytecode::ValidateError`], these can only occur
//! while actually walking the bytecode against a haystack — a program
//! that passed `Program::validate()` will never hit [`RuntimeError::MalformedProgram`],
//! but the matcher checks anyway rather than trusting an un-validated
//! caller.

use regex_core_bytecode::DecodeError;
use thiserror::Error;

/// Errors surfaced by the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The backtracking search nested deeper than
    /// [`crate::MatcherConfig::max_recursion_depth`] allows. Usually means
    /// a pathological pattern against a long input rather than a bug in
    /// the pattern itself.
    #[error("recursion depth exceeded limit {limit}")]
    RecursionLimitExceeded { limit: usize },

    /// The search took more single-instruction steps than
    /// [`crate::MatcherConfig::max_steps`] allows — the catastrophic
    /// backtracking guard.
    #[error("step count exceeded limit {limit}")]
    StepLimitExceeded { limit: u64 },

    /// The program counter landed on bytes that don't decode to a valid
    /// instruction. Indicates a program that skipped `Program::validate()`.
    #[error("malformed program at byte {at}: {source}")]
    MalformedProgram {
        at: usize,
        #[source]
        source: DecodeError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_non_empty() {
        let errors = vec![
            RuntimeError::RecursionLimitExceeded { limit: 1000 },
            RuntimeError::StepLimitExceeded { limit: 1_000_000 },
            RuntimeError::MalformedProgram {
                at: 4,
                source: DecodeError::IllegalOpcode(4, 0xFF),
            },
        ];
        for e in &errors {
            assert!(!e.to_string().is_empty());
        }
    }
}
