//! Errors surfaced by code generation.

use regex_core_syntax::SyntaxError;
use thiserror::Error;

/// Errors that occur turning an AST into bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The pattern failed to parse; see the wrapped [`SyntaxError`].
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Defense in depth: the parser already enforces the 15-group ceiling,
    /// but codegen re-checks since it is the component that actually
    /// indexes into the 16-slot capture table.
    #[error("pattern declares more than {max} capturing groups")]
    TooManyCaptures { max: u8 },

    /// The emitted bytecode buffer would exceed the addressable range of a
    /// signed 32-bit jump operand.
    #[error("compiled program exceeds the addressable operand range")]
    ProgramTooLarge,

    /// Internal invariant violation: `finalize()` was called with pending
    /// patches. Indicates a code generator bug, not a user-facing pattern
    /// error.
    #[error("internal error: {count} label(s) left unresolved after code generation")]
    UnresolvedLabels { count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_non_empty() {
        let errors = vec![
            CompileError::TooManyCaptures { max: 15 },
            CompileError::ProgramTooLarge,
            CompileError::UnresolvedLabels { count: 2 },
        ];
        for e in &errors {
            assert!(!e.to_string().is_empty());
        }
    }

    #[test]
    fn syntax_error_converts_via_from() {
        let syntax_err = SyntaxError::UnmatchedParen { at: 3 };
        let compile_err: CompileError = syntax_err.clone().into();
        assert_eq!(compile_err, CompileError::Syntax(syntax_err));
    }
}
