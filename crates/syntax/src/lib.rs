//! Pattern front end: lexer, recursive-descent parser, and the AST they
//! produce.
//!
//! This crate turns a pattern string into an [`Ast`] and nothing more — it
//! has no notion of bytecode. `regex_core_compile` is the crate that walks
//! the tree this one builds.
//!
//! ```
//! use regex_core_syntax::parse;
//!
//! let (ast, group_count) = parse(r"hello (\w+)").unwrap();
//! assert_eq!(group_count, 1);
//! ```

pub mod ast;
pub mod error;
mod lexer;
mod parser;

pub use ast::{Ast, ClassItem, ClassShorthand, Greediness};
pub use error::SyntaxError;
pub use parser::{parse, MAX_CAPTURING_GROUPS};
