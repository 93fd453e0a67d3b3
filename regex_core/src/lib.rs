//! Top-level facade over the regex pipeline: pattern string in, compiled
//! [`Program`] and matches out.
//!
//! This crate wires `regex_core_syntax` → `regex_core_compile` →
//! `regex_core_vm` into one public surface and adds no algorithmic logic of
//! its own. It exposes both the language-neutral free-function shape
//! (`compile`/`match_full`/`find`/`find_all`/`replace` over a [`Program`])
//! and an idiomatic [`Regex`] wrapper for everyday use.
//!
//! The engine is byte-oriented and ASCII-aware (see `regex_core_bytecode`'s
//! `CHAR_CLASS` tables): haystacks are taken as `&str` for ergonomics, but
//! matching itself operates on `str::as_bytes()`, and a match boundary is
//! only guaranteed to land on a `char` boundary when the pattern and
//! haystack are themselves ASCII.

mod error;

pub use error::{CompileError, Error, RuntimeError};
pub use regex_core_bytecode::Program;
pub use regex_core_vm::Captures as RawCaptures;

/// Knobs that change both how a pattern compiles and how matching it later
/// is resource-bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fold ASCII letter matching and backreferences case-insensitively.
    pub case_insensitive: bool,
    /// Recursion depth cap for every subsequent match attempt. `0` disables it.
    pub max_recursion_depth: usize,
    /// Step-count cap for every subsequent match attempt. `0` disables it.
    pub max_steps: u64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            case_insensitive: false,
            max_recursion_depth: 1000,
            max_steps: 1_000_000,
        }
    }
}

impl CompileOptions {
    fn codegen_options(self) -> regex_core_compile::CompileOptions {
        regex_core_compile::CompileOptions {
            case_insensitive: self.case_insensitive,
        }
    }

    fn matcher_config(self) -> regex_core_vm::MatcherConfig {
        regex_core_vm::MatcherConfig {
            max_recursion_depth: self.max_recursion_depth,
            max_steps: self.max_steps,
        }
    }
}

/// Parses and lowers `pattern` to bytecode. Language-neutral free-function
/// form of `Regex::with_options`.
pub fn compile(pattern: &str, options: CompileOptions) -> Result<Program, CompileError> {
    regex_core_compile::compile(pattern, options.codegen_options())
}

/// Succeeds iff `program` matches `input` from position 0 to its end.
pub fn match_full(
    program: &Program,
    input: &[u8],
    options: CompileOptions,
) -> Result<bool, RuntimeError> {
    regex_core_vm::matches_full(program, input, &options.matcher_config())
}

/// The first match of `program` anywhere in `input`.
pub fn find(
    program: &Program,
    input: &[u8],
    options: CompileOptions,
) -> Result<Option<RawCaptures>, RuntimeError> {
    regex_core_vm::find(program, input, &options.matcher_config())
}

/// Every non-overlapping match of `program` in `input`, left to right.
pub fn find_all(
    program: &Program,
    input: &[u8],
    options: CompileOptions,
) -> Result<Vec<RawCaptures>, RuntimeError> {
    regex_core_vm::find_all(program, input, &options.matcher_config())
}

/// Replaces every match of `program` in `input` with `replacement`.
pub fn replace(
    program: &Program,
    input: &[u8],
    replacement: &[u8],
    options: CompileOptions,
) -> Result<Vec<u8>, RuntimeError> {
    regex_core_vm::replace(program, input, replacement, &options.matcher_config())
}

/// One match against a borrowed haystack: a byte range plus the captures
/// recorded along the way.
#[derive(Debug, Clone)]
pub struct Match<'h> {
    haystack: &'h str,
    start: usize,
    end: usize,
}

impl<'h> Match<'h> {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn as_str(&self) -> &'h str {
        &self.haystack[self.start..self.end]
    }
}

/// The capture table of one successful match, indexed by group number
/// (`0` is the whole match).
#[derive(Debug, Clone)]
pub struct Captures<'h> {
    haystack: &'h str,
    slots: RawCaptures,
}

impl<'h> Captures<'h> {
    pub fn get(&self, index: usize) -> Option<Match<'h>> {
        let (start, end) = self.slots.group(index as u8)?;
        Some(Match {
            haystack: self.haystack,
            start,
            end,
        })
    }
}

impl<'h> std::ops::Index<usize> for Captures<'h> {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        self.get(index)
            .unwrap_or_else(|| panic!("no group at index {index}"))
            .as_str()
    }
}

/// Lazily iterates every non-overlapping match in a haystack, advancing the
/// search position one match at a time instead of collecting eagerly.
pub struct FindAll<'r, 'h> {
    regex: &'r Regex,
    haystack: &'h str,
    pos: usize,
    done: bool,
}

impl<'r, 'h> Iterator for FindAll<'r, 'h> {
    type Item = Result<Match<'h>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos > self.haystack.len() {
            return None;
        }
        let config = self.regex.options.matcher_config();
        let caps = match regex_core_vm::find_from(
            &self.regex.program,
            self.haystack.as_bytes(),
            self.pos,
            &config,
        ) {
            Ok(Some(caps)) => caps,
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        };
        let (start, end) = caps
            .group(0)
            .expect("slot 0 is always set by a successful match");
        self.pos = if end > start { end } else { end + 1 };
        Some(Ok(Match {
            haystack: self.haystack,
            start,
            end,
        }))
    }
}

/// A compiled pattern ready to match against any number of haystacks.
///
/// `Program` is an owned, immutable byte buffer with no interior
/// mutability, so `Regex` is `Send + Sync`: the same compiled pattern can
/// be shared (e.g. behind an `Arc`) and matched against concurrently from
/// multiple threads, each match attempt owning its own ephemeral matcher
/// state.
#[derive(Debug, Clone)]
pub struct Regex {
    program: Program,
    options: CompileOptions,
}

impl Regex {
    /// Compiles `pattern` with default options.
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Regex::with_options(pattern, CompileOptions::default())
    }

    /// Compiles `pattern` with caller-supplied options.
    pub fn with_options(pattern: &str, options: CompileOptions) -> Result<Regex, Error> {
        let program = compile(pattern, options)?;
        Ok(Regex { program, options })
    }

    /// True iff this pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> Result<bool, Error> {
        Ok(self.find(text)?.is_some())
    }

    /// True iff this pattern matches `text` from start to end.
    pub fn matches_full(&self, text: &str) -> Result<bool, Error> {
        Ok(match_full(&self.program, text.as_bytes(), self.options)?)
    }

    /// The first match anywhere in `text`.
    pub fn find<'h>(&self, text: &'h str) -> Result<Option<Match<'h>>, Error> {
        let config = self.options.matcher_config();
        let caps = regex_core_vm::find(&self.program, text.as_bytes(), &config)?;
        Ok(caps.and_then(|c| c.group(0)).map(|(start, end)| Match {
            haystack: text,
            start,
            end,
        }))
    }

    /// The first match anywhere in `text`, together with its capture groups.
    pub fn captures<'h>(&self, text: &'h str) -> Result<Option<Captures<'h>>, Error> {
        let config = self.options.matcher_config();
        let slots = regex_core_vm::find(&self.program, text.as_bytes(), &config)?;
        Ok(slots.map(|slots| Captures {
            haystack: text,
            slots,
        }))
    }

    /// Every non-overlapping match in `text`, left to right, as a lazy
    /// iterator.
    pub fn find_all<'r, 'h>(&'r self, text: &'h str) -> FindAll<'r, 'h> {
        FindAll {
            regex: self,
            haystack: text,
            pos: 0,
            done: false,
        }
    }

    /// Replaces every match in `text` with `replacement`, concatenating the
    /// unmatched slices in between.
    pub fn replace(&self, text: &str, replacement: &str) -> Result<String, Error> {
        let config = self.options.matcher_config();
        let bytes = regex_core_vm::replace(
            &self.program,
            text.as_bytes(),
            replacement.as_bytes(),
            &config,
        )?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_compiles_with_default_options() {
        let re = Regex::new(r"\d+").unwrap();
        assert!(re.is_match("abc123").unwrap());
    }

    #[test]
    fn matches_full_requires_whole_string() {
        let re = Regex::new("ab").unwrap();
        assert!(re.matches_full("ab").unwrap());
        assert!(!re.matches_full("abc").unwrap());
    }

    #[test]
    fn find_reports_start_end_and_text() {
        let re = Regex::new(r"hello (\w+)").unwrap();
        let m = re.find("hello world").unwrap().unwrap();
        assert_eq!(m.start(), 0);
        assert_eq!(m.end(), 11);
        assert_eq!(m.as_str(), "hello world");
    }

    #[test]
    fn captures_exposes_group_one() {
        let re = Regex::new(r"hello (\w+)").unwrap();
        let caps = re.captures("hello world").unwrap().unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "world");
        assert_eq!(&caps[1], "world");
    }

    #[test]
    fn find_all_yields_every_match_lazily() {
        let re = Regex::new(r"\d+").unwrap();
        let found: Vec<&str> = re
            .find_all("a1 b22 c333")
            .map(|m| m.unwrap().as_str())
            .collect();
        assert_eq!(found, vec!["1", "22", "333"]);
    }

    #[test]
    fn replace_substitutes_every_match() {
        let re = Regex::new(r"\d+").unwrap();
        assert_eq!(re.replace("a1 b22 c333", "#").unwrap(), "a# b# c#");
    }

    #[test]
    fn invalid_pattern_surfaces_compile_error() {
        let err = Regex::new("(a").unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
    }

    #[test]
    fn backreference_case_insensitive_scenarios() {
        let re = Regex::new(r"(.)\1").unwrap();
        assert!(re.matches_full("aa").unwrap());
        assert!(!re.matches_full("ab").unwrap());

        let ci = Regex::with_options(
            r"(.)\1",
            CompileOptions {
                case_insensitive: true,
                ..CompileOptions::default()
            },
        )
        .unwrap();
        assert!(ci.matches_full("Aa").unwrap());
    }

    #[test]
    fn lookbehind_scenario_matches_price_after_dollar() {
        let re = Regex::new(r"(?<=\$)\d+").unwrap();
        let m = re.find("Price: $100").unwrap().unwrap();
        assert_eq!((m.start(), m.end()), (8, 11));
        assert!(re.find("Price: 100").unwrap().is_none());
    }

    #[test]
    fn bounded_repeat_scenarios() {
        let greedy = Regex::new("a{2,4}").unwrap();
        let m = greedy.find("aaaaa").unwrap().unwrap();
        assert_eq!((m.start(), m.end()), (0, 4));

        let lazy = Regex::new("a{2,4}?").unwrap();
        let m = lazy.find("aaaa").unwrap().unwrap();
        assert_eq!((m.start(), m.end()), (0, 2));
    }
}
