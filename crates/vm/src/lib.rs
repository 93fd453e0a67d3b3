//! Recursive backtracking matcher for compiled regex bytecode.
//!
//! Given a [`regex_core_bytecode::Program`] and a haystack, walks the
//! bytecode against the input, backtracking on failed branches and tracking
//! captures as it goes. [`machine`] holds matcher state and the `SPLIT`
//! classifier it needs for loop detection; [`execute`] holds the recursive
//! opcode dispatch itself.

pub mod error;
pub mod execute;
pub mod machine;

pub use error::RuntimeError;
pub use machine::{Captures, Matcher, DEFAULT_LOOKBEHIND_WINDOW};

use regex_core_bytecode::Program;

/// ReDoS guards threaded through every match attempt. `0` disables the
/// corresponding check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    pub max_recursion_depth: usize,
    pub max_steps: u64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            max_recursion_depth: 1000,
            max_steps: 1_000_000,
        }
    }
}

/// Succeeds iff a match anchored at position 0 consumes the entire input.
pub fn matches_full(
    program: &Program,
    input: &[u8],
    config: &MatcherConfig,
) -> Result<bool, RuntimeError> {
    let mut matcher = Matcher::new(program, input, config);
    match matcher.try_match_at(0)? {
        Some(caps) => Ok(caps.group(0) == Some((0, input.len()))),
        None => Ok(false),
    }
}

/// Tries `match_from(0, s)` for `s = from, from + 1, ..., input.len()`; the
/// first success wins. The matcher always sees the full input, not a
/// suffix slice, so a lookbehind can inspect bytes before `from`.
///
/// Exposed publicly so a caller (the facade crate's lazy `find_all`
/// iterator, for one) can drive the search one match at a time instead of
/// eagerly collecting every match up front.
pub fn find_from(
    program: &Program,
    input: &[u8],
    from: usize,
    config: &MatcherConfig,
) -> Result<Option<Captures>, RuntimeError> {
    let mut matcher = Matcher::new(program, input, config);
    for start in from..=input.len() {
        if let Some(caps) = matcher.try_match_at(start)? {
            return Ok(Some(caps));
        }
    }
    Ok(None)
}

/// The first match anywhere in `input`, or `None` if there isn't one.
pub fn find(
    program: &Program,
    input: &[u8],
    config: &MatcherConfig,
) -> Result<Option<Captures>, RuntimeError> {
    find_from(program, input, 0, config)
}

/// Every non-overlapping match in `input`, left to right. A zero-length
/// match advances the search position by one byte so iteration always
/// terminates.
pub fn find_all(
    program: &Program,
    input: &[u8],
    config: &MatcherConfig,
) -> Result<Vec<Captures>, RuntimeError> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos <= input.len() {
        let Some(caps) = find_from(program, input, pos, config)? else {
            break;
        };
        let (start, end) = caps
            .group(0)
            .expect("slot 0 is always set by a successful match");
        out.push(caps);
        pos = if end > start { end } else { end + 1 };
    }
    Ok(out)
}

/// Replaces every match in `input` with `replacement`, concatenating the
/// unmatched slices in between. With no matches, returns `input` unchanged.
pub fn replace(
    program: &Program,
    input: &[u8],
    replacement: &[u8],
    config: &MatcherConfig,
) -> Result<Vec<u8>, RuntimeError> {
    let matches = find_all(program, input, config)?;
    let mut out = Vec::with_capacity(input.len());
    let mut last = 0;
    for caps in &matches {
        let (start, end) = caps
            .group(0)
            .expect("slot 0 is always set by a successful match");
        out.extend_from_slice(&input[last..start]);
        out.extend_from_slice(replacement);
        last = end;
    }
    out.extend_from_slice(&input[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex_core_compile::{compile, CompileOptions};

    fn program(pattern: &str) -> Program {
        compile(pattern, CompileOptions::default()).unwrap()
    }

    #[test]
    fn matches_full_requires_consuming_entire_input() {
        let p = program("ab");
        let config = MatcherConfig::default();
        assert!(matches_full(&p, b"ab", &config).unwrap());
        assert!(!matches_full(&p, b"abc", &config).unwrap());
    }

    #[test]
    fn find_locates_a_match_not_anchored_at_zero() {
        let p = program(r"\w+");
        let config = MatcherConfig::default();
        let caps = find(&p, b"  hello", &config).unwrap().unwrap();
        assert_eq!(caps.group(0), Some((2, 7)));
    }

    #[test]
    fn find_returns_none_when_nothing_matches() {
        let p = program("xyz");
        let config = MatcherConfig::default();
        assert!(find(&p, b"abc", &config).unwrap().is_none());
    }

    #[test]
    fn find_all_collects_non_overlapping_matches_in_order() {
        let p = program(r"\d+");
        let config = MatcherConfig::default();
        let matches = find_all(&p, b"a1 b22 c333", &config).unwrap();
        let spans: Vec<_> = matches.iter().map(|c| c.group(0).unwrap()).collect();
        assert_eq!(spans, vec![(1, 2), (4, 6), (8, 11)]);
    }

    #[test]
    fn find_all_advances_past_zero_length_matches() {
        let p = program("a*");
        let config = MatcherConfig::default();
        let matches = find_all(&p, b"ba", &config).unwrap();
        // position 0: zero-length match before 'b'; position 1: "a".
        let spans: Vec<_> = matches.iter().map(|c| c.group(0).unwrap()).collect();
        assert_eq!(spans, vec![(0, 0), (1, 2), (2, 2)]);
    }

    #[test]
    fn replace_substitutes_every_match() {
        let p = program(r"\d+");
        let config = MatcherConfig::default();
        let out = replace(&p, b"a1 b22 c333", b"#", &config).unwrap();
        assert_eq!(out, b"a# b# c#");
    }

    #[test]
    fn replace_with_no_matches_returns_input_unchanged() {
        let p = program("xyz");
        let config = MatcherConfig::default();
        let out = replace(&p, b"abc", b"#", &config).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn redos_pattern_trips_step_limit_rather_than_running_unbounded() {
        let p = program("(a+)+b");
        let config = MatcherConfig {
            max_recursion_depth: 1000,
            max_steps: 10_000,
        };
        let input = vec![b'a'; 40];
        let err = matches_full(&p, &input, &config).unwrap_err();
        assert!(matches!(err, RuntimeError::StepLimitExceeded { .. }));
    }
}
