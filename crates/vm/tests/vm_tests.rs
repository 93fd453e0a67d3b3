//! End-to-end tests driving real compiled programs through the matcher.
//!
//! Unlike the unit tests colocated with `execute.rs`/`machine.rs`, these
//! exercise the full `regex_core_syntax` → `regex_core_compile` →
//! `regex_core_vm` pipeline on the concrete scenarios the engine is meant
//! to handle, not hand-built instruction sequences.

use regex_core_compile::{compile, CompileOptions};
use regex_core_vm::{find, find_all, matches_full, replace, MatcherConfig};

fn prog(pattern: &str) -> regex_core_bytecode::Program {
    compile(pattern, CompileOptions::default()).unwrap()
}

fn prog_ci(pattern: &str) -> regex_core_bytecode::Program {
    compile(
        pattern,
        CompileOptions {
            case_insensitive: true,
        },
    )
    .unwrap()
}

// ============================================================
// Capturing groups
// ============================================================

#[test]
fn capturing_group_extracts_the_matched_word() {
    let p = prog(r"hello (\w+)");
    let config = MatcherConfig::default();
    let caps = find(&p, b"hello world", &config).unwrap().unwrap();
    assert_eq!(caps.group(0), Some((0, 11)));
    assert_eq!(caps.group(1), Some((6, 11)));
}

#[test]
fn unparticipated_group_reports_no_span() {
    let p = prog(r"(a)|(b)");
    let config = MatcherConfig::default();
    let caps = find(&p, b"b", &config).unwrap().unwrap();
    assert_eq!(caps.group(1), None);
    assert_eq!(caps.group(2), Some((0, 1)));
}

// ============================================================
// Backreferences and case folding
// ============================================================

#[test]
fn backreference_requires_identical_repeat() {
    let p = prog(r"(\w+)\s\1");
    let config = MatcherConfig::default();
    assert!(find(&p, b"echo echo", &config).unwrap().is_some());
    assert!(find(&p, b"echo bravo", &config).unwrap().is_none());
}

#[test]
fn case_insensitive_backreference_folds_ascii_letters() {
    let p = prog_ci(r"(.)\1");
    let config = MatcherConfig::default();
    assert!(matches_full(&p, b"Aa", &config).unwrap());
    assert!(!matches_full(&p, b"Ab", &config).unwrap());
}

// ============================================================
// Quantifier policies
// ============================================================

#[test]
fn greedy_star_takes_the_longest_run() {
    let p = prog("a*");
    let config = MatcherConfig::default();
    let caps = find(&p, b"aaa", &config).unwrap().unwrap();
    assert_eq!(caps.group(0), Some((0, 3)));
}

#[test]
fn lazy_star_takes_the_shortest_run() {
    let p = prog("a*?");
    let config = MatcherConfig::default();
    let caps = find(&p, b"aaa", &config).unwrap().unwrap();
    assert_eq!(caps.group(0), Some((0, 0)));
}

#[test]
fn possessive_star_never_backtracks_and_can_fail_outright() {
    let p = prog("a*+a");
    let config = MatcherConfig::default();
    assert!(find(&p, b"aaa", &config).unwrap().is_none());
}

#[test]
fn possessive_star_still_matches_when_skip_is_the_whole_match() {
    let p = prog("a*+");
    let config = MatcherConfig::default();
    let caps = find(&p, b"aaa", &config).unwrap().unwrap();
    assert_eq!(caps.group(0), Some((0, 3)));
}

#[test]
fn possessive_plus_commits_to_the_full_run() {
    let p = prog("a++");
    let config = MatcherConfig::default();
    let caps = find(&p, b"aaa", &config).unwrap().unwrap();
    assert_eq!(caps.group(0), Some((0, 3)));
    assert!(find(&p, b"", &config).unwrap().is_none());
}

#[test]
fn possessive_question_takes_skip_branch_when_body_does_not_match() {
    let p = prog("a?+b");
    let config = MatcherConfig::default();
    let caps = find(&p, b"b", &config).unwrap().unwrap();
    assert_eq!(caps.group(0), Some((0, 1)));
}

#[test]
fn possessive_question_commits_to_its_match_when_available() {
    let p = prog("a?+a");
    let config = MatcherConfig::default();
    // The possessive `?` commits to consuming the `a`, leaving nothing for
    // the trailing literal `a` to match — it cannot backtrack to skip.
    assert!(find(&p, b"a", &config).unwrap().is_none());
}

#[test]
fn bounded_repeat_respects_min_and_max() {
    let p = prog("a{2,4}");
    let config = MatcherConfig::default();
    let caps = find(&p, b"aaaaa", &config).unwrap().unwrap();
    assert_eq!(caps.group(0), Some((0, 4)));

    let too_few = prog("a{2,4}");
    assert!(find(&too_few, b"a", &config).unwrap().is_none());
}

// ============================================================
// Lookaround
// ============================================================

#[test]
fn lookahead_gates_without_consuming() {
    let p = prog("foo(?=bar)");
    let config = MatcherConfig::default();
    let caps = find(&p, b"foobar", &config).unwrap().unwrap();
    assert_eq!(caps.group(0), Some((0, 3)));
    assert!(find(&p, b"foobaz", &config).unwrap().is_none());
}

#[test]
fn lookbehind_matches_digits_after_a_dollar_sign() {
    let p = prog(r"(?<=\$)\d+");
    let config = MatcherConfig::default();
    let caps = find(&p, b"Price: $100", &config).unwrap().unwrap();
    assert_eq!(caps.group(0), Some((8, 11)));
    assert!(find(&p, b"Price: 100", &config).unwrap().is_none());
}

#[test]
fn negative_lookahead_rejects_the_forbidden_suffix() {
    let p = prog(r"foo(?!bar)");
    let config = MatcherConfig::default();
    assert!(find(&p, b"foobaz", &config).unwrap().is_some());
    assert!(find(&p, b"foobar", &config).unwrap().is_none());
}

// ============================================================
// find_all / replace
// ============================================================

#[test]
fn find_all_collects_every_number_left_to_right() {
    let p = prog(r"\d+");
    let config = MatcherConfig::default();
    let matches = find_all(&p, b"room 7, row 12, seat 3", &config).unwrap();
    let spans: Vec<_> = matches.iter().map(|c| c.group(0).unwrap()).collect();
    assert_eq!(spans.len(), 3);
    assert_eq!(spans[0], (5, 6));
}

#[test]
fn replace_swaps_every_match_and_preserves_surrounding_text() {
    let p = prog(r"\s+");
    let config = MatcherConfig::default();
    let out = replace(&p, b"a  b   c", b" ", &config).unwrap();
    assert_eq!(out, b"a b c");
}

// ============================================================
// ReDoS guards
// ============================================================

#[test]
fn catastrophic_backtracking_pattern_trips_the_step_limit() {
    let p = prog("(a+)+b");
    let config = MatcherConfig {
        max_recursion_depth: 1000,
        max_steps: 5_000,
    };
    let input = vec![b'a'; 30];
    let err = matches_full(&p, &input, &config).unwrap_err();
    assert!(matches!(
        err,
        regex_core_vm::RuntimeError::StepLimitExceeded { .. }
    ));
}

#[test]
fn deeply_nested_groups_trip_the_recursion_limit() {
    let pattern = "(".repeat(50) + &"a".repeat(50) + &")".repeat(50);
    let p = prog(&pattern);
    let config = MatcherConfig {
        max_recursion_depth: 10,
        max_steps: 1_000_000,
    };
    let input = vec![b'a'; 50];
    let err = matches_full(&p, &input, &config).unwrap_err();
    assert!(matches!(
        err,
        regex_core_vm::RuntimeError::RecursionLimitExceeded { .. }
    ));
}

// ============================================================
// Anchors and character classes
// ============================================================

#[test]
fn line_anchors_bind_to_the_whole_input_not_embedded_newlines() {
    let p = prog("^abc$");
    let config = MatcherConfig::default();
    assert!(matches_full(&p, b"abc", &config).unwrap());
    assert!(!matches_full(&p, b"xabc", &config).unwrap());
}

#[test]
fn word_class_matches_underscores_and_digits_but_not_punctuation() {
    let p = prog(r"\w+");
    let config = MatcherConfig::default();
    let caps = find(&p, b"--var_1--", &config).unwrap().unwrap();
    assert_eq!(caps.group(0), Some((2, 7)));
}
