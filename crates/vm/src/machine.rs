//! Matcher state: the capture table and the recursive search's bookkeeping.

use regex_core_bytecode::{Instruction, Program};

use crate::error::RuntimeError;
use crate::MatcherConfig;

/// Capture table: slot 0 is the whole match, slots 1..=15 are user groups.
///
/// Start and end are tracked independently since a group's `SaveStart` and
/// `SaveEnd` land at different points in the search — a group can have a
/// start recorded and still be mid-match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Captures {
    pub(crate) starts: [Option<usize>; 16],
    pub(crate) ends: [Option<usize>; 16],
}

impl Captures {
    fn empty() -> Self {
        Captures {
            starts: [None; 16],
            ends: [None; 16],
        }
    }

    /// The `(start, end)` byte span of group `index`, if it participated
    /// in the match.
    pub fn group(&self, index: u8) -> Option<(usize, usize)> {
        let i = index as usize;
        match (self.starts.get(i).copied().flatten(), self.ends.get(i).copied().flatten()) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        }
    }
}

impl Default for Captures {
    fn default() -> Self {
        Captures::empty()
    }
}

/// Walks a [`Program`] against a haystack via recursive backtracking.
///
/// One `Matcher` is built per attempt (per start position); `run` recurses
/// once per instruction along the path currently being explored, and a
/// `SPLIT*` instruction is the only place that branches into more than one
/// path.
pub struct Matcher<'a> {
    pub(crate) program: &'a Program,
    pub(crate) input: &'a [u8],
    pub(crate) config: &'a MatcherConfig,
    pub(crate) captures: Captures,
    pub(crate) depth: usize,
    pub(crate) steps: u64,
    /// Program counters `run` should treat as an immediate, zero-cost
    /// success instead of dispatching — how a possessive quantifier bounds
    /// one iteration of its body without recursing into its continuation.
    pub(crate) stop_pcs: Vec<usize>,
}

/// Lookbehind bodies are tried against a bounded window of bytes ending at
/// the current position rather than scanned from the start of the input —
/// an unbounded scan would make `(?<=a*)b` cost O(input length) per
/// attempt.
pub const DEFAULT_LOOKBEHIND_WINDOW: usize = 100;

impl<'a> Matcher<'a> {
    pub fn new(program: &'a Program, input: &'a [u8], config: &'a MatcherConfig) -> Self {
        Matcher {
            program,
            input,
            config,
            captures: Captures::empty(),
            depth: 0,
            steps: 0,
            stop_pcs: Vec::new(),
        }
    }

    /// Attempt a match anchored at `start`. Returns the capture table on
    /// success; the whole-match span is always `captures.group(0)`.
    pub fn try_match_at(&mut self, start: usize) -> Result<Option<Captures>, RuntimeError> {
        self.captures = Captures::empty();
        self.depth = 0;
        self.steps = 0;
        self.stop_pcs.clear();
        match self.run(0, start)? {
            Some(_) => Ok(Some(self.captures)),
            None => Ok(None),
        }
    }

    pub(crate) fn decode(&self, pc: usize) -> Result<(Instruction, usize), RuntimeError> {
        self.program
            .decode_at(pc)
            .map_err(|source| RuntimeError::MalformedProgram { at: pc, source })
    }

    pub(crate) fn charge_step(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;
        if self.config.max_steps != 0 && self.steps > self.config.max_steps {
            return Err(RuntimeError::StepLimitExceeded {
                limit: self.config.max_steps,
            });
        }
        Ok(())
    }

    pub(crate) fn enter(&mut self) -> Result<(), RuntimeError> {
        self.depth += 1;
        if self.config.max_recursion_depth != 0 && self.depth > self.config.max_recursion_depth {
            return Err(RuntimeError::RecursionLimitExceeded {
                limit: self.config.max_recursion_depth,
            });
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    /// The static byte offset one past the matching `LookaheadEnd` /
    /// `LookbehindEnd` for the lookaround opened at `open_pc`. A pure
    /// bytecode-shape scan, nesting-depth aware so a lookaround containing
    /// another lookaround resolves to its own close, not the inner one's.
    pub(crate) fn lookaround_close(&self, open_pc: usize) -> Result<usize, RuntimeError> {
        let mut depth: usize = 0;
        let mut pc = open_pc;
        loop {
            let (instr, len) = self.decode(pc)?;
            let opcode = instr.opcode();
            if opcode.opens_lookaround() {
                depth += 1;
            } else if opcode.closes_lookaround() {
                depth -= 1;
                if depth == 0 {
                    return Ok(pc + len);
                }
            }
            pc += len;
        }
    }
}

pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
