//! Instruction dispatch for the recursive-backtracking search.

use regex_core_bytecode::Instruction;

use crate::error::RuntimeError;
use crate::machine::{is_word_byte, Matcher, DEFAULT_LOOKBEHIND_WINDOW};

impl<'a> Matcher<'a> {
    /// Execute starting at `pc` with the cursor at `pos`, returning the
    /// position reached on success.
    ///
    /// Every instruction that just consumes input or falls through tail-calls
    /// back into `run` for its continuation and returns that result
    /// directly — the recursion IS the backtracking: a `SPLIT*` is the
    /// only place more than one continuation is tried, and failure of the
    /// first unwinds back here to try the second.
    pub(crate) fn run(&mut self, pc: usize, pos: usize) -> Result<Option<usize>, RuntimeError> {
        if self.stop_pcs.contains(&pc) {
            return Ok(Some(pos));
        }
        self.charge_step()?;
        self.enter()?;
        let result = self.dispatch(pc, pos);
        self.leave();
        result
    }

    fn dispatch(&mut self, pc: usize, pos: usize) -> Result<Option<usize>, RuntimeError> {
        let (instr, len) = self.decode(pc)?;

        match instr {
            Instruction::Match => Ok(Some(pos)),

            Instruction::CharAny => {
                if pos < self.input.len() {
                    self.run(pc + len, pos + 1)
                } else {
                    Ok(None)
                }
            }

            Instruction::Char32(b) => self.consume_if(pc, len, pos, |byte| byte == b),

            Instruction::CharRange { lo, hi } => {
                self.consume_if(pc, len, pos, |byte| (lo..=hi).contains(&byte))
            }

            Instruction::CharRangeInv { lo, hi } => {
                self.consume_if(pc, len, pos, |byte| !(lo..=hi).contains(&byte))
            }

            Instruction::CharClass(table) => {
                self.consume_if(pc, len, pos, |byte| table_has(&table, byte))
            }

            Instruction::CharClassInv(table) => {
                self.consume_if(pc, len, pos, |byte| !table_has(&table, byte))
            }

            Instruction::Goto(off) => self.run(target(pc, len, off), pos),

            Instruction::Split { first, second } => {
                // first = the alternative bound by label (branch b), second
                // = 0 = fallthrough into whatever's emitted right after the
                // split (branch a) — alternation tries a before b.
                self.try_both(target(pc, len, second), target(pc, len, first), pos)
            }

            Instruction::SplitGreedy { first, second } => {
                // first = skip, second = consume/loop body (codegen's
                // uniform convention) — greedy prefers consuming.
                self.try_both(target(pc, len, second), target(pc, len, first), pos)
            }

            Instruction::SplitLazy { first, second } => {
                // Lazy prefers skipping.
                self.try_both(target(pc, len, first), target(pc, len, second), pos)
            }

            Instruction::SplitPossessive { first, second } => {
                let skip_pc = target(pc, len, first);
                let body_pc = target(pc, len, second);
                match self.classify_possessive(pc, body_pc, skip_pc)? {
                    PossessiveShape::Loop => {
                        self.run_possessive_loop(pc, body_pc, skip_pc, pos)
                    }
                    PossessiveShape::Optional => {
                        self.run_possessive_optional(body_pc, skip_pc, pos)
                    }
                }
            }

            Instruction::SaveStart(g) => self.with_slot_saved(g, true, pos, pc, len),
            Instruction::SaveEnd(g) => self.with_slot_saved(g, false, pos, pc, len),

            Instruction::BackRef(g) => self.match_backref(pc, len, pos, g, false),
            Instruction::BackRefI(g) => self.match_backref(pc, len, pos, g, true),

            Instruction::LineStart => {
                if pos == 0 {
                    self.run(pc + len, pos)
                } else {
                    Ok(None)
                }
            }

            Instruction::LineEnd => {
                if pos == self.input.len() {
                    self.run(pc + len, pos)
                } else {
                    Ok(None)
                }
            }

            Instruction::WordBoundary => {
                if self.is_word_boundary(pos) {
                    self.run(pc + len, pos)
                } else {
                    Ok(None)
                }
            }

            Instruction::NotWordBoundary => {
                if !self.is_word_boundary(pos) {
                    self.run(pc + len, pos)
                } else {
                    Ok(None)
                }
            }

            Instruction::Lookahead(_) => self.match_lookahead(pc, len, pos, false),
            Instruction::NegativeLookahead(_) => self.match_lookahead(pc, len, pos, true),
            Instruction::Lookbehind(_) => self.match_lookbehind(pc, len, pos, false),
            Instruction::NegativeLookbehind(_) => self.match_lookbehind(pc, len, pos, true),

            Instruction::LookaheadEnd | Instruction::LookbehindEnd => Ok(Some(pos)),
        }
    }

    fn consume_if(
        &mut self,
        pc: usize,
        len: usize,
        pos: usize,
        pred: impl FnOnce(u8) -> bool,
    ) -> Result<Option<usize>, RuntimeError> {
        match self.input.get(pos) {
            Some(&b) if pred(b) => self.run(pc + len, pos + 1),
            _ => Ok(None),
        }
    }

    /// Try `first_target`, and only on failure try `second_target`,
    /// restoring any captures the failed attempt set.
    fn try_both(
        &mut self,
        first_target: usize,
        second_target: usize,
        pos: usize,
    ) -> Result<Option<usize>, RuntimeError> {
        let snapshot = self.captures;
        if let Some(end) = self.run(first_target, pos)? {
            return Ok(Some(end));
        }
        self.captures = snapshot;
        self.run(second_target, pos)
    }

    fn with_slot_saved(
        &mut self,
        group: u8,
        is_start: bool,
        pos: usize,
        pc: usize,
        len: usize,
    ) -> Result<Option<usize>, RuntimeError> {
        let i = group as usize;
        let old = if is_start {
            self.captures.starts[i]
        } else {
            self.captures.ends[i]
        };
        if is_start {
            self.captures.starts[i] = Some(pos);
        } else {
            self.captures.ends[i] = Some(pos);
        }
        let result = self.run(pc + len, pos);
        if matches!(result, Ok(None)) {
            if is_start {
                self.captures.starts[i] = old;
            } else {
                self.captures.ends[i] = old;
            }
        }
        result
    }

    fn match_backref(
        &mut self,
        pc: usize,
        len: usize,
        pos: usize,
        group: u8,
        case_insensitive: bool,
    ) -> Result<Option<usize>, RuntimeError> {
        let span = self.captures.group(group);
        let (start, end) = match span {
            // A group that never participated matches the empty string.
            None => return self.run(pc + len, pos),
            Some(span) => span,
        };
        let referenced = &self.input[start..end];
        let candidate = self.input.get(pos..pos + referenced.len());
        let matched = match candidate {
            Some(bytes) => {
                if case_insensitive {
                    bytes.eq_ignore_ascii_case(referenced)
                } else {
                    bytes == referenced
                }
            }
            None => false,
        };
        if matched {
            self.run(pc + len, pos + referenced.len())
        } else {
            Ok(None)
        }
    }

    fn is_word_boundary(&self, pos: usize) -> bool {
        let left = pos > 0 && is_word_byte(self.input[pos - 1]);
        let right = pos < self.input.len() && is_word_byte(self.input[pos]);
        left != right
    }

    fn match_lookahead(
        &mut self,
        pc: usize,
        len: usize,
        pos: usize,
        negated: bool,
    ) -> Result<Option<usize>, RuntimeError> {
        let after = self.lookaround_close(pc)?;
        let snapshot = self.captures;
        let body_matched = self.run(pc + len, pos)?.is_some();

        if negated {
            self.captures = snapshot;
            if body_matched {
                Ok(None)
            } else {
                self.run(after, pos)
            }
        } else if body_matched {
            self.run(after, pos)
        } else {
            self.captures = snapshot;
            Ok(None)
        }
    }

    fn match_lookbehind(
        &mut self,
        pc: usize,
        len: usize,
        pos: usize,
        negated: bool,
    ) -> Result<Option<usize>, RuntimeError> {
        let after = self.lookaround_close(pc)?;
        let window = DEFAULT_LOOKBEHIND_WINDOW.min(pos);
        let snapshot = self.captures;

        let mut found = false;
        for start in (pos - window..=pos).rev() {
            match self.run(pc + len, start)? {
                Some(end) if end == pos => {
                    found = true;
                    break;
                }
                _ => self.captures = snapshot,
            }
        }

        if negated {
            self.captures = snapshot;
            if found {
                Ok(None)
            } else {
                self.run(after, pos)
            }
        } else if found {
            self.run(after, pos)
        } else {
            self.captures = snapshot;
            Ok(None)
        }
    }

    /// Which shape a `SplitPossessive`'s body takes, determined by a
    /// one-time forward scan of the bytecode from `body_pc`: a loop
    /// (star/plus) has a `Goto` back to the split's own `pc` somewhere in
    /// its body, while a bounded optional (possessive `?`) flows straight
    /// into `skip_pc` with no back-edge.
    fn classify_possessive(
        &self,
        pc: usize,
        body_pc: usize,
        skip_pc: usize,
    ) -> Result<PossessiveShape, RuntimeError> {
        let mut cur = body_pc;
        loop {
            if cur == skip_pc {
                return Ok(PossessiveShape::Optional);
            }
            let (instr, len) = self.decode(cur)?;
            if let Instruction::Goto(off) = instr {
                if target(cur, len, off) == pc {
                    return Ok(PossessiveShape::Loop);
                }
            }
            cur += len;
        }
    }

    /// Possessive star/plus: consume the body to its committed fixpoint —
    /// repeating for as long as it matches and advances — then continue
    /// from the skip target exactly once, with no backtracking into a
    /// shorter consume.
    fn run_possessive_loop(
        &mut self,
        loop_pc: usize,
        body_pc: usize,
        skip_pc: usize,
        pos: usize,
    ) -> Result<Option<usize>, RuntimeError> {
        let mut cur = pos;
        self.stop_pcs.push(loop_pc);
        loop {
            let snapshot = self.captures;
            match self.run(body_pc, cur) {
                Ok(Some(next)) => {
                    if next == cur {
                        // Zero-width iteration: looping again would never
                        // terminate, so stop as if the body had failed.
                        break;
                    }
                    cur = next;
                }
                Ok(None) => {
                    self.captures = snapshot;
                    break;
                }
                Err(e) => {
                    self.stop_pcs.pop();
                    return Err(e);
                }
            }
        }
        self.stop_pcs.pop();
        self.run(skip_pc, cur)
    }

    /// Possessive `?`: try the body once, committed — on success continue
    /// from the skip target without ever retrying a shorter consume; on
    /// failure fall back to skip directly.
    fn run_possessive_optional(
        &mut self,
        body_pc: usize,
        skip_pc: usize,
        pos: usize,
    ) -> Result<Option<usize>, RuntimeError> {
        let snapshot = self.captures;
        self.stop_pcs.push(skip_pc);
        let body_result = self.run(body_pc, pos);
        self.stop_pcs.pop();
        match body_result? {
            Some(next) => self.run(skip_pc, next),
            None => {
                self.captures = snapshot;
                self.run(skip_pc, pos)
            }
        }
    }
}

/// Which control-flow shape a `SplitPossessive`'s body has — determined at
/// runtime by [`Matcher::classify_possessive`] since the bytecode carries no
/// static tag distinguishing a possessive loop from a possessive optional.
enum PossessiveShape {
    Loop,
    Optional,
}

/// Resolves a jump-offset operand relative to the instruction at `pc`
/// (whose encoded length is `len`). Offset `0` is a reserved sentinel for
/// "fall through to the next instruction" — the code generator leaves a
/// split's fallthrough branch unpatched at `0` rather than ever emitting a
/// genuine zero-offset jump, so `0` must resolve to `pc + len`, not `pc`.
fn target(pc: usize, len: usize, rel: i32) -> usize {
    if rel == 0 {
        pc + len
    } else {
        (pc as i64 + rel as i64) as usize
    }
}

fn table_has(table: &[u8; 32], b: u8) -> bool {
    table[(b / 8) as usize] & (1 << (b % 8)) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatcherConfig;
    use regex_core_bytecode::{Instruction, Program};

    #[test]
    fn literal_char_matches_and_advances() {
        let program =
            Program::from_instructions(&[Instruction::Char32(b'a'), Instruction::Match]);
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"a", &config);
        assert!(m.try_match_at(0).unwrap().is_some());
    }

    #[test]
    fn literal_char_rejects_mismatched_byte() {
        let program =
            Program::from_instructions(&[Instruction::Char32(b'a'), Instruction::Match]);
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"b", &config);
        assert!(m.try_match_at(0).unwrap().is_none());
    }

    #[test]
    fn save_pair_records_whole_match_span() {
        let program = Program::from_instructions(&[
            Instruction::SaveStart(0),
            Instruction::Char32(b'a'),
            Instruction::Char32(b'b'),
            Instruction::SaveEnd(0),
            Instruction::Match,
        ]);
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"ab", &config);
        let caps = m.try_match_at(0).unwrap().unwrap();
        assert_eq!(caps.group(0), Some((0, 2)));
    }

    fn compile(pattern: &str) -> Program {
        regex_core_compile::compile(pattern, regex_core_compile::CompileOptions::default())
            .unwrap()
    }

    #[test]
    fn greedy_star_consumes_as_much_as_possible() {
        let program = compile("a*b");
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"aaab", &config);
        let caps = m.try_match_at(0).unwrap().unwrap();
        assert_eq!(caps.group(0), Some((0, 4)));
    }

    #[test]
    fn lazy_star_stops_at_first_opportunity() {
        let program =
            regex_core_compile::compile("a*?b", regex_core_compile::CompileOptions::default())
                .unwrap();
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"aaab", &config);
        // `a*?b` is still anchored at position 0, so it must still consume
        // every leading `a` before reaching the `b` — laziness only
        // affects which length is tried first during backtracking, not
        // whether the only viable match is found.
        let caps = m.try_match_at(0).unwrap().unwrap();
        assert_eq!(caps.group(0), Some((0, 4)));
    }

    #[test]
    fn backreference_matches_prior_capture() {
        let program = compile(r"(x)\1");
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"xx", &config);
        assert!(m.try_match_at(0).unwrap().is_some());
        let mut m2 = Matcher::new(&program, b"xy", &config);
        assert!(m2.try_match_at(0).unwrap().is_none());
    }

    #[test]
    fn word_boundary_detects_transition() {
        let program = compile(r"a\b");
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"a ", &config);
        assert!(m.try_match_at(0).unwrap().is_some());
    }

    #[test]
    fn lookahead_is_zero_width() {
        let program = compile(r"a(?=b)");
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"ab", &config);
        let caps = m.try_match_at(0).unwrap().unwrap();
        assert_eq!(caps.group(0), Some((0, 1)));
    }

    #[test]
    fn negative_lookahead_rejects_when_body_matches() {
        let program = compile(r"a(?!b)");
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"ab", &config);
        assert!(m.try_match_at(0).unwrap().is_none());
        let mut m2 = Matcher::new(&program, b"ac", &config);
        assert!(m2.try_match_at(0).unwrap().is_some());
    }

    #[test]
    fn lookbehind_is_zero_width_and_checks_preceding_bytes() {
        let program = compile(r"(?<=a)b");
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"ab", &config);
        let caps = m.try_match_at(0).unwrap();
        assert!(caps.is_none(), "match must start at the 'b', not position 0");
        let mut m2 = Matcher::new(&program, b"ab", &config);
        let caps2 = m2.try_match_at(1).unwrap().unwrap();
        assert_eq!(caps2.group(0), Some((1, 2)));
    }

    #[test]
    fn capturing_group_inside_alternation_records_correct_branch() {
        let program = compile(r"(cat|dog)");
        let config = MatcherConfig::default();
        let mut m = Matcher::new(&program, b"dog", &config);
        let caps = m.try_match_at(0).unwrap().unwrap();
        assert_eq!(caps.group(1), Some((0, 3)));
    }
}
