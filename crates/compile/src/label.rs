//! A label-and-patch buffer that code generation writes into.
//!
//! Code generation often needs to emit a jump before it knows the jump's
//! target — the classic example is `SPLIT L_skip ...` where `L_skip` is
//! only bound once the quantifier's body has been fully emitted. Rather
//! than patch raw bytes (every jump operand is a different byte width
//! depending on where it lands in a variable-width stream), this buffer
//! works at the [`Instruction`] level: every instruction's encoded length
//! is a pure function of its opcode, so a PC can be assigned the moment an
//! instruction is pushed, before any of its operands are known.

use regex_core_bytecode::{Instruction, Program};

use crate::error::CompileError;

/// Opaque handle to a not-yet-bound jump target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

/// Which operand slot of a two-target instruction a patch resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Goto,
    First,
    Second,
}

struct Patch {
    instr_index: usize,
    slot: Slot,
    label: Label,
}

/// Accumulates instructions and resolves label references against final
/// program counters.
pub struct Writer {
    instructions: Vec<Instruction>,
    pcs: Vec<usize>,
    next_pc: usize,
    labels: Vec<Option<usize>>,
    patches: Vec<Patch>,
}

impl Writer {
    pub fn new() -> Self {
        Writer {
            instructions: Vec::new(),
            pcs: Vec::new(),
            next_pc: 0,
            labels: Vec::new(),
            patches: Vec::new(),
        }
    }

    /// The program counter the next emitted instruction will receive.
    pub fn pc(&self) -> usize {
        self.next_pc
    }

    /// Reserves a new, as-yet-unbound jump target.
    pub fn create_label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    /// Binds `label` to the current program counter — the position the
    /// next instruction emitted after this call will occupy.
    pub fn bind_label(&mut self, label: Label) {
        self.labels[label.0] = Some(self.next_pc);
    }

    fn push(&mut self, instr: Instruction) -> usize {
        let idx = self.instructions.len();
        self.pcs.push(self.next_pc);
        self.next_pc += instr.encoded_len();
        self.instructions.push(instr);
        idx
    }

    /// Emits an instruction with no forward references (anything that
    /// isn't `Goto` or a `Split*`).
    pub fn emit(&mut self, instr: Instruction) {
        debug_assert!(!matches!(
            instr,
            Instruction::Goto(_)
                | Instruction::Split { .. }
                | Instruction::SplitGreedy { .. }
                | Instruction::SplitLazy { .. }
                | Instruction::SplitPossessive { .. }
        ));
        self.push(instr);
    }

    /// Emits an unconditional jump to `label`.
    pub fn emit_goto(&mut self, label: Label) {
        let idx = self.push(Instruction::Goto(0));
        self.patches.push(Patch {
            instr_index: idx,
            slot: Slot::Goto,
            label,
        });
    }

    /// Emits a two-branch split of the given `kind`. `second` is typically
    /// left to fall through into whatever is emitted immediately after —
    /// pass the label returned by [`Self::create_label`] for both ends
    /// only when the caller genuinely has two forward targets.
    pub fn emit_split(&mut self, kind: SplitKind, first: Label, second: Label) {
        let instr = kind.placeholder();
        let idx = self.push(instr);
        self.patches.push(Patch {
            instr_index: idx,
            slot: Slot::First,
            label: first,
        });
        self.patches.push(Patch {
            instr_index: idx,
            slot: Slot::Second,
            label: second,
        });
    }

    /// Emits a split whose second branch is the instruction emitted
    /// immediately next (the fall-through convention: operand `0`).
    /// Returns the label the caller must bind once the skip target is
    /// known.
    pub fn emit_split_fallthrough(&mut self, kind: SplitKind) -> Label {
        let skip = self.create_label();
        let instr = kind.placeholder();
        let idx = self.push(instr);
        self.patches.push(Patch {
            instr_index: idx,
            slot: Slot::First,
            label: skip,
        });
        skip
    }

    /// Consumes the writer, resolving every patch against its label and
    /// assembling the final program.
    pub fn finalize(mut self) -> Result<Program, CompileError> {
        let unresolved = self.labels.iter().filter(|l| l.is_none()).count();
        if unresolved > 0 {
            return Err(CompileError::UnresolvedLabels { count: unresolved });
        }

        for patch in &self.patches {
            let target_pc = self.labels[patch.label.0].unwrap();
            let instr_pc = self.pcs[patch.instr_index];
            let rel = target_pc as i64 - instr_pc as i64;
            let rel = i32::try_from(rel).map_err(|_| CompileError::ProgramTooLarge)?;
            match (&mut self.instructions[patch.instr_index], patch.slot) {
                (Instruction::Goto(off), Slot::Goto) => *off = rel,
                (Instruction::Split { first, second }, slot)
                | (Instruction::SplitGreedy { first, second }, slot)
                | (Instruction::SplitLazy { first, second }, slot)
                | (Instruction::SplitPossessive { first, second }, slot) => match slot {
                    Slot::First => *first = rel,
                    Slot::Second => *second = rel,
                    Slot::Goto => unreachable!("split patch tagged as goto"),
                },
                _ => unreachable!("patch slot does not match instruction shape"),
            }
        }

        Ok(Program::from_instructions(&self.instructions))
    }
}

/// Which `SPLIT*` opcode a quantifier construct should lower to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    /// Bare two-way branch used for alternation and case folding — no
    /// greedy/lazy preference attached.
    Plain,
    Greedy,
    Lazy,
    Possessive,
}

impl SplitKind {
    fn placeholder(self) -> Instruction {
        match self {
            SplitKind::Plain => Instruction::Split {
                first: 0,
                second: 0,
            },
            SplitKind::Greedy => Instruction::SplitGreedy {
                first: 0,
                second: 0,
            },
            SplitKind::Lazy => Instruction::SplitLazy {
                first: 0,
                second: 0,
            },
            SplitKind::Possessive => Instruction::SplitPossessive {
                first: 0,
                second: 0,
            },
        }
    }
}

impl Default for Writer {
    fn default() -> Self {
        Writer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex_core_bytecode::Opcode;

    #[test]
    fn goto_patches_to_bound_label() {
        let mut w = Writer::new();
        let end = w.create_label();
        w.emit(Instruction::CharAny);
        w.emit_goto(end);
        w.bind_label(end);
        w.emit(Instruction::Match);
        let program = w.finalize().unwrap();
        let instrs: Vec<_> = program.iter().map(|r| r.unwrap().1).collect();
        assert_eq!(instrs[0], Instruction::CharAny);
        assert_eq!(instrs[1], Instruction::Goto(2));
        assert_eq!(instrs[2], Instruction::Match);
    }

    #[test]
    fn fallthrough_split_needs_no_patch_for_body() {
        let mut w = Writer::new();
        let skip = w.emit_split_fallthrough(SplitKind::Greedy);
        w.emit(Instruction::Char32(b'x'));
        w.bind_label(skip);
        w.emit(Instruction::Match);
        let program = w.finalize().unwrap();
        let instrs: Vec<_> = program.iter().map(|r| r.unwrap().1).collect();
        match &instrs[0] {
            Instruction::SplitGreedy { first, second } => {
                assert_eq!(*second, 0);
                assert_ne!(*first, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(instrs[0].opcode(), Opcode::SplitGreedy);
    }

    #[test]
    fn unresolved_label_is_an_error() {
        let mut w = Writer::new();
        let _dangling = w.create_label();
        w.emit(Instruction::Match);
        let err = w.finalize().unwrap_err();
        assert!(matches!(err, CompileError::UnresolvedLabels { count: 1 }));
    }
}
