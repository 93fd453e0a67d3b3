//! Walks a parsed [`Ast`] and emits bytecode for it.

use regex_core_bytecode::Instruction;
use regex_core_syntax::{Ast, ClassItem, ClassShorthand, Greediness};

use crate::char_tables;
use crate::label::{SplitKind, Writer};

fn split_kind_for(mode: Greediness) -> SplitKind {
    match mode {
        Greediness::Greedy => SplitKind::Greedy,
        Greediness::Lazy => SplitKind::Lazy,
        Greediness::Possessive => SplitKind::Possessive,
    }
}

pub struct Codegen {
    pub writer: Writer,
    pub case_insensitive: bool,
}

impl Codegen {
    pub fn new(case_insensitive: bool) -> Self {
        Codegen {
            writer: Writer::new(),
            case_insensitive,
        }
    }

    pub fn emit(&mut self, ast: &Ast) {
        match ast {
            Ast::Char(b) => {
                if self.case_insensitive && b.is_ascii_alphabetic() {
                    self.emit_case_fold_char(*b);
                } else {
                    self.writer.emit(Instruction::Char32(*b));
                }
            }

            Ast::Dot => self.writer.emit(Instruction::CharAny),

            Ast::CharRange { lo, hi, inverted } => {
                if *inverted {
                    self.writer.emit(Instruction::CharRangeInv { lo: *lo, hi: *hi });
                } else {
                    self.writer.emit(Instruction::CharRange { lo: *lo, hi: *hi });
                }
            }

            Ast::CharClass { children, inverted } => self.emit_char_class(children, *inverted),

            Ast::ClassShorthand(s) => self.emit_shorthand(*s),

            Ast::Sequence(terms) => {
                for t in terms {
                    self.emit(t);
                }
            }

            Ast::Alternation(a, b) => {
                let end = self.writer.create_label();
                let skip = self.writer.emit_split_fallthrough(SplitKind::Plain);
                self.emit(a);
                self.writer.emit_goto(end);
                self.writer.bind_label(skip);
                self.emit(b);
                self.writer.bind_label(end);
            }

            Ast::Group { index, child } => {
                self.writer.emit(Instruction::SaveStart(*index));
                self.emit(child);
                self.writer.emit(Instruction::SaveEnd(*index));
            }

            Ast::NonCapturingGroup(child) => self.emit(child),

            Ast::Lookahead { child, negated } => {
                let open = if *negated {
                    Instruction::NegativeLookahead(0)
                } else {
                    Instruction::Lookahead(0)
                };
                self.writer.emit(open);
                self.emit(child);
                self.writer.emit(Instruction::LookaheadEnd);
            }

            Ast::Lookbehind { child, negated } => {
                let open = if *negated {
                    Instruction::NegativeLookbehind(0)
                } else {
                    Instruction::Lookbehind(0)
                };
                self.writer.emit(open);
                self.emit(child);
                self.writer.emit(Instruction::LookbehindEnd);
            }

            Ast::Repeat {
                min,
                max,
                mode,
                child,
            } => self.emit_repeat(*min, *max, *mode, child),

            Ast::Backref(g) => {
                let instr = if self.case_insensitive {
                    Instruction::BackRefI(*g)
                } else {
                    Instruction::BackRef(*g)
                };
                self.writer.emit(instr);
            }

            Ast::AnchorStart => self.writer.emit(Instruction::LineStart),
            Ast::AnchorEnd => self.writer.emit(Instruction::LineEnd),
            Ast::WordBoundary { negated } => {
                let instr = if *negated {
                    Instruction::NotWordBoundary
                } else {
                    Instruction::WordBoundary
                };
                self.writer.emit(instr);
            }
        }
    }

    /// `a|b` under case folding, for a single ASCII letter: a two-branch
    /// split between the lowercase and uppercase literal, not a dedicated
    /// case-insensitive char opcode.
    fn emit_case_fold_char(&mut self, b: u8) {
        let lower = b.to_ascii_lowercase();
        let upper = b.to_ascii_uppercase();
        let end = self.writer.create_label();
        let skip = self.writer.emit_split_fallthrough(SplitKind::Plain);
        self.writer.emit(Instruction::Char32(lower));
        self.writer.emit_goto(end);
        self.writer.bind_label(skip);
        self.writer.emit(Instruction::Char32(upper));
        self.writer.bind_label(end);
    }

    fn emit_char_class(&mut self, children: &[ClassItem], inverted: bool) {
        if let [ClassItem::Range(lo, hi)] = children {
            if inverted {
                self.writer.emit(Instruction::CharRangeInv { lo: *lo, hi: *hi });
            } else {
                self.writer.emit(Instruction::CharRange { lo: *lo, hi: *hi });
            }
            return;
        }
        let table = char_tables::table_from_items(children);
        if inverted {
            self.writer.emit(Instruction::CharClassInv(table));
        } else {
            self.writer.emit(Instruction::CharClass(table));
        }
    }

    fn emit_shorthand(&mut self, s: ClassShorthand) {
        let (table, inverted) = match s {
            ClassShorthand::Digit => (char_tables::digit_table(), false),
            ClassShorthand::NotDigit => (char_tables::digit_table(), true),
            ClassShorthand::Word => (char_tables::word_table(), false),
            ClassShorthand::NotWord => (char_tables::word_table(), true),
            ClassShorthand::Space => (char_tables::space_table(), false),
            ClassShorthand::NotSpace => (char_tables::space_table(), true),
        };
        if inverted {
            self.writer.emit(Instruction::CharClassInv(table));
        } else {
            self.writer.emit(Instruction::CharClass(table));
        }
    }

    /// Lowers `min`/`max`/`mode` uniformly: `min` mandatory copies of
    /// `child`, then either an unbounded loop (`max: None`) or `max - min`
    /// sequential optional copies.
    ///
    /// Every unbounded tail — whether it came from `*`, `+`, or `{n,}` —
    /// shares one bytecode shape (head `SPLIT`, body, trailing `GOTO` back
    /// to the head). The matcher only has to recognize that one shape to
    /// classify a loop; it never needs to also recognize the tail-split
    /// shape a literal translation of `+` would produce.
    fn emit_repeat(&mut self, min: u32, max: Option<u32>, mode: Greediness, child: &Ast) {
        for _ in 0..min {
            self.emit(child);
        }
        match max {
            None => self.emit_star_tail(child, mode),
            Some(max) => {
                debug_assert!(max >= min);
                for _ in 0..(max - min) {
                    self.emit_question(child, mode);
                }
            }
        }
    }

    fn emit_star_tail(&mut self, child: &Ast, mode: Greediness) {
        let kind = split_kind_for(mode);
        let loop_label = self.writer.create_label();
        self.writer.bind_label(loop_label);
        let skip = self.writer.emit_split_fallthrough(kind);
        self.emit(child);
        self.writer.emit_goto(loop_label);
        self.writer.bind_label(skip);
    }

    fn emit_question(&mut self, child: &Ast, mode: Greediness) {
        let kind = split_kind_for(mode);
        let skip = self.writer.emit_split_fallthrough(kind);
        self.emit(child);
        self.writer.bind_label(skip);
    }
}
