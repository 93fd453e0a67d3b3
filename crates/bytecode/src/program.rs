//! Program representation for the regex bytecode format.
//!
//! A program owns one contiguous byte buffer of variable-width
//! instructions (see [`crate::instruction`]). It is built once by the code
//! generator and is thereafter immutable and freely shareable: matching
//! only ever reads from it.

use crate::error::{DecodeError, ValidateError};
use crate::instruction::Instruction;

/// A compiled regex bytecode program: an owned, immutable byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Wrap an already-encoded byte buffer. Does not validate; call
    /// [`Program::validate`] if the bytes did not come from this crate's
    /// own code generator.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Encode a sequence of instructions into a new program.
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        let mut bytes = Vec::new();
        for instr in instructions {
            instr.encode(&mut bytes);
        }
        Self { bytes }
    }

    /// The raw instruction bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes in the program.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the program holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the instruction at byte offset `pc`.
    pub fn decode_at(&self, pc: usize) -> Result<(Instruction, usize), DecodeError> {
        Instruction::decode(&self.bytes, pc)
    }

    /// Iterate over every instruction in the program in order, paired with
    /// its PC.
    pub fn iter(&self) -> ProgramIter<'_> {
        ProgramIter {
            bytes: &self.bytes,
            pc: 0,
        }
    }

    /// Check every control-flow operand targets a PC inside `[0, len]`,
    /// that the program ends with `MATCH`, and that lookaround regions are
    /// balanced.
    ///
    /// A `pc == len` target is legal: it is the address one past the last
    /// instruction, the position a fall-through GOTO/SPLIT at the final
    /// instruction would land on before hitting MATCH.
    pub fn validate(&self) -> Result<(), ValidateError> {
        if self.bytes.is_empty() {
            return Err(ValidateError::EmptyProgram);
        }

        let len = self.bytes.len() as i64;
        let mut lookaround_stack: Vec<usize> = Vec::new();
        let mut last_instr = None;

        for item in self.iter() {
            let (pc, instr) = item?;

            let check_target = |at: usize, rel: i32| -> Result<(), ValidateError> {
                let target = at as i64 + rel as i64;
                if target < 0 || target > len {
                    Err(ValidateError::JumpOutOfRange { at, target, len: self.bytes.len() })
                } else {
                    Ok(())
                }
            };

            match &instr {
                Instruction::Goto(off) => check_target(pc, *off)?,
                Instruction::Split { first, second }
                | Instruction::SplitGreedy { first, second }
                | Instruction::SplitLazy { first, second }
                | Instruction::SplitPossessive { first, second } => {
                    check_target(pc, *first)?;
                    check_target(pc, *second)?;
                }
                _ => {}
            }

            let opcode = instr.opcode();
            if opcode.opens_lookaround() {
                lookaround_stack.push(pc);
            } else if opcode.closes_lookaround() {
                if lookaround_stack.pop().is_none() {
                    return Err(ValidateError::UnbalancedLookaround { at: pc });
                }
            }

            last_instr = Some(instr);
        }

        if let Some(open_pc) = lookaround_stack.first() {
            return Err(ValidateError::UnbalancedLookaround { at: *open_pc });
        }

        match last_instr {
            Some(Instruction::Match) => {}
            _ => return Err(ValidateError::MissingTerminalMatch),
        }

        Ok(())
    }

    /// Render the program as one line per instruction: `pc: mnemonic operands`.
    ///
    /// Stops (with a trailing error line) if the buffer does not decode
    /// cleanly; a successfully compiled program never triggers this.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for item in self.iter() {
            match item {
                Ok((pc, instr)) => {
                    out.push_str(&format_instruction(pc, &instr));
                    out.push('\n');
                }
                Err(e) => {
                    out.push_str(&format!("<decode error: {e}>\n"));
                    break;
                }
            }
        }
        out
    }
}

fn format_instruction(pc: usize, instr: &Instruction) -> String {
    let mnemonic = instr.opcode().mnemonic();
    match instr {
        Instruction::CharAny
        | Instruction::Match
        | Instruction::LineStart
        | Instruction::LineEnd
        | Instruction::WordBoundary
        | Instruction::NotWordBoundary
        | Instruction::LookaheadEnd
        | Instruction::LookbehindEnd => format!("{pc:>6}: {mnemonic}"),

        Instruction::Char32(b) => format!("{pc:>6}: {mnemonic} {}", format_byte(*b)),

        Instruction::CharRange { lo, hi } | Instruction::CharRangeInv { lo, hi } => {
            format!("{pc:>6}: {mnemonic} {}-{}", format_byte(*lo), format_byte(*hi))
        }

        Instruction::CharClass(table) | Instruction::CharClassInv(table) => {
            let count: u32 = table.iter().map(|b| b.count_ones()).sum();
            format!("{pc:>6}: {mnemonic} <{count} byte(s) set>")
        }

        Instruction::Goto(off) => {
            format!("{pc:>6}: {mnemonic} {off:+} -> {}", target_pc(pc, *off))
        }

        Instruction::Split { first, second }
        | Instruction::SplitGreedy { first, second }
        | Instruction::SplitLazy { first, second }
        | Instruction::SplitPossessive { first, second } => format!(
            "{pc:>6}: {mnemonic} {first:+} -> {}, {second:+} -> {}",
            target_pc(pc, *first),
            target_pc(pc, *second)
        ),

        Instruction::SaveStart(g)
        | Instruction::SaveEnd(g)
        | Instruction::BackRef(g)
        | Instruction::BackRefI(g) => format!("{pc:>6}: {mnemonic} {g}"),

        Instruction::Lookahead(v)
        | Instruction::NegativeLookahead(v)
        | Instruction::Lookbehind(v)
        | Instruction::NegativeLookbehind(v) => format!("{pc:>6}: {mnemonic} {v}"),
    }
}

fn target_pc(pc: usize, rel: i32) -> i64 {
    pc as i64 + rel as i64
}

fn format_byte(b: u8) -> String {
    if b.is_ascii_graphic() || b == b' ' {
        format!("'{}'", b as char)
    } else {
        format!("{b:#04x}")
    }
}

/// Lazy iterator over a program's instructions, yielding `(pc, instruction)`
/// or the decode error encountered at the current PC.
pub struct ProgramIter<'a> {
    bytes: &'a [u8],
    pc: usize,
}

impl Iterator for ProgramIter<'_> {
    type Item = Result<(usize, Instruction), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pc >= self.bytes.len() {
            return None;
        }
        match Instruction::decode(self.bytes, self.pc) {
            Ok((instr, size)) => {
                let pc = self.pc;
                self.pc += size;
                Some(Ok((pc, instr)))
            }
            Err(e) => {
                self.pc = self.bytes.len();
                Some(Err(e))
            }
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = Result<(usize, Instruction), DecodeError>;
    type IntoIter = ProgramIter<'a>;

    fn into_iter(self) -> ProgramIter<'a> {
        self.iter()
    }
}
