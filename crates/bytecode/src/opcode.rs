//! Opcode set for the regex bytecode format.
//!
//! Opcodes are grouped into numbered ranges of 8, mirroring the layout of
//! the instruction stream's categories (literal, control flow, capture,
//! backreference, assertion, lookaround). Each range reserves a few unused
//! byte values so a future opcode can be added to its category without
//! renumbering the rest. `TryFrom<u8>` distinguishes a genuinely unknown
//! byte (`IllegalOpcode`, beyond any defined range) from a byte that falls
//! inside a known range but has no opcode assigned to it yet
//! (`ReservedOpcode`), since the two cases call for different diagnostics.

/// Context-free opcode-byte rejection, before a buffer offset is known.
///
/// [`crate::instruction::Instruction::decode`] attaches the offset and
/// turns this into a [`crate::error::DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeByteError {
    /// Byte is beyond every defined category range.
    Illegal(u8),
    /// Byte falls inside a known range but has no opcode assigned.
    Reserved(u8),
}

/// A single bytecode operation.
///
/// See module docs for the byte-range layout. Every variant here has a
/// fixed operand shape; [`Opcode::operand_kind`] and
/// [`crate::instruction::Instruction::encoded_len`] describe it.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // --- Group 0: Literal (0-7) ---
    CharAny = 0,
    Char32 = 1,
    CharRange = 2,
    CharRangeInv = 3,
    CharClass = 4,
    CharClassInv = 5,

    // --- Group 1: Control flow (8-15) ---
    Match = 8,
    Goto = 9,
    Split = 10,
    SplitGreedy = 11,
    SplitLazy = 12,
    SplitPossessive = 13,

    // --- Group 2: Capture and backreference (16-23) ---
    SaveStart = 16,
    SaveEnd = 17,
    BackRef = 18,
    BackRefI = 19,

    // --- Group 3: Assertion (24-31) ---
    LineStart = 24,
    LineEnd = 25,
    WordBoundary = 26,
    NotWordBoundary = 27,

    // --- Group 4: Lookaround (32-39) ---
    Lookahead = 32,
    NegativeLookahead = 33,
    Lookbehind = 34,
    NegativeLookbehind = 35,
    LookaheadEnd = 36,
    LookbehindEnd = 37,
}

/// All defined opcodes, in discriminant order. Kept in lockstep with the
/// enum body; `every_byte_value_resolves` checks this does not drift.
pub const ALL_OPCODES: [Opcode; 26] = [
    Opcode::CharAny,
    Opcode::Char32,
    Opcode::CharRange,
    Opcode::CharRangeInv,
    Opcode::CharClass,
    Opcode::CharClassInv,
    Opcode::Match,
    Opcode::Goto,
    Opcode::Split,
    Opcode::SplitGreedy,
    Opcode::SplitLazy,
    Opcode::SplitPossessive,
    Opcode::SaveStart,
    Opcode::SaveEnd,
    Opcode::BackRef,
    Opcode::BackRefI,
    Opcode::LineStart,
    Opcode::LineEnd,
    Opcode::WordBoundary,
    Opcode::NotWordBoundary,
    Opcode::Lookahead,
    Opcode::NegativeLookahead,
    Opcode::Lookbehind,
    Opcode::NegativeLookbehind,
    Opcode::LookaheadEnd,
    Opcode::LookbehindEnd,
];

/// Shape of an opcode's operand block, used to compute instruction length
/// and to drive encode/decode without a second lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// No operand bytes.
    None,
    /// A single group index, 0..=15.
    GroupIndex,
    /// A single `u32`: a literal byte value or a jump/lookaround placeholder.
    U32,
    /// Two `u32` values: a character range's `lo`/`hi`, or a SPLIT's two offsets.
    TwoU32,
    /// A 256-bit (32 byte) inline class membership table.
    ClassTable,
}

impl Opcode {
    /// The operand shape for this opcode.
    pub const fn operand_kind(self) -> OperandKind {
        use OperandKind::*;
        match self {
            Opcode::CharAny => None,
            Opcode::Char32 => U32,
            Opcode::CharRange | Opcode::CharRangeInv => TwoU32,
            Opcode::CharClass | Opcode::CharClassInv => ClassTable,
            Opcode::Match => None,
            Opcode::Goto => U32,
            Opcode::Split | Opcode::SplitGreedy | Opcode::SplitLazy | Opcode::SplitPossessive => {
                TwoU32
            }
            Opcode::SaveStart | Opcode::SaveEnd | Opcode::BackRef | Opcode::BackRefI => {
                GroupIndex
            }
            Opcode::LineStart
            | Opcode::LineEnd
            | Opcode::WordBoundary
            | Opcode::NotWordBoundary => None,
            Opcode::Lookahead
            | Opcode::NegativeLookahead
            | Opcode::Lookbehind
            | Opcode::NegativeLookbehind => U32,
            Opcode::LookaheadEnd | Opcode::LookbehindEnd => None,
        }
    }

    /// Total encoded length in bytes, including the opcode byte itself.
    pub const fn encoded_len(self) -> usize {
        match self.operand_kind() {
            OperandKind::None => 1,
            OperandKind::GroupIndex => 2,
            OperandKind::U32 => 5,
            OperandKind::TwoU32 => 9,
            OperandKind::ClassTable => 33,
        }
    }

    /// Lowercase-with-underscores mnemonic, as rendered by the disassembler.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::CharAny => "char_any",
            Opcode::Char32 => "char32",
            Opcode::CharRange => "char_range",
            Opcode::CharRangeInv => "char_range_inv",
            Opcode::CharClass => "char_class",
            Opcode::CharClassInv => "char_class_inv",
            Opcode::Match => "match",
            Opcode::Goto => "goto",
            Opcode::Split => "split",
            Opcode::SplitGreedy => "split_greedy",
            Opcode::SplitLazy => "split_lazy",
            Opcode::SplitPossessive => "split_possessive",
            Opcode::SaveStart => "save_start",
            Opcode::SaveEnd => "save_end",
            Opcode::BackRef => "back_ref",
            Opcode::BackRefI => "back_ref_i",
            Opcode::LineStart => "line_start",
            Opcode::LineEnd => "line_end",
            Opcode::WordBoundary => "word_boundary",
            Opcode::NotWordBoundary => "not_word_boundary",
            Opcode::Lookahead => "lookahead",
            Opcode::NegativeLookahead => "negative_lookahead",
            Opcode::Lookbehind => "lookbehind",
            Opcode::NegativeLookbehind => "negative_lookbehind",
            Opcode::LookaheadEnd => "lookahead_end",
            Opcode::LookbehindEnd => "lookbehind_end",
        }
    }

    /// True for the four opcodes that open a lookaround region (used by
    /// the validator to check region balance).
    pub const fn opens_lookaround(self) -> bool {
        matches!(
            self,
            Opcode::Lookahead
                | Opcode::NegativeLookahead
                | Opcode::Lookbehind
                | Opcode::NegativeLookbehind
        )
    }

    /// True for the two opcodes that close a lookaround region.
    pub const fn closes_lookaround(self) -> bool {
        matches!(self, Opcode::LookaheadEnd | Opcode::LookbehindEnd)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = OpcodeByteError;

    fn try_from(byte: u8) -> Result<Self, OpcodeByteError> {
        match byte {
            0 => Ok(Opcode::CharAny),
            1 => Ok(Opcode::Char32),
            2 => Ok(Opcode::CharRange),
            3 => Ok(Opcode::CharRangeInv),
            4 => Ok(Opcode::CharClass),
            5 => Ok(Opcode::CharClassInv),
            6..=7 => Err(OpcodeByteError::Reserved(byte)),
            8 => Ok(Opcode::Match),
            9 => Ok(Opcode::Goto),
            10 => Ok(Opcode::Split),
            11 => Ok(Opcode::SplitGreedy),
            12 => Ok(Opcode::SplitLazy),
            13 => Ok(Opcode::SplitPossessive),
            14..=15 => Err(OpcodeByteError::Reserved(byte)),
            16 => Ok(Opcode::SaveStart),
            17 => Ok(Opcode::SaveEnd),
            18 => Ok(Opcode::BackRef),
            19 => Ok(Opcode::BackRefI),
            20..=23 => Err(OpcodeByteError::Reserved(byte)),
            24 => Ok(Opcode::LineStart),
            25 => Ok(Opcode::LineEnd),
            26 => Ok(Opcode::WordBoundary),
            27 => Ok(Opcode::NotWordBoundary),
            28..=31 => Err(OpcodeByteError::Reserved(byte)),
            32 => Ok(Opcode::Lookahead),
            33 => Ok(Opcode::NegativeLookahead),
            34 => Ok(Opcode::Lookbehind),
            35 => Ok(Opcode::NegativeLookbehind),
            36 => Ok(Opcode::LookaheadEnd),
            37 => Ok(Opcode::LookbehindEnd),
            38..=39 => Err(OpcodeByteError::Reserved(byte)),
            _ => Err(OpcodeByteError::Illegal(byte)),
        }
    }
}
