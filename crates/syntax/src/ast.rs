//! Abstract syntax tree produced by [`crate::parser::Parser`].
//!
//! The tree is owned by the caller (the code generator, in practice) for
//! the duration of compilation and is discarded immediately after
//! bytecode emission; nothing here is retained past `compile()`.

/// How a quantifier prefers to consume its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greediness {
    /// Consume as much as possible, backtracking into shorter matches on failure.
    Greedy,
    /// Consume as little as possible, expanding only on failure.
    Lazy,
    /// Consume as much as possible and never backtrack into the body.
    Possessive,
}

/// The four shorthand character classes (`\d \D \w \W \s \S`, collapsed by
/// negation).
///
/// Kept as a distinct node rather than expanded at parse time: lowering to
/// a `CHAR_CLASS`/`CHAR_CLASS_INV` bit table is the code generator's job
/// (see `SPEC_FULL.md` §4.4), not the parser's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassShorthand {
    /// `\d` — ASCII digit.
    Digit,
    /// `\D` — not an ASCII digit.
    NotDigit,
    /// `\w` — word character (`[A-Za-z0-9_]`).
    Word,
    /// `\W` — not a word character.
    NotWord,
    /// `\s` — whitespace.
    Space,
    /// `\S` — not whitespace.
    NotSpace,
}

/// One member of a bracket expression `[...]`.
///
/// Per the data model invariant, bracket-expression children are only
/// single bytes or byte ranges — no nested shorthand classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassItem {
    /// A single literal byte.
    Char(u8),
    /// An inclusive byte range `lo..=hi`.
    Range(u8, u8),
}

/// A parsed regular expression.
///
/// Groups are numbered in source order starting at 1; group 0 denotes the
/// whole match and never appears as a `Group` node itself. `Repeat`
/// unifies `*`, `+`, `?`, and `{n,m}`: `min <= max` when `max` is
/// `Some`, and `max: None` represents the unbounded `{n,}` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// A single literal byte.
    Char(u8),
    /// `.` — any byte (line-terminator handling is not modeled; see Non-goals).
    Dot,
    /// A bare range outside a bracket expression does not occur from the
    /// parser; this variant exists for the peephole in codegen that
    /// lowers a single-range bracket expression to it. See `SPEC_FULL.md` §4.4.
    CharRange { lo: u8, hi: u8, inverted: bool },
    /// A bracket expression `[...]` / `[^...]`.
    CharClass {
        children: Vec<ClassItem>,
        inverted: bool,
    },
    /// `\d \D \w \W \s \S`.
    ClassShorthand(ClassShorthand),
    /// A concatenation of terms.
    Sequence(Vec<Ast>),
    /// `a|b`.
    Alternation(Box<Ast>, Box<Ast>),
    /// A capturing group `(...)`, numbered in source order starting at 1.
    Group { index: u8, child: Box<Ast> },
    /// A non-capturing group `(?:...)`.
    NonCapturingGroup(Box<Ast>),
    /// `(?=...)` / `(?!...)`.
    Lookahead { child: Box<Ast>, negated: bool },
    /// `(?<=...)` / `(?<!...)`.
    Lookbehind { child: Box<Ast>, negated: bool },
    /// `e*`, `e+`, `e?`, `e{n}`, `e{n,}`, `e{n,m}`, and their lazy/possessive
    /// suffixed forms.
    Repeat {
        min: u32,
        max: Option<u32>,
        mode: Greediness,
        child: Box<Ast>,
    },
    /// `\1`..`\9` (in principle up to the 16-slot capture table width).
    Backref(u8),
    /// `^`.
    AnchorStart,
    /// `$`.
    AnchorEnd,
    /// `\b` (negated = false) / `\B` (negated = true).
    WordBoundary { negated: bool },
}

impl Ast {
    /// True for node kinds a quantifier may not legally apply to directly
    /// (anchors and word boundaries are zero-width and repeating them is
    /// almost always a pattern-author mistake the parser should reject
    /// rather than silently accept — see `InvalidQuantifierTarget`).
    pub fn is_quantifiable(&self) -> bool {
        !matches!(
            self,
            Ast::AnchorStart | Ast::AnchorEnd | Ast::WordBoundary { .. }
        )
    }
}
