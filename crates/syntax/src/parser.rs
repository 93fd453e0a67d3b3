//! Recursive-descent parser: token stream → [`Ast`].
//!
//! Precedence, loosest to tightest: alternation < concatenation <
//! quantification < atom. Mirrors the grammar in `SPEC_FULL.md` §4.3.

use crate::ast::{Ast, ClassItem, Greediness};
use crate::error::SyntaxError;
use crate::lexer::{Lexer, QuantKind, Token};

/// Capture table width: 16 slots, index 0 reserved for the whole match, so
/// at most 15 user-visible capturing groups.
pub const MAX_CAPTURING_GROUPS: u8 = 15;

/// Parse a complete pattern into an AST.
///
/// Returns the AST together with the number of capturing groups declared
/// (not counting the implicit whole-match group 0).
pub fn parse(pattern: &str) -> Result<(Ast, u8), SyntaxError> {
    let mut parser = Parser {
        lexer: Lexer::new(pattern),
        group_count: 0,
    };
    let ast = parser.parse_disjunction()?;
    let tok = parser.lexer.next()?;
    if tok.value != Token::Eof {
        return Err(SyntaxError::UnmatchedCloseParen { at: tok.offset });
    }
    Ok((ast, parser.group_count))
}

struct Parser<'p> {
    lexer: Lexer<'p>,
    group_count: u8,
}

impl<'p> Parser<'p> {
    /// `disjunction := sequence ('|' sequence)*`
    fn parse_disjunction(&mut self) -> Result<Ast, SyntaxError> {
        let mut node = self.parse_sequence()?;
        loop {
            let tok = self.lexer.peek()?;
            if tok.value != Token::Pipe {
                break;
            }
            self.lexer.next()?;
            let rhs = self.parse_sequence()?;
            node = Ast::Alternation(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    /// `sequence := term*`
    fn parse_sequence(&mut self) -> Result<Ast, SyntaxError> {
        let mut terms = Vec::new();
        loop {
            let tok = self.lexer.peek()?;
            if matches!(tok.value, Token::Eof | Token::Pipe | Token::RParen) {
                break;
            }
            terms.push(self.parse_term()?);
        }
        Ok(match terms.len() {
            1 => terms.into_iter().next().unwrap(),
            _ => Ast::Sequence(terms),
        })
    }

    /// `term := atom quantifier?`
    fn parse_term(&mut self) -> Result<Ast, SyntaxError> {
        let atom_offset = self.lexer.peek()?.offset;
        let atom = self.parse_atom()?;
        let tok = self.lexer.peek()?;
        if let Token::Quantifier(kind, mode) = tok.value {
            if !atom.is_quantifiable() {
                return Err(SyntaxError::InvalidQuantifierTarget { at: atom_offset });
            }
            self.lexer.next()?;
            let (min, max) = match kind {
                QuantKind::Star => (0, None),
                QuantKind::Plus => (1, None),
                QuantKind::Question => (0, Some(1)),
                QuantKind::Repeat { min, max } => (min, max),
            };
            return Ok(Ast::Repeat {
                min,
                max,
                mode,
                child: Box::new(atom),
            });
        }
        Ok(atom)
    }

    /// `atom := literal | dot | anchor | class | group | backref`
    fn parse_atom(&mut self) -> Result<Ast, SyntaxError> {
        let tok = self.lexer.next()?;
        match tok.value {
            Token::Literal(b) => Ok(Ast::Char(b)),
            Token::Dot => Ok(Ast::Dot),
            Token::CaretAnchor => Ok(Ast::AnchorStart),
            Token::DollarAnchor => Ok(Ast::AnchorEnd),
            Token::WordBoundary { negated } => Ok(Ast::WordBoundary { negated }),
            Token::ClassShorthand(shorthand) => Ok(Ast::ClassShorthand(shorthand)),
            Token::Backref(index) => {
                if index == 0 || index > self.group_count {
                    return Err(SyntaxError::InvalidBackreference {
                        at: tok.offset,
                        group: index,
                    });
                }
                Ok(Ast::Backref(index))
            }
            Token::LBracket => self.parse_class(tok.offset),
            Token::LParen => {
                self.group_count += 1;
                if self.group_count > MAX_CAPTURING_GROUPS {
                    return Err(SyntaxError::TooManyCaptures {
                        max: MAX_CAPTURING_GROUPS,
                    });
                }
                let index = self.group_count;
                let child = self.parse_disjunction()?;
                self.expect_close_paren(tok.offset)?;
                Ok(Ast::Group {
                    index,
                    child: Box::new(child),
                })
            }
            Token::NonCapturing => {
                let child = self.parse_disjunction()?;
                self.expect_close_paren(tok.offset)?;
                Ok(Ast::NonCapturingGroup(Box::new(child)))
            }
            Token::Lookahead => self.parse_lookaround(tok.offset, false, false),
            Token::NegLookahead => self.parse_lookaround(tok.offset, true, false),
            Token::Lookbehind => self.parse_lookaround(tok.offset, false, true),
            Token::NegLookbehind => self.parse_lookaround(tok.offset, true, true),
            Token::RParen => Err(SyntaxError::UnmatchedCloseParen { at: tok.offset }),
            Token::Pipe | Token::Eof => Err(SyntaxError::UnexpectedEof { at: tok.offset }),
            Token::Quantifier(..) => Err(SyntaxError::InvalidQuantifierTarget { at: tok.offset }),
        }
    }

    fn parse_lookaround(
        &mut self,
        open_offset: usize,
        negated: bool,
        behind: bool,
    ) -> Result<Ast, SyntaxError> {
        let child = self.parse_disjunction()?;
        self.expect_close_paren(open_offset)?;
        let child = Box::new(child);
        Ok(if behind {
            Ast::Lookbehind { child, negated }
        } else {
            Ast::Lookahead { child, negated }
        })
    }

    fn expect_close_paren(&mut self, open_offset: usize) -> Result<(), SyntaxError> {
        let tok = self.lexer.next()?;
        match tok.value {
            Token::RParen => Ok(()),
            Token::Eof => Err(SyntaxError::UnmatchedParen { at: open_offset }),
            _ => Err(SyntaxError::UnmatchedParen { at: open_offset }),
        }
    }

    /// `class := '[' '^'? (char | char '-' char)+ ']'`
    ///
    /// Scanned at the raw byte level: bracket-expression escapes are a
    /// narrower set than the main token grammar's (no shorthand classes —
    /// the data model restricts class children to bytes and byte ranges).
    fn parse_class(&mut self, open_offset: usize) -> Result<Ast, SyntaxError> {
        let inverted = if self.lexer.peek_byte() == Some(b'^') {
            self.lexer.bump_byte();
            true
        } else {
            false
        };

        let mut children = Vec::new();
        loop {
            match self.lexer.peek_byte() {
                None => return Err(SyntaxError::UnmatchedBracket { at: open_offset }),
                Some(b']') => {
                    self.lexer.bump_byte();
                    break;
                }
                Some(_) => {
                    let lo_offset = self.lexer.pos();
                    let lo = self.read_class_byte(open_offset)?;
                    if self.lexer.peek_byte() == Some(b'-') {
                        let save = self.lexer.pos();
                        self.lexer.bump_byte();
                        match self.lexer.peek_byte() {
                            Some(b']') | None => {
                                // Trailing '-' before ']' or EOF is a literal dash.
                                self.lexer.seek(save);
                                children.push(ClassItem::Char(lo));
                            }
                            Some(_) => {
                                let hi = self.read_class_byte(open_offset)?;
                                if hi < lo {
                                    return Err(SyntaxError::InvalidRange {
                                        at: lo_offset,
                                        lo,
                                        hi,
                                    });
                                }
                                children.push(ClassItem::Range(lo, hi));
                            }
                        }
                    } else {
                        children.push(ClassItem::Char(lo));
                    }
                }
            }
        }

        if children.is_empty() {
            return Err(SyntaxError::UnmatchedBracket { at: open_offset });
        }

        Ok(Ast::CharClass { children, inverted })
    }

    fn read_class_byte(&mut self, open_offset: usize) -> Result<u8, SyntaxError> {
        let b = self
            .lexer
            .bump_byte()
            .ok_or(SyntaxError::UnmatchedBracket { at: open_offset })?;
        if b != b'\\' {
            return Ok(b);
        }
        let at = self.lexer.pos().saturating_sub(1);
        let escaped = self
            .lexer
            .bump_byte()
            .ok_or(SyntaxError::UnmatchedBracket { at: open_offset })?;
        match escaped {
            b'n' => Ok(b'\n'),
            b't' => Ok(b'\t'),
            b'r' => Ok(b'\r'),
            b'0' => Ok(0),
            b'\\' | b'.' | b'*' | b'+' | b'?' | b'(' | b')' | b'[' | b']' | b'{' | b'}'
            | b'|' | b'^' | b'$' | b'-' | b'/' => Ok(escaped),
            other => Err(SyntaxError::InvalidEscape {
                at,
                ch: other as char,
            }),
        }
    }
}
