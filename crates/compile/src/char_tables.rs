//! 256-bit (32-byte) membership tables for character classes.

use regex_core_syntax::ClassItem;

/// Builds the inline bit table for a bracket expression's children. The
/// table always records literal membership; inversion is applied by the
/// matcher when it sees the `*_INV` opcode, not baked in here.
pub fn table_from_items(children: &[ClassItem]) -> [u8; 32] {
    let mut table = [0u8; 32];
    for item in children {
        match *item {
            ClassItem::Char(b) => set_bit(&mut table, b),
            ClassItem::Range(lo, hi) => {
                for b in lo..=hi {
                    set_bit(&mut table, b);
                }
            }
        }
    }
    table
}

fn set_bit(table: &mut [u8; 32], b: u8) {
    table[(b / 8) as usize] |= 1 << (b % 8);
}

/// `[0-9]`.
pub fn digit_table() -> [u8; 32] {
    table_from_items(&[ClassItem::Range(b'0', b'9')])
}

/// `[A-Za-z0-9_]`.
pub fn word_table() -> [u8; 32] {
    table_from_items(&[
        ClassItem::Range(b'A', b'Z'),
        ClassItem::Range(b'a', b'z'),
        ClassItem::Range(b'0', b'9'),
        ClassItem::Char(b'_'),
    ])
}

/// Space, tab, newline, carriage return, vertical tab, form feed.
pub fn space_table() -> [u8; 32] {
    table_from_items(&[
        ClassItem::Char(b' '),
        ClassItem::Char(b'\t'),
        ClassItem::Char(b'\n'),
        ClassItem::Char(b'\r'),
        ClassItem::Char(0x0B),
        ClassItem::Char(0x0C),
    ])
}
