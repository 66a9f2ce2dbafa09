//! Letter/index codec for the 26-symbol alphabet.

/// Number of contacts on every rotor, reflector and the plugboard.
pub const ALPHABET_LEN: usize = 26;

/// Zero-based alphabet index, `A = 0` through `Z = 25`.
pub type Symbol = u8;

/// Maps an ASCII letter (either case) to its symbol.
pub fn symbol_from_letter(ch: char) -> Option<Symbol> {
    if ch.is_ascii_alphabetic() {
        Some(ch.to_ascii_uppercase() as u8 - b'A')
    } else {
        None
    }
}

pub fn letter_from_symbol(symbol: Symbol) -> char {
    (b'A' + symbol % ALPHABET_LEN as u8) as char
}

/// Adds `delta` to `symbol` modulo the alphabet length.
pub fn offset(symbol: Symbol, delta: i32) -> Symbol {
    wrap(symbol as i32 + delta)
}

pub fn wrap(value: i32) -> Symbol {
    value.rem_euclid(ALPHABET_LEN as i32) as Symbol
}

pub(crate) fn letters(symbols: &[Symbol]) -> String {
    symbols.iter().copied().map(letter_from_symbol).collect()
}
