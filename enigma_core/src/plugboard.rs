use log::warn;

use crate::alphabet::{ALPHABET_LEN, Symbol, letter_from_symbol, symbol_from_letter};
use crate::error::PlugWarning;

/// Self-inverse letter swap applied on the way in and on the way out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plugboard {
    map: [Symbol; ALPHABET_LEN],
}

impl Default for Plugboard {
    fn default() -> Self {
        Self::identity()
    }
}

impl Plugboard {
    pub fn identity() -> Self {
        let mut map = [0; ALPHABET_LEN];
        for (index, slot) in map.iter_mut().enumerate() {
            *slot = index as Symbol;
        }
        Self { map }
    }

    /// Builds a plugboard from a string of letter pairs such as `"AB CD"`.
    ///
    /// Anything that is not a letter is dropped before pairing. Mistakes are
    /// reported as warnings (and logged) rather than refused: a dangling
    /// final letter is ignored and a letter plugged twice keeps its last
    /// partner.
    pub fn configure(pairs: &str) -> (Self, Vec<PlugWarning>) {
        let letters: Vec<Symbol> = pairs.chars().filter_map(symbol_from_letter).collect();
        let mut board = Self::identity();
        let mut warnings = Vec::new();
        if letters.len() % 2 == 1 {
            if let Some(&dangling) = letters.last() {
                warnings.push(PlugWarning::InvalidPlugConfiguration {
                    letters: letters.len(),
                    dangling: letter_from_symbol(dangling),
                });
            }
        }
        for pair in letters.chunks_exact(2) {
            let (from, to) = (pair[0], pair[1]);
            let ends = if from == to { vec![from] } else { vec![from, to] };
            let replugged: Vec<Symbol> = ends
                .into_iter()
                .filter(|symbol| board.map[*symbol as usize] != *symbol)
                .collect();
            for symbol in replugged {
                warnings.push(PlugWarning::DuplicatePlugAssignment {
                    symbol: letter_from_symbol(symbol),
                });
                board.unplug(symbol);
            }
            board.map[from as usize] = to;
            board.map[to as usize] = from;
        }
        for warning in &warnings {
            warn!("{}", warning);
        }
        (board, warnings)
    }

    fn unplug(&mut self, symbol: Symbol) {
        let partner = self.map[symbol as usize];
        self.map[partner as usize] = partner;
        self.map[symbol as usize] = symbol;
    }

    pub fn swap(&self, symbol: Symbol) -> Symbol {
        self.map[symbol as usize]
    }

    /// Plugged pairs, each listed once with the lower letter first.
    pub fn pairs(&self) -> Vec<(Symbol, Symbol)> {
        self.map
            .iter()
            .enumerate()
            .filter(|(index, partner)| (*index as Symbol) < **partner)
            .map(|(index, partner)| (index as Symbol, *partner))
            .collect()
    }

    pub fn is_identity(&self) -> bool {
        self.pairs().is_empty()
    }
}
