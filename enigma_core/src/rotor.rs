use crate::alphabet::{ALPHABET_LEN, Symbol, offset, wrap};
use crate::error::EnigmaError;
use crate::wiring::WiringSpec;

/// One wired disk in a stack slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotor {
    wiring: &'static WiringSpec,
    position: Symbol,
    ring_setting: Symbol,
}

impl Rotor {
    pub fn new(wiring: &'static WiringSpec, position: Symbol, ring_setting: Symbol) -> Self {
        Self {
            wiring,
            position: position % ALPHABET_LEN as Symbol,
            ring_setting: ring_setting % ALPHABET_LEN as Symbol,
        }
    }

    pub fn name(&self) -> &'static str {
        self.wiring.name()
    }

    pub fn wiring(&self) -> &'static WiringSpec {
        self.wiring
    }

    /// Visible position, the letter showing in the window.
    pub fn position(&self) -> Symbol {
        self.position
    }

    pub fn ring_setting(&self) -> Symbol {
        self.ring_setting
    }

    /// Notches sit on the outer ring, so this compares the visible position
    /// and ignores the ring setting.
    pub fn at_notch(&self) -> bool {
        self.wiring.notch() == Some(self.position)
    }

    fn advance(&mut self) {
        self.position = offset(self.position, 1);
    }

    fn contact(&self, symbol: Symbol) -> Symbol {
        wrap(symbol as i32 + self.position as i32 - self.ring_setting as i32)
    }

    /// Carries the current right-to-left, from the entry side to the reflector.
    pub fn inbound(&self, symbol: Symbol) -> Symbol {
        let delta = self.wiring.forward_offset(self.contact(symbol));
        offset(symbol, delta as i32)
    }

    /// Carries the current left-to-right, from the reflector back out.
    pub fn outbound(&self, symbol: Symbol) -> Symbol {
        let delta = self.wiring.reverse_offset(self.contact(symbol));
        offset(symbol, delta as i32)
    }
}

/// Rotors ordered left (slowest) to right (fastest).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotorStack {
    rotors: Vec<Rotor>,
}

impl RotorStack {
    pub fn new(rotors: Vec<Rotor>) -> Result<Self, EnigmaError> {
        if rotors.is_empty() {
            return Err(EnigmaError::EmptyRotorStack);
        }
        Ok(Self { rotors })
    }

    /// Advances the stack by one key press.
    ///
    /// Every decision is taken on the positions before the press. A rotor
    /// moves when it is the rightmost rotor, when its right neighbour sits at
    /// its notch, or when it is an interior rotor sitting at its own notch.
    /// The last case is the double step: with three rotors the middle rotor
    /// at its notch carries the left rotor and moves itself on the same press.
    pub fn step(&mut self) {
        let last = self.rotors.len() - 1;
        let at_notch: Vec<bool> = self.rotors.iter().map(Rotor::at_notch).collect();
        for (index, rotor) in self.rotors.iter_mut().enumerate() {
            let moves = index == last
                || at_notch[index + 1]
                || (index > 0 && at_notch[index]);
            if moves {
                rotor.advance();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    pub fn positions(&self) -> Vec<Symbol> {
        self.rotors.iter().map(Rotor::position).collect()
    }

    pub fn ring_settings(&self) -> Vec<Symbol> {
        self.rotors.iter().map(Rotor::ring_setting).collect()
    }

    /// Moves every rotor to the given positions, left to right. Extra
    /// entries are ignored and missing ones leave the rotor in place.
    pub fn set_positions(&mut self, positions: &[Symbol]) {
        for (rotor, position) in self.rotors.iter_mut().zip(positions) {
            rotor.position = position % ALPHABET_LEN as Symbol;
        }
    }
}
