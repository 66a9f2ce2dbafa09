use std::fmt;

use serde::Serialize;

use crate::alphabet::{Symbol, letter_from_symbol, letters};

/// Read-only copy of the machine's configuration and window letters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MachineSnapshot {
    pub rotors: Vec<&'static str>,
    pub reflector: &'static str,
    pub positions: Vec<Symbol>,
    pub rings: Vec<Symbol>,
    pub plug_pairs: Vec<(Symbol, Symbol)>,
}

impl MachineSnapshot {
    pub fn position_letters(&self) -> String {
        letters(&self.positions)
    }

    pub fn ring_letters(&self) -> String {
        letters(&self.rings)
    }

    pub fn plug_letters(&self) -> Vec<String> {
        self.plug_pairs
            .iter()
            .map(|(a, b)| [letter_from_symbol(*a), letter_from_symbol(*b)].iter().collect())
            .collect()
    }
}

/// `Enigma Rotors: I-II-III Position: ABC Rings: BBB Plugboard: AB CD`.
/// Rings all at `A` and an empty plugboard are left out.
impl fmt::Display for MachineSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Enigma Rotors: {} Position: {}",
            self.rotors.join("-"),
            self.position_letters()
        )?;
        if self.rings.iter().any(|ring| *ring != 0) {
            write!(f, " Rings: {}", self.ring_letters())?;
        }
        if !self.plug_pairs.is_empty() {
            write!(f, " Plugboard: {}", self.plug_letters().join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MachineSnapshot {
        MachineSnapshot {
            rotors: vec!["I", "II", "III"],
            reflector: "B",
            positions: vec![0, 1, 2],
            rings: vec![0, 0, 0],
            plug_pairs: Vec::new(),
        }
    }

    #[test]
    fn plain_machine_omits_rings_and_plugs() {
        assert_eq!(
            snapshot().to_string(),
            "Enigma Rotors: I-II-III Position: ABC"
        );
    }

    #[test]
    fn non_default_rings_and_plugs_are_listed() {
        let mut state = snapshot();
        state.rings = vec![1, 0, 0];
        state.plug_pairs = vec![(0, 1), (2, 25)];
        assert_eq!(
            state.to_string(),
            "Enigma Rotors: I-II-III Position: ABC Rings: BAA Plugboard: AB CZ"
        );
    }

    #[test]
    fn serializes_raw_symbols() {
        let value = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(value["reflector"], "B");
        assert_eq!(value["positions"], serde_json::json!([0, 1, 2]));
    }
}
