//! Named rotor and reflector wirings.
//!
//! Each wiring is a permutation of the alphabet. It is stored as two offset
//! tables: `forward[i]` is how far contact `i` is carried when the current
//! enters on the wire side (`target(i) - i`), and `reverse[j]` undoes it for
//! a current entering at the target contact `j`. The tables are derived once,
//! the first time the registry is touched, and shared by every engine.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::alphabet::{ALPHABET_LEN, Symbol, wrap};
use crate::error::EnigmaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WiringKind {
    Rotor,
    Reflector,
}

impl fmt::Display for WiringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WiringKind::Rotor => f.write_str("rotor"),
            WiringKind::Reflector => f.write_str("reflector"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct WiringDefinition {
    name: &'static str,
    wires: &'static [u8; ALPHABET_LEN],
    notch: Option<u8>,
}

const ROTOR_I: WiringDefinition = WiringDefinition {
    name: "I",
    wires: b"EKMFLGDQVZNTOWYHXUSPAIBRCJ",
    notch: Some(b'Q'),
};

const ROTOR_II: WiringDefinition = WiringDefinition {
    name: "II",
    wires: b"AJDKSIRUXBLHWTMCQGZNPYFVOE",
    notch: Some(b'E'),
};

const ROTOR_III: WiringDefinition = WiringDefinition {
    name: "III",
    wires: b"BDFHJLCPRTXVZNYEIWGAKMUSQO",
    notch: Some(b'V'),
};

const ROTOR_IV: WiringDefinition = WiringDefinition {
    name: "IV",
    wires: b"ESOVPZJAYQUIRHXLNFTGKDCMWB",
    notch: Some(b'J'),
};

const ROTOR_V: WiringDefinition = WiringDefinition {
    name: "V",
    wires: b"VZBRGITYUPSDNHLXAWMJQOFECK",
    notch: Some(b'Z'),
};

const REFLECTOR_B: WiringDefinition = WiringDefinition {
    name: "B",
    wires: b"YRUHQSLDPXNGOKMIEBFZCWVJAT",
    notch: None,
};

const REFLECTOR_C: WiringDefinition = WiringDefinition {
    name: "C",
    wires: b"FVPJIAOYEDRZXWGCTKUQSBNMHL",
    notch: None,
};

static ROTOR_DEFINITIONS: [WiringDefinition; 5] =
    [ROTOR_I, ROTOR_II, ROTOR_III, ROTOR_IV, ROTOR_V];

static REFLECTOR_DEFINITIONS: [WiringDefinition; 2] = [REFLECTOR_B, REFLECTOR_C];

static WIRING_REGISTRY: Lazy<WiringRegistry> = Lazy::new(WiringRegistry::build);

/// Derived, read-only form of one named wiring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WiringSpec {
    name: &'static str,
    kind: WiringKind,
    wires: [Symbol; ALPHABET_LEN],
    notch: Option<Symbol>,
    forward: [Symbol; ALPHABET_LEN],
    reverse: [Symbol; ALPHABET_LEN],
}

impl WiringSpec {
    fn derive(kind: WiringKind, definition: &WiringDefinition) -> Self {
        let mut wires = [0; ALPHABET_LEN];
        let mut forward = [0; ALPHABET_LEN];
        let mut reverse = [0; ALPHABET_LEN];
        for (from, byte) in definition.wires.iter().enumerate() {
            let to = byte - b'A';
            wires[from] = to;
            forward[from] = wrap(to as i32 - from as i32);
            reverse[to as usize] = wrap(from as i32 - to as i32);
        }
        Self {
            name: definition.name,
            kind,
            wires,
            notch: definition.notch.map(|letter| letter - b'A'),
            forward,
            reverse,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> WiringKind {
        self.kind
    }

    /// Turnover position; always `None` for reflectors.
    pub fn notch(&self) -> Option<Symbol> {
        self.notch
    }

    /// Contact reached by following the wire from `contact`.
    pub fn target(&self, contact: Symbol) -> Symbol {
        self.wires[contact as usize]
    }

    pub fn forward_offset(&self, contact: Symbol) -> Symbol {
        self.forward[contact as usize]
    }

    pub fn reverse_offset(&self, contact: Symbol) -> Symbol {
        self.reverse[contact as usize]
    }
}

/// Process-wide table of every registered wiring.
#[derive(Debug)]
pub struct WiringRegistry {
    rotors: Vec<WiringSpec>,
    reflectors: Vec<WiringSpec>,
}

impl WiringRegistry {
    fn build() -> Self {
        Self {
            rotors: ROTOR_DEFINITIONS
                .iter()
                .map(|definition| WiringSpec::derive(WiringKind::Rotor, definition))
                .collect(),
            reflectors: REFLECTOR_DEFINITIONS
                .iter()
                .map(|definition| WiringSpec::derive(WiringKind::Reflector, definition))
                .collect(),
        }
    }

    pub fn global() -> &'static WiringRegistry {
        &WIRING_REGISTRY
    }

    pub fn lookup(&self, kind: WiringKind, name: &str) -> Result<&WiringSpec, EnigmaError> {
        let wanted = name.trim();
        let specs = match kind {
            WiringKind::Rotor => &self.rotors,
            WiringKind::Reflector => &self.reflectors,
        };
        specs
            .iter()
            .find(|spec| spec.name == wanted)
            .ok_or_else(|| EnigmaError::UnknownWiringName {
                kind,
                name: wanted.to_string(),
            })
    }

    pub fn rotor_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rotors.iter().map(|spec| spec.name)
    }

    pub fn reflector_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.reflectors.iter().map(|spec| spec.name)
    }

    pub fn rotors(&self) -> &[WiringSpec] {
        &self.rotors
    }

    pub fn reflectors(&self) -> &[WiringSpec] {
        &self.reflectors
    }
}

pub fn lookup_rotor(name: &str) -> Result<&'static WiringSpec, EnigmaError> {
    WiringRegistry::global().lookup(WiringKind::Rotor, name)
}

pub fn lookup_reflector(name: &str) -> Result<&'static WiringSpec, EnigmaError> {
    WiringRegistry::global().lookup(WiringKind::Reflector, name)
}
