//! Machine configuration as supplied by the operator.

use serde::{Deserialize, Serialize};

use crate::alphabet::{Symbol, symbol_from_letter};
use crate::error::EnigmaError;

const DEFAULT_ROTORS: [&str; 3] = ["I", "II", "III"];
const DEFAULT_REFLECTOR: &str = "B";
const DEFAULT_POSITIONS: &str = "MCK";
const DEFAULT_RINGS: &str = "AAA";

/// Full machine settings. Missing fields in a serialized document fall back
/// to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rotor names, left to right.
    pub rotors: Vec<String>,
    pub reflector: String,
    /// Starting window letters, one per rotor.
    pub positions: String,
    /// Ring settings, one letter per rotor.
    pub rings: String,
    /// Plugboard pairs, e.g. `"AV BS CG"`.
    pub plugs: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rotors: DEFAULT_ROTORS.iter().map(|name| name.to_string()).collect(),
            reflector: DEFAULT_REFLECTOR.to_string(),
            positions: DEFAULT_POSITIONS.to_string(),
            rings: DEFAULT_RINGS.to_string(),
            plugs: String::new(),
        }
    }
}

impl EngineConfig {
    pub fn with_rotors<I, S>(mut self, rotors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rotors = rotors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reflector(mut self, reflector: impl Into<String>) -> Self {
        self.reflector = reflector.into();
        self
    }

    pub fn with_positions(mut self, positions: impl Into<String>) -> Self {
        self.positions = positions.into();
        self
    }

    pub fn with_rings(mut self, rings: impl Into<String>) -> Self {
        self.rings = rings.into();
        self
    }

    pub fn with_plugs(mut self, plugs: impl Into<String>) -> Self {
        self.plugs = plugs.into();
        self
    }

    /// Replaces only the fields present in `overrides`.
    pub fn apply(&mut self, overrides: &ConfigOverride) {
        if let Some(rotors) = &overrides.rotors {
            self.rotors = rotors.clone();
        }
        if let Some(reflector) = &overrides.reflector {
            self.reflector = reflector.clone();
        }
        if let Some(positions) = &overrides.positions {
            self.positions = positions.clone();
        }
        if let Some(rings) = &overrides.rings {
            self.rings = rings.clone();
        }
        if let Some(plugs) = &overrides.plugs {
            self.plugs = plugs.clone();
        }
    }

    pub fn merged(&self, overrides: &ConfigOverride) -> Self {
        let mut merged = self.clone();
        merged.apply(overrides);
        merged
    }

    pub(crate) fn position_symbols(&self) -> Result<Vec<Symbol>, EnigmaError> {
        parse_slot_letters("positions", &self.positions, self.rotors.len())
    }

    pub(crate) fn ring_symbols(&self) -> Result<Vec<Symbol>, EnigmaError> {
        parse_slot_letters("rings", &self.rings, self.rotors.len())
    }
}

/// Partial settings used to re-initialize a running engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverride {
    pub rotors: Option<Vec<String>>,
    pub reflector: Option<String>,
    pub positions: Option<String>,
    pub rings: Option<String>,
    pub plugs: Option<String>,
}

impl ConfigOverride {
    pub fn positions(positions: impl Into<String>) -> Self {
        Self {
            positions: Some(positions.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parses one letter per rotor slot. Whitespace and `-` separate letters.
fn parse_slot_letters(
    field: &'static str,
    text: &str,
    expected: usize,
) -> Result<Vec<Symbol>, EnigmaError> {
    let symbols = text
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .map(|ch| {
            symbol_from_letter(ch).ok_or(EnigmaError::InvalidSettingLetter { field, found: ch })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if symbols.len() != expected {
        return Err(EnigmaError::SlotCountMismatch {
            field,
            expected,
            found: symbols.len(),
        });
    }
    Ok(symbols)
}
