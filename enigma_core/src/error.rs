use thiserror::Error;

use crate::wiring::WiringKind;

/// Configuration errors that leave no valid machine to build.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EnigmaError {
    #[error("unknown {kind} wiring '{name}'")]
    UnknownWiringName { kind: WiringKind, name: String },

    #[error("rotor stack must contain at least one rotor")]
    EmptyRotorStack,

    #[error("{field} setting has {found} letters but the machine has {expected} rotors")]
    SlotCountMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid {field} letter {found:?}")]
    InvalidSettingLetter { field: &'static str, found: char },
}

/// Operator mistakes the machine tolerates. Construction carries on.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlugWarning {
    #[error(
        "invalid plugboard settings - must have an even number of characters (found {letters}, ignoring '{dangling}')"
    )]
    InvalidPlugConfiguration { letters: usize, dangling: char },

    #[error("redefinition of plug setting for {symbol}")]
    DuplicatePlugAssignment { symbol: char },
}
