//! Signal-path engine for a three-rotor electromechanical cipher machine.
//!
//! A key press steps the rotor stack, then the current runs through the
//! plugboard, the rotors right to left, the reflector, the rotors left to
//! right and the plugboard again. The path is its own inverse, so the same
//! settings decode what they encoded.
//!
//! ```
//! use enigma_core::{ConfigOverride, EngineConfig, EnigmaEngine};
//!
//! let config = EngineConfig::default().with_positions("AAA");
//! let mut engine = EnigmaEngine::new(config).unwrap();
//! assert_eq!(engine.encode("AAAAA"), "BDZGO");
//!
//! engine.reinitialize(ConfigOverride::default()).unwrap();
//! assert_eq!(engine.encode("BDZGO"), "AAAAA");
//! ```
//!
//! This is a mechanical simulator and offers no security.

pub mod alphabet;
pub mod engine;
pub mod error;
pub mod plugboard;
pub mod rotor;
pub mod settings;
pub mod summary;
pub mod trace;
pub mod wiring;

pub use crate::alphabet::{ALPHABET_LEN, Symbol, letter_from_symbol, symbol_from_letter};
pub use crate::engine::EnigmaEngine;
pub use crate::error::{EnigmaError, PlugWarning};
pub use crate::plugboard::Plugboard;
pub use crate::rotor::{Rotor, RotorStack};
pub use crate::settings::{ConfigOverride, EngineConfig};
pub use crate::summary::MachineSnapshot;
pub use crate::trace::{LogObserver, SignalObserver, SignalTrace};
pub use crate::wiring::{WiringKind, WiringRegistry, WiringSpec, lookup_reflector, lookup_rotor};
