//! Per-symbol signal tracing.
//!
//! Observers are purely diagnostic: the engine hands them a record of the
//! path each symbol took and never reads anything back.

use std::fmt;

use log::debug;

use crate::alphabet::{Symbol, letter_from_symbol};
use crate::summary::MachineSnapshot;

/// Intermediate values of one symbol's trip through the machine.
///
/// `path` holds the input, the value after the plugboard, after each rotor
/// right to left, after the reflector, after each rotor left to right, and
/// after the plugboard again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalTrace {
    pub input: char,
    pub output: char,
    pub path: Vec<Symbol>,
}

impl fmt::Display for SignalTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, symbol) in self.path.iter().enumerate() {
            if index > 0 {
                f.write_str("->")?;
            }
            write!(f, "{}", letter_from_symbol(*symbol))?;
        }
        Ok(())
    }
}

pub trait SignalObserver {
    /// Called after the engine is built or re-initialized.
    fn on_initialize(&mut self, _snapshot: &MachineSnapshot) {}

    /// Called once per alphabetic symbol, after the rotors have stepped.
    fn on_symbol(&mut self, trace: &SignalTrace, snapshot: &MachineSnapshot);
}

impl<F> SignalObserver for F
where
    F: FnMut(&SignalTrace, &MachineSnapshot),
{
    fn on_symbol(&mut self, trace: &SignalTrace, snapshot: &MachineSnapshot) {
        self(trace, snapshot)
    }
}

/// Writes every trace to the `log` facade at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl SignalObserver for LogObserver {
    fn on_initialize(&mut self, snapshot: &MachineSnapshot) {
        debug!("Init: {}", snapshot);
    }

    fn on_symbol(&mut self, trace: &SignalTrace, snapshot: &MachineSnapshot) {
        debug!("{} {}", trace, snapshot);
    }
}
