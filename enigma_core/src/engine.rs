use std::fmt;

use log::debug;

use crate::alphabet::{Symbol, letter_from_symbol, letters, offset, symbol_from_letter};
use crate::error::{EnigmaError, PlugWarning};
use crate::plugboard::Plugboard;
use crate::rotor::{Rotor, RotorStack};
use crate::settings::{ConfigOverride, EngineConfig};
use crate::summary::MachineSnapshot;
use crate::trace::{SignalObserver, SignalTrace};
use crate::wiring::{WiringSpec, lookup_reflector, lookup_rotor};

/// The machine: plugboard, rotor stack and reflector, plus the settings
/// they were built from.
///
/// Encoding is reciprocal. Re-initialize (or [`reset`](Self::reset)) to the
/// starting positions and feed the ciphertext back in to recover the
/// plaintext.
pub struct EnigmaEngine {
    config: EngineConfig,
    start_positions: Vec<Symbol>,
    stack: RotorStack,
    reflector: &'static WiringSpec,
    plugboard: Plugboard,
    warnings: Vec<PlugWarning>,
    observer: Option<Box<dyn SignalObserver + Send>>,
}

/// Everything derived from one `EngineConfig`.
struct Assembly {
    start_positions: Vec<Symbol>,
    stack: RotorStack,
    reflector: &'static WiringSpec,
    plugboard: Plugboard,
    warnings: Vec<PlugWarning>,
}

impl Assembly {
    fn build(config: &EngineConfig) -> Result<Self, EnigmaError> {
        let wirings = config
            .rotors
            .iter()
            .map(|name| lookup_rotor(name))
            .collect::<Result<Vec<_>, _>>()?;
        let reflector = lookup_reflector(&config.reflector)?;
        let start_positions = config.position_symbols()?;
        let rings = config.ring_symbols()?;
        let rotors = wirings
            .into_iter()
            .zip(start_positions.iter().zip(&rings))
            .map(|(wiring, (position, ring))| Rotor::new(wiring, *position, *ring))
            .collect();
        let stack = RotorStack::new(rotors)?;
        let (plugboard, warnings) = Plugboard::configure(&config.plugs);
        Ok(Self {
            start_positions,
            stack,
            reflector,
            plugboard,
            warnings,
        })
    }
}

impl EnigmaEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EnigmaError> {
        let assembly = Assembly::build(&config)?;
        let engine = Self {
            config,
            start_positions: assembly.start_positions,
            stack: assembly.stack,
            reflector: assembly.reflector,
            plugboard: assembly.plugboard,
            warnings: assembly.warnings,
            observer: None,
        };
        debug!("built {}", engine.snapshot());
        Ok(engine)
    }

    pub fn with_observer(mut self, observer: impl SignalObserver + Send + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    pub fn set_observer(&mut self, observer: impl SignalObserver + Send + 'static) {
        let mut observer: Box<dyn SignalObserver + Send> = Box::new(observer);
        observer.on_initialize(&self.snapshot());
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Rebuilds the rotor stack and plugboard from the current settings with
    /// `overrides` applied. The merged settings are kept for later calls.
    /// On error nothing changes.
    pub fn reinitialize(&mut self, overrides: ConfigOverride) -> Result<(), EnigmaError> {
        let config = self.config.merged(&overrides);
        let assembly = Assembly::build(&config)?;
        self.config = config;
        self.start_positions = assembly.start_positions;
        self.stack = assembly.stack;
        self.reflector = assembly.reflector;
        self.plugboard = assembly.plugboard;
        self.warnings = assembly.warnings;
        let snapshot = self.snapshot();
        debug!("reinitialized {}", snapshot);
        if let Some(observer) = self.observer.as_mut() {
            observer.on_initialize(&snapshot);
        }
        Ok(())
    }

    /// Returns the rotors to the configured starting positions.
    pub fn reset(&mut self) {
        self.stack.set_positions(&self.start_positions);
        if let Some(observer) = self.observer.as_mut() {
            observer.on_initialize(&snapshot_of(
                &self.stack,
                self.reflector,
                &self.plugboard,
            ));
        }
    }

    /// Encodes one character. Anything outside `A-Z`/`a-z` comes back
    /// unchanged and does not move the rotors.
    pub fn encode_symbol(&mut self, ch: char) -> char {
        let Some(input) = symbol_from_letter(ch) else {
            return ch;
        };
        self.stack.step();
        let path = self.signal_path(input);
        let output = letter_from_symbol(path[path.len() - 1]);
        if let Some(observer) = self.observer.as_mut() {
            let trace = SignalTrace {
                input: ch,
                output,
                path,
            };
            let snapshot = snapshot_of(&self.stack, self.reflector, &self.plugboard);
            observer.on_symbol(&trace, &snapshot);
        }
        output
    }

    pub fn encode(&mut self, text: &str) -> String {
        text.chars().map(|ch| self.encode_symbol(ch)).collect()
    }

    fn signal_path(&self, input: Symbol) -> Vec<Symbol> {
        let mut path = Vec::with_capacity(2 * self.stack.len() + 4);
        path.push(input);
        let mut symbol = self.plugboard.swap(input);
        path.push(symbol);
        for rotor in self.stack.rotors().iter().rev() {
            symbol = rotor.inbound(symbol);
            path.push(symbol);
        }
        symbol = offset(symbol, self.reflector.forward_offset(symbol) as i32);
        path.push(symbol);
        for rotor in self.stack.rotors() {
            symbol = rotor.outbound(symbol);
            path.push(symbol);
        }
        symbol = self.plugboard.swap(symbol);
        path.push(symbol);
        path
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn positions(&self) -> Vec<Symbol> {
        self.stack.positions()
    }

    pub fn position_letters(&self) -> String {
        letters(&self.stack.positions())
    }

    pub fn start_positions(&self) -> &[Symbol] {
        &self.start_positions
    }

    pub fn ring_settings(&self) -> Vec<Symbol> {
        self.stack.ring_settings()
    }

    pub fn rotor_stack(&self) -> &RotorStack {
        &self.stack
    }

    pub fn reflector(&self) -> &'static WiringSpec {
        self.reflector
    }

    pub fn plugboard(&self) -> &Plugboard {
        &self.plugboard
    }

    /// Plugboard warnings raised by the most recent (re)initialization.
    pub fn warnings(&self) -> &[PlugWarning] {
        &self.warnings
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        snapshot_of(&self.stack, self.reflector, &self.plugboard)
    }
}

fn snapshot_of(
    stack: &RotorStack,
    reflector: &'static WiringSpec,
    plugboard: &Plugboard,
) -> MachineSnapshot {
    MachineSnapshot {
        rotors: stack.rotors().iter().map(Rotor::name).collect(),
        reflector: reflector.name(),
        positions: stack.positions(),
        rings: stack.ring_settings(),
        plug_pairs: plugboard.pairs(),
    }
}

impl fmt::Debug for EnigmaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnigmaEngine")
            .field("config", &self.config)
            .field("positions", &self.position_letters())
            .field("warnings", &self.warnings)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    fn machine(positions: &str) -> EnigmaEngine {
        EnigmaEngine::new(EngineConfig::default().with_positions(positions)).unwrap()
    }

    #[test]
    fn single_letter_reference_vector() {
        let mut engine = machine("AAA");
        assert_eq!(engine.encode("A"), "B");
        assert_eq!(engine.position_letters(), "AAB");
    }

    #[test]
    fn five_letter_reference_vector() {
        let mut engine = machine("AAA");
        assert_eq!(engine.encode("AAAAA"), "BDZGO");
    }

    #[test]
    fn lower_case_is_encoded_as_upper_case() {
        let mut upper = machine("AAA");
        let mut lower = machine("AAA");
        assert_eq!(upper.encode("HELLO"), lower.encode("hello"));
    }

    #[test]
    fn non_letters_pass_through_without_stepping() {
        let mut engine = machine("AAA");
        assert_eq!(engine.encode(" ,1!"), " ,1!");
        assert_eq!(engine.position_letters(), "AAA");
        assert_eq!(engine.encode("Hello, World! 123"), "ILBDA, AMTAZ! 123");
        assert_eq!(engine.position_letters(), "AAK");
    }

    #[test]
    fn reset_then_decode_recovers_plaintext() {
        let mut engine = EnigmaEngine::new(EngineConfig::default().with_plugs("AB CD EF")).unwrap();
        let cipher = engine.encode("ATTACK AT DAWN");
        engine.reset();
        assert_eq!(engine.encode(&cipher), "ATTACK AT DAWN");
    }

    #[test]
    fn reinitialize_restores_start_positions() {
        let mut engine = machine("QEV");
        let start = engine.positions();
        engine.encode("SOME TRAFFIC TO MOVE THE ROTORS ALONG");
        assert_ne!(engine.positions(), start);
        engine.reinitialize(ConfigOverride::default()).unwrap();
        assert_eq!(engine.positions(), start);
    }

    #[test]
    fn reinitialize_keeps_merged_settings() {
        let mut engine = machine("AAA");
        engine
            .reinitialize(ConfigOverride {
                reflector: Some("C".into()),
                ..ConfigOverride::default()
            })
            .unwrap();
        assert_eq!(engine.encode("AAAAA"), "PJBUZ");
        engine.reinitialize(ConfigOverride::positions("AAA")).unwrap();
        assert_eq!(engine.config().reflector, "C");
        assert_eq!(engine.encode("AAAAA"), "PJBUZ");
    }

    #[test]
    fn failed_reinitialize_leaves_engine_untouched() {
        let mut engine = machine("AAA");
        engine.encode("AB");
        let err = engine
            .reinitialize(ConfigOverride {
                rotors: Some(vec!["I".into(), "IX".into(), "III".into()]),
                ..ConfigOverride::default()
            })
            .unwrap_err();
        assert!(matches!(err, EnigmaError::UnknownWiringName { .. }));
        assert_eq!(engine.position_letters(), "AAC");
        assert_eq!(engine.config().rotors, vec!["I", "II", "III"]);
    }

    #[test]
    fn unknown_names_fail_construction() {
        let err = EnigmaEngine::new(EngineConfig::default().with_reflector("A")).unwrap_err();
        assert_eq!(err.to_string(), "unknown reflector wiring 'A'");
        assert!(EnigmaEngine::new(EngineConfig::default().with_rotors(["I", "II", "VI"])).is_err());
    }

    #[test]
    fn mismatched_slot_counts_fail_construction() {
        let config = EngineConfig::default().with_rotors(["I", "II", "III", "IV"]);
        assert!(matches!(
            EnigmaEngine::new(config),
            Err(EnigmaError::SlotCountMismatch {
                field: "positions",
                ..
            })
        ));
        let empty = EngineConfig::default()
            .with_rotors(Vec::<String>::new())
            .with_positions("")
            .with_rings("");
        assert_eq!(EnigmaEngine::new(empty).unwrap_err(), EnigmaError::EmptyRotorStack);
    }

    #[test]
    fn plug_warnings_are_kept_but_not_fatal() {
        let mut engine = EnigmaEngine::new(
            EngineConfig::default()
                .with_positions("AAA")
                .with_plugs("AB AC D"),
        )
        .unwrap();
        assert_eq!(
            engine.warnings(),
            &[
                PlugWarning::InvalidPlugConfiguration {
                    letters: 5,
                    dangling: 'D',
                },
                PlugWarning::DuplicatePlugAssignment { symbol: 'A' },
            ]
        );
        assert_eq!(engine.encode("AAAAA"), "QREBN");
        engine
            .reinitialize(ConfigOverride {
                plugs: Some(String::new()),
                ..ConfigOverride::default()
            })
            .unwrap();
        assert!(engine.warnings().is_empty());
    }

    #[test]
    fn ring_settings_shift_the_wiring() {
        let mut engine =
            EnigmaEngine::new(EngineConfig::default().with_positions("AAA").with_rings("BBB"))
                .unwrap();
        assert_eq!(engine.encode("AAAAA"), "EWTYX");
        assert_eq!(engine.ring_settings(), vec![1, 1, 1]);
    }

    #[test]
    fn observer_sees_every_letter_and_nothing_else() {
        let traces = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&traces);
        let mut engine = machine("AAA").with_observer(
            move |trace: &SignalTrace, snapshot: &MachineSnapshot| {
                sink.lock()
                    .unwrap()
                    .push(format!("{} {}", trace, snapshot));
            },
        );
        let traced = engine.encode("A-A");
        let mut plain = machine("AAA");
        assert_eq!(traced, plain.encode("A-A"));
        let traces = traces.lock().unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(
            traces[0],
            "A->A->C->D->F->S->S->E->B->B Enigma Rotors: I-II-III Position: AAB"
        );
    }

    #[test]
    fn observer_is_told_about_initialization() {
        struct Counter(Arc<Mutex<usize>>);
        impl SignalObserver for Counter {
            fn on_initialize(&mut self, _snapshot: &MachineSnapshot) {
                *self.0.lock().unwrap() += 1;
            }
            fn on_symbol(&mut self, _trace: &SignalTrace, _snapshot: &MachineSnapshot) {}
        }
        let count = Arc::new(Mutex::new(0));
        let mut engine = machine("AAA").with_observer(Counter(Arc::clone(&count)));
        engine.reinitialize(ConfigOverride::default()).unwrap();
        engine.reset();
        assert_eq!(*count.lock().unwrap(), 3);
        engine.clear_observer();
        engine.reset();
        assert_eq!(*count.lock().unwrap(), 3);
    }

    #[test]
    fn snapshot_reports_live_state() {
        let mut engine = EnigmaEngine::new(
            EngineConfig::default()
                .with_positions("AAA")
                .with_plugs("AB CD EF"),
        )
        .unwrap();
        engine.encode("HELLOWORLD");
        assert_eq!(
            engine.snapshot().to_string(),
            "Enigma Rotors: I-II-III Position: AAK Plugboard: AB CD EF"
        );
        assert_eq!(engine.start_positions(), &[0, 0, 0]);
    }

    proptest! {
        #[test]
        fn encoding_is_reciprocal(
            text in "[A-Z]{0,64}",
            positions in "[A-Z]{3}",
            rings in "[A-Z]{3}",
            plugs in "[A-Z]{0,20}",
            reflector in prop::sample::select(vec!["B", "C"]),
        ) {
            let config = EngineConfig::default()
                .with_reflector(reflector)
                .with_positions(positions)
                .with_rings(rings)
                .with_plugs(plugs);
            let mut engine = EnigmaEngine::new(config).unwrap();
            let cipher = engine.encode(&text);
            engine.reset();
            prop_assert_eq!(engine.encode(&cipher), text);
        }

        #[test]
        fn no_letter_maps_to_itself(text in "[A-Z]{1,32}", positions in "[A-Z]{3}") {
            let mut engine = machine(&positions);
            let cipher = engine.encode(&text);
            for (plain, coded) in text.chars().zip(cipher.chars()) {
                prop_assert_ne!(plain, coded);
            }
        }

        #[test]
        fn non_letters_keep_their_place(text in "[A-Za-z0-9 .,!?]{0,48}") {
            let mut engine = machine("AAA");
            let letters = text.chars().filter(char::is_ascii_alphabetic).count();
            let cipher = engine.encode(&text);
            prop_assert_eq!(cipher.chars().count(), text.chars().count());
            for (plain, coded) in text.chars().zip(cipher.chars()) {
                if !plain.is_ascii_alphabetic() {
                    prop_assert_eq!(plain, coded);
                }
            }
            let mut stepped = machine("AAA");
            for _ in 0..letters {
                stepped.stack.step();
            }
            prop_assert_eq!(engine.positions(), stepped.positions());
        }
    }
}
