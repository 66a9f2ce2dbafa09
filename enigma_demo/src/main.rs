use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use enigma_core::{
    ConfigOverride, EngineConfig, EnigmaEngine, LogObserver, WiringRegistry, letter_from_symbol,
};
use env_logger::Env;
use log::{LevelFilter, debug, info};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "enigma",
    author,
    version,
    about = "Rotor cipher machine simulator"
)]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    /// JSON settings document; missing fields keep their defaults.
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,
    /// Rotor names left to right, e.g. `I,II,III`.
    #[arg(long, global = true, value_delimiter = ',')]
    rotors: Option<Vec<String>>,
    #[arg(long, global = true)]
    reflector: Option<String>,
    /// Starting window letters, e.g. `MCK`.
    #[arg(long, global = true)]
    position: Option<String>,
    #[arg(long, global = true)]
    rings: Option<String>,
    /// Plugboard pairs, e.g. `"AV BS CG"`.
    #[arg(long, global = true)]
    plugs: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode (or, with the same settings, decode) a message.
    Encode {
        #[arg(long, value_name = "TEXT")]
        message: Option<String>,
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Log the signal path of every letter at debug level.
        #[arg(long)]
        trace: bool,
    },
    /// Print the machine settings.
    Describe {
        #[arg(long)]
        json: bool,
    },
    /// Encode, reset to the starting positions and decode again.
    Roundtrip {
        #[arg(long, value_name = "TEXT")]
        message: String,
    },
    /// List the registered rotor and reflector wirings.
    Wirings,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let trace = matches!(cli.command, Commands::Encode { trace: true, .. });
    init_logging(cli.debug || trace);
    let config = resolve_config(&cli)?;
    debug!("resolved settings {:?}", config);
    match cli.command {
        Commands::Encode {
            message,
            input,
            out,
            trace,
        } => cmd_encode(config, message, input, out, trace),
        Commands::Describe { json } => cmd_describe(config, json),
        Commands::Roundtrip { message } => cmd_roundtrip(config, &message),
        Commands::Wirings => cmd_wirings(),
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

/// Defaults, then the settings file, then individual flags.
fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => EngineConfig::default(),
    };
    config.apply(&ConfigOverride {
        rotors: cli.rotors.clone(),
        reflector: cli.reflector.clone(),
        positions: cli.position.clone(),
        rings: cli.rings.clone(),
        plugs: cli.plugs.clone(),
    });
    Ok(config)
}

fn load_settings(path: &Path) -> Result<EngineConfig> {
    let data =
        fs::read(path).with_context(|| format!("reading settings from {}", path.display()))?;
    let config = serde_json::from_slice(&data)
        .with_context(|| format!("parsing settings from {}", path.display()))?;
    Ok(config)
}

fn build_engine(config: EngineConfig) -> Result<EnigmaEngine> {
    let engine = EnigmaEngine::new(config).context("building machine")?;
    for warning in engine.warnings() {
        info!("settings accepted with warning: {}", warning);
    }
    Ok(engine)
}

fn resolve_message(message: Option<String>, input: Option<PathBuf>) -> Result<String> {
    match (message, input) {
        (Some(text), None) => Ok(text),
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("reading message from {}", path.display())),
        (Some(_), Some(_)) => bail!("Provide either --message or --input, not both."),
        (None, None) => bail!("Provide --message TEXT or --input FILE for data to encode."),
    }
}

fn cmd_encode(
    config: EngineConfig,
    message: Option<String>,
    input: Option<PathBuf>,
    out: Option<PathBuf>,
    trace: bool,
) -> Result<()> {
    let text = resolve_message(message, input)?;
    let mut engine = build_engine(config)?;
    if trace {
        engine.set_observer(LogObserver);
    }
    let encoded = engine.encode(&text);
    debug!("final state {}", engine.snapshot());
    match out {
        Some(path) => {
            fs::write(&path, &encoded)
                .with_context(|| format!("writing output to {}", path.display()))?;
            println!(
                "Encoded {} characters and wrote them to {}",
                encoded.chars().count(),
                path.display()
            );
        }
        None => println!("{}", encoded),
    }
    Ok(())
}

fn cmd_describe(config: EngineConfig, json: bool) -> Result<()> {
    let engine = build_engine(config)?;
    if json {
        let document = json!({
            "settings": engine.config(),
            "state": engine.snapshot(),
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!("{}", engine.snapshot());
    }
    Ok(())
}

fn cmd_roundtrip(config: EngineConfig, message: &str) -> Result<()> {
    let mut engine = build_engine(config)?;
    println!("Start:   {}", engine.snapshot());
    let cipher = engine.encode(message);
    println!("Cipher:  {}", cipher);
    println!("After:   {}", engine.snapshot());
    engine.reset();
    let plain = engine.encode(&cipher);
    println!("Decoded: {}", plain);
    if plain != message.to_ascii_uppercase() {
        bail!("round trip mismatch: '{}' came back as '{}'", message, plain);
    }
    Ok(())
}

fn cmd_wirings() -> Result<()> {
    let registry = WiringRegistry::global();
    println!("Rotors:");
    for spec in registry.rotors() {
        let wires: String = (0..26).map(|i| letter_from_symbol(spec.target(i))).collect();
        let notch = spec.notch().map(letter_from_symbol).unwrap_or('-');
        println!("  {:<4} {} notch {}", spec.name(), wires, notch);
    }
    println!("Reflectors:");
    for spec in registry.reflectors() {
        let wires: String = (0..26).map(|i| letter_from_symbol(spec.target(i))).collect();
        println!("  {:<4} {}", spec.name(), wires);
    }
    Ok(())
}
