//! errsim - Step-by-step error detection and correction simulator
//!
//! Sends a binary message through an encoder, a noisy channel, and the
//! matching detector and corrector, narrating every step.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};

use errsim_codecs::prelude::*;
use errsim_core::BitString;
use errsim_sim::prelude::*;
use errsim_tools::{GlobalOpts, RunConfig, Runner, StepReporter};

/// errsim error-control simulator
#[derive(Parser)]
#[command(name = "errsim")]
#[command(about = "Simulate error detection and correction over a noisy channel")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one full simulation
    Run(RunArgs),
    /// Encode a message and print the code word
    Encode(CodeArgs),
    /// Check a received word for errors and try to correct it
    Check(CodeArgs),
    /// List the available methods
    Methods {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Error-control method
#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Parity,
    Checksum,
    Hamming,
    Crc,
    Repetition,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Parity => Method::Parity,
            MethodArg::Checksum => Method::Checksum,
            MethodArg::Hamming => Method::Hamming,
            MethodArg::Crc => Method::Crc,
            MethodArg::Repetition => Method::Repetition,
        }
    }
}

#[derive(Parser)]
struct RunArgs {
    /// Binary message to send
    #[arg(short, long)]
    message: Option<String>,

    /// Error-control method
    #[arg(long, value_enum)]
    method: Option<MethodArg>,

    /// Seed for the noisy channel
    #[arg(long)]
    seed: Option<u64>,

    /// Flip this code word index instead of random noise (repeatable)
    #[arg(long = "flip", value_name = "INDEX")]
    flips: Vec<usize>,

    /// Delay between paced steps in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Advance automatically after each delay
    #[arg(long)]
    auto: bool,

    /// Print one JSON object per step
    #[arg(long)]
    json: bool,

    /// Load settings from a TOML or JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to a TOML file
    #[arg(long, value_name = "PATH")]
    save_config: Option<PathBuf>,
}

impl RunArgs {
    /// File settings overridden by command-line flags
    fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(message) = &self.message {
            config.message = message.clone();
        }
        if let Some(method) = self.method {
            config.method = method.into();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if !self.flips.is_empty() {
            config.flips = Some(self.flips.clone());
        }
        if let Some(delay) = self.delay_ms {
            config.simulation.step_delay_ms = delay;
        }
        if self.auto {
            config.simulation.auto_advance = true;
        }

        config
            .simulation
            .validate()
            .context("Invalid simulation settings")?;
        Ok(config)
    }
}

#[derive(Parser)]
struct CodeArgs {
    /// Error-control method
    #[arg(long, value_enum, default_value = "parity")]
    method: MethodArg,

    /// Bits to process
    bits: String,
}

impl CodeArgs {
    fn parse(&self) -> Result<(Method, BitString)> {
        let bits = BitString::parse(&self.bits)
            .with_context(|| format!("Invalid bit string: {:?}", self.bits))?;
        Ok((self.method.into(), bits))
    }
}

fn run_simulation(args: &RunArgs) -> Result<()> {
    let config = args.resolve()?;
    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        info!("Saved settings to {:?}", path);
    }

    let channel: Box<dyn Channel> = match (&config.flips, config.seed) {
        (Some(flips), _) => Box::new(ScriptedChannel::new(vec![flips.clone()])),
        (None, Some(seed)) => Box::new(NoisyChannel::with_seed(seed)),
        (None, None) => Box::new(NoisyChannel::from_entropy()),
    };
    let engine = SimulationEngine::with_parts(
        config.simulation.clone(),
        channel,
        Box::new(SystemClock::new()),
    )?;

    let reporter = StepReporter::new(std::io::stdout().lock(), args.json);
    let mut runner = Runner::new(engine, reporter);
    let state = runner.run(&config.message, config.method)?;

    if let Some(outcome) = state.outcome() {
        info!(%outcome, "simulation finished");
    }
    Ok(())
}

fn encode(args: &CodeArgs) -> Result<()> {
    let (method, message) = args.parse()?;
    let code = method.code();
    let encoded = code.encode(&message);
    debug!(%message, %encoded, "encoded");

    println!("{}", encoded);
    eprintln!(
        "{}: {} -> {} bits (rate {:.3})",
        method.display_name(),
        message.len(),
        encoded.len(),
        code.code_rate(message.len())
    );
    Ok(())
}

fn check(args: &CodeArgs) -> Result<()> {
    let (method, received) = args.parse()?;
    let code = method.code();

    let detection = code
        .detect(&received)
        .with_context(|| format!("{} cannot inspect {}", method.display_name(), received))?;
    println!("detection: {}", serde_json::to_string(&detection.details)?);

    if !detection.error_found {
        println!("no error detected");
        println!("data: {}", code.extract_data(&received)?);
        return Ok(());
    }

    println!("error detected");
    match code.correct(&received)? {
        Correction::Corrected { output, data } => {
            println!("corrected: {}", output);
            println!("data: {}", data);
        }
        Correction::Unlocatable { syndrome } => {
            println!("syndrome {} lies outside the word; retransmission required", syndrome);
        }
        Correction::Unsupported => {
            println!("{} cannot correct; retransmission required", method.display_name());
        }
    }
    Ok(())
}

fn show_methods(json: bool) -> Result<()> {
    let registry = MethodRegistry::new();
    if json {
        println!("{}", registry.export_json()?);
        return Ok(());
    }

    println!("\n=== Error-Control Methods ===");
    for info in registry.list() {
        let mode = if info.can_correct { "detect + correct" } else { "detect" };
        println!("  • {:<10} {} ({})", info.id, info.name, mode);
        println!("      {}", info.description);
        println!("      redundancy: {}", info.redundancy);
    }

    println!("\n=== Code Word Length for a 4-bit Message ===");
    for (method, len) in registry.encoded_lengths(4) {
        println!("  • {:<10} {}", method.id(), len);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.global.init_logging()?;

    info!("errsim starting");

    match &cli.command {
        Commands::Run(args) => run_simulation(args)?,
        Commands::Encode(args) => encode(args)?,
        Commands::Check(args) => check(args)?,
        Commands::Methods { json } => show_methods(*json)?,
    }

    Ok(())
}
