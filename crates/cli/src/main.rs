#![deny(unsafe_code)]
//! CLI binary for the storyline-fx effect system.
//!
//! Subcommands:
//! - `render <effect>` — trigger an effect, advance it, write a PNG
//! - `run <effect>` — trigger an effect and drive it to settlement
//! - `list` — print available effects

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;
use std::process;
use storyline_fx_core::{Cue, Effect, Flow};
use storyline_fx_effects::EffectKind;

#[derive(Parser)]
#[command(name = "storyline-fx", about = "Storyline effect engine CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Trigger an effect, advance it N ticks, and write a PNG snapshot.
    Render {
        /// Effect name (e.g. "shatter").
        effect: String,

        /// Viewport width in CSS pixels.
        #[arg(short = 'W', long, default_value_t = 800.0)]
        width: f64,

        /// Viewport height in CSS pixels.
        #[arg(short = 'H', long, default_value_t = 600.0)]
        height: f64,

        /// Number of ticks to advance (stops early on settle).
        #[arg(short, long, default_value_t = 30)]
        ticks: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Effect parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Trigger an effect and tick until it settles or the cap is hit.
    Run {
        /// Effect name (e.g. "countdown").
        effect: String,

        /// Viewport width in CSS pixels.
        #[arg(short = 'W', long, default_value_t = 800.0)]
        width: f64,

        /// Viewport height in CSS pixels.
        #[arg(short = 'H', long, default_value_t = 600.0)]
        height: f64,

        /// Tick cap for effects that settle slowly or never.
        #[arg(long, default_value_t = 600)]
        max_ticks: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Effect parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List available effects.
    List,
}

/// Builds the validated cue an invocation describes.
fn assemble_cue(
    effect: &str,
    width: f64,
    height: f64,
    seed: u64,
    ticks: usize,
    params: &str,
) -> Result<Cue, CliError> {
    let params: serde_json::Value = serde_json::from_str(params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let mut cue = Cue::new(effect, width, height, seed);
    cue.params = params;
    cue.ticks = ticks;
    cue.validate()?;
    Ok(cue)
}

/// Ticks the effect at most `cap` times, stopping on settle.
///
/// Returns the ticks consumed and whether the effect settled.
fn drive(fx: &mut EffectKind, cap: usize) -> (usize, bool) {
    fx.trigger();
    let mut consumed = 0;
    for _ in 0..cap {
        consumed += 1;
        if fx.tick() == Flow::Settled {
            return (consumed, true);
        }
    }
    (consumed, false)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let effects = EffectKind::list_effects();
            if cli.json {
                let info = serde_json::json!({ "effects": effects });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Effects:");
                for name in effects {
                    println!("  {name}");
                }
            }
        }
        Command::Render {
            effect,
            width,
            height,
            ticks,
            seed,
            output,
            params,
        } => {
            let cue = assemble_cue(&effect, width, height, seed, ticks, &params)?;
            let mut fx = EffectKind::from_cue(&cue)?;
            if fx.surface().is_none() {
                return Err(CliError::Input(format!(
                    "effect '{effect}' draws no surface; use `run` to drive it"
                )));
            }

            let (consumed, settled) = drive(&mut fx, cue.ticks);

            let surface = fx
                .surface()
                .ok_or_else(|| CliError::Input("effect lost its surface".into()))?;
            storyline_fx_effects::snapshot::write_png(surface, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "cue": cue,
                    "ticks": consumed,
                    "settled": settled,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {effect} ({width}x{height}, {consumed} ticks, seed {seed}) -> {}",
                    output.display()
                );
            }
        }
        Command::Run {
            effect,
            width,
            height,
            max_ticks,
            seed,
            params,
        } => {
            let cue = assemble_cue(&effect, width, height, seed, max_ticks, &params)?;
            let mut fx = EffectKind::from_cue(&cue)?;

            let (consumed, settled) = drive(&mut fx, cue.ticks);

            if cli.json {
                let info = serde_json::json!({
                    "effect": effect,
                    "ticks": consumed,
                    "settled": settled,
                    "display": fx.display(),
                    "params": fx.params(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("effect: {effect}");
                println!("ticks: {consumed}");
                println!("settled: {settled}");
                if let Some(display) = fx.display() {
                    println!("display: {display}");
                }
                println!("params: {}", fx.params());
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
