//! Echo Resonance headless runner
//!
//! Plays the built-in levels with a scripted input sequence and logs what
//! happens. Useful for eyeballing tuning changes without a renderer.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use echo_resonance::consts::TICKS_PER_SECOND;
use echo_resonance::sim::{LevelStatus, TickEvent, TickInput};
use echo_resonance::{GameSession, Tuning};

/// Default run length: two minutes of game time
const DEFAULT_TICKS: u64 = 120 * TICKS_PER_SECOND as u64;

#[derive(Parser)]
#[command(name = "echo-resonance")]
#[command(about = "Play the built-in levels headless with scripted input")]
struct Cli {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,
    /// JSON file with tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Print the final snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

/// Walk right, hopping every 45 ticks
fn scripted_input(t: u64) -> TickInput {
    TickInput {
        right: true,
        jump: t % 45 == 0,
        ..Default::default()
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let tuning = match &cli.tuning {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };
    let mut session = GameSession::with_builtin_levels(tuning);
    session.start_level(1)?;

    for t in 0..cli.ticks {
        let report = session.step(&scripted_input(t))?;
        for event in &report.events {
            match event {
                TickEvent::Mechanism(inner) => log::debug!("[{t}] {inner:?}"),
                other => log::info!("[{t}] {other:?}"),
            }
        }

        let complete = session.current().is_some_and(|s| s.status == LevelStatus::Complete);
        if complete {
            match session.next_level_id() {
                Some(next) => {
                    session.start_level(next)?;
                }
                None => {
                    log::info!("All levels complete after {} ticks", t + 1);
                    break;
                }
            }
        }
    }

    if let Some(state) = session.current() {
        log::info!(
            "Stopped in level {} at tick {} ({} crystals, {} echoes)",
            state.level_id,
            state.time_ticks,
            state.collected,
            state.echoes().len()
        );
        if cli.snapshot {
            println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Echo Resonance (headless) starting...");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
