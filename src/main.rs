//! Collider Ball entry point
//!
//! Headless host: runs the simulation at a fixed rate with a scripted
//! pointer sweep standing in for the window, then prints the final frame.
//!
//! Usage: `collider-ball [CONFIG.json] [--seconds N] [-v]`

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use collider_ball::consts::SIM_DT;
use collider_ball::sim::{Driver, SimState};
use collider_ball::{InputEvent, SimConfig, logging};

/// Host frame rate (the tick rate is independent)
const FRAME_DT: f64 = 1.0 / 60.0;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; built-in defaults when omitted
    config: Option<PathBuf>,

    /// Seconds of host time to simulate
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    if !args.seconds.is_finite() || args.seconds < 0.0 {
        return Err(format!("--seconds must be >= 0, got {}", args.seconds).into());
    }
    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => {
            let config = SimConfig::default();
            config.validate()?;
            config
        }
    };

    let state = SimState::new(&config)?;
    log::info!(
        "Collider Ball (headless) starting: {} balls, {} Hz, seed {}",
        state.balls.len(),
        config.tick_hz,
        state.seed
    );

    let mut driver = Driver::new(state, config.tick_dt());
    log::debug!("Fixed step {:.5}s", driver.step_dt());
    let input = driver.sender();

    let frames = (args.seconds / FRAME_DT).round() as u64;
    let frames_per_second = (1.0 / FRAME_DT).round() as u64;
    let center = config.bounds.center();
    for frame in 0..frames {
        // Steer the collider around a loop through the swarm
        let t = frame as f64 * FRAME_DT;
        let target = center + glam::DVec2::new((t * 0.8).cos(), (t * 1.3).sin()) * center * 0.6;
        let delta = (target - driver.state.collider.pos) * 0.1;
        input.send(InputEvent::PointerMoved {
            dx: delta.x,
            dy: delta.y,
        });

        // Freeze once halfway through, like a space-bar press
        if frame == frames / 2 {
            input.send(InputEvent::Freeze);
        }

        driver.advance(FRAME_DT);

        if frame % frames_per_second == 0 {
            log::debug!(
                "tick {} collider {}",
                driver.state.time_ticks,
                driver.state.collider.readout()
            );
        }
    }

    input.send(InputEvent::Exit);
    driver.advance(SIM_DT);

    let snapshot = driver.snapshot();
    log::info!(
        "Stopped after {} ticks ({:.2}s simulated), collider hits: {}",
        snapshot.tick,
        driver.state.elapsed,
        snapshot
            .total_collisions
            .map_or_else(|| "untracked".to_string(), |n| n.to_string())
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(err) = run(&args) {
        log::error!("{err}");
        process::exit(1);
    }
}
