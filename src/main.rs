//! Asteroid Drift headless runner
//!
//! Starts the simulation thread, flies it with the autopilot, and prints the
//! run report as JSON when the run ends.
//!
//! Usage: `asteroid-drift [config.json]`

use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};

use asteroid_drift::audio::{self, LoggingAudio};
use asteroid_drift::autopilot::Autopilot;
use asteroid_drift::frame::Frame;
use asteroid_drift::interval::Interval;
use asteroid_drift::sim::SimulationState;
use asteroid_drift::{SimConfig, Simulation};

/// Presentation refresh rate
const FRAME_RATE: f64 = 30.0;
/// How often the HUD line is logged
const HUD_LOG_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(&path).with_context(|| format!("loading config {path}"))?,
        None => SimConfig::default(),
    };
    log::debug!("Config: {:?}", config);

    let sim = Simulation::start(SimulationState::new(&config))
        .context("spawning simulation thread")?;
    let view = sim.view();
    let commands = sim.commands();

    let mut pilot = Autopilot::new();
    let mut speaker = LoggingAudio::new();
    speaker.set_master_volume(config.master_volume);
    let mut frames = Interval::per_second(FRAME_RATE);

    let started = Instant::now();
    let deadline = started + Duration::from_secs_f64(config.demo_seconds);
    let mut next_hud = started;

    while !view.is_ended() && !sim.is_finished() {
        frames.step();

        let frame = Frame::capture(&view);
        speaker.set_muted(!frame.settings.sound);
        let now = Instant::now();
        if now >= next_hud {
            log::info!("{}", frame.hud.status_line());
            log::debug!(
                "Drawing {} asteroids, {} torpedoes, {} trails, {} blasts, {} debris",
                frame.asteroids.len(),
                frame.torpedoes.len(),
                frame.trails.len(),
                frame.blasts.len(),
                frame.debris.len()
            );
            next_hud = now + HUD_LOG_INTERVAL;
        }

        let plan = pilot.plan(&view.read());
        commands.send_all(plan);
        audio::drain(sim.sounds(), &mut speaker);

        if now >= deadline {
            log::info!("Demo time of {:.0}s elapsed", config.demo_seconds);
            commands.quit();
            break;
        }
    }

    audio::drain(sim.sounds(), &mut speaker);
    let report = sim
        .join()
        .map_err(|_| anyhow!("simulation thread panicked"))?;
    log::info!("Played {} sound effects", speaker.played());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
