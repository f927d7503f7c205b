//! Simulation state aggregate
//!
//! Everything a tick reads or writes lives in [`SimulationState`]. The driver
//! owns one behind a lock; presentation only ever sees it through a read guard.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroid::{Asteroid, AsteroidField, AsteroidId, DeletionQueue};
use super::blast::Blasts;
use super::collision::CollisionWarning;
use super::dust::DustField;
use super::input::{Command, Controls};
use super::shield::{Scoreboard, Shield};
use super::ship::Ship;
use super::targeting;
use super::torpedo::TorpedoBay;
use super::windshield::Windshield;
use crate::audio::SoundEffect;
use crate::config::SimConfig;
use crate::consts::*;
use crate::secs_to_ticks;
use crate::settings::Settings;

/// Driver state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Normal tick cadence
    Running,
    /// Clock keeps going, nothing mutates
    Paused,
    /// Terminal
    Ended,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    ShieldDepleted,
    Quit,
}

/// Complete simulation state (deterministic given seed and command stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: SimPhase,
    pub end_reason: Option<EndReason>,
    pub tick_rate: f64,
    pub dt: f64,
    pub wrap_bound: f64,
    pub difficulty: f64,
    /// Ticks simulated so far
    pub ticks: u64,
    pub ship: Ship,
    pub asteroids: AsteroidField,
    pub torpedoes: TorpedoBay,
    pub blasts: Blasts,
    pub windshield: Windshield,
    pub dust: DustField,
    pub shield: Shield,
    pub score: Scoreboard,
    /// Locked target, if it still exists
    pub target: Option<AsteroidId>,
    pub warning: CollisionWarning,
    /// Asteroids seen by the last collision pass
    pub asteroids_on_scanner: usize,
    pub settings: Settings,
    pub controls: Controls,
    /// Unlinks scheduled during the current tick
    #[serde(skip)]
    pub(crate) deletions: DeletionQueue,
    /// Sound effects raised since the driver last drained them
    #[serde(skip)]
    pub(crate) outbox: Vec<SoundEffect>,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: Pcg32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl SimulationState {
    /// Build the world for a run
    pub fn new(config: &SimConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);

        let asteroids =
            AsteroidField::generate(&mut rng, config.num_asteroids, config.generation_bound);
        let dust = DustField::generate(&mut rng, config.wrap_bound);
        let windshield = Windshield::new(&mut rng, 0.0);

        let mut settings = Settings {
            tracers: config.tracers,
            ..Settings::default()
        };
        for feature in config.disabled() {
            if settings.is_enabled(feature) {
                settings.toggle(feature);
            }
        }

        log::info!(
            "Created field of {} asteroids (seed {}, {} ticks/sec)",
            asteroids.len(),
            seed,
            config.tick_rate
        );

        Self {
            seed,
            phase: SimPhase::Running,
            end_reason: None,
            tick_rate: config.tick_rate,
            dt: config.dt(),
            wrap_bound: config.wrap_bound,
            difficulty: config.difficulty_multiplier(),
            ticks: 0,
            ship: Ship::default(),
            asteroids,
            torpedoes: TorpedoBay::default(),
            blasts: Blasts::default(),
            windshield,
            dust,
            shield: Shield::default(),
            score: Scoreboard::default(),
            target: None,
            warning: CollisionWarning::default(),
            asteroids_on_scanner: 0,
            settings,
            controls: Controls::default(),
            deletions: DeletionQueue::default(),
            outbox: Vec::new(),
            rng,
        }
    }

    /// Simulation time in seconds
    #[inline]
    pub fn secs(&self) -> f64 {
        self.ticks as f64 / self.tick_rate
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.phase == SimPhase::Ended
    }

    /// The locked target, if it has not been destroyed
    pub fn targeted(&self) -> Option<&Asteroid> {
        self.target.and_then(|id| self.asteroids.resolve(id))
    }

    /// Apply one input command. Gameplay commands are dropped while paused,
    /// and everything is dropped once the run has ended.
    pub fn apply(&mut self, command: Command) {
        match self.phase {
            SimPhase::Ended => return,
            SimPhase::Paused if !command.applies_while_paused() => {
                log::trace!("Ignoring {:?} while paused", command);
                return;
            }
            _ => {}
        }

        match command {
            Command::Thrust { axis, amount } => self.ship.slide(axis, amount),
            Command::Rotate { axis, degrees } => self.ship.turn(axis, degrees),
            Command::KeyRotate { axis, direction } => self.controls.press(axis, direction),
            Command::Steer { pitch, yaw } => self.controls.steer(pitch, yaw),
            Command::Stop => self.ship.stop(),
            Command::FireTorpedo => self.fire_torpedo(),
            Command::TargetAhead => self.target_ahead(),
            Command::AutoTarget => self.auto_target(),
            Command::Pause => self.set_paused(true),
            Command::Resume => self.set_paused(false),
            Command::TogglePause => self.set_paused(self.phase == SimPhase::Running),
            Command::Quit => self.end(EndReason::Quit),
            Command::Toggle(feature) => {
                let on = self.settings.toggle(feature);
                log::info!("{} {}", feature.as_str(), if on { "on" } else { "off" });
            }
        }
    }

    fn set_paused(&mut self, paused: bool) {
        let next = if paused { SimPhase::Paused } else { SimPhase::Running };
        if self.phase != next && self.phase != SimPhase::Ended {
            log::info!("{} at tick {}", if paused { "Paused" } else { "Resumed" }, self.ticks);
            self.phase = next;
        }
    }

    /// Enter the terminal state
    pub fn end(&mut self, reason: EndReason) {
        if self.phase == SimPhase::Ended {
            return;
        }
        log::info!("Game over at tick {} ({:?})", self.ticks, reason);
        self.phase = SimPhase::Ended;
        self.end_reason = Some(reason);
    }

    pub fn fire_torpedo(&mut self) {
        let ttl = secs_to_ticks(TORP_TTL, self.tick_rate);
        if self
            .torpedoes
            .fire(&self.ship, self.ticks, ttl, self.settings.tracers)
            .is_some()
        {
            self.outbox.push(SoundEffect::TorpedoFired);
        }
    }

    /// Lock onto whatever is on the boresight, or drop the lock
    pub fn target_ahead(&mut self) {
        self.target = targeting::target_ahead(&self.ship, &self.asteroids);
        if self.target.is_some() {
            self.outbox.push(SoundEffect::TargetAcquired);
        }
    }

    /// Lock onto the smallest asteroid in the field
    pub fn auto_target(&mut self) {
        if let Some(id) = targeting::auto_target(&self.asteroids) {
            self.target = Some(id);
            self.outbox.push(SoundEffect::TargetAcquired);
        }
    }

    /// Take the sound effects raised since the last call
    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.outbox)
    }

    /// End-of-run summary
    pub fn report(&self) -> RunReport {
        RunReport {
            seed: self.seed,
            ticks: self.ticks,
            seconds: self.secs(),
            score: self.score.score,
            display_score: self.score.display_score(self.difficulty),
            destroyed: self.score.destroyed,
            shield: self.shield.strength,
            asteroids_remaining: self.asteroids.len(),
            end_reason: self.end_reason,
        }
    }
}

/// Summary printed when a run finishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub ticks: u64,
    pub seconds: f64,
    pub score: u64,
    pub display_score: u64,
    pub destroyed: u64,
    pub shield: f64,
    pub asteroids_remaining: usize,
    pub end_reason: Option<EndReason>,
}
