//! Asteroid Drift - a first-person 3D asteroid field simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, entity lifecycles)
//! - `driver`: Fixed-rate simulation thread and read-only presentation handles
//! - `config`: Startup configuration
//! - `settings`: Cosmetic feature toggles
//! - `audio`: Sound effect notifications
//! - `frame`: Per-frame presentation snapshot
//! - `autopilot`: Demo pilot that plays through the command interface

pub mod audio;
pub mod autopilot;
pub mod config;
pub mod driver;
pub mod error;
pub mod frame;
pub mod interval;
pub mod settings;
pub mod sim;

pub use config::SimConfig;
pub use driver::{CommandSender, SimView, Simulation};
pub use error::ConfigError;
pub use settings::{Feature, Settings};

/// Simulation configuration constants
pub mod consts {
    /// Nominal ticks per second
    pub const TICKS_PER_SEC: f64 = 60.0;

    /// Asteroid generation cube half-size (asteroids spawn within ±AGB)
    pub const GENERATION_BOUND: f64 = 50.0;
    /// Toroidal wrap half-size, recentered on the ship each tick
    pub const WRAP_BOUND: f64 = 90.0;
    /// Distance inside the opposite boundary a wrapped entity lands at
    pub const WRAP_INSET: f64 = 10.0;

    /// Max asteroid rotation rate (degrees/sec)
    pub const MAX_AST_ROT_RATE: i32 = 180;
    /// Max asteroid speed (units/sec)
    pub const MAX_AST_SPEED: f64 = 20.0;
    pub const NUM_AST_TYPES: usize = 6;
    pub const MIN_AST_MASS: f64 = 5.0;
    pub const AST_MASS_K: f64 = 10.0;
    /// Default starting asteroid count
    pub const NUM_ASTEROIDS: usize = 50;

    /// Ship collision sphere and mass
    pub const SHIP_RADIUS: f64 = 3.0;
    pub const SHIP_MASS: f64 = 1.0;
    /// Thrust realized per second per axis
    pub const MAX_THRUST_PER_SEC: f64 = 25.0;
    /// Thrust requested by one keyboard slide event
    pub const THRUST_INPUT: f64 = 0.5;
    /// Max rotation that can be requested per second (degrees)
    pub const MAX_DPS_INPUT: f64 = 75.0;

    /// Keyboard rotation accumulator (see `sim::input::KeyRotation`)
    pub const KEYB_BASE_ROT_SCALE: f64 = 0.05;
    pub const KEYB_MAX_ROT_SCALE: i32 = 20;
    pub const KEYB_SCALE_DECAY: u32 = 2;
    pub const KEYB_FIRST_PRESS: i32 = 4;

    /// Torpedoes
    pub const MAX_TORPS: usize = 5;
    /// Torpedo lifetime (seconds)
    pub const TORP_TTL: f64 = 1.8;
    pub const TORP_SPEED: f64 = 25.0;
    pub const TORP_RADIUS: f64 = 0.5;
    /// Launch point distance ahead of the ship
    pub const TORP_LAUNCH_OFFSET: f64 = 2.0;
    /// Billboard roll per tick (degrees)
    pub const TORP_BB_ZROT: u32 = 5;

    /// Trails outlive their torpedoes, so there are more of them
    pub const MAX_TORP_TRAILS: usize = MAX_TORPS * 3;
    pub const TORP_TRAIL_LEN: usize = 25;

    /// Explosions last longer than torpedoes, so there are more of them too
    pub const MAX_BLASTS: usize = MAX_TORPS + 10;
    /// Blast lifetime (seconds)
    pub const BLAST_TTL: f64 = 5.0;
    /// Blast expansion rate (units/sec)
    pub const BLAST_EXPANSION_RATE: f64 = 2.0;
    pub const NUM_BLAST_TYPES: usize = 5;

    /// Windshield debris particles
    pub const NUM_WP_PER_BLAST: usize = 10;
    /// Max particle display time (seconds)
    pub const MAX_WP_TTL: f64 = 2.0;
    /// Shield drained per recycled particle
    pub const WP_SHIELD_DRAIN: f64 = 1.0;

    /// Shield
    pub const MAX_SHIELD: f64 = 4000.0;
    pub const SHIELD_REGEN_PER_SEC: f64 = 10.0;
    /// Shield flash after a collision (seconds)
    pub const SHIELD_FLASH_TTL: f64 = 1.0;
    /// Longest HUD flicker after a collision (seconds)
    pub const MAX_HUD_FLICKER_TTL: f64 = 5.0;

    /// Dust clusters
    pub const NUM_DUST_PART: usize = 50;
    pub const NUM_CHILD_DUST_PART: usize = 10;
    pub const CHILD_DUST_PART_DELTA: f64 = 20.0;

    /// Collision warning gauge
    pub const WARNING_RANGE: f64 = 12.0;
    /// Half-angle of the forward cone the gauge ignores (degrees)
    pub const WARNING_FORWARD_CONE: f64 = 50.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Convert a duration in seconds to a tick count at the given rate
#[inline]
pub fn secs_to_ticks(secs: f64, tps: f64) -> u64 {
    (secs * tps) as u64
}
