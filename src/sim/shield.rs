//! Shield and score bookkeeping

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::secs_to_ticks;

/// Ship shield. Strength below zero ends the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub strength: f64,
    /// Tick until which the shield flash is shown
    pub flash_until: u64,
    /// Tick until which the HUD gauges flicker
    pub flicker_until: u64,
}

impl Default for Shield {
    fn default() -> Self {
        Self {
            strength: MAX_SHIELD,
            flash_until: 0,
            flicker_until: 0,
        }
    }
}

impl Shield {
    #[inline]
    pub fn absorb(&mut self, amount: f64) {
        self.strength -= amount;
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.strength < 0.0
    }

    /// Regenerate toward full. Returns false once the shield is depleted,
    /// in which case nothing is regenerated.
    pub fn regenerate(&mut self, dt: f64) -> bool {
        if self.is_depleted() {
            return false;
        }
        if self.strength < MAX_SHIELD {
            self.strength += SHIELD_REGEN_PER_SEC * dt;
        }
        self.strength = self.strength.min(MAX_SHIELD);
        true
    }

    /// Start the shield flash and a random-length HUD flicker
    pub fn on_impact<R: Rng + ?Sized>(&mut self, rng: &mut R, now: u64, tps: f64) {
        self.flash_until = now + secs_to_ticks(SHIELD_FLASH_TTL, tps);
        let flicker = MAX_HUD_FLICKER_TTL * tps * rng.random_range(0.0..=1.0);
        self.flicker_until = now + flicker as u64;
    }

    #[inline]
    pub fn is_flashing(&self, now: u64) -> bool {
        now < self.flash_until
    }

    #[inline]
    pub fn is_flickering(&self, now: u64) -> bool {
        now < self.flicker_until
    }

    /// Strength as a fraction of full
    pub fn fraction(&self) -> f64 {
        (self.strength / MAX_SHIELD).clamp(0.0, 1.0)
    }
}

/// Destroyed-asteroid tally
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub destroyed: u64,
}

impl Scoreboard {
    pub fn record_kill(&mut self) {
        self.score += 1;
        self.destroyed += 1;
    }

    /// Score scaled by the difficulty multiplier
    pub fn display_score(&self, multiplier: f64) -> u64 {
        (self.score as f64 * multiplier.max(0.0)) as u64
    }
}
