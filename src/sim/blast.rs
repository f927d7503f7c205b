//! Explosions
//!
//! Blasts outlive the torpedoes that cause them, so the pool is larger than
//! the torpedo pool. A blast expanding over the ship pelts the windshield.

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Visual variant of an explosion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlastKind {
    #[default]
    Spark,
    Plume,
    Shell,
    Cloud,
    Nova,
}

impl BlastKind {
    pub const ALL: [BlastKind; NUM_BLAST_TYPES] = [
        BlastKind::Spark,
        BlastKind::Plume,
        BlastKind::Shell,
        BlastKind::Cloud,
        BlastKind::Nova,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..NUM_BLAST_TYPES)]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blast {
    pub active: bool,
    pub pos: DVec3,
    /// Radius proxy, grows linearly while active
    pub scalar: f64,
    /// Absolute tick deadline
    pub ttl: u64,
    pub kind: BlastKind,
}

impl Default for Blast {
    fn default() -> Self {
        Self {
            active: false,
            pos: DVec3::ZERO,
            scalar: 1.0,
            ttl: 0,
            kind: BlastKind::default(),
        }
    }
}

/// Fixed pool of explosions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blasts {
    pub slots: [Blast; MAX_BLASTS],
    /// Fast path flag: false when no slot is active
    pub any_active: bool,
    /// Blasts whose radius covered the ship this tick
    pub windshield_impacts: usize,
}

impl Blasts {
    /// Start an explosion in the first free slot. Saturation is a silent no-op.
    pub fn ignite<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        pos: DVec3,
        now: u64,
        ttl_ticks: u64,
    ) -> Option<usize> {
        let Some(slot) = self.slots.iter().position(|b| !b.active) else {
            log::debug!("No free blast slot");
            return None;
        };
        self.slots[slot] = Blast {
            active: true,
            pos,
            scalar: 1.0,
            ttl: now + ttl_ticks,
            kind: BlastKind::random(rng),
        };
        self.any_active = true;
        Some(slot)
    }

    /// Expand active blasts, tally windshield impacts, and expire old ones
    pub fn advance(&mut self, dt: f64, now: u64, ship_pos: DVec3) {
        self.windshield_impacts = 0;
        if !self.any_active {
            return;
        }

        let mut active = 0;
        for blast in self.slots.iter_mut().filter(|b| b.active) {
            active += 1;
            blast.scalar += dt * BLAST_EXPANSION_RATE;
            if ship_pos.distance(blast.pos) <= blast.scalar {
                self.windshield_impacts += 1;
            }
            if now >= blast.ttl {
                blast.active = false;
            }
        }

        if active == 0 {
            self.any_active = false;
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &Blast> + '_ {
        self.slots.iter().filter(|b| b.active)
    }
}
