//! Windshield debris
//!
//! A steady-state particle system: particles are never freed, only respawned
//! once their display window closes. Only the first `impacts * NUM_WP_PER_BLAST`
//! particles are live in a given tick, so debris appears only while the ship
//! sits inside an expanding blast.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

pub const NUM_WIND_PARTICLES: usize = MAX_BLASTS * NUM_WP_PER_BLAST;

/// A speck of debris on the windshield plane (z = -1 in view space)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindParticle {
    /// Position on the windshield, each component in [-1, 1]
    pub pos: DVec2,
    pub size: u32,
    /// Display window, in seconds of simulation time
    pub t_start: f64,
    pub t_end: f64,
}

impl WindParticle {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, secs: f64) -> Self {
        let t_start = secs + rng.random_range(0.0..=0.2);
        Self {
            pos: DVec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0)),
            size: 1 + rng.random_range(0..=5),
            t_start,
            t_end: t_start + MAX_WP_TTL * rng.random_range(0.1..=1.0),
        }
    }

    #[inline]
    pub fn is_visible(&self, secs: f64) -> bool {
        secs >= self.t_start && secs <= self.t_end
    }

    /// How far through its display window the particle is, in [0, 1]
    pub fn age(&self, secs: f64) -> f64 {
        let span = self.t_end - self.t_start;
        if span <= 0.0 {
            return 1.0;
        }
        ((secs - self.t_start) / span).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Windshield {
    pub particles: Vec<WindParticle>,
    /// Particles live this tick
    pub live: usize,
}

impl Windshield {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, secs: f64) -> Self {
        Self {
            particles: (0..NUM_WIND_PARTICLES)
                .map(|_| WindParticle::random(rng, secs))
                .collect(),
            live: 0,
        }
    }

    /// Respawn expired live particles. Returns how many were respawned; each
    /// one is a hit on the shield.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, secs: f64, impacts: usize) -> usize {
        self.live = (impacts * NUM_WP_PER_BLAST).min(self.particles.len());
        let mut hits = 0;
        for p in self.particles[..self.live].iter_mut() {
            if p.t_end < secs {
                *p = WindParticle::random(rng, secs);
                hits += 1;
            }
        }
        hits
    }

    /// Live particles currently inside their display window
    pub fn visible(&self, secs: f64) -> impl Iterator<Item = &WindParticle> + '_ {
        self.particles[..self.live]
            .iter()
            .filter(move |p| p.is_visible(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_particle_ranges() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..200 {
            let p = WindParticle::random(&mut rng, 10.0);
            assert!(p.pos.x.abs() <= 1.0 && p.pos.y.abs() <= 1.0);
            assert!((1..=6).contains(&p.size));
            assert!(p.t_start >= 10.0 && p.t_start <= 10.2);
            let span = p.t_end - p.t_start;
            assert!(span >= 0.1 * MAX_WP_TTL - 1e-12 && span <= MAX_WP_TTL + 1e-12);
        }
    }

    #[test]
    fn test_no_impacts_no_drain() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut shield = Windshield::new(&mut rng, 0.0);
        assert_eq!(shield.advance(&mut rng, 100.0, 0), 0);
        assert_eq!(shield.live, 0);
    }

    #[test]
    fn test_expired_live_particles_respawn() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut shield = Windshield::new(&mut rng, 0.0);

        // Every particle has expired by t = 100; one impact makes ten live
        let hits = shield.advance(&mut rng, 100.0, 1);
        assert_eq!(hits, NUM_WP_PER_BLAST);
        assert!(shield.particles[..NUM_WP_PER_BLAST].iter().all(|p| p.t_start >= 100.0));
        assert!(shield.particles[NUM_WP_PER_BLAST].t_end < 100.0);

        // Freshly respawned particles are not expired yet
        assert_eq!(shield.advance(&mut rng, 100.0, 1), 0);
    }

    #[test]
    fn test_live_count_is_capped() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut shield = Windshield::new(&mut rng, 0.0);
        shield.advance(&mut rng, 0.0, MAX_BLASTS + 4);
        assert_eq!(shield.live, NUM_WIND_PARTICLES);
    }
}
