//! Torpedoes and their trails
//!
//! Both pools are fixed capacity. Firing with no free torpedo slot is a no-op;
//! a torpedo that finds no free trail simply flies without one.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::ship::Ship;
use crate::consts::*;

/// Lifecycle of a trail ring buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailPhase {
    #[default]
    Idle,
    /// Parent torpedo alive, recording positions
    Running,
    /// Parent torpedo gone, draining one point per tick
    Ending,
}

/// Ring buffer of a torpedo's recent positions.
///
/// `end` is the oldest point, `start` the newest. Once full it holds the most
/// recent `TORP_TRAIL_LEN - 1` segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    pub phase: TrailPhase,
    pub start: usize,
    pub end: usize,
    pub points: [DVec3; TORP_TRAIL_LEN],
}

impl Default for Trail {
    fn default() -> Self {
        Self {
            phase: TrailPhase::Idle,
            start: 0,
            end: 0,
            points: [DVec3::ZERO; TORP_TRAIL_LEN],
        }
    }
}

impl Trail {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == TrailPhase::Idle
    }

    /// Begin recording at `pos`
    pub fn begin(&mut self, pos: DVec3) {
        self.phase = TrailPhase::Running;
        self.start = 0;
        self.end = 0;
        self.points[0] = pos;
    }

    /// Record a new newest point, overwriting the oldest when full
    pub fn append(&mut self, pos: DVec3) {
        self.start = (self.start + 1) % TORP_TRAIL_LEN;
        if self.start == self.end {
            self.end = (self.end + 1) % TORP_TRAIL_LEN;
        }
        self.points[self.start] = pos;
    }

    /// Parent torpedo retired: start draining (or go idle if nothing is left)
    pub fn finish(&mut self) {
        self.phase = if self.start == self.end {
            TrailPhase::Idle
        } else {
            TrailPhase::Ending
        };
    }

    /// Drop the oldest point. No-op unless ending.
    pub fn drain(&mut self) {
        if self.phase != TrailPhase::Ending {
            return;
        }
        self.end = (self.end + 1) % TORP_TRAIL_LEN;
        if self.end == self.start {
            self.phase = TrailPhase::Idle;
        }
    }

    /// Points from oldest to newest
    pub fn points(&self) -> impl Iterator<Item = DVec3> + '_ {
        let len = (self.start + TORP_TRAIL_LEN - self.end) % TORP_TRAIL_LEN + 1;
        (0..len).map(move |i| self.points[(self.end + i) % TORP_TRAIL_LEN])
    }
}

/// A single torpedo slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Torpedo {
    pub in_flight: bool,
    pub is_tracer: bool,
    pub pos: DVec3,
    pub velocity: DVec3,
    /// Absolute tick deadline. Zeroed on impact.
    pub ttl: u64,
    pub trail: Option<usize>,
    /// Billboard roll (degrees)
    pub roll: u32,
}

impl Torpedo {
    /// Still able to hit something this tick
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.in_flight && self.ttl != 0
    }
}

/// Torpedo and trail pools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorpedoBay {
    pub torps: [Torpedo; MAX_TORPS],
    pub trails: [Trail; MAX_TORP_TRAILS],
    /// Far-to-near copy of `torps` for back-to-front drawing, rebuilt each tick
    pub sorted: Vec<Torpedo>,
    /// Fast path: skip the torpedo pass entirely when nothing is flying
    pub any_in_flight: bool,
    /// Set while a tracer torpedo is in flight
    pub tracer_light: bool,
    tracer_countdown: usize,
}

impl Default for TorpedoBay {
    fn default() -> Self {
        Self {
            torps: Default::default(),
            trails: Default::default(),
            sorted: Vec::with_capacity(MAX_TORPS),
            any_in_flight: false,
            tracer_light: false,
            tracer_countdown: MAX_TORPS,
        }
    }
}

impl TorpedoBay {
    /// Launch from the first free slot. Returns the slot, or `None` when all are flying.
    pub fn fire(&mut self, ship: &Ship, now: u64, ttl_ticks: u64, tracers: bool) -> Option<usize> {
        let Some(slot) = self.torps.iter().position(|t| !t.in_flight) else {
            log::debug!("No free torpedo slot");
            return None;
        };

        if tracers {
            self.tracer_countdown -= 1;
        }
        let is_tracer = self.tracer_countdown == 0;
        if is_tracer {
            self.tracer_countdown = MAX_TORPS;
            self.tracer_light = true;
        }

        let pos = ship.pos + TORP_LAUNCH_OFFSET * ship.zaxis;
        let trail = self.trails.iter().position(Trail::is_idle);
        if let Some(t) = trail {
            self.trails[t].begin(pos);
        }

        self.torps[slot] = Torpedo {
            in_flight: true,
            is_tracer,
            pos,
            velocity: ship.velocity + TORP_SPEED * ship.zaxis,
            ttl: now + ttl_ticks,
            trail,
            roll: 0,
        };
        self.any_in_flight = true;
        Some(slot)
    }

    /// Mark a torpedo as spent; it retires on the next motion pass
    pub fn detonate(&mut self, slot: usize) {
        if let Some(t) = self.torps.get_mut(slot) {
            t.ttl = 0;
        }
    }

    /// Drain every ending trail by one point
    pub fn drain_trails(&mut self) {
        for trail in self.trails.iter_mut() {
            trail.drain();
        }
    }

    /// Move torpedoes, retire expired ones, extend live trails, and rebuild
    /// the sorted view relative to `eye`.
    pub fn advance(&mut self, dt: f64, now: u64, eye: DVec3) {
        if !self.any_in_flight {
            return;
        }

        let mut in_flight = 0;
        for torp in self.torps.iter_mut().filter(|t| t.in_flight) {
            in_flight += 1;
            torp.pos += dt * torp.velocity;
            torp.roll = (torp.roll + TORP_BB_ZROT) % 360;

            let retired = now >= torp.ttl;
            if retired {
                torp.in_flight = false;
                if torp.is_tracer {
                    self.tracer_light = false;
                }
            }

            let Some(trail) = torp.trail.and_then(|t| self.trails.get_mut(t)) else {
                continue;
            };
            if retired {
                trail.finish();
                torp.trail = None;
            } else {
                trail.append(torp.pos);
            }
        }

        if in_flight == 0 {
            self.any_in_flight = false;
        }

        self.sorted.clear();
        self.sorted.extend(self.torps.iter().cloned());
        self.sorted.sort_by(|a, b| {
            let da = a.pos.distance_squared(eye);
            let db = b.pos.distance_squared(eye);
            db.total_cmp(&da)
        });
    }

    /// Flying torpedoes, farthest from the eye first, as of the last advance
    pub fn far_first(&self) -> impl Iterator<Item = &Torpedo> + '_ {
        self.sorted.iter().filter(|t| t.in_flight)
    }

    pub fn in_flight(&self) -> impl Iterator<Item = (usize, &Torpedo)> + '_ {
        self.torps.iter().enumerate().filter(|(_, t)| t.in_flight)
    }

    pub fn active_trails(&self) -> impl Iterator<Item = &Trail> + '_ {
        self.trails.iter().filter(|t| !t.is_idle())
    }
}
