//! Collision detection and response
//!
//! Ship vs asteroid uses a per-axis elastic model: each velocity component is
//! treated as an independent 1-D two-body collision. It ignores the contact
//! normal entirely, which keeps glancing blows feeling heavy.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::asteroid::Asteroid;
use super::ship::Ship;
use super::vector::normalize_or;
use crate::consts::*;

/// Step added to the look-ahead time on each correction iteration (seconds)
const CORRECTION_STEP: f64 = 0.01;
/// Give up nudging after this many steps and place the asteroid directly
const MAX_CORRECTION_STEPS: u32 = 10_000;

/// Post-collision velocities for a ship/asteroid pair.
///
/// Returns `(ship_velocity, asteroid_velocity)`. Momentum is conserved per
/// component, and the relative velocity is reversed.
pub fn elastic_response(ship_mass: f64, ship_v: DVec3, ast_mass: f64, ast_v: DVec3) -> (DVec3, DVec3) {
    let k = 1.0 / (ship_mass + ast_mass);
    let ship_after = k * (ship_mass * ship_v + 2.0 * ast_mass * ast_v - ast_mass * ship_v);
    let ast_after = ship_v - ast_v + ship_after;
    (ship_after, ast_after)
}

/// How an overlapping asteroid was pushed clear of the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Moved along its own velocity; `steps` extra look-ahead increments were needed
    Nudged { steps: u32 },
    /// Velocity could not separate the pair, placed at `distance` from the ship
    Placed,
}

/// Push the asteroid along its velocity until the predicted next-tick
/// separation is at least `distance`. The ship is never moved.
pub fn correct_position(ship: &Ship, rock: &mut Asteroid, dt: f64, distance: f64) -> Correction {
    let ship_next = ship.pos + dt * ship.velocity;
    let mut k = dt;
    let mut candidate = rock.pos + k * rock.velocity;

    for steps in 0..MAX_CORRECTION_STEPS {
        if ship_next.distance(candidate) >= distance {
            rock.pos = candidate;
            return Correction::Nudged { steps };
        }
        k += CORRECTION_STEP;
        candidate = rock.pos + k * rock.velocity;
    }

    let away = normalize_or(rock.pos - ship_next, ship.zaxis);
    rock.pos = ship_next + away * distance;
    log::debug!("Asteroid could not be nudged clear, placed at {:?}", rock.pos);
    Correction::Placed
}

/// Outcome of a ship/asteroid contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipImpact {
    /// Shield strength to remove
    pub damage: f64,
    pub correction: Option<Correction>,
}

/// Resolve contact between the ship and one asteroid, updating both velocities.
///
/// Returns `None` when they do not touch.
pub fn collide_ship(ship: &mut Ship, rock: &mut Asteroid, dt: f64) -> Option<ShipImpact> {
    let collision_dist = SHIP_RADIUS + rock.radius;
    if ship.pos.distance(rock.pos) > collision_dist {
        return None;
    }

    let (ship_v, rock_v) = elastic_response(SHIP_MASS, ship.velocity, rock.mass, rock.velocity);
    ship.velocity = ship_v;
    rock.velocity = rock_v;

    // Still overlapping one tick from now? Then they would collide again.
    let ship_next = ship.pos + dt * ship.velocity;
    let rock_next = rock.pos + dt * rock.velocity;
    let correction = (ship_next.distance(rock_next) < collision_dist)
        .then(|| correct_position(ship, rock, dt, collision_dist));

    Some(ShipImpact {
        damage: rock.mass * ship.velocity.length(),
        correction,
    })
}

/// Torpedo contact test
#[inline]
pub fn torpedo_hits(torp_pos: DVec3, rock: &Asteroid) -> bool {
    torp_pos.distance(rock.pos) <= 2.0 * TORP_RADIUS + rock.radius
}

/// Directions from which nearby asteroids threaten the ship.
///
/// Asteroids inside the forward cone are visible through the windshield and
/// are left off the gauge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionWarning {
    pub rear: bool,
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionWarning {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.rear || self.above || self.below || self.left || self.right
    }

    /// Raise flags for an asteroid at `rock_pos`
    pub fn observe(&mut self, ship: &Ship, rock_pos: DVec3) {
        let offset = rock_pos - ship.pos;
        let dist = offset.length();
        if dist > WARNING_RANGE || dist <= f64::EPSILON {
            return;
        }
        let dir = offset / dist;

        let forward = ship.zaxis.dot(dir);
        if forward > 0.0 && forward.min(1.0).acos().to_degrees() < WARNING_FORWARD_CONE {
            return;
        }

        let up = ship.yaxis.dot(dir);
        let side = ship.xaxis.dot(dir);
        self.rear |= forward < 0.0;
        self.above |= up > 0.0;
        self.below |= up < 0.0;
        // Right handed frame: +x is to the pilot's left
        self.right |= side < 0.0;
        self.left |= side > 0.0;
    }
}
