//! Target selection and the lead-computing sight

use glam::DVec3;

use super::asteroid::{Asteroid, AsteroidField, AsteroidId};
use super::ship::Ship;
use crate::consts::*;

/// Pick the last asteroid in list order that sits in front of the ship and
/// within twice its radius of the boresight line.
pub fn target_ahead(ship: &Ship, field: &AsteroidField) -> Option<AsteroidId> {
    field
        .iter_ids()
        .filter(|(_, rock)| {
            let offset = rock.pos - ship.pos;
            let along = ship.zaxis.dot(offset);
            let off_axis = (ship.zaxis * along - offset).length();
            along > 0.0 && off_axis < 2.0 * rock.radius
        })
        .last()
        .map(|(id, _)| id)
}

/// Pick the first asteroid of the smallest kind present
pub fn auto_target(field: &AsteroidField) -> Option<AsteroidId> {
    let mut best: Option<(AsteroidId, &Asteroid)> = None;
    for (id, rock) in field.iter_ids() {
        match best {
            Some((_, b)) if b.kind <= rock.kind => {}
            _ => best = Some((id, rock)),
        }
    }
    best.map(|(id, _)| id)
}

/// Predicted intercept for a torpedo fired now along the boresight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadSolution {
    /// Torpedo flight time to the asteroid's current range (seconds)
    pub flight_time: f64,
    pub asteroid_at: DVec3,
    pub torpedo_at: DVec3,
    /// Torpedo still alive at `flight_time`
    pub in_range: bool,
}

impl LeadSolution {
    /// How far the torpedo would pass from the predicted asteroid position
    pub fn miss_distance(&self) -> f64 {
        self.asteroid_at.distance(self.torpedo_at)
    }
}

pub fn lead_solution(ship: &Ship, rock: &Asteroid) -> LeadSolution {
    let flight_time = ship.pos.distance(rock.pos) / TORP_SPEED;
    let torp_velocity = TORP_SPEED * ship.zaxis + ship.velocity;
    LeadSolution {
        flight_time,
        asteroid_at: rock.pos + flight_time * rock.velocity,
        torpedo_at: ship.pos + flight_time * torp_velocity,
        in_range: flight_time <= TORP_TTL,
    }
}
