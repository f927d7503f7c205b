//! Demo pilot
//!
//! Plays the simulation through the same command interface a human uses:
//! lock the smallest rock, swing the boresight onto the lead point, fire
//! when the sight says the torpedo will connect.

use glam::DVec3;

use crate::consts::*;
use crate::secs_to_ticks;
use crate::sim::{Axis, Command, SimPhase, SimulationState, lead_solution};

/// Seconds the pilot aims to close a heading error in
const SETTLE_SECS: f64 = 0.25;
/// Minimum spacing between shots (seconds)
const FIRE_COOLDOWN_SECS: f64 = 0.3;
/// Preferred speed while closing on a distant target
const CRUISE_SPEED: f64 = 5.0;
/// Heading error under which the pilot will thrust forward (degrees)
const THRUST_CONE_DEGREES: f64 = 10.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    next_fire_tick: u64,
    steering: Option<(f64, f64)>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands for the current state. Call once per frame.
    pub fn plan(&mut self, state: &SimulationState) -> Vec<Command> {
        let mut commands = Vec::new();
        if state.phase != SimPhase::Running {
            return commands;
        }

        let Some(rock) = state.targeted() else {
            commands.push(Command::AutoTarget);
            self.steer(&mut commands, 0.0, 0.0);
            return commands;
        };

        let ship = &state.ship;
        let lead = lead_solution(ship, rock);
        let local = ship.to_local(lead.asteroid_at - ship.pos);
        if local.length_squared() <= f64::EPSILON {
            return commands;
        }

        let (pitch_err, yaw_err) = heading_error(local);
        let scale = 1.0 / (SETTLE_SECS * MAX_DPS_INPUT);
        self.steer(&mut commands, pitch_err * scale, -yaw_err * scale);

        let on_target = lead.miss_distance() < rock.radius;
        let tube_free = state.torpedoes.in_flight().count() < MAX_TORPS;
        if on_target && lead.in_range && tube_free && state.ticks >= self.next_fire_tick {
            commands.push(Command::FireTorpedo);
            self.next_fire_tick = state.ticks + secs_to_ticks(FIRE_COOLDOWN_SECS, state.tick_rate);
        }

        let speed = ship.velocity.length();
        let off_axis = local.angle_between(DVec3::Z).to_degrees();
        if speed > 2.0 * CRUISE_SPEED {
            if ship.thrust == DVec3::ZERO {
                commands.push(Command::Stop);
            }
        } else if !lead.in_range && speed < CRUISE_SPEED && off_axis < THRUST_CONE_DEGREES {
            commands.push(Command::Thrust {
                axis: Axis::Z,
                amount: THRUST_INPUT,
            });
        }

        commands
    }

    fn steer(&mut self, commands: &mut Vec<Command>, pitch: f64, yaw: f64) {
        let next = (pitch.clamp(-1.0, 1.0), yaw.clamp(-1.0, 1.0));
        let current = self.steering.unwrap_or((0.0, 0.0));
        if next != current {
            commands.push(Command::Steer {
                pitch: next.0,
                yaw: next.1,
            });
            self.steering = Some(next);
        }
    }
}

/// `(pitch, yaw)` error in degrees for a ship-local direction
fn heading_error(local: DVec3) -> (f64, f64) {
    (
        local.y.atan2(local.z).to_degrees(),
        local.x.atan2(local.z).to_degrees(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::{Asteroid, AsteroidKind, tick};

    fn empty_state() -> SimulationState {
        SimulationState::new(&SimConfig {
            num_asteroids: 0,
            seed: Some(21),
            ..SimConfig::default()
        })
    }

    fn fly(state: &mut SimulationState, pilot: &mut Autopilot, ticks: usize) {
        for _ in 0..ticks {
            for command in pilot.plan(state) {
                state.apply(command);
            }
            tick(state);
        }
    }

    #[test]
    fn test_locks_when_untargeted() {
        let mut state = empty_state();
        state
            .asteroids
            .push(Asteroid::new(AsteroidKind::Medium, DVec3::new(0.0, 0.0, 20.0)));
        let commands = Autopilot::new().plan(&state);
        assert_eq!(commands, vec![Command::AutoTarget]);
    }

    #[test]
    fn test_fires_on_boresight() {
        let mut state = empty_state();
        let id = state
            .asteroids
            .push(Asteroid::new(AsteroidKind::Large, DVec3::new(0.0, 0.0, 20.0)));
        state.target = Some(id);

        let mut pilot = Autopilot::new();
        assert!(pilot.plan(&state).contains(&Command::FireTorpedo));

        // Cooling down
        assert!(!pilot.plan(&state).contains(&Command::FireTorpedo));
    }

    #[test]
    fn test_steers_toward_target() {
        let mut state = empty_state();
        let id = state
            .asteroids
            .push(Asteroid::new(AsteroidKind::Large, DVec3::new(20.0, 0.0, 20.0)));
        state.target = Some(id);

        let mut pilot = Autopilot::new();
        let commands = pilot.plan(&state);
        let Some(Command::Steer { yaw, .. }) = commands.first().copied() else {
            panic!("expected steering, got {commands:?}");
        };
        assert!(yaw < 0.0);
        assert!(!commands.contains(&Command::FireTorpedo));

        let aim = |s: &SimulationState| {
            (DVec3::new(20.0, 0.0, 20.0) - s.ship.pos).angle_between(s.ship.zaxis)
        };
        let before = aim(&state);
        fly(&mut state, &mut pilot, 60);
        assert!(aim(&state) < before / 4.0);
    }

    #[test]
    fn test_stops_when_too_fast() {
        let mut state = empty_state();
        let id = state
            .asteroids
            .push(Asteroid::new(AsteroidKind::Pebble, DVec3::new(0.0, 0.0, 80.0)));
        state.target = Some(id);
        state.ship.velocity = DVec3::new(0.0, 0.0, 3.0 * CRUISE_SPEED);

        assert!(Autopilot::new().plan(&state).contains(&Command::Stop));
    }

    #[test]
    fn test_idle_while_paused() {
        let mut state = empty_state();
        state.apply(Command::Pause);
        assert!(Autopilot::new().plan(&state).is_empty());
    }

    #[test]
    fn test_destroys_stationary_rock() {
        let mut state = empty_state();
        state
            .asteroids
            .push(Asteroid::new(AsteroidKind::Large, DVec3::new(8.0, 4.0, 30.0)));

        let mut pilot = Autopilot::new();
        fly(&mut state, &mut pilot, 300);
        assert!(state.score.destroyed >= 1);
    }
}
