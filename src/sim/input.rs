//! Input commands and the per-tick control state they feed
//!
//! The input collaborator never touches the ship directly: it sends
//! [`Command`]s, which are applied under the simulation lock at the start of
//! a tick. Continuous inputs (keyboard rotation, steering) persist in
//! [`Controls`] and are turned into rotation requests every tick.

use serde::{Deserialize, Serialize};

use super::ship::{Axis, Ship};
use crate::consts::*;
use crate::settings::Feature;

/// Sense of a keyboard rotation press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    Positive,
    Negative,
}

impl RotationDirection {
    #[inline]
    fn sign(self) -> i32 {
        match self {
            RotationDirection::Positive => 1,
            RotationDirection::Negative => -1,
        }
    }
}

/// A discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Add `amount` of pending thrust along a local axis
    Thrust { axis: Axis, amount: f64 },
    /// One-tick rotation request (degrees/sec) about a local axis
    Rotate { axis: Axis, degrees: f64 },
    /// Keyboard rotation press, decays on its own
    KeyRotate { axis: Axis, direction: RotationDirection },
    /// Persistent proportional steering, each in [-1, 1]
    Steer { pitch: f64, yaw: f64 },
    /// Thrust against current velocity until at rest
    Stop,
    FireTorpedo,
    TargetAhead,
    AutoTarget,
    Pause,
    Resume,
    TogglePause,
    Quit,
    Toggle(Feature),
}

impl Command {
    /// Commands honoured while paused
    pub fn applies_while_paused(&self) -> bool {
        matches!(self, Command::Resume | Command::TogglePause | Command::Quit)
    }
}

/// Decaying keyboard rotation accumulator for one axis.
///
/// A first press jumps straight to a usable rate; holding the key (repeated
/// presses) builds on it. Left alone it bleeds one unit every
/// `KEYB_SCALE_DECAY` ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRotation {
    pub scalar: i32,
    count: u32,
}

impl KeyRotation {
    pub fn press(&mut self, direction: RotationDirection) {
        let sign = direction.sign();
        if self.scalar == 0 {
            self.scalar = sign * KEYB_FIRST_PRESS;
        } else {
            self.scalar += sign;
        }
    }

    /// Rotation rate to request this tick (degrees/sec), decaying afterwards.
    /// `None` when idle.
    pub fn step(&mut self) -> Option<f64> {
        if self.scalar == 0 {
            return None;
        }
        let rate = MAX_DPS_INPUT * KEYB_BASE_ROT_SCALE * self.scalar as f64;

        self.count = (self.count + 1) % KEYB_SCALE_DECAY;
        self.scalar = self.scalar.clamp(-KEYB_MAX_ROT_SCALE, KEYB_MAX_ROT_SCALE);
        if self.count == 0 {
            self.scalar -= self.scalar.signum();
        }
        Some(rate)
    }
}

/// Continuous control state carried between ticks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Controls {
    pub keys: [KeyRotation; 3],
    /// Steering proportions `(pitch, yaw)`
    pub steer: Option<(f64, f64)>,
}

impl Controls {
    pub fn press(&mut self, axis: Axis, direction: RotationDirection) {
        self.keys[axis.index()].press(direction);
    }

    pub fn steer(&mut self, pitch: f64, yaw: f64) {
        let pitch = pitch.clamp(-1.0, 1.0);
        let yaw = yaw.clamp(-1.0, 1.0);
        self.steer = (pitch != 0.0 || yaw != 0.0).then_some((pitch, yaw));
    }

    /// Feed this tick's continuous rotation requests into the ship
    pub fn apply(&mut self, ship: &mut Ship) {
        if let Some((pitch, yaw)) = self.steer {
            ship.turn(Axis::Y, MAX_DPS_INPUT * yaw);
            ship.turn(Axis::X, MAX_DPS_INPUT * pitch);
        }
        for axis in Axis::ALL {
            if let Some(rate) = self.keys[axis.index()].step() {
                ship.turn(axis, rate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_first_press_then_increments() {
        let mut key = KeyRotation::default();
        key.press(RotationDirection::Negative);
        assert_eq!(key.scalar, -KEYB_FIRST_PRESS);
        key.press(RotationDirection::Negative);
        assert_eq!(key.scalar, -KEYB_FIRST_PRESS - 1);
        key.press(RotationDirection::Positive);
        assert_eq!(key.scalar, -KEYB_FIRST_PRESS);
    }

    #[test]
    fn test_decays_every_second_tick() {
        let mut key = KeyRotation::default();
        key.press(RotationDirection::Positive);

        let mut rates = Vec::new();
        while let Some(rate) = key.step() {
            rates.push(rate);
        }
        let unit = MAX_DPS_INPUT * KEYB_BASE_ROT_SCALE;
        assert_eq!(
            rates,
            vec![4.0, 4.0, 3.0, 3.0, 2.0, 2.0, 1.0, 1.0]
                .into_iter()
                .map(|s| s * unit)
                .collect::<Vec<_>>()
        );
        assert_eq!(key.step(), None);
    }

    #[test]
    fn test_clamped_to_max() {
        let mut key = KeyRotation::default();
        for _ in 0..40 {
            key.press(RotationDirection::Positive);
        }
        key.step();
        assert!(key.scalar <= KEYB_MAX_ROT_SCALE);
    }

    #[test]
    fn test_steer_persists() {
        let mut controls = Controls::default();
        controls.steer(2.0, -0.5);
        assert_eq!(controls.steer, Some((1.0, -0.5)));

        let mut ship = Ship::default();
        controls.apply(&mut ship);
        assert_eq!(ship.rotation, DVec3::new(MAX_DPS_INPUT, -0.5 * MAX_DPS_INPUT, 0.0));

        ship.rotation = DVec3::ZERO;
        controls.apply(&mut ship);
        assert_eq!(ship.rotation.x, MAX_DPS_INPUT);

        controls.steer(0.0, 0.0);
        assert_eq!(controls.steer, None);
    }

    #[test]
    fn test_paused_filter() {
        assert!(Command::Resume.applies_while_paused());
        assert!(Command::Quit.applies_while_paused());
        assert!(!Command::FireTorpedo.applies_while_paused());
        assert!(!Command::Stop.applies_while_paused());
    }
}
