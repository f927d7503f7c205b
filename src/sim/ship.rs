//! Player ship kinematics
//!
//! Three vectors drive the ship:
//! - `thrust`: requested but not yet applied velocity change
//! - `velocity`: realized velocity, integrated with explicit Euler
//! - `rotation`: per-axis rotation request (degrees/sec), a one-tick impulse

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::vector::rotation_matrix;

/// One of the ship's local axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// The player's ship: a point with an orthonormal local frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: DVec3,
    pub xaxis: DVec3,
    pub yaxis: DVec3,
    /// View direction
    pub zaxis: DVec3,
    pub velocity: DVec3,
    pub thrust: DVec3,
    pub rotation: DVec3,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: DVec3::ZERO,
            xaxis: DVec3::X,
            yaxis: DVec3::Y,
            zaxis: DVec3::Z,
            velocity: DVec3::ZERO,
            thrust: DVec3::ZERO,
            rotation: DVec3::ZERO,
        }
    }
}

impl Ship {
    /// Local axis vector in world space
    #[inline]
    pub fn axis(&self, axis: Axis) -> DVec3 {
        match axis {
            Axis::X => self.xaxis,
            Axis::Y => self.yaxis,
            Axis::Z => self.zaxis,
        }
    }

    /// Request a velocity change of `amount` along a local axis
    pub fn slide(&mut self, axis: Axis, amount: f64) {
        self.thrust += amount * self.axis(axis);
    }

    /// Accumulate a rotation request (degrees/sec) about a local axis
    pub fn turn(&mut self, axis: Axis, degrees_per_sec: f64) {
        self.rotation[axis.index()] += degrees_per_sec;
    }

    /// Request thrust exactly opposite the current velocity
    pub fn stop(&mut self) {
        self.thrust = -self.velocity;
    }

    /// Drain pending thrust into velocity, at most `max_per_sec * dt` per axis.
    /// Whatever is left over carries to later ticks.
    pub fn apply_thrust(&mut self, dt: f64, max_per_sec: f64) {
        let limit = dt * max_per_sec;
        let applied = self.thrust.clamp(DVec3::splat(-limit), DVec3::splat(limit));
        self.thrust -= applied;
        self.velocity += applied;
    }

    /// Advance position and consume the rotation request
    pub fn integrate(&mut self, dt: f64) {
        self.pos += dt * self.velocity;

        let request = self.rotation * dt;
        self.rotate_about(Axis::X, request.x);
        self.rotate_about(Axis::Y, request.y);
        self.rotate_about(Axis::Z, request.z);

        self.rotation = DVec3::ZERO;
    }

    /// Rotate the other two local axes about `axis`.
    ///
    /// The view frame turns opposite to the rotation request, which is what
    /// makes positive input read as clockwise from the cockpit.
    pub fn rotate_about(&mut self, axis: Axis, degrees: f64) {
        if degrees == 0.0 {
            return;
        }
        let m = rotation_matrix(self.axis(axis), -degrees);
        match axis {
            Axis::X => {
                self.yaxis = m * self.yaxis;
                self.zaxis = m * self.zaxis;
            }
            Axis::Y => {
                self.xaxis = m * self.xaxis;
                self.zaxis = m * self.zaxis;
            }
            Axis::Z => {
                self.xaxis = m * self.xaxis;
                self.yaxis = m * self.yaxis;
            }
        }
    }

    /// Express a world-space vector in ship-local coordinates
    #[inline]
    pub fn to_local(&self, v: DVec3) -> DVec3 {
        DVec3::new(v.dot(self.xaxis), v.dot(self.yaxis), v.dot(self.zaxis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_orthonormal(ship: &Ship) {
        for v in [ship.xaxis, ship.yaxis, ship.zaxis] {
            assert!((v.length() - 1.0).abs() < 1e-6);
        }
        assert!(ship.xaxis.dot(ship.yaxis).abs() < 1e-6);
        assert!(ship.yaxis.dot(ship.zaxis).abs() < 1e-6);
        assert!(ship.zaxis.dot(ship.xaxis).abs() < 1e-6);
    }

    #[test]
    fn test_thrust_is_rate_limited() {
        let mut ship = Ship::default();
        ship.slide(Axis::Z, 1.0);
        let dt = 1.0 / 60.0;

        ship.apply_thrust(dt, 25.0);
        let step = dt * 25.0;
        assert!((ship.velocity.z - step).abs() < EPS);
        assert!((ship.thrust.z - (1.0 - step)).abs() < EPS);

        // Drains completely after enough ticks
        for _ in 0..10 {
            ship.apply_thrust(dt, 25.0);
        }
        assert!((ship.velocity.z - 1.0).abs() < EPS);
        assert_eq!(ship.thrust.z, 0.0);
    }

    #[test]
    fn test_negative_thrust_drains_toward_zero() {
        let mut ship = Ship::default();
        ship.slide(Axis::X, -0.1);
        ship.apply_thrust(1.0 / 60.0, 25.0);
        assert!((ship.velocity.x + 0.1).abs() < EPS);
        assert_eq!(ship.thrust, DVec3::ZERO);
    }

    #[test]
    fn test_stop_cancels_velocity() {
        let mut ship = Ship::default();
        ship.velocity = DVec3::new(1.0, -2.0, 0.5);
        ship.stop();
        for _ in 0..20 {
            ship.apply_thrust(1.0 / 60.0, 25.0);
        }
        assert!(ship.velocity.length() < EPS);
    }

    #[test]
    fn test_integrate_moves_and_clears_rotation() {
        let mut ship = Ship::default();
        ship.velocity = DVec3::new(6.0, 0.0, 0.0);
        ship.turn(Axis::Y, 90.0);
        ship.integrate(0.5);

        assert!((ship.pos.x - 3.0).abs() < EPS);
        assert_eq!(ship.rotation, DVec3::ZERO);
        // 45° about Y moved the view direction off +Z
        assert!((ship.zaxis.z - 45.0_f64.to_radians().cos()).abs() < EPS);
        assert_orthonormal(&ship);
    }

    #[test]
    fn test_frame_stays_orthonormal() {
        let mut ship = Ship::default();
        for i in 0..500 {
            ship.turn(Axis::X, 13.0 + i as f64 * 0.1);
            ship.turn(Axis::Y, -7.0);
            ship.turn(Axis::Z, 29.0);
            ship.integrate(1.0 / 60.0);
        }
        assert_orthonormal(&ship);
    }

    #[test]
    fn test_to_local() {
        let ship = Ship::default();
        let v = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(ship.to_local(v), v);
    }
}
