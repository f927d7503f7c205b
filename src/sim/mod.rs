//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (asteroid list order, torpedo slot order)
//! - No threads, clocks, or I/O

pub mod asteroid;
pub mod blast;
pub mod collision;
pub mod dust;
pub mod input;
pub mod shield;
pub mod ship;
pub mod state;
pub mod targeting;
pub mod tick;
pub mod torpedo;
pub mod vector;
pub mod windshield;

pub use asteroid::{Asteroid, AsteroidField, AsteroidId, AsteroidKind, DeletionQueue};
pub use blast::{Blast, BlastKind, Blasts};
pub use collision::{CollisionWarning, Correction, ShipImpact, collide_ship, elastic_response};
pub use dust::{DustCluster, DustField};
pub use input::{Command, Controls, KeyRotation, RotationDirection};
pub use shield::{Scoreboard, Shield};
pub use ship::{Axis, Ship};
pub use state::{EndReason, RunReport, SimPhase, SimulationState};
pub use targeting::{LeadSolution, auto_target, lead_solution, target_ahead};
pub use tick::tick;
pub use torpedo::{Torpedo, TorpedoBay, Trail, TrailPhase};
pub use windshield::{WindParticle, Windshield};
