//! Background dust
//!
//! Purely a motion cue: dust never moves on its own and never collides, it is
//! only wrapped around the ship so there is always some nearby.

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::vector::{random_in_cube, wrap_position};
use crate::consts::*;

/// A parent point plus child offsets relative to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DustCluster {
    pub center: DVec3,
    pub offsets: Vec<DVec3>,
}

impl DustCluster {
    /// World-space positions of every particle in the cluster
    pub fn points(&self) -> impl Iterator<Item = DVec3> + '_ {
        std::iter::once(self.center).chain(self.offsets.iter().map(|o| self.center + *o))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DustField {
    pub clusters: Vec<DustCluster>,
}

impl DustField {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> Self {
        let clusters = (0..NUM_DUST_PART)
            .map(|_| DustCluster {
                center: random_in_cube(rng, bound),
                offsets: (1..NUM_CHILD_DUST_PART)
                    .map(|_| random_in_cube(rng, CHILD_DUST_PART_DELTA))
                    .collect(),
            })
            .collect();
        Self { clusters }
    }

    /// Keep every cluster inside the wrap cube around `center`
    pub fn wrap(&mut self, center: DVec3, bound: f64) {
        for cluster in self.clusters.iter_mut() {
            wrap_position(&mut cluster.center, center, bound);
        }
    }
}
