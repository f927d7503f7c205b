//! Asteroids and the asteroid field
//!
//! The field is a singly linked list threaded through an arena:
//! - Slot 0 is a permanent sentinel head; the first real asteroid is `head.next`
//! - A tail index gives O(1) append (fragments land at the tail)
//! - Freed slots are recycled through a free list, with a generation counter
//!   so stale [`AsteroidId`]s never alias a newer asteroid
//!
//! Nodes are never reordered, only appended and unlinked. Unlinking during
//! a scan is deferred through [`DeletionQueue`].

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::vector::{random_in_cube, random_unit_vector, wrap_position};
use crate::consts::*;
use crate::normalize_degrees;

/// Asteroid size class. Determines radius and mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AsteroidKind {
    Pebble,
    Small,
    Medium,
    Large,
    Huge,
    Giant,
}

impl AsteroidKind {
    pub const ALL: [AsteroidKind; NUM_AST_TYPES] = [
        AsteroidKind::Pebble,
        AsteroidKind::Small,
        AsteroidKind::Medium,
        AsteroidKind::Large,
        AsteroidKind::Huge,
        AsteroidKind::Giant,
    ];

    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// `MIN_AST_MASS + AST_MASS_K * type`
    #[inline]
    pub fn mass(self) -> f64 {
        MIN_AST_MASS + AST_MASS_K * self.ordinal() as f64
    }

    /// `(type + 1) / 2`
    #[inline]
    pub fn radius(self) -> f64 {
        (self.ordinal() + 1) as f64 / 2.0
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..NUM_AST_TYPES)]
    }

    /// Random kind strictly smaller than `self`, or `None` for the smallest kind
    pub fn random_smaller<R: Rng + ?Sized>(self, rng: &mut R) -> Option<Self> {
        match self.ordinal() {
            0 => None,
            n => Some(Self::ALL[rng.random_range(0..n)]),
        }
    }
}

/// A single asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub kind: AsteroidKind,
    pub mass: f64,
    pub radius: f64,
    pub pos: DVec3,
    pub velocity: DVec3,
    /// Current rotation (degrees, [0, 360))
    pub rot: f64,
    /// Rotation rate (degrees/sec)
    pub rot_delta: f64,
    pub rot_axis: DVec3,
}

impl Asteroid {
    /// A motionless asteroid of the given kind
    pub fn new(kind: AsteroidKind, pos: DVec3) -> Self {
        Self {
            kind,
            mass: kind.mass(),
            radius: kind.radius(),
            pos,
            velocity: DVec3::ZERO,
            rot: 0.0,
            rot_delta: 0.0,
            rot_axis: DVec3::Z,
        }
    }

    /// Asteroid of `kind` at `pos` with random drift and spin
    pub fn random_at<R: Rng + ?Sized>(rng: &mut R, kind: AsteroidKind, pos: DVec3) -> Self {
        let speed = rng.random_range(0.0..MAX_AST_SPEED);
        let velocity = random_unit_vector(rng) * speed;
        let rot_delta = rng.random_range(-MAX_AST_ROT_RATE..=MAX_AST_ROT_RATE) as f64;
        let rot_axis = random_unit_vector(rng);
        Self {
            velocity,
            rot_delta,
            rot_axis,
            ..Self::new(kind, pos)
        }
    }

    /// Advance position and spin by one tick
    pub fn advance(&mut self, dt: f64) {
        self.pos += dt * self.velocity;
        self.rot = normalize_degrees(self.rot + self.rot_delta * dt);
    }

    /// Only asteroids heavier than the floor break into fragments
    #[inline]
    pub fn can_fragment(&self) -> bool {
        self.mass > MIN_AST_MASS
    }
}

/// Fragment count distribution, weighted toward 2-3
const FRAGMENT_COUNTS: [usize; 10] = [2, 2, 2, 3, 3, 3, 3, 4, 4, 5];

/// Stable handle to an asteroid in the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AsteroidId {
    index: usize,
    generation: u32,
}

impl AsteroidId {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot {
    rock: Option<Asteroid>,
    next: Option<usize>,
    generation: u32,
}

impl Slot {
    fn vacant() -> Self {
        Self {
            rock: None,
            next: None,
            generation: 0,
        }
    }
}

/// Index of the sentinel head node
pub const HEAD: usize = 0;

/// Arena-backed singly linked list of asteroids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidField {
    slots: Vec<Slot>,
    free: Vec<usize>,
    tail: usize,
    len: usize,
}

impl Default for AsteroidField {
    fn default() -> Self {
        Self::new()
    }
}

impl AsteroidField {
    /// An empty field (head sentinel only)
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::vacant()],
            free: Vec::new(),
            tail: HEAD,
            len: 0,
        }
    }

    /// Populate a field with `count` random asteroids inside `±bound`
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, count: usize, bound: f64) -> Self {
        let mut field = Self::new();
        for _ in 0..count {
            let kind = AsteroidKind::random(rng);
            let pos = random_in_cube(rng, bound);
            field.push(Asteroid::random_at(rng, kind, pos));
        }
        field
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the last node (`HEAD` when empty)
    #[inline]
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Successor of node `index`
    #[inline]
    pub fn next_of(&self, index: usize) -> Option<usize> {
        self.slots.get(index).and_then(|s| s.next)
    }

    pub fn get(&self, index: usize) -> Option<&Asteroid> {
        self.slots.get(index).and_then(|s| s.rock.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Asteroid> {
        self.slots.get_mut(index).and_then(|s| s.rock.as_mut())
    }

    /// Handle for the live asteroid at `index`
    pub fn id_of(&self, index: usize) -> Option<AsteroidId> {
        let slot = self.slots.get(index)?;
        slot.rock.as_ref().map(|_| AsteroidId {
            index,
            generation: slot.generation,
        })
    }

    /// Resolve a handle; `None` once the asteroid has been destroyed
    pub fn resolve(&self, id: AsteroidId) -> Option<&Asteroid> {
        let slot = self.slots.get(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.rock.as_ref()
    }

    /// Append at the tail
    pub fn push(&mut self, rock: Asteroid) -> AsteroidId {
        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                self.slots.push(Slot::vacant());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        slot.rock = Some(rock);
        slot.next = None;
        let id = AsteroidId {
            index,
            generation: slot.generation,
        };

        self.slots[self.tail].next = Some(index);
        self.tail = index;
        self.len += 1;
        id
    }

    /// Unlink the node after `prev`, returning it.
    ///
    /// Keeps the tail valid when the removed node was the tail.
    pub fn unlink_after(&mut self, prev: usize) -> Option<Asteroid> {
        let current = self.next_of(prev)?;
        let after = self.slots[current].next;
        if after.is_none() {
            self.tail = prev;
        }
        self.slots[prev].next = after;

        let slot = &mut self.slots[current];
        slot.next = None;
        slot.generation = slot.generation.wrapping_add(1);
        let rock = slot.rock.take();
        self.free.push(current);
        self.len -= 1;
        rock
    }

    /// Spawn 2-5 fragments strictly smaller than `kind` at `pos`, appended at the tail.
    /// Returns how many were spawned.
    pub fn fragment<R: Rng + ?Sized>(&mut self, rng: &mut R, pos: DVec3, kind: AsteroidKind) -> usize {
        if kind.ordinal() == 0 {
            return 0;
        }
        let count = FRAGMENT_COUNTS[rng.random_range(0..FRAGMENT_COUNTS.len())];
        for _ in 0..count {
            if let Some(child) = kind.random_smaller(rng) {
                self.push(Asteroid::random_at(rng, child, pos));
            }
        }
        count
    }

    /// Move every asteroid one tick and wrap it around the ship
    pub fn advance(&mut self, dt: f64, center: DVec3, bound: f64) {
        for slot in self.slots.iter_mut() {
            if let Some(rock) = slot.rock.as_mut() {
                rock.advance(dt);
                wrap_position(&mut rock.pos, center, bound);
            }
        }
    }

    /// Iterate live asteroids in list order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            field: self,
            cursor: self.slots[HEAD].next,
        }
    }

    /// Iterate `(id, asteroid)` in list order
    pub fn iter_ids(&self) -> impl Iterator<Item = (AsteroidId, &Asteroid)> + '_ {
        let mut cursor = self.slots[HEAD].next;
        std::iter::from_fn(move || {
            let index = cursor?;
            let slot = &self.slots[index];
            cursor = slot.next;
            let id = AsteroidId {
                index,
                generation: slot.generation,
            };
            slot.rock.as_ref().map(|rock| (id, rock))
        })
    }

    /// Walk head to tail and check that the chain is consistent:
    /// every linked node is live, the count matches, and `tail` is the last node.
    pub fn is_well_formed(&self) -> bool {
        let mut count = 0;
        let mut last = HEAD;
        let mut cursor = self.slots[HEAD].next;
        while let Some(index) = cursor {
            if self.slots[index].rock.is_none() || count > self.slots.len() {
                return false;
            }
            count += 1;
            last = index;
            cursor = self.slots[index].next;
        }
        count == self.len && last == self.tail
    }
}

/// In-order iterator over the field
pub struct Iter<'a> {
    field: &'a AsteroidField,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Asteroid;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let slot = &self.field.slots[index];
        self.cursor = slot.next;
        slot.rock.as_ref()
    }
}

/// Per-tick scratch list of pending unlinks.
///
/// Each entry is the *predecessor* of the node to delete, since that is what
/// a singly linked unlink needs. At most one deletion per torpedo can be
/// scheduled in a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletionQueue {
    pending: [Option<usize>; MAX_TORPS],
}

impl DeletionQueue {
    /// Record that the node after `prev` must go. Returns false when full.
    pub fn schedule(&mut self, prev: usize) -> bool {
        match self.pending.iter_mut().find(|p| p.is_none()) {
            Some(entry) => {
                *entry = Some(prev);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.iter().all(|p| p.is_none())
    }

    /// Unlink every scheduled node, then reset for the next tick.
    ///
    /// Before each unlink the remaining entries are corrected:
    /// - an entry naming the same predecessor is a duplicate target and is dropped
    /// - an entry naming the node being removed is re-pointed at that node's
    ///   predecessor, which becomes the target's predecessor once the unlink lands
    ///
    /// Returns the removed asteroids.
    pub fn flush(&mut self, field: &mut AsteroidField) -> Vec<Asteroid> {
        let mut removed = Vec::new();
        for i in 0..MAX_TORPS {
            let Some(prev) = self.pending[i] else {
                continue;
            };
            let Some(current) = field.next_of(prev) else {
                log::warn!("Deletion entry {} has no successor to unlink", prev);
                continue;
            };

            for later in self.pending[i + 1..].iter_mut() {
                if *later == Some(prev) {
                    *later = None;
                } else if *later == Some(current) {
                    *later = Some(prev);
                }
            }

            if let Some(rock) = field.unlink_after(prev) {
                removed.push(rock);
            }
        }
        self.pending = [None; MAX_TORPS];
        removed
    }
}
