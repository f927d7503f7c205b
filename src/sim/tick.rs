//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one step, in a fixed order:
//! controls, ship motion, asteroid motion, collisions, deferred deletions,
//! torpedoes and trails, blasts, dust, windshield debris, shield.

use super::asteroid::HEAD;
use super::collision::{collide_ship, torpedo_hits};
use super::state::{EndReason, SimPhase, SimulationState};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::secs_to_ticks;

/// Advance the simulation by one tick. Does nothing unless running.
pub fn tick(state: &mut SimulationState) {
    if state.phase != SimPhase::Running {
        return;
    }
    let dt = state.dt;

    // Ship
    state.controls.apply(&mut state.ship);
    state.ship.apply_thrust(dt, MAX_THRUST_PER_SEC);
    state.ship.integrate(dt);

    // Asteroids, then everything that can hit them
    state.asteroids.advance(dt, state.ship.pos, state.wrap_bound);
    collision_pass(state);
    if !state.deletions.is_empty() {
        log::trace!("{} asteroids scheduled for unlink", state.deletions.len());
    }
    let removed = state.deletions.flush(&mut state.asteroids);
    if !removed.is_empty() {
        log::trace!("Unlinked {} asteroids, {} remain", removed.len(), state.asteroids.len());
    }

    // Torpedoes
    state.torpedoes.drain_trails();
    state.torpedoes.advance(dt, state.ticks, state.ship.pos);

    state.blasts.advance(dt, state.ticks, state.ship.pos);
    state.dust.wrap(state.ship.pos, state.wrap_bound);

    // Debris pelting the windshield wears the shield down
    let secs = state.secs();
    let hits = state
        .windshield
        .advance(&mut state.rng, secs, state.blasts.windshield_impacts);
    state.shield.absorb(hits as f64 * WP_SHIELD_DRAIN);

    if !state.shield.regenerate(dt) {
        state.end(EndReason::ShieldDepleted);
    }

    state.ticks += 1;
}

/// Walk the asteroid list once, resolving ship and torpedo contacts and
/// updating the collision warning gauge.
///
/// Destroyed asteroids are only scheduled here: the walk keeps a trailing
/// predecessor index, and unlinking under it would break the walk. Fragments
/// are appended at the tail, so the walk reaches them too.
fn collision_pass(state: &mut SimulationState) {
    state.warning.clear();
    state.asteroids_on_scanner = 0;

    let dt = state.dt;
    let blast_ttl = secs_to_ticks(BLAST_TTL, state.tick_rate);
    let mut prev = HEAD;

    while let Some(current) = state.asteroids.next_of(prev) {
        state.asteroids_on_scanner += 1;

        let Some(rock) = state.asteroids.get_mut(current) else {
            break;
        };

        if let Some(impact) = collide_ship(&mut state.ship, rock, dt) {
            state.shield.absorb(impact.damage);
            state
                .shield
                .on_impact(&mut state.rng, state.ticks, state.tick_rate);
            state.outbox.push(SoundEffect::Collision);
            log::debug!(
                "Collision with {:?}, shield -{:.1} ({:?})",
                rock.kind,
                impact.damage,
                impact.correction
            );
        }

        let (kind, pos, can_fragment) = (rock.kind, rock.pos, rock.can_fragment());
        state.warning.observe(&state.ship, pos);

        for slot in 0..MAX_TORPS {
            let torp = &state.torpedoes.torps[slot];
            if !torp.is_armed() {
                continue;
            }
            let Some(rock) = state.asteroids.get(current) else {
                break;
            };
            if !torpedo_hits(torp.pos, rock) {
                continue;
            }

            let torp_pos = torp.pos;
            state
                .blasts
                .ignite(&mut state.rng, torp_pos, state.ticks, blast_ttl);
            state.outbox.push(SoundEffect::AsteroidDestroyed(kind));

            if can_fragment {
                let n = state.asteroids.fragment(&mut state.rng, pos, kind);
                log::debug!("{:?} split into {} fragments", kind, n);
            }

            state.torpedoes.detonate(slot);

            if !state.deletions.schedule(prev) {
                log::warn!("Deletion queue full, asteroid at slot {} survives", current);
            }

            if state.target.is_some() && state.target == state.asteroids.id_of(current) {
                state.target = None;
            }

            state.score.record_kill();
        }

        prev = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::asteroid::{Asteroid, AsteroidKind};
    use crate::sim::input::Command;
    use crate::sim::torpedo::TrailPhase;
    use glam::DVec3;

    fn empty_state() -> SimulationState {
        SimulationState::new(&SimConfig {
            num_asteroids: 0,
            seed: Some(7),
            ..SimConfig::default()
        })
    }

    /// A torpedo sitting on `pos`, armed
    fn torpedo_at(state: &mut SimulationState, pos: DVec3) -> usize {
        let slot = state
            .torpedoes
            .fire(&state.ship, state.ticks, 108, false)
            .unwrap();
        state.torpedoes.torps[slot].pos = pos;
        state.torpedoes.torps[slot].velocity = DVec3::ZERO;
        slot
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut state = empty_state();
        tick(&mut state);
        tick(&mut state);
        assert_eq!(state.ticks, 2);
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let mut state = empty_state();
        state.ship.velocity = DVec3::X;
        state.apply(Command::Pause);
        tick(&mut state);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.ship.pos, DVec3::ZERO);
    }

    #[test]
    fn test_head_on_collision_through_tick() {
        let mut state = empty_state();
        let mut rock = Asteroid::new(AsteroidKind::Pebble, DVec3::new(3.2, 0.0, 0.0));
        rock.velocity = DVec3::new(-5.0, 0.0, 0.0);
        state.asteroids.push(rock);

        tick(&mut state);

        assert!(state.ship.velocity.x < 0.0);
        assert!(state.shield.strength < MAX_SHIELD);
        assert!(state.shield.is_flashing(state.ticks));
        assert!(state.drain_sounds().contains(&SoundEffect::Collision));
    }

    #[test]
    fn test_torpedo_kill_with_fragmentation() {
        let mut state = empty_state();
        let target = DVec3::new(0.0, 0.0, 30.0);
        let id = state.asteroids.push(Asteroid::new(AsteroidKind::Large, target));
        state.target = Some(id);
        let slot = torpedo_at(&mut state, target);

        tick(&mut state);

        let active_blasts = state.blasts.active().count();
        assert_eq!(active_blasts, 1);
        assert!(state.asteroids.resolve(id).is_none());
        let n = state.asteroids.len();
        assert!((2..=5).contains(&n), "spawned {n} fragments");
        assert!(state.asteroids.iter().all(|a| a.kind < AsteroidKind::Large));
        assert!(state.asteroids.is_well_formed());
        assert!(!state.torpedoes.torps[slot].in_flight);
        assert_eq!(state.score.score, 1);
        assert_eq!(state.target, None);
        assert!(
            state
                .drain_sounds()
                .contains(&SoundEffect::AsteroidDestroyed(AsteroidKind::Large))
        );
    }

    #[test]
    fn test_pebble_does_not_fragment() {
        let mut state = empty_state();
        let target = DVec3::new(10.0, 0.0, 0.0);
        state.asteroids.push(Asteroid::new(AsteroidKind::Pebble, target));
        torpedo_at(&mut state, target);

        tick(&mut state);
        assert!(state.asteroids.is_empty());
        assert_eq!(state.score.destroyed, 1);
    }

    #[test]
    fn test_two_torpedoes_one_asteroid() {
        let mut state = empty_state();
        let target = DVec3::new(0.0, 20.0, 0.0);
        state.asteroids.push(Asteroid::new(AsteroidKind::Pebble, target));
        state.asteroids.push(Asteroid::new(AsteroidKind::Pebble, DVec3::new(0.0, -20.0, 0.0)));
        torpedo_at(&mut state, target);
        torpedo_at(&mut state, target);

        tick(&mut state);
        assert_eq!(state.asteroids.len(), 1);
        assert!(state.asteroids.is_well_formed());
    }

    #[test]
    fn test_adjacent_kills_in_one_tick() {
        let mut state = empty_state();
        let a = DVec3::new(0.0, 20.0, 0.0);
        let b = DVec3::new(0.0, -20.0, 0.0);
        state.asteroids.push(Asteroid::new(AsteroidKind::Pebble, a));
        state.asteroids.push(Asteroid::new(AsteroidKind::Pebble, b));
        state.asteroids.push(Asteroid::new(AsteroidKind::Pebble, DVec3::new(20.0, 0.0, 0.0)));
        torpedo_at(&mut state, a);
        torpedo_at(&mut state, b);

        tick(&mut state);
        assert_eq!(state.asteroids.len(), 1);
        assert!(state.asteroids.is_well_formed());
        assert_eq!(state.score.score, 2);
    }

    #[test]
    fn test_trail_outlives_torpedo() {
        let mut state = empty_state();
        state.apply(Command::FireTorpedo);
        let ttl = state.torpedoes.torps[0].ttl;
        while state.ticks <= ttl {
            tick(&mut state);
        }
        assert!(!state.torpedoes.torps[0].in_flight);
        assert_eq!(state.torpedoes.trails[0].phase, TrailPhase::Ending);

        for _ in 0..TORP_TRAIL_LEN {
            tick(&mut state);
        }
        assert_eq!(state.torpedoes.trails[0].phase, TrailPhase::Idle);
    }

    #[test]
    fn test_shield_depletion_ends_run() {
        let mut state = empty_state();
        state.shield.strength = -1.0;
        tick(&mut state);
        assert!(state.is_ended());
        assert_eq!(state.end_reason, Some(EndReason::ShieldDepleted));

        let ticks = state.ticks;
        tick(&mut state);
        assert_eq!(state.ticks, ticks);
    }

    #[test]
    fn test_blast_over_ship_drains_shield() {
        let mut state = empty_state();
        state.blasts.ignite(&mut state.rng, DVec3::ZERO, 0, 300);

        // Let the first batch of debris expire so it respawns
        state.ticks = 1000;
        let before = state.shield.strength;
        tick(&mut state);
        assert_eq!(state.blasts.windshield_impacts, 1);
        let regen = SHIELD_REGEN_PER_SEC * state.dt;
        let drained = NUM_WP_PER_BLAST as f64 * WP_SHIELD_DRAIN;
        assert!((state.shield.strength - (before - drained + regen)).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_keeps_field_around_ship() {
        let mut state = empty_state();
        for i in 0..20 {
            let side = if i % 2 == 0 { 30.0 } else { -30.0 };
            let pos = DVec3::new(side, i as f64 * 4.0 - 40.0, i as f64 * 8.0 - 80.0);
            state.asteroids.push(Asteroid::new(AsteroidKind::Medium, pos));
        }
        state.ship.velocity = DVec3::new(0.0, 0.0, 120.0);
        for _ in 0..240 {
            tick(&mut state);
        }

        let ship = state.ship.pos;
        assert!(ship.z > 400.0);
        for rock in state.asteroids.iter() {
            assert!((rock.pos - ship).abs().max_element() <= state.wrap_bound);
        }
        for cluster in &state.dust.clusters {
            assert!((cluster.center - ship).abs().max_element() <= state.wrap_bound);
        }
    }

    #[test]
    fn test_deterministic_replay() {
        let config = SimConfig {
            seed: Some(11),
            ..SimConfig::default()
        };
        let run = || {
            let mut state = SimulationState::new(&config);
            state.apply(Command::Thrust {
                axis: crate::sim::ship::Axis::Z,
                amount: 5.0,
            });
            for i in 0..600 {
                if i % 30 == 0 {
                    state.apply(Command::FireTorpedo);
                }
                tick(&mut state);
            }
            state.report()
        };
        assert_eq!(run(), run());
    }
}
