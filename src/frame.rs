//! Presentation snapshot
//!
//! Collects what one rendered frame needs from the running simulation. Each
//! section takes its own read guard and releases it before the next, so a
//! tick can land between sections. Cosmetic settings are applied here, never
//! in the simulation.

use glam::{DVec2, DVec3};

use crate::consts::MAX_TORPS;
use crate::driver::SimView;
use crate::settings::{Settings, TargetBox};
use crate::sim::{
    AsteroidKind, BlastKind, CollisionWarning, LeadSolution, SimPhase, SimulationState,
    lead_solution,
};

/// Camera frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: DVec3,
    pub right: DVec3,
    pub up: DVec3,
    pub forward: DVec3,
}

impl Camera {
    /// Depth of a world point along the view direction
    pub fn depth(&self, p: DVec3) -> f64 {
        (p - self.eye).dot(self.forward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidSprite {
    pub kind: AsteroidKind,
    pub pos: DVec3,
    pub radius: f64,
    pub rot: f64,
    pub rot_axis: DVec3,
    pub targeted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorpedoSprite {
    pub pos: DVec3,
    /// Billboard roll (degrees)
    pub roll: u32,
    pub is_tracer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlastSprite {
    pub kind: BlastKind,
    pub pos: DVec3,
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebrisSprite {
    pub pos: DVec2,
    pub size: u32,
    /// Seconds since it appeared
    pub age: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetHud {
    pub kind: AsteroidKind,
    pub distance: f64,
    pub lead: LeadSolution,
    pub style: TargetBox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub phase: SimPhase,
    pub seconds: f64,
    pub score: u64,
    pub destroyed: u64,
    pub shield: f64,
    pub shield_flash: bool,
    pub hud_flicker: bool,
    pub warning: CollisionWarning,
    pub on_scanner: usize,
    pub speed: f64,
    pub torpedoes_ready: usize,
    pub target: Option<TargetHud>,
    /// A tracer is lighting the field
    pub tracer_light: bool,
}

impl Hud {
    /// One-line status for logs
    pub fn status_line(&self) -> String {
        let target = match &self.target {
            Some(t) => format!("{:?} at {:.1}", t.kind, t.distance),
            None => "none".to_string(),
        };
        format!(
            "t={:.1}s score={} shield={:.0}% speed={:.1} scanner={} torps={} target={}{}",
            self.seconds,
            self.score,
            100.0 * self.shield,
            self.speed,
            self.on_scanner,
            self.torpedoes_ready,
            target,
            if self.warning.any() { " WARNING" } else { "" }
        )
    }
}

/// Everything drawn in one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub settings: Settings,
    pub camera: Camera,
    /// In front of the camera, far first
    pub asteroids: Vec<AsteroidSprite>,
    /// Far first
    pub torpedoes: Vec<TorpedoSprite>,
    pub trails: Vec<Vec<DVec3>>,
    pub blasts: Vec<BlastSprite>,
    pub dust: Vec<DVec3>,
    pub debris: Vec<DebrisSprite>,
    pub hud: Hud,
}

impl Frame {
    pub fn capture(view: &SimView) -> Self {
        let (settings, camera) = {
            let state = view.read();
            (state.settings.clone(), camera_of(&state))
        };

        let asteroids = asteroid_sprites(&view.read(), &camera);
        let (torpedoes, trails) = {
            let state = view.read();
            let torpedoes = state
                .torpedoes
                .far_first()
                .map(|t| TorpedoSprite {
                    pos: t.pos,
                    roll: t.roll,
                    is_tracer: t.is_tracer && settings.tracers,
                })
                .collect();
            let trails = state
                .torpedoes
                .active_trails()
                .map(|trail| trail.points().collect())
                .collect();
            (torpedoes, trails)
        };
        let blasts = view
            .read()
            .blasts
            .active()
            .map(|b| BlastSprite {
                kind: b.kind,
                pos: b.pos,
                scale: b.scalar,
            })
            .collect();

        let dust = if settings.dust {
            view.read()
                .dust
                .clusters
                .iter()
                .flat_map(|c| c.points())
                .collect()
        } else {
            Vec::new()
        };

        let debris = {
            let state = view.read();
            let secs = state.secs();
            state
                .windshield
                .visible(secs)
                .map(|p| DebrisSprite {
                    pos: p.pos,
                    size: p.size,
                    age: p.age(secs),
                })
                .collect()
        };

        let hud = hud_of(&view.read(), &settings);

        Self {
            settings,
            camera,
            asteroids,
            torpedoes,
            trails,
            blasts,
            dust,
            debris,
            hud,
        }
    }
}

fn camera_of(state: &SimulationState) -> Camera {
    let ship = &state.ship;
    Camera {
        eye: ship.pos,
        right: ship.xaxis,
        up: ship.yaxis,
        forward: ship.zaxis,
    }
}

fn asteroid_sprites(state: &SimulationState, camera: &Camera) -> Vec<AsteroidSprite> {
    let target = state.target;
    let mut sprites: Vec<AsteroidSprite> = state
        .asteroids
        .iter_ids()
        .filter(|(_, rock)| camera.depth(rock.pos) + rock.radius > 0.0)
        .map(|(id, rock)| AsteroidSprite {
            kind: rock.kind,
            pos: rock.pos,
            radius: rock.radius,
            rot: rock.rot,
            rot_axis: rock.rot_axis,
            targeted: target == Some(id),
        })
        .collect();
    sprites.sort_by(|a, b| camera.depth(b.pos).total_cmp(&camera.depth(a.pos)));
    sprites
}

fn hud_of(state: &SimulationState, settings: &Settings) -> Hud {
    let now = state.ticks;
    let target = state.targeted().map(|rock| TargetHud {
        kind: rock.kind,
        distance: state.ship.pos.distance(rock.pos),
        lead: lead_solution(&state.ship, rock),
        style: settings.target_box,
    });

    Hud {
        phase: state.phase,
        seconds: state.secs(),
        score: state.score.display_score(state.difficulty),
        destroyed: state.score.destroyed,
        shield: state.shield.fraction(),
        shield_flash: settings.shield_effect && state.shield.is_flashing(now),
        hud_flicker: state.shield.is_flickering(now),
        warning: state.warning,
        on_scanner: state.asteroids_on_scanner,
        speed: state.ship.velocity.length(),
        torpedoes_ready: MAX_TORPS - state.torpedoes.in_flight().count(),
        target,
        tracer_light: settings.tracers && state.torpedoes.tracer_light,
    }
}
