/// World: the complete state of a running slime simulation.
///
/// Owned by the host loop and handed to `step::step` / `step::render`
/// each tick. Nothing here touches the clock, the buttons or the display;
/// those are passed in.
///
/// ## Spawn
///
/// `spawn` is the position the actor started at. Grid regeneration always
/// builds its safety zone around `spawn`, not the actor's current position.

use tracing::info;

use crate::config::{GameConfig, GenerationConfig, Strategy};
use crate::domain::control::{ActivityController, InputResolver, Mode};
use crate::domain::entity::Actor;
use crate::domain::geom::{Position, Rect};
use crate::domain::obstacle::ObstacleField;
use crate::domain::random::RandomSource;
use crate::domain::timing::RateGate;
use crate::domain::wander::WanderPolicy;

pub struct World {
    // ── Entities ──
    pub actor: Actor,
    pub field: ObstacleField,
    pub spawn: Position,

    // ── Controllers ──
    pub input: InputResolver,
    pub activity: ActivityController,
    pub wander: WanderPolicy,

    // ── Render pacing ──
    pub render_gate: RateGate,

    // ── Generation settings (for regenerate) ──
    pub generation: GenerationConfig,

    // ── Meta ──
    pub tick: u64,
}

impl World {
    /// Build a world with an empty field. `actor_size` comes from the
    /// animation table; `started_at` is the clock reading at startup.
    pub fn new(config: &GameConfig, actor_size: (i32, i32), frame_count: usize, started_at: u64) -> Self {
        let f = &config.field;
        let t = &config.timing;
        let actor = Actor::new(config.spawn, actor_size.0, actor_size.1, f.width, f.height, frame_count);
        World {
            spawn: actor.position(),
            actor,
            field: ObstacleField::new(f.width, f.height, f.obstacle_width, f.obstacle_height, f.capacity),
            input: InputResolver::new(t.button_delay_ms),
            activity: ActivityController::new(t.inactivity_timeout_ms, started_at),
            wander: WanderPolicy::new(t.wander_interval_ms),
            render_gate: RateGate::new(t.render_interval_ms),
            generation: config.generation.clone(),
            tick: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.activity.mode()
    }

    /// The actor's footprint at its spawn position.
    pub fn spawn_rect(&self) -> Rect {
        let (w, h) = self.actor.size();
        Rect::at(self.spawn, w, h)
    }

    /// Replace the obstacle layout using the configured strategy.
    pub fn regenerate(&mut self, rng: &mut dyn RandomSource) {
        let spawn = self.spawn_rect();
        let g = &self.generation;
        match g.strategy {
            Strategy::Grid => self.field.generate_grid(&spawn, g.grid, rng),
            Strategy::Clustered => self.field.generate_clustered(g.clusters, rng),
            Strategy::Path => self.field.generate_path(g.clusters, g.removal_percent, rng),
        }
        info!(
            strategy = ?g.strategy,
            obstacles = self.field.len(),
            live = self.field.live().count(),
            "obstacle field generated"
        );
    }
}
