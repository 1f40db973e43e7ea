/// The step function: advances the world by one tick.
///
/// Processing order (one clock reading for the whole tick):
///   1. Input resolution   → per-direction repeat gates, player moves
///   2. Activity update    → Controlled ⇄ Autonomous
///   3. Wander             → only while Autonomous, own step gate
///
/// Drawing is separate (`render`) so the host can step and draw on
/// different cadences; it has its own gate.

use std::io;

use tracing::debug;

use crate::domain::control::Mode;
use crate::domain::entity::{Buttons, MoveOutcome};
use crate::domain::random::RandomSource;
use crate::domain::sprite::AnimationTable;
use crate::domain::wander::WanderStep;
use super::event::SimEvent;
use super::ports::DisplaySurface;
use super::world::World;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut World, now: u64, buttons: &Buttons, rng: &mut dyn RandomSource) -> Vec<SimEvent> {
    let mut events: Vec<SimEvent> = Vec::new();
    world.tick += 1;

    let had_input = resolve_input(world, now, buttons, &mut events);
    resolve_mode(world, now, had_input, &mut events);
    if world.mode() == Mode::Autonomous {
        resolve_wander(world, now, rng, &mut events);
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Input
// ══════════════════════════════════════════════════════════════

fn resolve_input(world: &mut World, now: u64, buttons: &Buttons, events: &mut Vec<SimEvent>) -> bool {
    let report = world.input.resolve(now, buttons, &mut world.actor, &world.field);
    for &(dir, outcome) in &report.attempts {
        if outcome == MoveOutcome::Blocked {
            events.push(SimEvent::Bumped { dir, at: world.actor.position() });
        }
    }
    report.had_input()
}

// ══════════════════════════════════════════════════════════════
// Mode
// ══════════════════════════════════════════════════════════════

fn resolve_mode(world: &mut World, now: u64, had_input: bool, events: &mut Vec<SimEvent>) {
    if let Some(mode) = world.activity.observe(now, had_input) {
        events.push(SimEvent::ModeChanged { mode, at: now });
    }
}

// ══════════════════════════════════════════════════════════════
// Wander
// ══════════════════════════════════════════════════════════════

fn resolve_wander(world: &mut World, now: u64, rng: &mut dyn RandomSource, events: &mut Vec<SimEvent>) {
    let result = world.wander.step(now, &mut world.actor, &world.field, rng);
    if let WanderStep::Turned { from, to, outcome } = result {
        debug!(?from, ?to, ?outcome, "wander heading changed");
        events.push(SimEvent::HeadingChanged { from, to, cause: outcome });
    }
}

// ══════════════════════════════════════════════════════════════
// Render
// ══════════════════════════════════════════════════════════════

/// Draw the world if the render gate is open. Returns whether a frame
/// was presented. The animation frame advances after every presented
/// frame, whether or not the actor moved.
pub fn render(
    world: &mut World,
    now: u64,
    surface: &mut dyn DisplaySurface,
    assets: &AnimationTable,
) -> io::Result<bool> {
    if !world.render_gate.try_fire(now) {
        return Ok(false);
    }

    surface.clear();

    let pos = world.actor.position();
    if let Some(frame) = assets.frame(world.actor.frame()) {
        surface.draw_bitmap(pos.x, pos.y, assets.width(), assets.height(), frame);
    }

    for o in world.field.live() {
        let r = o.rect;
        surface.draw_filled_rect(r.x, r.y, r.w, r.h);
    }

    surface.present()?;
    world.actor.advance_frame();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::{Direction, Heading};
    use crate::domain::geom::Position;
    use crate::domain::random::ScriptedRandom;
    use crate::sim::ports::fakes::{DrawCall, FakeClock, RecordingSurface};
    use crate::sim::ports::Clock;

    fn world() -> World {
        World::new(&GameConfig::default(), (16, 9), 4, 0)
    }

    fn assets() -> AnimationTable {
        AnimationTable::from_art(16, 9, &[&["#"], &["##"], &["###"], &["####"]])
    }

    fn idle() -> Buttons {
        Buttons::default()
    }

    #[test]
    fn left_up_same_tick_is_one_diagonal_step() {
        let mut w = world();
        let mut rng = ScriptedRandom::new(&[0]);
        let b = Buttons { left: true, up: true, ..Buttons::default() };
        let events = step(&mut w, 100, &b, &mut rng);
        assert!(events.is_empty());
        assert_eq!(w.actor.position(), Position::new(9, 38));
    }

    #[test]
    fn idle_timeout_switches_to_wander() {
        let mut w = world();
        let mut rng = ScriptedRandom::new(&[1]);
        let clock = FakeClock::new(0);

        clock.set(4999);
        assert!(step(&mut w, clock.now_millis(), &idle(), &mut rng).is_empty());
        assert_eq!(w.mode(), Mode::Controlled);

        clock.set(5000);
        let events = step(&mut w, clock.now_millis(), &idle(), &mut rng);
        assert_eq!(events, vec![SimEvent::ModeChanged { mode: Mode::Autonomous, at: 5000 }]);
        // Wandering starts the same tick.
        assert_eq!(w.wander.heading(), Some(Heading::Right));
        assert_eq!(w.actor.position(), Position::new(11, 39));
    }

    #[test]
    fn input_during_wander_takes_back_control() {
        let mut w = world();
        let mut rng = ScriptedRandom::new(&[1]);
        step(&mut w, 5000, &idle(), &mut rng);
        assert_eq!(w.mode(), Mode::Autonomous);

        let b = Buttons { down: true, ..Buttons::default() };
        let events = step(&mut w, 5100, &b, &mut rng);
        assert_eq!(events, vec![SimEvent::ModeChanged { mode: Mode::Controlled, at: 5100 }]);
        // Moved down by the player; no wander step this tick.
        assert_eq!(w.actor.position(), Position::new(11, 40));
    }

    #[test]
    fn rejected_input_still_counts_as_activity() {
        let mut w = world();
        // Wall flush against the slime's right edge.
        w.field.push(26, 32);
        // Wanders up one pixel, still against the wall.
        let mut rng = ScriptedRandom::new(&[2]);
        step(&mut w, 5000, &idle(), &mut rng);
        assert_eq!(w.mode(), Mode::Autonomous);

        let b = Buttons { right: true, ..Buttons::default() };
        let before = w.actor.position();
        let events = step(&mut w, 6000, &b, &mut rng);
        assert!(events.contains(&SimEvent::Bumped { dir: Direction::Right, at: before }));
        assert!(events.contains(&SimEvent::ModeChanged { mode: Mode::Controlled, at: 6000 }));
        assert_eq!(w.actor.position(), before);
    }

    #[test]
    fn wander_turn_is_reported() {
        let mut w = world();
        w.field.push(26, 32);
        w.wander.set_heading(Heading::Right);
        let mut rng = ScriptedRandom::new(&[2]);
        let events = step(&mut w, 5000, &idle(), &mut rng);
        assert!(events.contains(&SimEvent::HeadingChanged {
            from: Heading::Right,
            to: Heading::Up,
            cause: MoveOutcome::Blocked,
        }));
        assert_eq!(w.actor.position(), Position::new(10, 39));
    }

    #[test]
    fn render_draws_actor_then_live_obstacles() {
        let mut w = world();
        w.field.push(64, 0);
        w.field.push(80, 0);
        w.field.remove_at(1);
        let mut surface = RecordingSurface::default();

        assert!(render(&mut w, 50, &mut surface, &assets()).unwrap());
        assert_eq!(
            surface.calls,
            vec![
                DrawCall::Clear,
                DrawCall::Bitmap { x: 10, y: 39, w: 16, h: 9, len: 18 },
                DrawCall::Rect { x: 64, y: 0, w: 16, h: 16 },
                DrawCall::Present,
            ]
        );
        assert_eq!(w.actor.frame(), 1);
    }

    #[test]
    fn render_is_rate_limited() {
        let mut w = world();
        let mut surface = RecordingSurface::default();
        let a = assets();
        assert!(render(&mut w, 50, &mut surface, &a).unwrap());
        assert!(!render(&mut w, 99, &mut surface, &a).unwrap());
        assert!(render(&mut w, 100, &mut surface, &a).unwrap());
        assert_eq!(w.actor.frame(), 2);
        let presents = surface.calls.iter().filter(|c| **c == DrawCall::Present).count();
        assert_eq!(presents, 2);
    }

    #[test]
    fn scripted_session_hands_control_back_and_forth() {
        use crate::sim::ports::fakes::HeldButtons;
        use crate::sim::ports::ButtonSource;

        let mut w = world();
        let mut rng = ScriptedRandom::new(&[1]);
        let clock = FakeClock::new(0);
        let mut pad = HeldButtons::default();
        let mut modes = Vec::new();

        // 6 s idle, then hold Down for 1 s, then idle again for 6 s.
        for t in 0..1300u64 {
            clock.advance(10);
            pad.0 = Buttons { down: (600..700).contains(&t), ..Buttons::default() };
            for e in step(&mut w, clock.now_millis(), &pad.sample(), &mut rng) {
                if let SimEvent::ModeChanged { mode, .. } = e {
                    modes.push(mode);
                }
            }
        }

        assert_eq!(
            modes,
            vec![Mode::Autonomous, Mode::Controlled, Mode::Autonomous]
        );
        // Heading drawn once and kept across the switch.
        assert_eq!(rng.draws, 1);
        assert_eq!(w.wander.heading(), Some(Heading::Right));
    }

    #[test]
    fn animation_cycles_without_movement() {
        let mut w = world();
        let mut surface = RecordingSurface::default();
        let a = assets();
        for i in 1..=5 {
            render(&mut w, i * 50, &mut surface, &a).unwrap();
        }
        assert_eq!(w.actor.frame(), 1);
        assert_eq!(w.actor.position(), Position::new(10, 39));
    }
}
