/// Autonomous wandering.
///
/// The slime walks in a straight line along its current heading and only
/// turns when the next step is refused (wall or screen edge). A refused
/// step costs the tick: the new heading is used from the following step.
///
/// The heading is drawn lazily on the first wander step and then kept for
/// the lifetime of the policy, across mode switches, until `reset()`.

use super::entity::{Actor, Heading, MoveOutcome};
use super::obstacle::ObstacleField;
use super::random::RandomSource;
use super::timing::RateGate;

/// What one call to `step` did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WanderStep {
    /// Step gate still closed.
    Waiting,
    Moved(Heading),
    /// Step refused; `to` will be tried next time.
    Turned { from: Heading, to: Heading, outcome: MoveOutcome },
}

pub struct WanderPolicy {
    heading: Option<Heading>,
    gate: RateGate,
}

impl WanderPolicy {
    pub fn new(step_interval: u64) -> Self {
        WanderPolicy { heading: None, gate: RateGate::new(step_interval) }
    }

    pub fn heading(&self) -> Option<Heading> {
        self.heading
    }

    /// Forget the heading; the next step draws a fresh one.
    pub fn reset(&mut self) {
        self.heading = None;
    }

    /// Force a heading (tests, scripted demos).
    pub fn set_heading(&mut self, heading: Heading) {
        self.heading = Some(heading);
    }

    pub fn step(
        &mut self,
        now: u64,
        actor: &mut Actor,
        field: &ObstacleField,
        rng: &mut dyn RandomSource,
    ) -> WanderStep {
        if !self.gate.try_fire(now) {
            return WanderStep::Waiting;
        }

        let heading = match self.heading {
            Some(h) => h,
            None => {
                let h = draw_heading(rng);
                self.heading = Some(h);
                h
            }
        };

        let (dx, dy) = heading.delta();
        match actor.try_step(dx, dy, field) {
            MoveOutcome::Moved => WanderStep::Moved(heading),
            outcome => {
                let next = draw_heading(rng);
                self.heading = Some(next);
                WanderStep::Turned { from: heading, to: next, outcome }
            }
        }
    }
}

fn draw_heading(rng: &mut dyn RandomSource) -> Heading {
    Heading::from_index(rng.next_in_range(0, Heading::COUNT - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geom::Position;
    use crate::domain::random::ScriptedRandom;

    fn actor_at(x: i32, y: i32) -> Actor {
        Actor::new(Position::new(x, y), 16, 9, 128, 64, 4)
    }

    fn field() -> ObstacleField {
        ObstacleField::new(128, 64, 16, 16, 15)
    }

    #[test]
    fn first_step_draws_heading_and_moves() {
        let mut w = WanderPolicy::new(50);
        let mut a = actor_at(40, 20);
        let mut rng = ScriptedRandom::new(&[1]);
        assert_eq!(w.heading(), None);
        assert_eq!(w.step(50, &mut a, &field(), &mut rng), WanderStep::Moved(Heading::Right));
        assert_eq!(a.position(), Position::new(41, 20));
        assert_eq!(w.heading(), Some(Heading::Right));
    }

    #[test]
    fn keeps_heading_while_unobstructed() {
        let mut w = WanderPolicy::new(50);
        let mut a = actor_at(40, 20);
        let mut rng = ScriptedRandom::new(&[7]);
        for t in 1..=5 {
            w.step(t * 50, &mut a, &field(), &mut rng);
        }
        assert_eq!(a.position(), Position::new(45, 25));
        assert_eq!(rng.draws, 1);
    }

    #[test]
    fn gate_limits_step_rate() {
        let mut w = WanderPolicy::new(50);
        let mut a = actor_at(40, 20);
        let mut rng = ScriptedRandom::new(&[1]);
        w.step(50, &mut a, &field(), &mut rng);
        assert_eq!(w.step(80, &mut a, &field(), &mut rng), WanderStep::Waiting);
        assert_eq!(a.position(), Position::new(41, 20));
    }

    #[test]
    fn obstacle_ahead_turns_without_moving() {
        let mut f = field();
        // Wall directly right of a slime at (40, 20): slime spans x 40..56.
        f.push(56, 16);
        let mut w = WanderPolicy::new(50);
        w.set_heading(Heading::Right);
        let mut a = actor_at(40, 20);
        let mut rng = ScriptedRandom::new(&[2]);

        let step = w.step(50, &mut a, &f, &mut rng);
        assert_eq!(
            step,
            WanderStep::Turned { from: Heading::Right, to: Heading::Up, outcome: MoveOutcome::Blocked }
        );
        assert_eq!(a.position(), Position::new(40, 20));
        assert_eq!(w.heading(), Some(Heading::Up));

        // New heading applies on the next step.
        assert_eq!(w.step(100, &mut a, &f, &mut rng), WanderStep::Moved(Heading::Up));
        assert_eq!(a.position(), Position::new(40, 19));
    }

    #[test]
    fn screen_edge_turns_diagonal_without_partial_move() {
        let mut w = WanderPolicy::new(50);
        w.set_heading(Heading::DownLeft);
        let mut a = actor_at(0, 30);
        let mut rng = ScriptedRandom::new(&[3]);
        let step = w.step(50, &mut a, &field(), &mut rng);
        assert!(matches!(step, WanderStep::Turned { outcome: MoveOutcome::OutOfBounds, .. }));
        assert_eq!(a.position(), Position::new(0, 30));
        assert_eq!(w.heading(), Some(Heading::Down));
    }

    #[test]
    fn reset_forgets_heading() {
        let mut w = WanderPolicy::new(50);
        w.set_heading(Heading::Up);
        w.reset();
        assert_eq!(w.heading(), None);
    }
}
