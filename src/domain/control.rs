/// Player control: button → movement resolution and the activity tracker
/// that decides who is driving the slime.
///
/// ## Input resolution
///
/// Directions are visited in the fixed order Left, Right, Up, Down. Each
/// has its own repeat gate. A pressed direction whose gate is open attempts
/// a one-pixel move; the gate re-arms whether or not the move succeeded, so
/// holding a button against a wall retries at the repeat rate rather than
/// every tick. Two held directions move diagonally.
///
/// ## Mode
///
///   Controlled ──(no input for `inactivity_timeout`)──▶ Autonomous
///   Autonomous ──(any directional attempt)───────────▶ Controlled

use super::entity::{Actor, Buttons, Direction, MoveOutcome};
use super::obstacle::ObstacleField;
use super::timing::RateGate;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Controlled,
    Autonomous,
}

/// What the input resolver did this tick.
#[derive(Clone, Debug, Default)]
pub struct InputReport {
    pub attempts: Vec<(Direction, MoveOutcome)>,
}

impl InputReport {
    /// Was there any directional attempt (accepted or rejected)?
    pub fn had_input(&self) -> bool {
        !self.attempts.is_empty()
    }
}

pub struct InputResolver {
    gates: [RateGate; 4],
}

impl InputResolver {
    pub fn new(button_delay: u64) -> Self {
        InputResolver { gates: [RateGate::new(button_delay); 4] }
    }

    pub fn resolve(
        &mut self,
        now: u64,
        buttons: &Buttons,
        actor: &mut Actor,
        field: &ObstacleField,
    ) -> InputReport {
        let mut report = InputReport::default();
        for dir in Direction::ALL {
            if !buttons.is_pressed(dir) {
                continue;
            }
            let gate = &mut self.gates[dir.index()];
            if !gate.try_fire(now) {
                continue;
            }
            let (dx, dy) = dir.delta();
            let outcome = actor.try_move(dx, dy, field);
            report.attempts.push((dir, outcome));
        }
        report
    }
}

pub struct ActivityController {
    mode: Mode,
    last_input: u64,
    inactivity_timeout: u64,
}

impl ActivityController {
    /// `started_at` counts as the last input, so the idle countdown runs
    /// from startup.
    pub fn new(inactivity_timeout: u64, started_at: u64) -> Self {
        ActivityController {
            mode: Mode::Controlled,
            last_input: started_at,
            inactivity_timeout,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn last_input(&self) -> u64 {
        self.last_input
    }

    /// Fold this tick's input into the mode. Returns the new mode when it
    /// changed.
    pub fn observe(&mut self, now: u64, had_input: bool) -> Option<Mode> {
        let before = self.mode;
        if had_input {
            self.last_input = now;
            self.mode = Mode::Controlled;
        }
        if self.mode == Mode::Controlled
            && now.saturating_sub(self.last_input) >= self.inactivity_timeout
        {
            self.mode = Mode::Autonomous;
        }
        if self.mode != before { Some(self.mode) } else { None }
    }
}
