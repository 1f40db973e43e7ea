/// Events emitted during a simulation step.
/// The host consumes these for logging.

use crate::domain::control::Mode;
use crate::domain::entity::{Direction, Heading, MoveOutcome};
use crate::domain::geom::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    ModeChanged { mode: Mode, at: u64 },
    /// A player move ran into a wall.
    Bumped { dir: Direction, at: Position },
    HeadingChanged { from: Heading, to: Heading, cause: MoveOutcome },
}
