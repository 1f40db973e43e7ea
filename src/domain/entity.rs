/// Entities: the slime actor plus the small value types that drive it
/// (button snapshot, directions, wander headings).

use super::geom::{Position, Rect};
use super::obstacle::ObstacleField;

/// The four directional buttons, in the order the input resolver visits them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One sample of the six buttons. A and B are read but currently unused.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Buttons {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub a: bool,
    pub b: bool,
}

impl Buttons {
    pub const fn is_pressed(&self, dir: Direction) -> bool {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    /// Combine two sources (keyboard + gamepad): a button is down if
    /// either source reports it.
    pub fn merge(self, other: Buttons) -> Buttons {
        Buttons {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
            a: self.a || other.a,
            b: self.b || other.b,
        }
    }
}

/// Wander heading: 4 cardinal + 4 diagonal unit steps.
/// Discriminants are the indices drawn from the random source.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Heading {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
    UpLeft = 4,
    UpRight = 5,
    DownLeft = 6,
    DownRight = 7,
}

impl Heading {
    pub const COUNT: i32 = 8;

    /// Map a drawn index to a heading; out-of-range values wrap.
    pub fn from_index(idx: i32) -> Heading {
        match idx.rem_euclid(Self::COUNT) {
            0 => Heading::Left,
            1 => Heading::Right,
            2 => Heading::Up,
            3 => Heading::Down,
            4 => Heading::UpLeft,
            5 => Heading::UpRight,
            6 => Heading::DownLeft,
            _ => Heading::DownRight,
        }
    }

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::UpLeft => (-1, -1),
            Heading::UpRight => (1, -1),
            Heading::DownLeft => (-1, 1),
            Heading::DownRight => (1, 1),
        }
    }
}

/// Result of a movement attempt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// Committed exactly as requested.
    Moved,
    /// Committed, then pulled back inside the screen.
    Clamped,
    /// Candidate overlaps an obstacle; position unchanged.
    Blocked,
    /// Candidate leaves the screen; position unchanged (strict moves only).
    OutOfBounds,
}

impl MoveOutcome {
    pub const fn is_rejected(self) -> bool {
        matches!(self, MoveOutcome::Blocked | MoveOutcome::OutOfBounds)
    }
}

/// The slime. Position only changes through `try_move` / `try_step`,
/// both of which leave it inside `[0, screen - size]` on each axis.
#[derive(Clone, Debug)]
pub struct Actor {
    pos: Position,
    width: i32,
    height: i32,
    screen_w: i32,
    screen_h: i32,
    frame: usize,
    frame_count: usize,
}

impl Actor {
    pub fn new(spawn: Position, width: i32, height: i32, screen_w: i32, screen_h: i32, frame_count: usize) -> Self {
        let mut actor = Actor {
            pos: spawn,
            width,
            height,
            screen_w,
            screen_h,
            frame: 0,
            frame_count: frame_count.max(1),
        };
        actor.clamp();
        actor
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.pos, self.width, self.height)
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Largest legal top-left coordinate on each axis.
    pub fn max_x(&self) -> i32 {
        (self.screen_w - self.width).max(0)
    }

    pub fn max_y(&self) -> i32 {
        (self.screen_h - self.height).max(0)
    }

    fn in_screen(&self, p: Position) -> bool {
        p.x >= 0 && p.x <= self.max_x() && p.y >= 0 && p.y <= self.max_y()
    }

    fn clamp(&mut self) {
        self.pos.x = self.pos.x.clamp(0, self.max_x());
        self.pos.y = self.pos.y.clamp(0, self.max_y());
    }

    /// Player movement: reject on collision, otherwise commit and clamp.
    pub fn try_move(&mut self, dx: i32, dy: i32, field: &ObstacleField) -> MoveOutcome {
        let candidate = self.pos.offset(dx, dy);
        if field.collides(&Rect::at(candidate, self.width, self.height)) {
            return MoveOutcome::Blocked;
        }
        self.pos = candidate;
        self.clamp();
        if self.pos == candidate { MoveOutcome::Moved } else { MoveOutcome::Clamped }
    }

    /// Wander movement: reject on collision or if the step would leave the
    /// screen. Nothing is committed on rejection.
    pub fn try_step(&mut self, dx: i32, dy: i32, field: &ObstacleField) -> MoveOutcome {
        let candidate = self.pos.offset(dx, dy);
        if field.collides(&Rect::at(candidate, self.width, self.height)) {
            return MoveOutcome::Blocked;
        }
        if !self.in_screen(candidate) {
            return MoveOutcome::OutOfBounds;
        }
        self.pos = candidate;
        MoveOutcome::Moved
    }

    pub fn advance_frame(&mut self) {
        self.frame = (self.frame + 1) % self.frame_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn slime_at(x: i32, y: i32) -> Actor {
        Actor::new(Position::new(x, y), 16, 9, 128, 64, 4)
    }

    fn open_field() -> ObstacleField {
        ObstacleField::new(128, 64, 16, 16, 15)
    }

    #[rstest]
    #[case(Heading::Left, (-1, 0))]
    #[case(Heading::Right, (1, 0))]
    #[case(Heading::Up, (0, -1))]
    #[case(Heading::Down, (0, 1))]
    #[case(Heading::UpLeft, (-1, -1))]
    #[case(Heading::UpRight, (1, -1))]
    #[case(Heading::DownLeft, (-1, 1))]
    #[case(Heading::DownRight, (1, 1))]
    fn heading_deltas(#[case] heading: Heading, #[case] delta: (i32, i32)) {
        assert_eq!(heading.delta(), delta);
        assert_eq!(Heading::from_index(heading as i32), heading);
    }

    #[test]
    fn spawn_outside_screen_is_clamped() {
        let a = slime_at(200, -3);
        assert_eq!(a.position(), Position::new(112, 0));
    }

    #[test]
    fn move_commits_when_clear() {
        let mut a = slime_at(10, 39);
        assert_eq!(a.try_move(1, 0, &open_field()), MoveOutcome::Moved);
        assert_eq!(a.position(), Position::new(11, 39));
    }

    #[test]
    fn blocked_move_leaves_position_untouched() {
        let mut f = open_field();
        f.push(26, 32);
        let mut a = slime_at(10, 39);
        let before = a.position();
        assert_eq!(a.try_move(1, 0, &f), MoveOutcome::Blocked);
        assert_eq!(a.position(), before);
        assert_eq!(a.try_move(1, 0, &f), MoveOutcome::Blocked);
        assert_eq!(a.position(), before);
    }

    #[test]
    fn move_past_edge_is_clamped() {
        let mut a = slime_at(0, 55);
        assert_eq!(a.try_move(-1, 0, &open_field()), MoveOutcome::Clamped);
        assert_eq!(a.position(), Position::new(0, 55));
        assert_eq!(a.try_move(0, 1, &open_field()), MoveOutcome::Clamped);
        assert_eq!(a.position(), Position::new(0, 55));
    }

    #[test]
    fn position_stays_on_screen_under_random_moves() {
        use crate::domain::random::{RandomSource, SeededRng};
        let mut rng = SeededRng::new(99);
        let mut f = open_field();
        f.push(64, 16);
        let mut a = slime_at(10, 39);
        for _ in 0..5000 {
            let dx = rng.next_in_range(-3, 3);
            let dy = rng.next_in_range(-3, 3);
            if rng.chance(50) {
                a.try_move(dx, dy, &f);
            } else {
                a.try_step(dx, dy, &f);
            }
            let p = a.position();
            assert!((0..=112).contains(&p.x), "x = {}", p.x);
            assert!((0..=55).contains(&p.y), "y = {}", p.y);
        }
    }

    #[test]
    fn strict_step_rejects_leaving_screen() {
        let mut a = slime_at(0, 30);
        assert_eq!(a.try_step(-1, 1, &open_field()), MoveOutcome::OutOfBounds);
        assert_eq!(a.position(), Position::new(0, 30));
        assert_eq!(a.try_step(1, 1, &open_field()), MoveOutcome::Moved);
        assert_eq!(a.position(), Position::new(1, 31));
    }

    #[test]
    fn strict_step_reports_collision_first() {
        let mut f = open_field();
        f.push(0, 39);
        let mut a = slime_at(16, 39);
        assert_eq!(a.try_step(-1, 0, &f), MoveOutcome::Blocked);
    }

    #[test]
    fn frame_wraps_at_count() {
        let mut a = slime_at(0, 0);
        let seen: Vec<usize> = (0..6).map(|_| { a.advance_frame(); a.frame() }).collect();
        assert_eq!(seen, vec![1, 2, 3, 0, 1, 2]);
    }

    #[test]
    fn zero_frames_treated_as_one() {
        let mut a = Actor::new(Position::new(0, 0), 16, 9, 128, 64, 0);
        a.advance_frame();
        assert_eq!(a.frame(), 0);
    }

    #[test]
    fn buttons_merge_is_or() {
        let kb = Buttons { left: true, ..Buttons::default() };
        let pad = Buttons { up: true, a: true, ..Buttons::default() };
        let both = kb.merge(pad);
        assert!(both.left && both.up && both.a);
        assert!(!both.right && !both.down && !both.b);
    }
}
