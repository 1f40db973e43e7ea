/// Obstacle field: a fixed-capacity list of rectangular walls.
///
/// ## Capacity
///
/// The field never holds more than `capacity` obstacles. `push` past the
/// limit is a silent no-op; the generators rely on this to stop placing
/// walls once the field is full. A capacity of zero is a valid (empty) field.
///
/// ## Removal
///
/// Path carving marks an obstacle removed by moving it to the sentinel
/// position `(-1, -1)`. The slot stays occupied (`len()` is unchanged), but
/// removed obstacles are skipped by `collides()` and by `live()`.
///
/// ## Generators
///
///   - `generate_grid`      → one candidate per grid cell, row-major
///   - `generate_clustered` → random clusters of jittered walls
///   - `generate_path`      → clustered, then randomly carve walls away
///
/// Every generator clears the field first.

use tracing::debug;

use super::geom::{Position, Rect};
use super::random::RandomSource;

/// Position marking a removed obstacle.
pub const SENTINEL: Position = Position::new(-1, -1);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Obstacle {
    pub rect: Rect,
}

impl Obstacle {
    pub const fn position(&self) -> Position {
        Position::new(self.rect.x, self.rect.y)
    }

    pub fn is_removed(&self) -> bool {
        self.position() == SENTINEL
    }
}

/// Grid generation parameters.
#[derive(Clone, Copy, Debug)]
pub struct GridParams {
    /// Chance (0..=100) that an eligible cell receives a wall.
    pub fill_percent: u32,
    /// Pixels added on every side of the spawn rect to form the safety zone.
    pub spawn_buffer: i32,
}

impl Default for GridParams {
    fn default() -> Self {
        GridParams { fill_percent: 50, spawn_buffer: 20 }
    }
}

/// Clustered generation parameters.
#[derive(Clone, Copy, Debug)]
pub struct ClusterParams {
    pub count: u32,
    pub min_size: i32,
    pub max_size: i32,
    /// Offsets are drawn from `[-spread, spread - 1]`.
    pub spread: i32,
}

impl Default for ClusterParams {
    fn default() -> Self {
        ClusterParams { count: 10, min_size: 3, max_size: 5, spread: 5 }
    }
}

#[derive(Clone, Debug)]
pub struct ObstacleField {
    width: i32,
    height: i32,
    obstacle_w: i32,
    obstacle_h: i32,
    capacity: usize,
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(width: i32, height: i32, obstacle_w: i32, obstacle_h: i32, capacity: usize) -> Self {
        ObstacleField {
            width,
            height,
            obstacle_w,
            obstacle_h,
            capacity,
            obstacles: Vec::with_capacity(capacity),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored obstacles, removed ones included.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.obstacles.len() >= self.capacity
    }

    /// All stored obstacles in insertion order.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Obstacles that still block movement.
    pub fn live(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| !o.is_removed())
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Append a wall with the field's obstacle size at `(x, y)`.
    /// Returns `false` (and stores nothing) when the field is full.
    pub fn push(&mut self, x: i32, y: i32) -> bool {
        if self.is_full() {
            return false;
        }
        self.obstacles.push(Obstacle {
            rect: Rect::new(x, y, self.obstacle_w, self.obstacle_h),
        });
        true
    }

    /// Mark obstacle `idx` removed. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, idx: usize) {
        if let Some(o) = self.obstacles.get_mut(idx) {
            o.rect.x = SENTINEL.x;
            o.rect.y = SENTINEL.y;
        }
    }

    /// Does `rect` overlap any live obstacle?
    pub fn collides(&self, rect: &Rect) -> bool {
        self.live().any(|o| o.rect.overlaps(rect))
    }

    // ── Generators ──

    /// Maze-like layout: walk the grid row-major and fill cells at random,
    /// skipping every cell that touches the safety zone around `spawn`.
    pub fn generate_grid(&mut self, spawn: &Rect, params: GridParams, rng: &mut dyn RandomSource) {
        self.clear();
        if self.obstacle_w <= 0 || self.obstacle_h <= 0 {
            return;
        }

        let zone = spawn.expand(params.spawn_buffer);
        let cols = self.width / self.obstacle_w;
        let rows = self.height / self.obstacle_h;

        for row in 0..rows {
            for col in 0..cols {
                let cell = Rect::new(
                    col * self.obstacle_w,
                    row * self.obstacle_h,
                    self.obstacle_w,
                    self.obstacle_h,
                );
                if cell.overlaps(&zone) {
                    continue;
                }
                if rng.chance(params.fill_percent) {
                    self.push(cell.x, cell.y);
                }
            }
        }
        debug!(count = self.len(), "grid obstacles generated");
    }

    /// Scatter `params.count` clusters over the field. Members that would
    /// poke outside the field are discarded.
    pub fn generate_clustered(&mut self, params: ClusterParams, rng: &mut dyn RandomSource) {
        self.clear();
        let bounds = self.bounds();

        for _ in 0..params.count {
            let cx = rng.next_in_range(0, self.width - 1);
            let cy = rng.next_in_range(0, self.height - 1);
            let size = rng.next_in_range(params.min_size, params.max_size);

            for _ in 0..size {
                let ox = rng.next_in_range(-params.spread, params.spread - 1);
                let oy = rng.next_in_range(-params.spread, params.spread - 1);
                let candidate = Rect::new(cx + ox, cy + oy, self.obstacle_w, self.obstacle_h);
                if bounds.contains(&candidate) {
                    self.push(candidate.x, candidate.y);
                }
            }
        }
        debug!(count = self.len(), "clustered obstacles generated");
    }

    /// Clustered layout with a random subset of walls carved away.
    pub fn generate_path(
        &mut self,
        clusters: ClusterParams,
        removal_percent: u32,
        rng: &mut dyn RandomSource,
    ) {
        self.generate_clustered(clusters, rng);
        for idx in 0..self.obstacles.len() {
            if rng.chance(removal_percent) {
                self.remove_at(idx);
            }
        }
        debug!(
            count = self.len(),
            live = self.live().count(),
            "path obstacles generated"
        );
    }
}
