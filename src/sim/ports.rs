/// Capabilities the simulation consumes from the host: time, buttons and a
/// drawing surface. The simulation never reads back from the surface.

use std::io;
use std::time::Instant;

use crate::domain::entity::Buttons;

pub trait Clock {
    /// Monotonic milliseconds since an arbitrary origin.
    fn now_millis(&self) -> u64;
}

pub trait ButtonSource {
    /// Sample all six buttons once. Called once per tick.
    fn sample(&mut self) -> Buttons;
}

/// A 1-bit drawing surface.
pub trait DisplaySurface {
    fn clear(&mut self);

    /// Draw an XBM bitmap with its top-left corner at `(x, y)`.
    fn draw_bitmap(&mut self, x: i32, y: i32, w: i32, h: i32, data: &[u8]);

    fn draw_filled_rect(&mut self, x: i32, y: i32, w: i32, h: i32);

    /// Push the finished frame to the output device.
    fn present(&mut self) -> io::Result<()>;
}

/// Wall clock backed by `Instant`, starting at zero.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock { origin: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
