/// Non-blocking rate gate: a "virtual timer" that opens once at least
/// `interval` milliseconds have passed since it last fired.
///
/// All gates in a tick are checked against the same clock reading.

#[derive(Clone, Copy, Debug)]
pub struct RateGate {
    interval: u64,
    last_fired: u64,
}

impl RateGate {
    pub const fn new(interval: u64) -> Self {
        RateGate { interval, last_fired: 0 }
    }

    pub const fn interval(&self) -> u64 {
        self.interval
    }

    pub fn is_open(&self, now: u64) -> bool {
        now.saturating_sub(self.last_fired) >= self.interval
    }

    pub fn fire(&mut self, now: u64) {
        self.last_fired = now;
    }

    /// Fire and return `true` if the gate is open at `now`.
    pub fn try_fire(&mut self, now: u64) -> bool {
        if self.is_open(now) {
            self.fire(now);
            true
        } else {
            false
        }
    }
}
