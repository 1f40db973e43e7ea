/// Random source used by obstacle generation and wandering.
///
/// Ranges are inclusive on both ends. The host seeds once at startup;
/// tests substitute a scripted source so that every draw is known.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Restart the sequence from `seed`.
    fn seed(&mut self, seed: u64);

    /// Uniform integer in `[min, max]`. Returns `min` when `min > max`.
    fn next_in_range(&mut self, min: i32, max: i32) -> i32;

    /// `true` with probability `percent / 100`, using a single draw.
    fn chance(&mut self, percent: u32) -> bool {
        (self.next_in_range(0, 99) as u32) < percent
    }
}

/// Seedable generator backed by `StdRng`.
pub struct SeededRng {
    rng: StdRng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        SeededRng { rng: StdRng::seed_from_u64(seed) }
    }

    /// Seed drawn from the OS entropy pool.
    pub fn entropy_seed() -> u64 {
        rand::random::<u64>()
    }
}

impl RandomSource for SeededRng {
    fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn next_in_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Replays a fixed list of values, cycling when exhausted.
/// Values outside the requested range are clamped into it.
#[cfg(test)]
pub struct ScriptedRandom {
    values: Vec<i32>,
    cursor: usize,
    pub draws: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(values: &[i32]) -> Self {
        ScriptedRandom { values: values.to_vec(), cursor: 0, draws: 0 }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn seed(&mut self, _seed: u64) {
        self.cursor = 0;
    }

    fn next_in_range(&mut self, min: i32, max: i32) -> i32 {
        self.draws += 1;
        if self.values.is_empty() || min >= max {
            return min;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        let xs: Vec<i32> = (0..32).map(|_| a.next_in_range(-5, 4)).collect();
        let ys: Vec<i32> = (0..32).map(|_| b.next_in_range(-5, 4)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn reseed_restarts_sequence() {
        let mut rng = SeededRng::new(7);
        let first: Vec<i32> = (0..8).map(|_| rng.next_in_range(0, 99)).collect();
        rng.seed(7);
        let again: Vec<i32> = (0..8).map(|_| rng.next_in_range(0, 99)).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn range_is_inclusive() {
        let mut rng = SeededRng::new(1);
        let mut seen = [false; 8];
        for _ in 0..2000 {
            let v = rng.next_in_range(0, 7);
            assert!((0..=7).contains(&v));
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn inverted_range_returns_min() {
        let mut rng = SeededRng::new(1);
        assert_eq!(rng.next_in_range(5, 5), 5);
        assert_eq!(rng.next_in_range(9, 3), 9);
    }

    #[test]
    fn chance_uses_one_draw_per_call() {
        let mut rng = ScriptedRandom::new(&[29, 30, 0, 99]);
        assert!(rng.chance(30));
        assert!(!rng.chance(30));
        assert!(rng.chance(30));
        assert!(!rng.chance(30));
        assert_eq!(rng.draws, 4);
    }
}
