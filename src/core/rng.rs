//! Seeded Order Picker
//!
//! The engine never draws random numbers. This Xorshift128+ generator feeds
//! the simulation binary and the randomized tests, so a seed pins down every
//! order they issue and a recorded battle can be played again exactly.

use super::hex::{Coord, MAP_HEIGHT, MAP_WIDTH};

/// Xorshift128+ generator seeded through SplitMix64.
///
/// # Example
///
/// ```
/// use broadside::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(12345);
/// assert_eq!(rng.next_u64(), 6233086606872742541);
/// ```
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    s0: u64,
    s1: u64,
}

impl DeterministicRng {
    /// Generator for `seed`. Every seed, zero included, gives a live state.
    pub fn new(seed: u64) -> Self {
        let mut mix = seed;
        let s0 = splitmix64(&mut mix);
        let s1 = splitmix64(&mut mix);
        if s0 | s1 == 0 {
            return Self { s0: 1, s1: 1 };
        }
        Self { s0, s1 }
    }

    /// Next raw 64-bit output.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let (a, b) = (self.s0, self.s1 ^ self.s0);
        let out = self.s0.wrapping_add(self.s1);
        self.s0 = a.rotate_left(24) ^ b ^ (b << 16);
        self.s1 = b.rotate_left(37);
        out
    }

    /// Uniform-ish value in `0..bound`; 0 when `bound` is 0.
    #[inline]
    pub fn below(&mut self, bound: u32) -> u32 {
        match bound {
            0 => 0,
            n => (self.next_u64() % u64::from(n)) as u32,
        }
    }

    /// True `percent` times out of 100.
    #[inline]
    pub fn chance(&mut self, percent: u32) -> bool {
        self.below(100) < percent
    }

    /// Any cell on the map.
    pub fn random_coord(&mut self) -> Coord {
        let x = self.below(MAP_WIDTH as u32) as i32;
        let y = self.below(MAP_HEIGHT as u32) as i32;
        Coord::new(x, y)
    }

    /// A cell at most `radius` columns and rows from `center`, clamped to the map.
    pub fn random_coord_near(&mut self, center: Coord, radius: i32) -> Coord {
        let x = center.x.saturating_add(self.offset(radius));
        let y = center.y.saturating_add(self.offset(radius));
        Coord::new(x.clamp(0, MAP_WIDTH - 1), y.clamp(0, MAP_HEIGHT - 1))
    }

    /// One element of `items`, or `None` when it is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.below(items.len() as u32) as usize)
    }

    /// Offset in `-radius..=radius`.
    fn offset(&mut self, radius: i32) -> i32 {
        let radius = radius.clamp(0, MAP_WIDTH.max(MAP_HEIGHT));
        self.below((2 * radius + 1) as u32) as i32 - radius
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
