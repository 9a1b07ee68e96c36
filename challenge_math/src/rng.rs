//! Seeded pseudo-random sequences for deterministic scenario selection
//!
//! Every visitor must see the same challenge on a given calendar day, with
//! no shared server state. That works only if each client derives the same
//! draw sequence from the same seed string, so everything here is exact
//! wrapping arithmetic modulo 2^32 with no float accumulation in the state.

/// Hash a seed string to a 32-bit state.
///
/// Rolling `hash = hash * 31 + code_unit (mod 2^32)`, starting at 0 and
/// iterating UTF-16 code units. Seed strings are date keys and slot indices
/// (ASCII), but the code-unit walk keeps the value stable for any input.
pub fn hash_seed(input: &str) -> u32 {
    let mut hash: u32 = 0;
    for unit in input.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(u32::from(unit));
    }
    hash
}

/// Linear congruential generator with a fixed 32-bit state.
///
/// `state = state * 1664525 + 1013904223 (mod 2^32)`; each draw is
/// `state / 2^32`, a float in `[0, 1)`. The constants are part of the
/// reproducibility contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a generator from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Create a generator directly from a seed string.
    pub fn from_seed_str(input: &str) -> Self {
        Self::new(hash_seed(input))
    }

    /// Advance the state and draw a float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        f64::from(self.state) / 4_294_967_296.0
    }
}

/// Deterministically pick one element of a slice.
///
/// Index is `floor(draw * len) mod len`; returns `None` for an empty slice.
pub fn pick<'a, T>(items: &'a [T], rng: &mut SeededRng) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = (rng.next_f64() * items.len() as f64).floor() as usize % items.len();
    items.get(index)
}

/// Deterministic pick-based shuffle: returns the indices `0..len` in the
/// order produced by repeatedly picking from the remaining pool.
pub fn shuffle_indices(len: usize, rng: &mut SeededRng) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..len).collect();
    let mut order = Vec::with_capacity(len);
    while !remaining.is_empty() {
        let index = (rng.next_f64() * remaining.len() as f64).floor() as usize % remaining.len();
        order.push(remaining.remove(index));
    }
    order
}
