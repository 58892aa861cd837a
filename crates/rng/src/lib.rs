//! A deterministic, counter-based pseudo-random number source.
//!
//! Unlike a free-running generator, [`CounterRng`] derives every output from
//! an explicit `(seed, iteration)` pair through a fixed mixing function, so a
//! draw sequence is bit-for-bit reproducible across runs and machines and the
//! full state can be saved and restored with [`push_state`]/[`pop_state`].
//!
//! Generation steps receive a `&mut CounterRng` as an explicit capability;
//! there is no shared or thread-local random facility in this workspace.
//!
//! [`push_state`]: CounterRng::push_state
//! [`pop_state`]: CounterRng::pop_state

use smallvec::SmallVec;

pub mod utility;

/// A deterministic pseudo-random number source.
#[derive(Debug, Clone)]
pub struct CounterRng {
    seed: u32,
    iteration: u32,
    stack: SmallVec<[(u32, u32); 4]>,
}

impl CounterRng {
    /// Creates a new [`CounterRng`] with the provided seed and an iteration
    /// counter of zero.
    #[inline]
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            iteration: 0,
            stack: SmallVec::new(),
        }
    }

    /// Creates a new [`CounterRng`] from 64-bit seed material, folding it
    /// into the 32-bit seed space.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(utility::fold_u64(seed))
    }

    /// Resets the generator to `(seed, iteration = 0)`.
    #[inline]
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
        self.iteration = 0;
    }

    /// The current `(seed, iteration)` state.
    #[inline]
    pub fn state(&self) -> (u32, u32) {
        (self.seed, self.iteration)
    }

    /// Generates the next pseudo-random `u64` value and advances the
    /// iteration counter.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let packed = ((self.seed as u64) << 32) | self.iteration as u64;
        self.iteration = self.iteration.wrapping_add(1);
        utility::splitmix64(packed)
    }

    /// Generates the next pseudo-random `u32` value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    /// Generates the next pseudo-random `i32` value.
    #[inline]
    pub fn next_i32(&mut self) -> i32 {
        self.next_u32() as i32
    }

    /// Generates the next pseudo-random `f32` value in the range `[0.0, 1.0)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        utility::f32_from_u32_01(self.next_u32())
    }

    /// Generates the next pseudo-random `f32` value in the range `(-1.0, 1.0)`.
    #[inline]
    pub fn next_f32_signed(&mut self) -> f32 {
        utility::f32_from_u32_11(self.next_u32())
    }

    /// Generates a pseudo-random value in the range `[0, bound)`.
    ///
    /// Returns `0` when `bound` is `0`.
    #[inline]
    pub fn next_bounded(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        // Lemire's multiply-shift range reduction.
        ((self.next_u32() as u64 * bound as u64) >> 32) as u32
    }

    /// Saves the current `(seed, iteration)` state onto the state stack.
    #[inline]
    pub fn push_state(&mut self) {
        self.stack.push((self.seed, self.iteration));
    }

    /// Saves the current state onto the state stack, then resets the
    /// generator with `seed`.
    #[inline]
    pub fn push_state_with(&mut self, seed: u32) {
        self.push_state();
        self.set_seed(seed);
    }

    /// Restores the most recently pushed state.
    ///
    /// # Panics
    ///
    /// Panics if the state stack is empty. Push/pop calls must be strictly
    /// nested; an underflow indicates a bug in the calling code.
    #[inline]
    pub fn pop_state(&mut self) {
        let (seed, iteration) = self
            .stack
            .pop()
            .expect("CounterRng state stack underflow: pop_state without matching push_state");
        self.seed = seed;
        self.iteration = iteration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_seeds_produce_identical_sequences() {
        let mut a = CounterRng::new(42);
        let mut b = CounterRng::new(42);
        for _ in 0..64 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn set_seed_resets_the_iteration_counter() {
        let mut rng = CounterRng::new(1);
        let first = rng.next_u64();
        rng.next_u64();
        rng.set_seed(1);
        assert_eq!(rng.next_u64(), first);
    }

    #[test]
    fn push_pop_is_strictly_nested() {
        let mut rng = CounterRng::new(5);
        rng.next_u64();
        let outer = rng.state();

        rng.push_state();
        rng.push_state_with(7);
        assert_eq!(rng.state(), (7, 0));
        rng.pop_state();

        // The inner pop restores the state as of the first push, not the
        // initial state.
        assert_eq!(rng.state(), outer);
        rng.pop_state();
        assert_eq!(rng.state(), outer);
    }

    #[test]
    #[should_panic(expected = "state stack underflow")]
    fn pop_on_empty_stack_panics() {
        let mut rng = CounterRng::new(0);
        rng.pop_state();
    }

    #[test]
    fn draws_depend_only_on_seed_and_iteration() {
        let mut a = CounterRng::new(9);
        a.next_u64();
        a.next_u64();

        // A fresh generator fast-forwarded by drawing twice must agree with
        // one that reached the same state through push/pop traffic.
        let mut b = CounterRng::new(9);
        b.push_state_with(1234);
        b.next_u64();
        b.pop_state();
        b.next_u64();
        b.next_u64();

        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn bounded_draws_stay_in_range() {
        let mut rng = CounterRng::new(3);
        for _ in 0..100 {
            assert!(rng.next_bounded(10) < 10);
        }
        assert_eq!(rng.next_bounded(0), 0);
    }
}
