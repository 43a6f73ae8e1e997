//! Uniform random picks over pools and ranges
//!
//! Everything random in password composition funnels through
//! [`RandomPicker::index_below`], so a scripted source can drive the
//! generator deterministically in tests.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::error::{Error, Result};

/// Source of uniform picks.
pub trait RandomPicker {
    /// Uniform value in `0..bound`. Callers never pass `bound == 0`.
    fn index_below(&mut self, bound: u64) -> u64;

    /// Pick one element uniformly
    fn pick_one<'a, T>(&mut self, pool: &'a [T]) -> Result<&'a T> {
        if pool.is_empty() {
            return Err(Error::EmptyPool);
        }
        let idx = self.index_below(pool.len() as u64) as usize;
        Ok(&pool[idx])
    }

    /// Uniform integer in the closed range `min..=max`
    fn pick_int(&mut self, min: i32, max: i32) -> Result<i32> {
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }
        let span = (max as i64 - min as i64 + 1) as u64;
        Ok((min as i64 + self.index_below(span) as i64) as i32)
    }

    /// Fisher-Yates shuffle into a new vector; the input is left alone.
    fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut shuffled = items.to_vec();
        for i in (1..shuffled.len()).rev() {
            let j = self.index_below(i as u64 + 1) as usize;
            shuffled.swap(i, j);
        }
        shuffled
    }
}

impl RandomPicker for Pcg32 {
    fn index_below(&mut self, bound: u64) -> u64 {
        self.random_range(0..bound)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Replays a fixed list of indices, clamped into range.
    pub(crate) struct ScriptedPicks {
        pub picks: VecDeque<u64>,
    }

    impl ScriptedPicks {
        pub(crate) fn new(picks: &[u64]) -> Self {
            Self {
                picks: picks.iter().copied().collect(),
            }
        }
    }

    impl RandomPicker for ScriptedPicks {
        fn index_below(&mut self, bound: u64) -> u64 {
            self.picks.pop_front().unwrap_or(0).min(bound - 1)
        }
    }

    #[test]
    fn test_pick_int_single_value() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(rng.pick_int(5, 5), Ok(5));
        }
    }

    #[test]
    fn test_pick_int_rejects_inverted_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(rng.pick_int(5, 3), Err(Error::InvalidRange { min: 5, max: 3 }));
    }

    #[test]
    fn test_pick_int_extreme_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        let v = rng.pick_int(i32::MIN, i32::MAX).unwrap();
        assert!((i32::MIN..=i32::MAX).contains(&v));
    }

    #[test]
    fn test_pick_one_empty_pool() {
        let mut rng = Pcg32::seed_from_u64(1);
        let empty: [char; 0] = [];
        assert_eq!(rng.pick_one(&empty), Err(Error::EmptyPool));
    }

    #[test]
    fn test_pick_one_covers_pool() {
        let mut rng = Pcg32::seed_from_u64(42);
        let pool = ['a', 'b', 'c'];
        let mut seen = [false; 3];
        for _ in 0..200 {
            let c = rng.pick_one(&pool).unwrap();
            seen[(*c as u8 - b'a') as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_shuffle_scripted_swaps() {
        // i=2 swaps with 0, i=1 swaps with 1
        let mut picks = ScriptedPicks::new(&[0, 1]);
        assert_eq!(picks.shuffle(&['a', 'b', 'c']), vec!['c', 'b', 'a']);
    }

    #[test]
    fn test_shuffle_leaves_input_untouched() {
        let mut rng = Pcg32::seed_from_u64(9);
        let input = vec![1, 2, 3, 4, 5];
        let _ = rng.shuffle(&input);
        assert_eq!(input, vec![1, 2, 3, 4, 5]);
    }

    proptest! {
        #[test]
        fn shuffle_is_a_permutation(
            seed in any::<u64>(),
            items in proptest::collection::vec(any::<u8>(), 0..40),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut shuffled = rng.shuffle(&items);
            prop_assert_eq!(shuffled.len(), items.len());
            let mut sorted = items.clone();
            sorted.sort_unstable();
            shuffled.sort_unstable();
            prop_assert_eq!(shuffled, sorted);
        }
    }
}
