use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Seed used by `CustomNumberGenerator::default()`.
pub const DEFAULT_SEED: u64 = 3819201;

/// Source of the random choices made by players and by Monte Carlo rollouts.
pub trait RandomGenerator: Default {
    /// Returns a number in `from..to`. `to` must be greater than `from`.
    fn next_range(&mut self, from: usize, to: usize) -> usize;

    /// Picks an element uniformly at random, or `None` if `items` is empty.
    fn choose<'a, K>(&mut self, items: &'a [K]) -> Option<&'a K> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_range(0, items.len()))
    }
}

/// Thread-local, non-reproducible randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRandomGenerator;

impl RandomGenerator for StandardRandomGenerator {
    fn next_range(&mut self, from: usize, to: usize) -> usize {
        rand::rng().random_range(from..to)
    }
}

/// Seeded randomness: two generators built from the same seed make the same choices.
#[derive(Debug, Clone)]
pub struct CustomNumberGenerator {
    rng: ChaCha20Rng,
}

impl Default for CustomNumberGenerator {
    fn default() -> Self {
        CustomNumberGenerator::new(DEFAULT_SEED)
    }
}

impl RandomGenerator for CustomNumberGenerator {
    fn next_range(&mut self, from: usize, to: usize) -> usize {
        self.rng.random_range(from..to)
    }
}

impl CustomNumberGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::random::{CustomNumberGenerator, RandomGenerator, StandardRandomGenerator};

    #[test]
    fn same_seed_same_numbers() {
        let mut first = CustomNumberGenerator::new(42);
        let mut second = CustomNumberGenerator::new(42);
        let a: Vec<usize> = (0..20).map(|_| first.next_range(0, 10)).collect();
        let b: Vec<usize> = (0..20).map(|_| second.next_range(0, 10)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn numbers_stay_in_range() {
        let mut crg = CustomNumberGenerator::default();
        let mut srg = StandardRandomGenerator;
        for _ in 0..100 {
            let n = crg.next_range(3, 7);
            assert!((3..7).contains(&n));
            let n = srg.next_range(3, 7);
            assert!((3..7).contains(&n));
        }
    }

    #[test]
    fn choose_from_empty_is_none() {
        let mut crg = CustomNumberGenerator::default();
        let empty: [u8; 0] = [];
        assert_eq!(crg.choose(&empty), None);
    }

    #[test]
    fn random_from_vec_should_be_same() {
        let vec = vec![432, 6542, 534, 6, 13, 645, 88, 2352, 345, 2667, 8287];
        let mut first = CustomNumberGenerator::default();
        let mut second = CustomNumberGenerator::default();
        for _ in 0..5 {
            let picked = first.choose(&vec).unwrap();
            assert!(vec.contains(picked));
            assert_eq!(picked, second.choose(&vec).unwrap());
        }
    }
}
