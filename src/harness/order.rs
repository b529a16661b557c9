use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded shuffler for the order variants run in within a fork.
pub struct RunOrder {
    rng: ChaCha8Rng,
}

impl RunOrder {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// A fresh permutation of `0..len`.
    pub fn next_order(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_orders() {
        let mut a = RunOrder::new(42);
        let mut b = RunOrder::new(42);
        for _ in 0..8 {
            assert_eq!(a.next_order(4), b.next_order(4));
        }
    }

    #[test]
    fn order_is_a_permutation() {
        let mut order = RunOrder::new(3);
        let mut indices = order.next_order(6);
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(order.next_order(0).is_empty());
    }
}
