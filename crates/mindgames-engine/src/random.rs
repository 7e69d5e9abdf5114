//! `rand`-backed draws for claim-truth resolution

use mindgames_domain::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Adapts any `rand` generator to [`RandomSource`]
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// Reproducible draws
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Draws seeded from the OS
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_in_unit_interval() {
        let mut source = RngSource::seeded(7);
        for _ in 0..1000 {
            let draw = source.next_unit();
            assert!((0.0..1.0).contains(&draw));
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }
}
