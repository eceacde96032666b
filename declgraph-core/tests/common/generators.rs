//! Stochastic content generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("DECLGRAPH_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    /// Returns 0, 1, 2, ... with decreasing probability
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Poisson-like count (simplified)
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.rng.gen::<f64>();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random comment text: words of ASCII letters, never `*/`
    pub fn words(&mut self) -> String {
        let count = 1 + self.geometric(0.6);
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let len = 1 + self.geometric(0.7);
            let word: String = (0..len)
                .map(|_| char::from(self.rng.gen_range(b'a'..=b'z')))
                .collect();
            out.push(word);
        }
        out.join(" ")
    }

    /// ` // words` to append at the end of a line
    pub fn line_comment(&mut self) -> String {
        format!(" // {}", self.words())
    }

    /// A few lines of line and block comments (for context wrapping)
    pub fn comment_block(&mut self) -> String {
        let mut out = String::new();
        for _ in 0..1 + self.geometric(0.5) {
            if self.chance(0.5) {
                out.push_str(&format!("// {}\n", self.words()));
            } else {
                out.push_str(&format!("/* {}\n   {} */\n", self.words(), self.words()));
            }
        }
        out
    }

    /// Add random indent (geometric, α=0.9)
    pub fn indent_level(&mut self) -> usize {
        self.geometric(0.9) * 2 // 2 spaces per level
    }

    /// Inject random blank lines
    pub fn blank_lines(&mut self) -> String {
        let count = self.geometric(0.1); // Usually 0
        "\n".repeat(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.words(), g2.words());
            assert_eq!(g1.geometric(0.9), g2.geometric(0.9));
        }
    }

    #[test]
    fn test_geometric_distribution() {
        let mut gen = Gen::new(12345);
        let samples: Vec<usize> = (0..1000).map(|_| gen.geometric(0.9)).collect();

        // With α=0.9, we expect mean ≈ 9 (geometric mean = α/(1-α))
        let mean: f64 = samples.iter().sum::<usize>() as f64 / samples.len() as f64;
        assert!(mean > 5.0 && mean < 15.0, "Mean {} out of expected range", mean);
    }

    #[test]
    fn test_comments_never_close_early() {
        let mut gen = Gen::new(7);
        for _ in 0..100 {
            let block = gen.comment_block();
            assert!(block.matches("*/").count() == block.matches("/*").count());
        }
    }
}
