//! Injectable randomness for every draw the engine makes.

use std::collections::VecDeque;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws.
///
/// The engine draws, per sentence: the candidate index, the question type,
/// the truth coin and then a sibling index and lemma index for every
/// non-empty sibling pool it meets while scanning the ontology.
pub trait RandomSource {
    /// Uniform index in `[0, upper)`; returns 0 when `upper` is 0.
    fn below(&mut self, upper: usize) -> usize;

    /// Fair coin.
    fn coin(&mut self) -> bool {
        self.below(2) == 1
    }

    /// Uniformly picks an element, `None` on an empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            items.get(self.below(items.len()))
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn below(&mut self, upper: usize) -> usize {
        (**self).below(upper)
    }
}

/// Process-wide style generator seeded from OS entropy.
#[derive(Debug, Clone)]
pub struct EntropyRandom {
    rng: SmallRng,
}

impl Default for EntropyRandom {
    fn default() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl RandomSource for EntropyRandom {
    fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            0
        } else {
            self.rng.gen_range(0..upper)
        }
    }
}

/// Reproducible generator; the same seed yields the same quiz on every platform.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a generator from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            0
        } else {
            self.rng.gen_range(0..upper)
        }
    }
}

/// Replays a fixed list of draws. Each value is reduced modulo the requested
/// bound; once exhausted every draw is 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: VecDeque<usize>,
    consumed: usize,
}

impl ScriptedRandom {
    /// Creates a source replaying `draws` in order.
    #[must_use]
    pub fn new(draws: impl IntoIterator<Item = usize>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Number of draws served so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// Draws not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&mut self, upper: usize) -> usize {
        self.consumed += 1;
        let next = self.draws.pop_front().unwrap_or(0);
        if upper == 0 {
            0
        } else {
            next % upper
        }
    }
}

/// Builds the production source: seeded when a seed is configured.
#[must_use]
pub fn from_seed(seed: Option<u64>) -> Box<dyn RandomSource + Send> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(EntropyRandom::default()),
    }
}
