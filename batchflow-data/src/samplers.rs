//! Index samplers for the [`DataLoader`](crate::dataloader::DataLoader).

use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Defines the order in which dataset indices are visited during one pass.
pub trait Sampler: Debug + Send + Sync {
    /// Returns an iterator over the indices of a dataset of `dataset_len`
    /// items. Called once per pass.
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync>;

    /// Returns the number of indices the iterator will yield.
    fn len(&self, dataset_len: usize) -> usize;
}

/// Visits every index in order, always the same.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler;

impl SequentialSampler {
    pub fn new() -> Self {
        SequentialSampler
    }
}

impl Sampler for SequentialSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        Box::new(0..dataset_len)
    }

    fn len(&self, dataset_len: usize) -> usize {
        dataset_len
    }
}

/// Draws a fresh permutation of all indices on every pass.
///
/// Without a seed the permutation comes from the thread RNG and is not
/// reproducible across passes; reproducibility is the caller's choice via
/// [`with_seed`](RandomSampler::with_seed).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSampler {
    seed: Option<u64>,
}

impl RandomSampler {
    pub fn new() -> Self {
        RandomSampler { seed: None }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomSampler { seed: Some(seed) }
    }
}

impl Sampler for RandomSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        let mut indices: Vec<usize> = (0..dataset_len).collect();
        match self.seed {
            Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => indices.shuffle(&mut rand::thread_rng()),
        }
        Box::new(indices.into_iter())
    }

    fn len(&self, dataset_len: usize) -> usize {
        dataset_len
    }
}

#[cfg(test)]
#[path = "samplers_test.rs"]
mod tests;
