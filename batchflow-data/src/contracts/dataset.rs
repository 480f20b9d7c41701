use batchflow_core::{ArrayTree, BatchFlowError};

use crate::dataloader::DataLoader;
use crate::samplers::{RandomSampler, Sampler, SequentialSampler};

use super::traits::{BatchIter, BatchLoader, IterParams};

/// A random-access dataset of individual samples.
///
/// Implementations provide integer indexing in `0..len()`; everything else
/// (batching, shuffling, parallel fetch) is derived. `Send + Sync` is
/// required so the ordered fetch service can read samples from worker
/// threads.
pub trait Dataset: Send + Sync {
    /// Returns the sample at `index`.
    fn get(&self, index: usize) -> Result<ArrayTree, BatchFlowError>;

    /// Returns the total number of samples.
    fn len(&self) -> usize;

    /// Returns true if the dataset contains no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<D: Dataset + ?Sized> Dataset for Box<D> {
    fn get(&self, index: usize) -> Result<ArrayTree, BatchFlowError> {
        (**self).get(index)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Shared index-driven pass used by every indexed variant.
pub(crate) fn indexed_batch_iter<'a, D: Dataset + ?Sized>(
    dataset: &'a D,
    params: &IterParams,
) -> BatchIter<'a> {
    let sampler: Box<dyn Sampler> = if params.shuffle {
        match params.seed {
            Some(seed) => Box::new(RandomSampler::with_seed(seed)),
            None => Box::new(RandomSampler::new()),
        }
    } else {
        Box::new(SequentialSampler::new())
    };
    Box::new(DataLoader::new(dataset, sampler.as_ref(), params))
}

/// Gives any [`Dataset`] the uniform [`BatchLoader`] surface.
///
/// Batches are built via sample collation; random access allows shuffled
/// passes, ordered parallel fetch and dropping a final undersized batch.
pub struct DatasetLoader<D: Dataset> {
    dataset: D,
}

impl<D: Dataset> DatasetLoader<D> {
    pub fn new(dataset: D) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn into_inner(self) -> D {
        self.dataset
    }
}

impl<D: Dataset> BatchLoader for DatasetLoader<D> {
    fn batch_iter(&self, params: &IterParams) -> Result<BatchIter<'_>, BatchFlowError> {
        Ok(indexed_batch_iter(&self.dataset, params))
    }
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
