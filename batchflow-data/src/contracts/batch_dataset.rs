use std::collections::VecDeque;

use batchflow_core::{ArrayTree, BatchFlowError};

use crate::prefetch::ordered_fetch;

use super::traits::{BatchIter, BatchLoader, IterParams};

/// A random-access dataset of pre-built batches.
///
/// `get(index)` returns one complete batch structure; the loader never
/// regroups or shuffles them.
pub trait BatchDataset: Send + Sync {
    /// Returns the pre-built batch at `index`.
    fn get(&self, index: usize) -> Result<ArrayTree, BatchFlowError>;

    /// Returns the total number of batches.
    fn len(&self) -> usize;

    /// Returns true if the dataset contains no batches.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: BatchDataset + ?Sized> BatchDataset for Box<B> {
    fn get(&self, index: usize) -> Result<ArrayTree, BatchFlowError> {
        (**self).get(index)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Gives any [`BatchDataset`] the uniform [`BatchLoader`] surface.
///
/// Iteration is strictly sequential with a unit batch size: each pull
/// yields the next pre-built batch. `batch_size`, `shuffle` and
/// `drop_last` are fixed by the contract and ignored; `num_workers > 0`
/// fetches the next window of batches in parallel but still yields them in
/// index order.
pub struct BatchDatasetLoader<B: BatchDataset> {
    dataset: B,
}

impl<B: BatchDataset> BatchDatasetLoader<B> {
    pub fn new(dataset: B) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &B {
        &self.dataset
    }

    pub fn into_inner(self) -> B {
        self.dataset
    }
}

impl<B: BatchDataset> BatchLoader for BatchDatasetLoader<B> {
    fn batch_iter(&self, params: &IterParams) -> Result<BatchIter<'_>, BatchFlowError> {
        Ok(Box::new(BatchFetch {
            dataset: &self.dataset,
            next_index: 0,
            num_workers: params.num_workers,
            ready: VecDeque::new(),
        }))
    }
}

struct BatchFetch<'a, B: BatchDataset + ?Sized> {
    dataset: &'a B,
    next_index: usize,
    num_workers: usize,
    ready: VecDeque<Result<ArrayTree, BatchFlowError>>,
}

impl<'a, B: BatchDataset + ?Sized> Iterator for BatchFetch<'a, B> {
    type Item = Result<ArrayTree, BatchFlowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ready.is_empty() {
            let remaining = self.dataset.len().saturating_sub(self.next_index);
            let window = self.num_workers.max(1).min(remaining);
            if window == 0 {
                return None;
            }
            if window == 1 {
                self.ready.push_back(self.dataset.get(self.next_index));
            } else {
                let dataset = self.dataset;
                let base = self.next_index;
                self.ready
                    .extend(ordered_fetch(window, |i| dataset.get(base + i)));
            }
            self.next_index += window;
        }
        self.ready.pop_front()
    }
}

#[cfg(test)]
#[path = "batch_dataset_test.rs"]
mod tests;
