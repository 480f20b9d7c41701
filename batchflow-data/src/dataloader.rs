//! # DataLoader
//!
//! The batch-iterable adapter: given an indexed dataset and a sampler, it
//! draws the index sequence once per pass, groups indices into batches,
//! fetches the samples and collates them into one structure per batch.
//!
//! With `num_workers > 0` each refill hands a window of batch groups to the
//! ordered fetch service; batches still come back in index order, never in
//! completion order.
//!
//! ```rust
//! use batchflow_core::ArrayTree;
//! use batchflow_data::contracts::{IterParams, PreloadedDataset};
//! use batchflow_data::dataloader::DataLoader;
//! use batchflow_data::samplers::SequentialSampler;
//! use ndarray::Array2;
//!
//! let data = ArrayTree::map([("inputs", ArrayTree::from(Array2::<f32>::zeros((6, 2)).into_dyn()))]);
//! let dataset = PreloadedDataset::new(data)?;
//! let params = IterParams { batch_size: 2, ..Default::default() };
//! let loader = DataLoader::new(&dataset, &SequentialSampler::new(), &params);
//! assert_eq!(loader.count(), 3);
//! # Ok::<(), batchflow_core::BatchFlowError>(())
//! ```

use std::collections::VecDeque;

use batchflow_core::{collate_samples, ArrayTree, BatchFlowError};

use crate::contracts::{Dataset, IterParams};
use crate::prefetch::ordered_fetch;
use crate::samplers::Sampler;

/// One shuffled-or-sequential pass of collated batches over an indexed
/// dataset.
///
/// The index permutation is drawn from the sampler once, at construction;
/// every pass therefore needs a fresh `DataLoader`.
pub struct DataLoader<'a, D: Dataset + ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    drop_last: bool,
    num_workers: usize,
    indices: Box<dyn Iterator<Item = usize> + Send + Sync>,
    ready: VecDeque<Result<ArrayTree, BatchFlowError>>,
    exhausted: bool,
}

impl<'a, D: Dataset + ?Sized> DataLoader<'a, D> {
    pub fn new(dataset: &'a D, sampler: &dyn Sampler, params: &IterParams) -> Self {
        let indices = sampler.iter(dataset.len());
        Self {
            dataset,
            batch_size: params.batch_size.max(1),
            drop_last: params.drop_last,
            num_workers: params.num_workers,
            indices,
            ready: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Draws the next group of up to `batch_size` indices. Returns `None`
    /// when the pass is over, including when `drop_last` discards a final
    /// undersized group.
    fn next_group(&mut self) -> Option<Vec<usize>> {
        let mut group = Vec::with_capacity(self.batch_size);
        for _ in 0..self.batch_size {
            match self.indices.next() {
                Some(index) => group.push(index),
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }
        if group.is_empty() || (self.drop_last && group.len() < self.batch_size) {
            return None;
        }
        Some(group)
    }

    fn fetch_group(dataset: &D, group: &[usize]) -> Result<ArrayTree, BatchFlowError> {
        let mut samples = Vec::with_capacity(group.len());
        for &index in group {
            samples.push(dataset.get(index)?);
        }
        collate_samples(&samples)
    }

    fn refill(&mut self) {
        let window = self.num_workers.max(1);
        let mut groups = Vec::with_capacity(window);
        while groups.len() < window && !self.exhausted {
            match self.next_group() {
                Some(group) => groups.push(group),
                None => break,
            }
        }
        if groups.is_empty() {
            return;
        }
        log::debug!("fetching {} batch group(s)", groups.len());
        if groups.len() == 1 || self.num_workers <= 1 {
            for group in &groups {
                self.ready
                    .push_back(Self::fetch_group(self.dataset, group));
            }
        } else {
            let dataset = self.dataset;
            self.ready.extend(ordered_fetch(groups.len(), |i| {
                Self::fetch_group(dataset, &groups[i])
            }));
        }
    }
}

impl<'a, D: Dataset + ?Sized> Iterator for DataLoader<'a, D> {
    type Item = Result<ArrayTree, BatchFlowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ready.is_empty() {
            self.refill();
        }
        self.ready.pop_front()
    }
}

#[cfg(test)]
#[path = "dataloader_test.rs"]
mod tests;
