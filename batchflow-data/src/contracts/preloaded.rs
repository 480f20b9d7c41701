use batchflow_core::{index_into, leading_lens, ArrayTree, BatchFlowError};

use super::dataset::{indexed_batch_iter, Dataset};
use super::traits::{BatchIter, BatchLoader, IterParams};

/// A dataset fully materialized in memory.
///
/// The stored structure must have exactly one common leading-dimension
/// length across all of its leaves; that length is the number of samples.
/// Random access slices every leaf at the requested index, and
/// [`load_all`](BatchLoader::load_all) returns the stored structure
/// directly instead of re-aggregating batches.
#[derive(Debug)]
pub struct PreloadedDataset {
    data: ArrayTree,
    len: usize,
}

impl PreloadedDataset {
    /// Validates and wraps a full dataset structure.
    ///
    /// # Errors
    ///
    /// [`BatchFlowError::DimensionMismatch`] when the leaf arrays disagree
    /// on their leading-dimension length (or the structure has no leaves at
    /// all, in which case no length can be inferred).
    pub fn new(data: ArrayTree) -> Result<Self, BatchFlowError> {
        let lens = leading_lens(&data)?;
        if lens.len() != 1 {
            return Err(BatchFlowError::DimensionMismatch {
                lengths: lens.into_iter().collect(),
            });
        }
        let len = lens.into_iter().next().unwrap_or(0);
        Ok(Self { data, len })
    }

    /// Builds the dataset from a zero-argument production function.
    pub fn from_fn<F>(data_fn: F) -> Result<Self, BatchFlowError>
    where
        F: FnOnce() -> Result<ArrayTree, BatchFlowError>,
    {
        Self::new(data_fn()?)
    }

    /// The full stored structure.
    pub fn data(&self) -> &ArrayTree {
        &self.data
    }
}

impl Dataset for PreloadedDataset {
    fn get(&self, index: usize) -> Result<ArrayTree, BatchFlowError> {
        if index >= self.len {
            return Err(BatchFlowError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        index_into(&self.data, index)
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl BatchLoader for PreloadedDataset {
    fn batch_iter(&self, params: &IterParams) -> Result<BatchIter<'_>, BatchFlowError> {
        Ok(indexed_batch_iter(self, params))
    }

    /// Direct return of the stored structure; batching parameters are
    /// irrelevant here.
    fn load_all(&self, _params: &IterParams) -> Result<ArrayTree, BatchFlowError> {
        Ok(self.data.clone())
    }
}

#[cfg(test)]
#[path = "preloaded_test.rs"]
mod tests;
