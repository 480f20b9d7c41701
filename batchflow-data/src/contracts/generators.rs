use batchflow_core::BatchFlowError;

use super::streaming::SampleBatches;
use super::traits::{BatchIter, BatchLoader, BatchStream, IterParams, SampleStream};

/// Function-derived sample source: a production function (with its
/// construction arguments captured in the closure) returns a **fresh**
/// sample stream on every pass, making the loader restartable by
/// construction.
pub struct SampleGenerator {
    generator_fn: Box<dyn Fn() -> Result<SampleStream, BatchFlowError>>,
}

impl SampleGenerator {
    pub fn from_fn<F>(generator_fn: F) -> Self
    where
        F: Fn() -> Result<SampleStream, BatchFlowError> + 'static,
    {
        Self {
            generator_fn: Box::new(generator_fn),
        }
    }
}

impl BatchLoader for SampleGenerator {
    fn batch_iter(&self, params: &IterParams) -> Result<BatchIter<'_>, BatchFlowError> {
        let stream = (self.generator_fn)()?;
        Ok(Box::new(SampleBatches {
            stream,
            batch_size: params.batch_size.max(1),
        }))
    }
}

/// Function-derived batch source: each pass pulls a fresh stream of
/// pre-built batches and passes them through unmodified.
pub struct BatchGenerator {
    generator_fn: Box<dyn Fn() -> Result<BatchStream, BatchFlowError>>,
}

impl BatchGenerator {
    pub fn from_fn<F>(generator_fn: F) -> Self
    where
        F: Fn() -> Result<BatchStream, BatchFlowError> + 'static,
    {
        Self {
            generator_fn: Box::new(generator_fn),
        }
    }
}

impl BatchLoader for BatchGenerator {
    fn batch_iter(&self, _params: &IterParams) -> Result<BatchIter<'_>, BatchFlowError> {
        let stream = (self.generator_fn)()?;
        Ok(stream)
    }
}

#[cfg(test)]
#[path = "generators_test.rs"]
mod tests;
