use std::cell::RefCell;

use batchflow_core::{collate_samples, ArrayTree, BatchFlowError};

use super::traits::{BatchIter, BatchLoader, BatchStream, IterParams, SampleStream};

/// Wraps a single exhaustible stream of samples.
///
/// Batches are built by greedily collecting up to `batch_size` consecutive
/// samples; a final partial group is yielded as a smaller batch. Once the
/// stream signals exhaustion, further passes yield nothing — use
/// [`SampleGenerator`](super::SampleGenerator) for a restartable source.
pub struct SampleIteratorLoader {
    stream: RefCell<SampleStream>,
}

impl SampleIteratorLoader {
    pub fn new<I>(stream: I) -> Self
    where
        I: Iterator<Item = Result<ArrayTree, BatchFlowError>> + 'static,
    {
        Self::from_stream(Box::new(stream))
    }

    pub fn from_stream(stream: SampleStream) -> Self {
        Self {
            stream: RefCell::new(stream),
        }
    }
}

impl BatchLoader for SampleIteratorLoader {
    fn batch_iter(&self, params: &IterParams) -> Result<BatchIter<'_>, BatchFlowError> {
        Ok(Box::new(SampleBatches {
            stream: SharedStream(&self.stream),
            batch_size: params.batch_size.max(1),
        }))
    }
}

/// Wraps a single exhaustible stream of pre-built batches; pure
/// pass-through, no parameters apply.
pub struct BatchIteratorLoader {
    stream: RefCell<BatchStream>,
}

impl BatchIteratorLoader {
    pub fn new<I>(stream: I) -> Self
    where
        I: Iterator<Item = Result<ArrayTree, BatchFlowError>> + 'static,
    {
        Self::from_stream(Box::new(stream))
    }

    pub fn from_stream(stream: BatchStream) -> Self {
        Self {
            stream: RefCell::new(stream),
        }
    }
}

impl BatchLoader for BatchIteratorLoader {
    fn batch_iter(&self, _params: &IterParams) -> Result<BatchIter<'_>, BatchFlowError> {
        Ok(Box::new(SharedStream(&self.stream)))
    }
}

/// Pulls from a shared stream one item at a time.
struct SharedStream<'a>(&'a RefCell<SampleStream>);

impl Iterator for SharedStream<'_> {
    type Item = Result<ArrayTree, BatchFlowError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.borrow_mut().next()
    }
}

/// Greedy grouping of a sample stream into collated batches.
pub(crate) struct SampleBatches<I> {
    pub(crate) stream: I,
    pub(crate) batch_size: usize,
}

impl<I> Iterator for SampleBatches<I>
where
    I: Iterator<Item = Result<ArrayTree, BatchFlowError>>,
{
    type Item = Result<ArrayTree, BatchFlowError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut group = Vec::with_capacity(self.batch_size);
        for sample in self.stream.by_ref() {
            match sample {
                Ok(sample) => {
                    group.push(sample);
                    if group.len() == self.batch_size {
                        break;
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
        if group.is_empty() {
            None
        } else {
            Some(collate_samples(&group))
        }
    }
}

#[cfg(test)]
#[path = "streaming_test.rs"]
mod tests;
