use batchflow_core::{concat_batches, ArrayTree, BatchFlowError};

/// Batching parameters accepted by every loading contract.
///
/// Not every variant honours every field: pre-batched and streaming sources
/// ignore `batch_size`/`shuffle` where their contract fixes them (see the
/// individual loader docs). Shuffle permutations are drawn once per pass and
/// are only reproducible across passes when `seed` is set by the caller.
#[derive(Debug, Clone)]
pub struct IterParams {
    /// How many samples per batch.
    pub batch_size: usize,
    /// Reshuffle the index order on every pass.
    pub shuffle: bool,
    /// Width of the ordered parallel fetch window; 0 fetches inline.
    pub num_workers: usize,
    /// Skip a final batch smaller than `batch_size`.
    pub drop_last: bool,
    /// Explicit shuffle seed. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for IterParams {
    fn default() -> Self {
        IterParams {
            batch_size: 32,
            shuffle: false,
            num_workers: 0,
            drop_last: false,
            seed: None,
        }
    }
}

/// One pass of batches.
pub type BatchIter<'a> = Box<dyn Iterator<Item = Result<ArrayTree, BatchFlowError>> + 'a>;

/// One pass of `(inputs, targets)` pairs.
pub type TrainIter<'a> =
    Box<dyn Iterator<Item = Result<(ArrayTree, ArrayTree), BatchFlowError>> + 'a>;

/// An owned, possibly single-exhaustible stream of samples.
pub type SampleStream = Box<dyn Iterator<Item = Result<ArrayTree, BatchFlowError>>>;

/// An owned, possibly single-exhaustible stream of pre-built batches.
pub type BatchStream = Box<dyn Iterator<Item = Result<ArrayTree, BatchFlowError>>>;

/// The uniform high-level surface shared by all loading contracts.
///
/// Each variant supplies [`batch_iter`](Self::batch_iter), its one
/// variant-specific primitive; the derived surface below is provided once
/// for all of them. [`PreloadedDataset`](super::PreloadedDataset)
/// additionally overrides [`load_all`](Self::load_all) to hand back its
/// stored structure without re-aggregation.
pub trait BatchLoader {
    /// The canonical batch-producing entry point.
    fn batch_iter(&self, params: &IterParams) -> Result<BatchIter<'_>, BatchFlowError>;

    /// Projects each batch to its `(inputs, targets)` pair.
    ///
    /// With `cycle` set, the underlying batch iteration is restarted
    /// indefinitely, which makes the iterator infinite for any restartable
    /// source; a source whose fresh pass is immediately empty (a drained
    /// single-exhaustible stream) terminates instead of spinning.
    fn batch_train_iter(
        &self,
        cycle: bool,
        params: &IterParams,
    ) -> Result<TrainIter<'_>, BatchFlowError> {
        if cycle {
            let inner = self.batch_iter(params)?;
            Ok(Box::new(TrainCycle {
                loader: self,
                params: params.clone(),
                inner,
            }))
        } else {
            let inner = self.batch_iter(params)?;
            Ok(Box::new(inner.map(|batch| batch.and_then(train_pair))))
        }
    }

    /// Projects each batch to its `inputs` entry.
    fn batch_predict_iter(&self, params: &IterParams) -> Result<BatchIter<'_>, BatchFlowError> {
        let inner = self.batch_iter(params)?;
        Ok(Box::new(inner.map(|batch| {
            batch.and_then(|b| b.field("inputs").map(|inputs| inputs.clone()))
        })))
    }

    /// Exhausts [`batch_iter`](Self::batch_iter) and concatenates every
    /// yielded batch, materializing the entire dataset in memory.
    fn load_all(&self, params: &IterParams) -> Result<ArrayTree, BatchFlowError> {
        let mut batches = Vec::new();
        for batch in self.batch_iter(params)? {
            batches.push(batch?);
        }
        concat_batches(&batches)
    }
}

fn train_pair(batch: ArrayTree) -> Result<(ArrayTree, ArrayTree), BatchFlowError> {
    let inputs = batch.field("inputs")?.clone();
    let targets = batch.field("targets")?.clone();
    Ok((inputs, targets))
}

/// Restarts the underlying batch iteration whenever it runs dry.
struct TrainCycle<'a, L: BatchLoader + ?Sized> {
    loader: &'a L,
    params: IterParams,
    inner: BatchIter<'a>,
}

impl<'a, L: BatchLoader + ?Sized> Iterator for TrainCycle<'a, L> {
    type Item = Result<(ArrayTree, ArrayTree), BatchFlowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(batch) = self.inner.next() {
            return Some(batch.and_then(train_pair));
        }
        match self.loader.batch_iter(&self.params) {
            Ok(mut fresh) => {
                let first = fresh.next();
                self.inner = fresh;
                // A fresh pass with nothing in it means the source is
                // permanently exhausted; terminate instead of spinning.
                first.map(|batch| batch.and_then(train_pair))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
