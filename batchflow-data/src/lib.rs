//! # BatchFlow data loading
//!
//! A pluggable data-loading abstraction: user implementations satisfy one of
//! seven loading contracts, and every contract exposes the same high-level
//! iteration surface ([`BatchLoader`]) producing batches of nested array
//! structures. The [`factory`] module validates a declarative description
//! against a registered implementation and binds both into a ready-to-use
//! [`DataLoaderFactory`](factory::DataLoaderFactory).
//!
//! ## Example
//!
//! ```rust
//! use batchflow_core::ArrayTree;
//! use batchflow_data::{BatchLoader, IterParams, PreloadedDataset};
//! use ndarray::Array2;
//!
//! let data = ArrayTree::map([
//!     ("inputs", ArrayTree::from(Array2::<f32>::zeros((10, 4)).into_dyn())),
//!     ("targets", ArrayTree::from(Array2::<f32>::zeros((10, 1)).into_dyn())),
//! ]);
//! let dataset = PreloadedDataset::new(data)?;
//!
//! let params = IterParams { batch_size: 4, ..Default::default() };
//! let mut sizes = Vec::new();
//! for batch in dataset.batch_iter(&params)? {
//!     let batch = batch?;
//!     let inputs = batch.field("inputs")?.as_leaf().expect("leaf").shape()[0];
//!     sizes.push(inputs);
//! }
//! assert_eq!(sizes, vec![4, 4, 2]);
//! # Ok::<(), batchflow_core::BatchFlowError>(())
//! ```

pub mod contracts;
pub mod dataloader;
pub mod factory;
pub mod prefetch;
pub mod samplers;
pub mod spec;

pub use contracts::{
    BatchDataset, BatchDatasetLoader, BatchGenerator, BatchIter, BatchIteratorLoader, BatchLoader,
    BatchStream, Dataset, DatasetLoader, IterParams, PreloadedDataset, SampleGenerator,
    SampleIteratorLoader, SampleStream, TrainIter,
};
pub use dataloader::DataLoader;
pub use factory::{
    dataloader_factory, get_dataloader_factory, Candidate, CandidateImpl, DataLoaderFactory,
    ImplRegistry, LoaderKind, LocalSource, Source, SourceContext,
};
pub use samplers::{RandomSampler, Sampler, SequentialSampler};
pub use spec::{DataLoaderArgument, DataLoaderDescription, Info, Kwargs};
