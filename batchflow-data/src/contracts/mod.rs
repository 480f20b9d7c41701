//! The loading-contract hierarchy: seven polymorphic variants sharing one
//! high-level iteration surface.
//!
//! | Variant | Primitive supplied |
//! |---|---|
//! | [`PreloadedDataset`] | a full in-memory structure (or a function producing one) |
//! | [`Dataset`] + [`DatasetLoader`] | `len()` + `get(index)` returning one sample |
//! | [`BatchDataset`] + [`BatchDatasetLoader`] | `len()` + `get(index)` returning one pre-built batch |
//! | [`SampleIteratorLoader`] | a single exhaustible sample stream |
//! | [`BatchIteratorLoader`] | a single exhaustible batch stream |
//! | [`SampleGenerator`] | a function producing a fresh sample stream per pass |
//! | [`BatchGenerator`] | a function producing a fresh batch stream per pass |

pub mod batch_dataset;
pub mod dataset;
pub mod generators;
pub mod preloaded;
pub mod streaming;
pub mod traits;

pub use batch_dataset::{BatchDataset, BatchDatasetLoader};
pub use dataset::{Dataset, DatasetLoader};
pub use generators::{BatchGenerator, SampleGenerator};
pub use preloaded::PreloadedDataset;
pub use streaming::{BatchIteratorLoader, SampleIteratorLoader};
pub use traits::{BatchIter, BatchLoader, BatchStream, IterParams, SampleStream, TrainIter};
