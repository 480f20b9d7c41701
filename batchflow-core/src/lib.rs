//! Core value types for the BatchFlow data-loading stack.
//!
//! This crate holds the pieces every dataloader contract is built from:
//! [`ArrayTree`], a nested (mapping/sequence) structure of numeric arrays,
//! the collation primitives that stack samples and concatenate batches
//! leaf-wise, and the shared [`BatchFlowError`] type.

pub mod array;
pub mod collate;
pub mod error;

pub use array::{leading_lens, ArrayTree};
pub use collate::{collate_samples, concat_batches, index_into};
pub use error::BatchFlowError;
