//! The collation engine: pure transforms that merge nested array
//! structures leaf-wise, plus the inverse single-sample extraction.
//!
//! All entry points require the identical leaf-path structure across their
//! inputs and retain no state of their own.

use std::collections::BTreeMap;

use ndarray::{concatenate, stack, ArrayViewD, Axis};

use crate::array::ArrayTree;
use crate::error::BatchFlowError;

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Stack along a new leading axis (samples -> batch).
    Stack,
    /// Concatenate along the existing leading axis (batches -> aggregate).
    Concat,
}

impl Mode {
    fn operation(self) -> &'static str {
        match self {
            Mode::Stack => "collate_samples",
            Mode::Concat => "concat_batches",
        }
    }
}

/// Merges N samples into one batch by stacking each corresponding leaf into
/// a new array with leading dimension N. Sample order is preserved: index
/// `i` of the batch holds sample `i`.
pub fn collate_samples(samples: &[ArrayTree]) -> Result<ArrayTree, BatchFlowError> {
    let refs: Vec<&ArrayTree> = samples.iter().collect();
    merge(&refs, Mode::Stack)
}

/// Merges M batches into one aggregate by concatenating each corresponding
/// leaf along the existing leading dimension, in input order.
pub fn concat_batches(batches: &[ArrayTree]) -> Result<ArrayTree, BatchFlowError> {
    let refs: Vec<&ArrayTree> = batches.iter().collect();
    merge(&refs, Mode::Concat)
}

fn mismatch(mode: Mode, detail: String) -> BatchFlowError {
    BatchFlowError::StructuralMismatch {
        operation: mode.operation().to_string(),
        detail,
    }
}

fn merge(items: &[&ArrayTree], mode: Mode) -> Result<ArrayTree, BatchFlowError> {
    let first = *items.first().ok_or(BatchFlowError::EmptyCollate)?;
    match first {
        ArrayTree::Leaf(_) => {
            let mut views: Vec<ArrayViewD<f32>> = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    ArrayTree::Leaf(array) => views.push(array.view()),
                    other => {
                        return Err(mismatch(
                            mode,
                            format!("expected an array leaf, found a {}", other.kind()),
                        ))
                    }
                }
            }
            let merged = match mode {
                Mode::Stack => stack(Axis(0), &views),
                Mode::Concat => concatenate(Axis(0), &views),
            }
            .map_err(|e| mismatch(mode, format!("leaf shapes do not agree: {}", e)))?;
            Ok(ArrayTree::Leaf(merged))
        }
        ArrayTree::Seq(first_items) => {
            for item in items {
                match item {
                    ArrayTree::Seq(sub) if sub.len() == first_items.len() => {}
                    ArrayTree::Seq(sub) => {
                        return Err(mismatch(
                            mode,
                            format!(
                                "sequence lengths differ: {} vs {}",
                                first_items.len(),
                                sub.len()
                            ),
                        ))
                    }
                    other => {
                        return Err(mismatch(
                            mode,
                            format!("expected a sequence, found a {}", other.kind()),
                        ))
                    }
                }
            }
            let mut merged = Vec::with_capacity(first_items.len());
            for position in 0..first_items.len() {
                let column: Vec<&ArrayTree> = items
                    .iter()
                    .filter_map(|item| match item {
                        ArrayTree::Seq(sub) => Some(&sub[position]),
                        _ => None,
                    })
                    .collect();
                merged.push(merge(&column, mode)?);
            }
            Ok(ArrayTree::Seq(merged))
        }
        ArrayTree::Map(first_entries) => {
            for item in items {
                match item {
                    ArrayTree::Map(entries) if entries.keys().eq(first_entries.keys()) => {}
                    ArrayTree::Map(entries) => {
                        return Err(mismatch(
                            mode,
                            format!(
                                "mapping keys differ: {:?} vs {:?}",
                                first_entries.keys().collect::<Vec<_>>(),
                                entries.keys().collect::<Vec<_>>()
                            ),
                        ))
                    }
                    other => {
                        return Err(mismatch(
                            mode,
                            format!("expected a mapping, found a {}", other.kind()),
                        ))
                    }
                }
            }
            let mut merged = BTreeMap::new();
            for key in first_entries.keys() {
                let column: Vec<&ArrayTree> = items
                    .iter()
                    .filter_map(|item| item.get(key))
                    .collect();
                merged.insert(key.clone(), merge(&column, mode)?);
            }
            Ok(ArrayTree::Map(merged))
        }
    }
}

/// The inverse primitive: slices every leaf of a preloaded structure at
/// `index` along the leading axis, dropping that axis. The result is the
/// single-sample structure that [`collate_samples`] would have stacked at
/// that position.
pub fn index_into(data: &ArrayTree, index: usize) -> Result<ArrayTree, BatchFlowError> {
    match data {
        ArrayTree::Leaf(array) => {
            let len = *array
                .shape()
                .first()
                .ok_or_else(|| BatchFlowError::StructuralMismatch {
                    operation: "index_into".to_string(),
                    detail: "scalar leaf has no leading dimension".to_string(),
                })?;
            if index >= len {
                return Err(BatchFlowError::IndexOutOfBounds { index, len });
            }
            Ok(ArrayTree::Leaf(array.index_axis(Axis(0), index).to_owned()))
        }
        ArrayTree::Seq(items) => items
            .iter()
            .map(|item| index_into(item, index))
            .collect::<Result<Vec<_>, _>>()
            .map(ArrayTree::Seq),
        ArrayTree::Map(entries) => entries
            .iter()
            .map(|(key, value)| index_into(value, index).map(|sliced| (key.clone(), sliced)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(ArrayTree::Map),
    }
}

#[cfg(test)]
#[path = "collate_test.rs"]
mod tests;
