use std::collections::{BTreeMap, BTreeSet};

use ndarray::ArrayD;

use crate::error::BatchFlowError;

/// A nested structure of numeric arrays.
///
/// Samples and batches are both represented as an `ArrayTree`: mappings and
/// ordered sequences of arbitrary depth whose leaves are concrete
/// [`ArrayD<f32>`] arrays. Within one dataset the set of leaf paths is
/// structurally identical across samples; leaf shapes may vary only in the
/// leading (batch) dimension once batched.
///
/// A batch conventionally carries at least the keys `inputs`, `targets` and
/// `metadata`, but nothing here is nominal: any internally consistent shape
/// is accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayTree {
    /// A single fixed-shape numeric array.
    Leaf(ArrayD<f32>),
    /// An ordered sequence of sub-structures.
    Seq(Vec<ArrayTree>),
    /// A string-keyed mapping of sub-structures.
    Map(BTreeMap<String, ArrayTree>),
}

impl ArrayTree {
    /// Builds a mapping node from `(key, value)` entries.
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ArrayTree)>,
        K: Into<String>,
    {
        ArrayTree::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a sequence node.
    pub fn seq<I>(items: I) -> Self
    where
        I: IntoIterator<Item = ArrayTree>,
    {
        ArrayTree::Seq(items.into_iter().collect())
    }

    /// Looks up a key on a mapping node. Returns `None` on non-mapping nodes.
    pub fn get(&self, key: &str) -> Option<&ArrayTree> {
        match self {
            ArrayTree::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Like [`get`](Self::get), but a missing entry is a structural error.
    ///
    /// Used by the training/prediction projections, which require the
    /// conventional `inputs`/`targets` entries to be present.
    pub fn field(&self, key: &str) -> Result<&ArrayTree, BatchFlowError> {
        self.get(key)
            .ok_or_else(|| BatchFlowError::StructuralMismatch {
                operation: "field access".to_string(),
                detail: format!("no {:?} entry in the batch structure", key),
            })
    }

    /// Returns the leaf array when this node is a leaf.
    pub fn as_leaf(&self) -> Option<&ArrayD<f32>> {
        match self {
            ArrayTree::Leaf(array) => Some(array),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ArrayTree::Leaf(_) => "array leaf",
            ArrayTree::Seq(_) => "sequence",
            ArrayTree::Map(_) => "mapping",
        }
    }
}

impl From<ArrayD<f32>> for ArrayTree {
    fn from(array: ArrayD<f32>) -> Self {
        ArrayTree::Leaf(array)
    }
}

/// Reports the set of first-dimension lengths found at every leaf.
///
/// A fully preloaded dataset must have exactly one common leading length;
/// construction uses this to enforce that invariant. A rank-0 leaf has no
/// leading dimension and fails with
/// [`BatchFlowError::StructuralMismatch`].
pub fn leading_lens(data: &ArrayTree) -> Result<BTreeSet<usize>, BatchFlowError> {
    let mut lens = BTreeSet::new();
    collect_lens(data, &mut lens)?;
    Ok(lens)
}

fn collect_lens(node: &ArrayTree, out: &mut BTreeSet<usize>) -> Result<(), BatchFlowError> {
    match node {
        ArrayTree::Leaf(array) => match array.shape().first() {
            Some(&n) => {
                out.insert(n);
                Ok(())
            }
            None => Err(BatchFlowError::StructuralMismatch {
                operation: "leading_lens".to_string(),
                detail: "scalar leaf has no leading dimension".to_string(),
            }),
        },
        ArrayTree::Seq(items) => items.iter().try_for_each(|item| collect_lens(item, out)),
        ArrayTree::Map(entries) => entries.values().try_for_each(|item| collect_lens(item, out)),
    }
}

#[cfg(test)]
#[path = "array_test.rs"]
mod tests;
