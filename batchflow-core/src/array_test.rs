use ndarray::{ArrayD, IxDyn};

use crate::array::{leading_lens, ArrayTree};
use crate::error::BatchFlowError;

fn leaf(shape: &[usize]) -> ArrayTree {
    let numel: usize = shape.iter().product();
    let values: Vec<f32> = (0..numel).map(|v| v as f32).collect();
    ArrayTree::Leaf(ArrayD::from_shape_vec(IxDyn(shape), values).expect("valid shape"))
}

#[test]
fn leading_lens_reports_one_common_length() {
    let data = ArrayTree::map([
        ("inputs", leaf(&[10, 4])),
        ("targets", leaf(&[10])),
        ("metadata", ArrayTree::seq([leaf(&[10, 2]), leaf(&[10, 1])])),
    ]);
    let lens = leading_lens(&data).expect("uniform structure");
    assert_eq!(lens.into_iter().collect::<Vec<_>>(), vec![10]);
}

#[test]
fn leading_lens_reports_divergent_lengths() {
    let data = ArrayTree::map([("inputs", leaf(&[10, 4])), ("targets", leaf(&[9]))]);
    let lens = leading_lens(&data).expect("still a valid structure");
    assert_eq!(lens.into_iter().collect::<Vec<_>>(), vec![9, 10]);
}

#[test]
fn leading_lens_rejects_scalar_leaves() {
    let data = ArrayTree::map([("inputs", leaf(&[10])), ("count", leaf(&[]))]);
    let err = leading_lens(&data).expect_err("scalars have no leading dimension");
    assert!(matches!(err, BatchFlowError::StructuralMismatch { .. }));
}

#[test]
fn field_access_on_mapping() {
    let batch = ArrayTree::map([("inputs", leaf(&[3, 2]))]);
    assert!(batch.field("inputs").is_ok());
    let err = batch.field("targets").expect_err("missing entry");
    assert!(matches!(err, BatchFlowError::StructuralMismatch { .. }));
}

#[test]
fn field_access_on_non_mapping() {
    let batch = leaf(&[3, 2]);
    assert!(batch.get("inputs").is_none());
    assert!(batch.field("inputs").is_err());
}

#[test]
fn as_leaf_exposes_the_array() {
    let node = leaf(&[2, 2]);
    assert_eq!(node.as_leaf().map(|a| a.shape().to_vec()), Some(vec![2, 2]));
    assert!(ArrayTree::seq([]).as_leaf().is_none());
}
