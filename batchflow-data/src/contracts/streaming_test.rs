use ndarray::{ArrayD, IxDyn};

use batchflow_core::{ArrayTree, BatchFlowError};

use crate::contracts::streaming::{BatchIteratorLoader, SampleIteratorLoader};
use crate::contracts::traits::{BatchLoader, IterParams};

fn sample(i: usize) -> ArrayTree {
    ArrayTree::map([(
        "inputs",
        ArrayTree::Leaf(
            ArrayD::from_shape_vec(IxDyn(&[2]), vec![i as f32, i as f32 + 0.5])
                .expect("valid shape"),
        ),
    )])
}

fn batch_len(batch: &ArrayTree) -> usize {
    batch
        .field("inputs")
        .expect("inputs")
        .as_leaf()
        .expect("leaf")
        .shape()[0]
}

#[test]
fn greedy_grouping_with_a_smaller_final_batch() {
    let loader = SampleIteratorLoader::new((0..10).map(|i| Ok(sample(i))));
    let params = IterParams {
        batch_size: 4,
        ..Default::default()
    };
    let batches: Vec<ArrayTree> = loader
        .batch_iter(&params)
        .expect("pass")
        .collect::<Result<_, _>>()
        .expect("no errors");
    assert_eq!(batches.iter().map(batch_len).collect::<Vec<_>>(), vec![4, 4, 2]);

    let inputs = batches[1].field("inputs").expect("inputs").as_leaf().expect("leaf");
    assert_eq!(inputs[[0, 0]], 4.0);
}

#[test]
fn a_drained_sample_stream_stays_drained() {
    let loader = SampleIteratorLoader::new((0..3).map(|i| Ok(sample(i))));
    let params = IterParams {
        batch_size: 2,
        ..Default::default()
    };
    let first_pass = loader.batch_iter(&params).expect("first pass").count();
    assert_eq!(first_pass, 2);
    let second_pass = loader.batch_iter(&params).expect("second pass").count();
    assert_eq!(second_pass, 0);
}

#[test]
fn stream_errors_surface_immediately() {
    let items: Vec<Result<ArrayTree, BatchFlowError>> = vec![
        Ok(sample(0)),
        Err(BatchFlowError::LoaderError("broken record".to_string())),
        Ok(sample(2)),
    ];
    let loader = SampleIteratorLoader::new(items.into_iter());
    let params = IterParams {
        batch_size: 4,
        ..Default::default()
    };
    let mut pass = loader.batch_iter(&params).expect("pass");
    let first = pass.next().expect("an item");
    assert_eq!(
        first,
        Err(BatchFlowError::LoaderError("broken record".to_string()))
    );
}

#[test]
fn batch_stream_passes_through_unmodified() {
    let prebuilt: Vec<ArrayTree> = (0..3)
        .map(|i| {
            ArrayTree::map([(
                "inputs",
                ArrayTree::Leaf(
                    ArrayD::from_shape_vec(IxDyn(&[2, 1]), vec![i as f32, i as f32 + 1.0])
                        .expect("valid shape"),
                ),
            )])
        })
        .collect();
    let loader = BatchIteratorLoader::new(prebuilt.clone().into_iter().map(Ok));
    let batches: Vec<ArrayTree> = loader
        .batch_iter(&IterParams::default())
        .expect("pass")
        .collect::<Result<_, _>>()
        .expect("no errors");
    assert_eq!(batches, prebuilt);

    // single-exhaustible, like the sample variant
    assert_eq!(loader.batch_iter(&IterParams::default()).expect("pass").count(), 0);
}
