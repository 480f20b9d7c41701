use ndarray::{ArrayD, IxDyn};

use batchflow_core::{ArrayTree, BatchFlowError};

use crate::contracts::dataset::{Dataset, DatasetLoader};
use crate::contracts::traits::{BatchLoader, IterParams};

fn leaf(values: Vec<f32>, shape: &[usize]) -> ArrayTree {
    ArrayTree::Leaf(ArrayD::from_shape_vec(IxDyn(shape), values).expect("valid shape"))
}

/// Deterministic toy dataset: sample i is ([i, i+0.5], [2 * i]).
#[derive(Debug)]
struct RangeDataset {
    n: usize,
}

impl Dataset for RangeDataset {
    fn get(&self, index: usize) -> Result<ArrayTree, BatchFlowError> {
        if index >= self.n {
            return Err(BatchFlowError::IndexOutOfBounds {
                index,
                len: self.n,
            });
        }
        let i = index as f32;
        Ok(ArrayTree::map([
            ("inputs", leaf(vec![i, i + 0.5], &[2])),
            ("targets", leaf(vec![2.0 * i], &[1])),
        ]))
    }

    fn len(&self) -> usize {
        self.n
    }
}

fn target_values(all: &ArrayTree) -> Vec<f32> {
    all.field("targets")
        .expect("targets")
        .as_leaf()
        .expect("leaf")
        .iter()
        .copied()
        .collect()
}

#[test]
fn sequential_pass_preserves_index_order() {
    let loader = DatasetLoader::new(RangeDataset { n: 10 });
    let params = IterParams {
        batch_size: 4,
        ..Default::default()
    };
    let batches: Vec<ArrayTree> = loader
        .batch_iter(&params)
        .expect("pass")
        .collect::<Result<_, _>>()
        .expect("no errors");
    assert_eq!(batches.len(), 3);

    let first_inputs = batches[0].field("inputs").expect("inputs").as_leaf().expect("leaf");
    assert_eq!(first_inputs.shape(), &[4, 2]);
    assert_eq!(first_inputs[[0, 0]], 0.0);
    assert_eq!(first_inputs[[3, 1]], 3.5);

    let last_inputs = batches[2].field("inputs").expect("inputs").as_leaf().expect("leaf");
    assert_eq!(last_inputs.shape(), &[2, 2]);
}

#[test]
fn shuffled_pass_is_a_permutation() {
    let loader = DatasetLoader::new(RangeDataset { n: 10 });
    let params = IterParams {
        batch_size: 3,
        shuffle: true,
        seed: Some(7),
        ..Default::default()
    };
    let all = loader.load_all(&params).expect("whole dataset");
    let mut targets = target_values(&all);
    targets.sort_by(f32::total_cmp);
    let expected: Vec<f32> = (0..10).map(|i| 2.0 * i as f32).collect();
    assert_eq!(targets, expected);
}

#[test]
fn seeded_shuffles_repeat_across_passes() {
    let loader = DatasetLoader::new(RangeDataset { n: 10 });
    let params = IterParams {
        batch_size: 3,
        shuffle: true,
        seed: Some(42),
        ..Default::default()
    };
    let first = loader.load_all(&params).expect("first pass");
    let second = loader.load_all(&params).expect("second pass");
    assert_eq!(first, second);
}

#[test]
fn parallel_fetch_matches_inline_fetch() {
    let loader = DatasetLoader::new(RangeDataset { n: 23 });
    let inline = loader
        .load_all(&IterParams {
            batch_size: 4,
            ..Default::default()
        })
        .expect("inline pass");
    let parallel = loader
        .load_all(&IterParams {
            batch_size: 4,
            num_workers: 3,
            ..Default::default()
        })
        .expect("parallel pass");
    assert_eq!(inline, parallel);
}

#[test]
fn train_iter_projects_input_target_pairs() {
    let loader = DatasetLoader::new(RangeDataset { n: 6 });
    let params = IterParams {
        batch_size: 2,
        ..Default::default()
    };
    let pairs: Vec<(ArrayTree, ArrayTree)> = loader
        .batch_train_iter(false, &params)
        .expect("pass")
        .collect::<Result<_, _>>()
        .expect("no errors");
    assert_eq!(pairs.len(), 3);
    let (inputs, targets) = &pairs[1];
    assert_eq!(inputs.as_leaf().expect("leaf")[[0, 0]], 2.0);
    assert_eq!(targets.as_leaf().expect("leaf")[[1, 0]], 6.0);
}

#[test]
fn boxed_trait_objects_remain_datasets() {
    let boxed: Box<dyn Dataset> = Box::new(RangeDataset { n: 4 });
    let loader = DatasetLoader::new(boxed);
    let all = loader.load_all(&IterParams::default()).expect("whole dataset");
    assert_eq!(target_values(&all), vec![0.0, 2.0, 4.0, 6.0]);
}
