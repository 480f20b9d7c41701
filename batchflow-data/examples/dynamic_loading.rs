//! Validates and runs a dataloader declared by a description document.
//!
//! The description and the candidate implementation are built in code here;
//! in a real deployment the description would come from a source registry
//! (see `LocalSource`) and the candidate from an `ImplRegistry`.

use std::collections::BTreeMap;

use ndarray::{ArrayD, IxDyn};

use batchflow_core::{ArrayTree, BatchFlowError};
use batchflow_data::{
    dataloader_factory, Candidate, DataLoaderArgument, DataLoaderDescription, Dataset, Info,
    IterParams, SourceContext,
};

struct SineDataset {
    n: usize,
}

impl Dataset for SineDataset {
    fn get(&self, index: usize) -> Result<ArrayTree, BatchFlowError> {
        if index >= self.n {
            return Err(BatchFlowError::IndexOutOfBounds {
                index,
                len: self.n,
            });
        }
        let x = index as f32 / self.n as f32;
        let inputs = ArrayD::from_shape_vec(IxDyn(&[1]), vec![x]).map_err(|e| {
            BatchFlowError::LoaderError(e.to_string())
        })?;
        let targets = ArrayD::from_shape_vec(IxDyn(&[1]), vec![x.sin()]).map_err(|e| {
            BatchFlowError::LoaderError(e.to_string())
        })?;
        Ok(ArrayTree::map([
            ("inputs", ArrayTree::Leaf(inputs)),
            ("targets", ArrayTree::Leaf(targets)),
        ]))
    }

    fn len(&self) -> usize {
        self.n
    }
}

fn description() -> DataLoaderDescription {
    let mut args = BTreeMap::new();
    args.insert(
        "n".to_string(),
        DataLoaderArgument {
            doc: "number of samples on the sine curve".to_string(),
            example: Some(serde_json::json!(10)),
            optional: false,
        },
    );
    DataLoaderDescription {
        kind: "Dataset".to_string(),
        defined_as: "sine.rs::SineDataset".to_string(),
        args,
        info: Info {
            name: Some("sine".to_string()),
            doc: "samples of sin(x) on [0, 1)".to_string(),
            ..Default::default()
        },
        output_schema: serde_json::Value::Null,
        dependencies: Vec::new(),
        postprocessing: BTreeMap::new(),
    }
}

fn main() -> Result<(), BatchFlowError> {
    env_logger::init();

    let candidate = Candidate::dataset(&["n"], |kwargs| {
        let n = kwargs
            .get("n")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| BatchFlowError::LoaderError("missing integer argument n".into()))?;
        Ok(Box::new(SineDataset { n: n as usize }))
    });
    let context = SourceContext::from_spec_path("in-code", "sine/dataloader.yaml".into());

    let factory = dataloader_factory(description(), candidate, context)?;
    factory.print_args();

    let loader = factory.init_example()?;
    let params = IterParams {
        batch_size: 4,
        ..Default::default()
    };
    for (i, batch) in loader.batch_iter(&params)?.enumerate() {
        let batch = batch?;
        if let Some(inputs) = batch.field("inputs")?.as_leaf() {
            println!("batch {}: inputs shape {:?}", i, inputs.shape());
        }
    }

    let all = loader.load_all(&params)?;
    if let Some(inputs) = all.field("inputs")?.as_leaf() {
        println!("full dataset: inputs shape {:?}", inputs.shape());
    }
    Ok(())
}
