use std::path::PathBuf;

use batchflow_core::BatchFlowError;

use crate::spec::DataLoaderDescription;

const FULL_DESCRIPTION: &str = r#"
type: Dataset
defined_as: toy_loader.rs::ToyDataset
args:
  intervals_file:
    doc: bed3 file of regions
    example: example_files/intervals.bed
  fasta_file:
    doc: reference genome fasta
    example: example_files/genome.fa
    optional: false
info:
  name: toy
  doc: toy dataloader for tests
  authors:
    - Ada Lovelace
dependencies:
  - htslib
output_schema:
  inputs:
    shape: [4, 101]
"#;

#[test]
fn parses_a_full_description() {
    let description: DataLoaderDescription =
        serde_yaml::from_str(FULL_DESCRIPTION).expect("valid yaml");
    assert_eq!(description.kind, "Dataset");
    assert_eq!(description.defined_as, "toy_loader.rs::ToyDataset");
    assert_eq!(description.args.len(), 2);
    let fasta = &description.args["fasta_file"];
    assert_eq!(fasta.doc, "reference genome fasta");
    assert_eq!(
        fasta.example,
        Some(serde_json::Value::String("example_files/genome.fa".to_string()))
    );
    assert!(!fasta.optional);
    assert_eq!(description.info.name.as_deref(), Some("toy"));
    assert_eq!(description.dependencies, vec!["htslib".to_string()]);
    assert!(description.output_schema.get("inputs").is_some());
    assert!(description.postprocessing.is_empty());
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let description: DataLoaderDescription =
        serde_yaml::from_str("type: SampleIterator\ndefined_as: gen.rs::stream\n")
            .expect("minimal yaml");
    assert_eq!(description.kind, "SampleIterator");
    assert!(description.args.is_empty());
    assert!(description.info.doc.is_empty());
    assert!(description.dependencies.is_empty());
}

#[test]
fn from_path_reads_a_description_file() {
    let dir = std::env::temp_dir().join(format!("batchflow-spec-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("dataloader.yaml");
    std::fs::write(&path, FULL_DESCRIPTION).expect("write yaml");

    let description = DataLoaderDescription::from_path(&path).expect("readable");
    assert_eq!(description.kind, "Dataset");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unreadable_or_invalid_documents_are_spec_errors() {
    let missing = DataLoaderDescription::from_path(&PathBuf::from("/nonexistent/dataloader.yaml"));
    assert!(matches!(missing, Err(BatchFlowError::SpecError { .. })));

    let dir = std::env::temp_dir().join(format!("batchflow-badspec-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("dataloader.yaml");
    std::fs::write(&path, "defined_as: no type field\n").expect("write yaml");
    let invalid = DataLoaderDescription::from_path(&path);
    assert!(matches!(invalid, Err(BatchFlowError::SpecError { .. })));
    std::fs::remove_dir_all(&dir).ok();
}
