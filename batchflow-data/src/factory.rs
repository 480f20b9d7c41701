//! Dynamic loading and validation of user-supplied dataloaders.
//!
//! Given a declarative description and a registered candidate
//! implementation, [`dataloader_factory`] verifies that the declared
//! contract-variant name is known, that the candidate's constructor
//! parameter names match the declared argument names exactly, and that the
//! candidate's shape satisfies the declared contract (function-derived
//! variants demand a plain function, the others an implementation of the
//! matching trait). On success the description's metadata is bound together
//! with the implementation into an immutable [`DataLoaderFactory`]; the
//! implementation itself is never mutated and no instance is created until
//! the caller asks for one.
//!
//! Validation is terminal on first failure so a broken loader is never
//! partially usable.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use batchflow_core::{ArrayTree, BatchFlowError};

use crate::contracts::{
    BatchDataset, BatchDatasetLoader, BatchGenerator, BatchIteratorLoader, BatchLoader, Dataset,
    BatchStream, DatasetLoader, PreloadedDataset, SampleGenerator, SampleIteratorLoader,
    SampleStream,
};
use crate::spec::{DataLoaderArgument, DataLoaderDescription, Info, Kwargs};

/// The seven known contract variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderKind {
    PreloadedDataset,
    Dataset,
    BatchDataset,
    SampleIterator,
    BatchIterator,
    SampleGenerator,
    BatchGenerator,
}

impl LoaderKind {
    pub const ALL: [LoaderKind; 7] = [
        LoaderKind::PreloadedDataset,
        LoaderKind::Dataset,
        LoaderKind::BatchDataset,
        LoaderKind::SampleIterator,
        LoaderKind::BatchIterator,
        LoaderKind::SampleGenerator,
        LoaderKind::BatchGenerator,
    ];

    pub fn from_name(name: &str) -> Option<LoaderKind> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            LoaderKind::PreloadedDataset => "PreloadedDataset",
            LoaderKind::Dataset => "Dataset",
            LoaderKind::BatchDataset => "BatchDataset",
            LoaderKind::SampleIterator => "SampleIterator",
            LoaderKind::BatchIterator => "BatchIterator",
            LoaderKind::SampleGenerator => "SampleGenerator",
            LoaderKind::BatchGenerator => "BatchGenerator",
        }
    }

    /// Variants constructed by binding a plain function rather than
    /// instantiating a contract implementation.
    pub fn is_function_kind(self) -> bool {
        matches!(
            self,
            LoaderKind::PreloadedDataset | LoaderKind::SampleGenerator | LoaderKind::BatchGenerator
        )
    }

    pub fn known_names() -> Vec<String> {
        Self::ALL.iter().map(|kind| kind.name().to_string()).collect()
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type DatasetCtor = Arc<dyn Fn(&Kwargs) -> Result<Box<dyn Dataset>, BatchFlowError> + Send + Sync>;
type BatchDatasetCtor =
    Arc<dyn Fn(&Kwargs) -> Result<Box<dyn BatchDataset>, BatchFlowError> + Send + Sync>;
type StreamCtor = Arc<dyn Fn(&Kwargs) -> Result<SampleStream, BatchFlowError> + Send + Sync>;
type DataCtor = Arc<dyn Fn(&Kwargs) -> Result<ArrayTree, BatchFlowError> + Send + Sync>;

/// The constructor shape of a registered implementation.
#[derive(Clone)]
pub enum CandidateImpl {
    /// A type implementing [`Dataset`].
    Dataset(DatasetCtor),
    /// A type implementing [`BatchDataset`].
    BatchDataset(BatchDatasetCtor),
    /// A type built once into a single exhaustible sample stream.
    SampleIterator(StreamCtor),
    /// A type built once into a single exhaustible batch stream.
    BatchIterator(StreamCtor),
    /// A plain function producing a full dataset structure.
    DataFn(DataCtor),
    /// A plain function producing a fresh sample stream per pass.
    SampleGenFn(StreamCtor),
    /// A plain function producing a fresh batch stream per pass.
    BatchGenFn(StreamCtor),
}

impl fmt::Debug for CandidateImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

impl CandidateImpl {
    fn describe(&self) -> &'static str {
        match self {
            CandidateImpl::Dataset(_) => "a Dataset implementation",
            CandidateImpl::BatchDataset(_) => "a BatchDataset implementation",
            CandidateImpl::SampleIterator(_) => "a SampleIterator implementation",
            CandidateImpl::BatchIterator(_) => "a BatchIterator implementation",
            CandidateImpl::DataFn(_) => "a plain dataset-producing function",
            CandidateImpl::SampleGenFn(_) => "a plain sample-generating function",
            CandidateImpl::BatchGenFn(_) => "a plain batch-generating function",
        }
    }

    fn satisfies(&self, kind: LoaderKind) -> bool {
        matches!(
            (kind, self),
            (LoaderKind::PreloadedDataset, CandidateImpl::DataFn(_))
                | (LoaderKind::Dataset, CandidateImpl::Dataset(_))
                | (LoaderKind::BatchDataset, CandidateImpl::BatchDataset(_))
                | (LoaderKind::SampleIterator, CandidateImpl::SampleIterator(_))
                | (LoaderKind::BatchIterator, CandidateImpl::BatchIterator(_))
                | (LoaderKind::SampleGenerator, CandidateImpl::SampleGenFn(_))
                | (LoaderKind::BatchGenerator, CandidateImpl::BatchGenFn(_))
        )
    }
}

/// A candidate implementation: its constructor parameter names plus its
/// constructor. Cheap to clone; constructors are shared.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub params: Vec<String>,
    pub imp: CandidateImpl,
}

impl Candidate {
    fn new(params: &[&str], imp: CandidateImpl) -> Self {
        Self {
            params: params.iter().map(|p| p.to_string()).collect(),
            imp,
        }
    }

    pub fn dataset<F>(params: &[&str], ctor: F) -> Self
    where
        F: Fn(&Kwargs) -> Result<Box<dyn Dataset>, BatchFlowError> + Send + Sync + 'static,
    {
        Self::new(params, CandidateImpl::Dataset(Arc::new(ctor)))
    }

    pub fn batch_dataset<F>(params: &[&str], ctor: F) -> Self
    where
        F: Fn(&Kwargs) -> Result<Box<dyn BatchDataset>, BatchFlowError> + Send + Sync + 'static,
    {
        Self::new(params, CandidateImpl::BatchDataset(Arc::new(ctor)))
    }

    pub fn sample_iterator<F>(params: &[&str], ctor: F) -> Self
    where
        F: Fn(&Kwargs) -> Result<SampleStream, BatchFlowError> + Send + Sync + 'static,
    {
        Self::new(params, CandidateImpl::SampleIterator(Arc::new(ctor)))
    }

    pub fn batch_iterator<F>(params: &[&str], ctor: F) -> Self
    where
        F: Fn(&Kwargs) -> Result<BatchStream, BatchFlowError> + Send + Sync + 'static,
    {
        Self::new(params, CandidateImpl::BatchIterator(Arc::new(ctor)))
    }

    pub fn data_fn<F>(params: &[&str], f: F) -> Self
    where
        F: Fn(&Kwargs) -> Result<ArrayTree, BatchFlowError> + Send + Sync + 'static,
    {
        Self::new(params, CandidateImpl::DataFn(Arc::new(f)))
    }

    pub fn sample_gen_fn<F>(params: &[&str], f: F) -> Self
    where
        F: Fn(&Kwargs) -> Result<SampleStream, BatchFlowError> + Send + Sync + 'static,
    {
        Self::new(params, CandidateImpl::SampleGenFn(Arc::new(f)))
    }

    pub fn batch_gen_fn<F>(params: &[&str], f: F) -> Self
    where
        F: Fn(&Kwargs) -> Result<BatchStream, BatchFlowError> + Send + Sync + 'static,
    {
        Self::new(params, CandidateImpl::BatchGenFn(Arc::new(f)))
    }
}

/// Where a description document came from.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Source registry name.
    pub source: String,
    /// Path of the description document.
    pub spec_path: PathBuf,
    /// Directory containing the description; relative paths in example
    /// arguments are interpreted against it by convention.
    pub source_dir: PathBuf,
}

impl SourceContext {
    pub fn from_spec_path(source: &str, spec_path: PathBuf) -> Self {
        let source_dir = spec_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            source: source.to_string(),
            spec_path,
            source_dir,
        }
    }
}

/// A validated loader: the description's metadata composed with the
/// implementation, ready to instantiate. No pooling or caching happens
/// here; every [`init`](Self::init) call builds a fresh caller-owned
/// instance.
#[derive(Debug)]
pub struct DataLoaderFactory {
    pub kind: LoaderKind,
    pub defined_as: String,
    pub args: BTreeMap<String, DataLoaderArgument>,
    pub info: Info,
    pub output_schema: serde_json::Value,
    pub dependencies: Vec<String>,
    pub postprocessing: BTreeMap<String, serde_json::Value>,
    pub spec_path: PathBuf,
    pub source: String,
    pub source_dir: PathBuf,
    /// Example keyword arguments collected from the argument descriptions.
    pub example_kwargs: Kwargs,
    imp: CandidateImpl,
}

impl DataLoaderFactory {
    /// Instantiates the loader with the given keyword arguments.
    pub fn init(&self, kwargs: &Kwargs) -> Result<Box<dyn BatchLoader>, BatchFlowError> {
        match &self.imp {
            CandidateImpl::DataFn(f) => Ok(Box::new(PreloadedDataset::from_fn(|| f(kwargs))?)),
            CandidateImpl::Dataset(f) => Ok(Box::new(DatasetLoader::new(f(kwargs)?))),
            CandidateImpl::BatchDataset(f) => Ok(Box::new(BatchDatasetLoader::new(f(kwargs)?))),
            CandidateImpl::SampleIterator(f) => {
                Ok(Box::new(SampleIteratorLoader::from_stream(f(kwargs)?)))
            }
            CandidateImpl::BatchIterator(f) => {
                Ok(Box::new(BatchIteratorLoader::from_stream(f(kwargs)?)))
            }
            CandidateImpl::SampleGenFn(f) => {
                let f = Arc::clone(f);
                let kwargs = kwargs.clone();
                Ok(Box::new(SampleGenerator::from_fn(move || f(&kwargs))))
            }
            CandidateImpl::BatchGenFn(f) => {
                let f = Arc::clone(f);
                let kwargs = kwargs.clone();
                Ok(Box::new(BatchGenerator::from_fn(move || f(&kwargs))))
            }
        }
    }

    /// Instantiates the loader with the example arguments from its
    /// description.
    pub fn init_example(&self) -> Result<Box<dyn BatchLoader>, BatchFlowError> {
        self.init(&self.example_kwargs)
    }

    /// Prints the expected keyword arguments.
    pub fn print_args(&self) {
        println!("Keyword arguments for {}:", self.defined_as);
        for (name, arg) in &self.args {
            let optional = if arg.optional { " (optional)" } else { "" };
            println!("  {}{}: {}", name, optional, arg.doc);
            if let Some(example) = &arg.example {
                println!("    example: {}", example);
            }
        }
        if !self.example_kwargs.is_empty() {
            println!("Example: init(&example_kwargs) with {:?}", self.example_kwargs);
        }
    }
}

/// Validates a description against a candidate implementation and binds
/// them into a [`DataLoaderFactory`].
pub fn dataloader_factory(
    description: DataLoaderDescription,
    candidate: Candidate,
    context: SourceContext,
) -> Result<DataLoaderFactory, BatchFlowError> {
    let kind = LoaderKind::from_name(&description.kind).ok_or_else(|| {
        BatchFlowError::UnknownVariant {
            given: description.kind.clone(),
            known: LoaderKind::known_names(),
        }
    })?;

    let declared: BTreeSet<&String> = description.args.keys().collect();
    let actual: BTreeSet<&String> = candidate.params.iter().collect();
    if declared != actual {
        return Err(BatchFlowError::ArgumentMismatch {
            declared: declared.into_iter().cloned().collect(),
            actual: actual.into_iter().cloned().collect(),
        });
    }

    if !candidate.imp.satisfies(kind) {
        let expected = if kind.is_function_kind() {
            format!("a plain function for {}", kind)
        } else {
            format!("an implementation of the {} contract", kind)
        };
        return Err(BatchFlowError::ContractMismatch {
            expected,
            found: candidate.imp.describe().to_string(),
        });
    }

    let example_kwargs: Kwargs = description
        .args
        .iter()
        .filter_map(|(name, arg)| arg.example.clone().map(|value| (name.clone(), value)))
        .collect();

    log::info!(
        "successfully loaded the dataloader {} from {}",
        description.defined_as,
        context.spec_path.display()
    );

    Ok(DataLoaderFactory {
        kind,
        defined_as: description.defined_as,
        args: description.args,
        info: description.info,
        output_schema: description.output_schema,
        dependencies: description.dependencies,
        postprocessing: description.postprocessing,
        spec_path: context.spec_path,
        source: context.source,
        source_dir: context.source_dir,
        example_kwargs,
        imp: candidate.imp,
    })
}

/// Maps `defined_as` implementation references to registered candidates.
///
/// The Rust rendition of resolving a `"<path>::<symbol>"` reference:
/// implementations are registered in-process under the reference their
/// description declares.
#[derive(Default)]
pub struct ImplRegistry {
    entries: BTreeMap<String, Candidate>,
}

impl ImplRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, defined_as: impl Into<String>, candidate: Candidate) {
        self.entries.insert(defined_as.into(), candidate);
    }

    pub fn resolve(&self, defined_as: &str) -> Result<Candidate, BatchFlowError> {
        self.entries
            .get(defined_as)
            .cloned()
            .ok_or_else(|| BatchFlowError::UnresolvedReference {
                defined_as: defined_as.to_string(),
            })
    }
}

/// A source registry handing out description documents by loader name.
/// Downloading and dependency installation stay behind this seam.
pub trait Source {
    fn name(&self) -> &str;

    /// Resolves a loader name to its description document path.
    fn resolve(&self, dataloader: &str) -> Result<PathBuf, BatchFlowError>;
}

/// A directory-backed source: `<root>/<loader>/dataloader.yaml`.
#[derive(Debug, Clone)]
pub struct LocalSource {
    name: String,
    root: PathBuf,
}

impl LocalSource {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }
}

impl Source for LocalSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, dataloader: &str) -> Result<PathBuf, BatchFlowError> {
        let path = self.root.join(dataloader).join("dataloader.yaml");
        if path.is_file() {
            Ok(path)
        } else {
            Err(BatchFlowError::UnknownLoader {
                name: dataloader.to_string(),
                source: self.name.clone(),
            })
        }
    }
}

/// The full dynamic-loading pipeline: resolve the description document from
/// a source, look up the implementation it references, validate and bind.
pub fn get_dataloader_factory(
    dataloader: &str,
    source: &dyn Source,
    registry: &ImplRegistry,
) -> Result<DataLoaderFactory, BatchFlowError> {
    let spec_path = source.resolve(dataloader)?;
    let description = DataLoaderDescription::from_path(&spec_path)?;
    let candidate = registry.resolve(&description.defined_as)?;
    let context = SourceContext::from_spec_path(source.name(), spec_path);
    dataloader_factory(description, candidate, context)
}

#[cfg(test)]
#[path = "factory_test.rs"]
mod tests;
