use std::fmt;
use std::path::PathBuf;

/// Error type shared by the BatchFlow workspace.
///
/// Every variant signals a contract violation between a dataloader, its
/// declared description, or the data it produces. None of them are retried:
/// construction and dynamic loading fail fast so a broken loader is never
/// partially usable.
///
/// `Display` and `Error` are implemented by hand rather than derived via
/// `thiserror` because the `UnknownLoader::source` field is a plain `String`
/// (a source *name*, not a source *error*), which the derive would otherwise
/// try to expose through `Error::source`.
#[derive(Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum BatchFlowError {
    StructuralMismatch { operation: String, detail: String },

    DimensionMismatch { lengths: Vec<usize> },

    IndexOutOfBounds { index: usize, len: usize },

    EmptyCollate,

    UnknownVariant { given: String, known: Vec<String> },

    ArgumentMismatch {
        declared: Vec<String>,
        actual: Vec<String>,
    },

    ContractMismatch { expected: String, found: String },

    UnknownLoader { name: String, source: String },

    UnresolvedReference { defined_as: String },

    SpecError { path: PathBuf, detail: String },

    /// Escape hatch for user-supplied dataset and stream implementations.
    LoaderError(String),
}

impl fmt::Display for BatchFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StructuralMismatch { operation, detail } => {
                write!(f, "structural mismatch during {operation}: {detail}")
            }
            Self::DimensionMismatch { lengths } => {
                write!(
                    f,
                    "leading dimension mismatch: leaf arrays report lengths {lengths:?}"
                )
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::EmptyCollate => {
                write!(f, "cannot collate an empty list of structures")
            }
            Self::UnknownVariant { given, known } => {
                write!(
                    f,
                    "dataloader type {given} is not among the supported types {known:?}"
                )
            }
            Self::ArgumentMismatch { declared, actual } => {
                write!(
                    f,
                    "dataloader arguments {actual:?} don't match the declared arguments {declared:?}"
                )
            }
            Self::ContractMismatch { expected, found } => {
                write!(
                    f,
                    "dataloader does not satisfy the declared contract: expected {expected}, got {found}"
                )
            }
            Self::UnknownLoader { name, source } => {
                write!(f, "dataloader {name} not found in source {source}")
            }
            Self::UnresolvedReference { defined_as } => {
                write!(f, "no implementation registered under {defined_as}")
            }
            Self::SpecError { path, detail } => {
                write!(
                    f,
                    "failed to read dataloader description {}: {detail}",
                    path.display()
                )
            }
            Self::LoaderError(detail) => {
                write!(f, "dataloader error: {detail}")
            }
        }
    }
}

impl std::error::Error for BatchFlowError {}
