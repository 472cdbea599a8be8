//! Error types emitted by the placegrain CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use placegrain_core::PlaceStoreError;
use placegrain_data::{LocateError, PipelineError, SourceError, VocabularyError};
use thiserror::Error;

/// Errors emitted by the placegrain CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk or has the wrong kind.
    #[error("{field} path {path:?} does not exist or is not a {expected}")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
        expected: &'static str,
    },
    /// The bounding box option could not be parsed.
    #[error("invalid bounding box {value:?}: expected four numbers west,north,east,south")]
    InvalidBoundingBox { value: String },
    /// The tile grid has a zero dimension.
    #[error("invalid tile grid {rows}x{cols}: rows and columns must be positive")]
    InvalidGrid { rows: u32, cols: u32 },
    /// Loading the classification vocabulary failed.
    #[error("failed to load vocabulary: {0}")]
    Vocabulary(#[from] VocabularyError),
    /// Building the relation location map failed.
    #[error("failed to resolve relation locations: {0}")]
    Locate(#[from] LocateError),
    /// Opening the extract failed.
    #[error("failed to open extract: {0}")]
    Source(#[from] SourceError),
    /// Opening the place store failed.
    #[error("failed to open place store at {path:?}: {source}")]
    OpenStore {
        path: Utf8PathBuf,
        #[source]
        source: PlaceStoreError,
    },
    /// The ingestion run stopped on a fatal error.
    #[error("ingestion failed: {0}")]
    Pipeline(#[from] PipelineError),
}
