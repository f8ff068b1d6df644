use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Workflow errors
// ---------------------------------------------------------------------------

/// Everything that can abort a workflow run or a project operation.
///
/// Idempotence guards and invalid delimited-text layers are *not* errors;
/// they surface as [`crate::workflow::Notice`]s instead.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading shapefile {path}")]
    Shapefile {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    #[error("CSV error in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("layer '{layer}': feature {index} has no point geometry")]
    MissingGeometry { layer: String, index: usize },

    #[error("{path}: shape {index} is a {kind}, expected a point")]
    UnsupportedGeometry {
        path: PathBuf,
        index: usize,
        kind: String,
    },

    #[error("no layer named '{0}' in the project")]
    LayerNotFound(String),

    #[error("invalid layer URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("invalid coordinate reference system '{0}'")]
    InvalidCrs(String),

    #[error("unsupported text encoding '{0}' (only UTF-8 is read)")]
    UnsupportedEncoding(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("parsing config file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("project file {path}")]
    Project {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = WorkflowError> = std::result::Result<T, E>;

impl WorkflowError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkflowError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        WorkflowError::Csv {
            path: path.into(),
            source,
        }
    }
}
