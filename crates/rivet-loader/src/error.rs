use rivet_core::ContainerError;
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors raised while reading service documents
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported import: {resource}")]
    UnsupportedImport { resource: String },

    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl LoaderError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn unsupported_import(resource: impl Into<String>) -> Self {
        Self::UnsupportedImport {
            resource: resource.into(),
        }
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}
