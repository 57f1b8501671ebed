use std::path::PathBuf;

use thiserror::Error;

/// Error raised by a host-supplied mail generator
pub type GenerationError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Class resolution error: {0}")]
    ClassResolution(String),

    #[error("Mail generation failed for {class_id}#{method_id}: {source}")]
    MailGeneration {
        class_id: String,
        method_id: String,
        #[source]
        source: GenerationError,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PreviewError {
    pub(crate) fn unknown_class(class_id: &str) -> Self {
        PreviewError::ClassResolution(format!("unknown preview class '{}'", class_id))
    }

    pub(crate) fn unknown_method(class_id: &str, method_id: &str) -> Self {
        PreviewError::ClassResolution(format!(
            "preview class '{}' has no method '{}'",
            class_id, method_id
        ))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PreviewError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
