//! Errors raised by the service manager and its backends.
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A service definition is already present where we would write ours.
    #[error("Service '{name}' already exists at {}", .path.display())]
    AlreadyExists { name: String, path: PathBuf },

    /// Uninstall was asked for a service that has no definition file.
    #[error("Service '{name}' does not exist at {}", .path.display())]
    NotFound { name: String, path: PathBuf },

    /// An input the backend needs was not supplied.
    #[error("Missing required option '{field}': {reason}")]
    MissingOption {
        field: &'static str,
        reason: &'static str,
    },

    /// An external command ran but exited unsuccessfully.
    #[error("Command `{command}` failed ({status}): {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    /// An external command could not be started at all.
    #[error("Failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render service file: {0}")]
    Render(String),

    #[error("Unsupported init system: {0}")]
    UnsupportedInitSystem(String),

    #[error("Could not detect init system: {0}")]
    DetectionFailed(String),
}

impl ServiceError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ServiceError::Io {
            context: context.into(),
            source,
        }
    }
}
