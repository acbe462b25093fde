//! Error types for the terminal host.
//!
//! The field itself never fails; these cover terminal I/O and the config file.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppError {
    /// Terminal or filesystem I/O failed.
    Io(std::io::Error),
    /// The config file exists but could not be read.
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file is not valid JSON for [`crate::config::AppConfig`].
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The config could not be serialized.
    ConfigSerialize(serde_json::Error),
    /// No platform config directory and no explicit path.
    NoConfigDir,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "I/O error: {}", e),
            AppError::ConfigRead { path, source } => {
                write!(f, "Failed to read config file {}: {}", path.display(), source)
            }
            AppError::ConfigParse { path, source } => {
                write!(f, "Failed to parse config file {}: {}", path.display(), source)
            }
            AppError::ConfigSerialize(e) => write!(f, "Failed to serialize config: {}", e),
            AppError::NoConfigDir => write!(f, "Could not determine config directory"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(e) => Some(e),
            AppError::ConfigRead { source, .. } => Some(source),
            AppError::ConfigParse { source, .. } => Some(source),
            AppError::ConfigSerialize(e) => Some(e),
            AppError::NoConfigDir => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}
