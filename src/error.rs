//! Global error handling for repo-flattener
//!
//! Fatal errors (bad repository, unusable output directory, invalid
//! configuration) abort a run before any file is written. Per-file errors are
//! represented by [`FlattenError::FileProcessing`] but never escape the single
//! file they belong to; the flattener records them and moves on.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a repository root was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryProblem {
    /// The path does not exist
    Missing,
    /// The path exists but is not a directory
    NotADirectory,
    /// The directory cannot be listed
    Unreadable,
}

impl fmt::Display for RepositoryProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "path does not exist"),
            Self::NotADirectory => write!(f, "path is not a directory"),
            Self::Unreadable => write!(f, "directory is not readable"),
        }
    }
}

/// Global error type for repo-flattener operations
#[derive(Error, Debug)]
pub enum FlattenError {
    /// Repository root missing, not a directory, or unreadable
    #[error("Invalid repository {}: {problem}", path.display())]
    InvalidRepository {
        path: PathBuf,
        problem: RepositoryProblem,
    },

    /// Output directory cannot be created
    #[error("Output directory unavailable {}: {source}", path.display())]
    OutputDirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single file could not be read or written
    #[error("Failed to process {path}: {source}")]
    FileProcessing {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Paths that would escape the repository root
    #[error("Security error: {0}")]
    Security(String),

    /// Too many files collected
    #[error("Resource limit exceeded: {0}")]
    ResourceLimit(String),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// YAML config parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FlattenError {
    /// A short hint for the user on how to fix the problem
    pub fn tip(&self) -> &'static str {
        match self {
            Self::InvalidRepository { problem, .. } => match problem {
                RepositoryProblem::Missing => "Make sure the path exists and is spelled correctly",
                RepositoryProblem::NotADirectory => {
                    "The path should point to a directory, not a file"
                }
                RepositoryProblem::Unreadable => {
                    "Make sure you have read permissions for this directory"
                }
            },
            Self::OutputDirectoryUnavailable { .. } => {
                "Ensure you have write permissions for the parent directory"
            }
            Self::FileProcessing { .. } => "Check file permissions and encoding",
            Self::Config(_) | Self::Yaml(_) => "Check your .repo-flattener.yml file syntax",
            Self::Security(_) => "File paths must stay inside the repository root",
            Self::ResourceLimit(_) => {
                "Use --max-files to increase the limit or filter files with --ignore-dirs"
            }
            Self::Io(_) => "Verify the paths involved and your access permissions",
        }
    }
}

/// Specialized Result type for repo-flattener operations
pub type Result<T> = std::result::Result<T, FlattenError>;

/// Creates a FlattenError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::FlattenError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
