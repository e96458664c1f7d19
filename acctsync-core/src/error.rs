//! Error types for acctsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Declared input rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A set-valued field contains the same value more than once.
    #[error("specified {field} are not unique: '{value}' appears more than once")]
    Duplicate { field: &'static str, value: String },

    /// An account name that cannot be used as a record file name.
    #[error("invalid account name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
}

/// The remote side returned link data that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A link target has no trailing identifier segment.
    #[error("malformed link for relation '{rel}': cannot extract identifier from '{href}'")]
    MalformedLink { rel: String, href: String },
}

/// All errors that can arise from local record persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending path.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`, so `~/.acctsync/` cannot be located.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// No record file exists for the requested account.
    #[error("no local record found at {path}")]
    RecordNotFound { path: PathBuf },
}
