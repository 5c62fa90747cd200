use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Required directories inside an extracted package.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageDir {
    Relationships,
    Media,
}

impl fmt::Display for PackageDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageDir::Relationships => f.write_str("relationships directory (word/_rels)"),
            PackageDir::Media => f.write_str("media directory (word/media)"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DocError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a valid document archive: {}: {reason}", .path.display())]
    CorruptArchive { path: PathBuf, reason: String },

    #[error("package is missing its {0}")]
    MissingStructure(PackageDir),

    /// Per-image failure; never escapes the image loop.
    #[error("image {name}: {reason}")]
    Image { name: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl DocError {
    pub(crate) fn image(name: &str, reason: impl fmt::Display) -> Self {
        DocError::Image {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Fatal errors abort a run before repacking.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DocError::Image { .. })
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, DocError>;
