//! Error types for mbox2eml
//!
//! Two tiers: [`Mbox2EmlError`] aborts a whole call before any message is
//! processed, [`RecordError`] is contained to a single message and only counted.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fatal operations
pub type Result<T> = std::result::Result<T, Mbox2EmlError>;

/// Call-aborting errors
#[derive(Error, Debug)]
pub enum Mbox2EmlError {
    /// Source or destination path does not exist
    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    /// Read or write access denied
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Destination resolves to something other than a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Source cannot be opened as an mbox stream at all
    #[error("Invalid mbox archive {}: {reason}", path.display())]
    InvalidArchive { path: PathBuf, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Message could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Header field missing from a message
    #[error("Header not found: {0}")]
    HeaderNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Mbox2EmlError {
    /// Classify an IO error raised while touching `path`.
    pub fn from_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.into()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.into()),
            io::ErrorKind::NotADirectory => Self::NotADirectory(path.into()),
            _ => Self::Io(err),
        }
    }

    /// The `std::io::ErrorKind` this error corresponds to.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::NotFound(_) => io::ErrorKind::NotFound,
            Self::PermissionDenied(_) => io::ErrorKind::PermissionDenied,
            Self::NotADirectory(_) => io::ErrorKind::NotADirectory,
            Self::InvalidArchive { .. } | Self::Parse(_) => io::ErrorKind::InvalidData,
            Self::Config(_) | Self::HeaderNotFound(_) => io::ErrorKind::InvalidInput,
            Self::Io(err) => err.kind(),
        }
    }
}

/// Errors confined to one archive record
#[derive(Error, Debug)]
pub enum RecordError {
    /// Data found before the first `From ` separator line
    #[error("{0} byte(s) of data before the first From_ line")]
    MissingSeparator(usize),

    /// Header field that cannot be written as-is (NUL byte)
    #[error("Malformed header at line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },

    /// The mail parser rejected the record
    #[error("Message could not be parsed")]
    Unparseable,

    /// Multipart message without a boundary parameter
    #[error("Multipart message has no boundary parameter")]
    MissingBoundary,

    /// Multipart body is missing its opening or closing delimiter
    #[error("Multipart body is truncated (boundary {boundary:?})")]
    TruncatedMultipart { boundary: String },

    /// Reading the archive failed mid-stream
    #[error("Read error: {0}")]
    Io(#[from] io::Error),

    /// Writing the .eml file failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
