//! Source archive access
//!
//! Opening an archive is the fatal boundary: anything that prevents a message
//! stream from being established fails the whole call. Once open, problems with
//! individual records surface as items of the stream.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::error::{Mbox2EmlError, RecordError, Result};
use crate::mbox::{MboxMessage, MboxReader};

/// Capability: turn a path into a sequence of message records in file order.
pub trait ArchiveReader {
    /// Stream of records. Dropping it releases the underlying file.
    type Records: Iterator<Item = std::result::Result<MboxMessage, RecordError>>;

    /// Open and validate the archive at `path`.
    fn open(&self, path: &Path) -> Result<Self::Records>;
}

/// Reads classic mbox files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct MboxArchiveReader;

impl ArchiveReader for MboxArchiveReader {
    type Records = MboxArchive;

    fn open(&self, path: &Path) -> Result<MboxArchive> {
        MboxArchive::open(path)
    }
}

/// An open mbox file
pub struct MboxArchive {
    reader: MboxReader<BufReader<File>>,
}

impl MboxArchive {
    /// Open an mbox file for reading
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| Mbox2EmlError::from_io(path, e))?;
        if !metadata.is_file() {
            let reason = if metadata.is_dir() {
                "is a directory"
            } else {
                "not a regular file"
            };
            return Err(Mbox2EmlError::InvalidArchive {
                path: path.to_path_buf(),
                reason: reason.to_string(),
            });
        }

        let file = File::open(path).map_err(|e| Mbox2EmlError::from_io(path, e))?;
        debug!(path = %path.display(), size = metadata.len(), "Opened mbox archive");

        Ok(Self {
            reader: MboxReader::new(BufReader::new(file)),
        })
    }

    /// Number of records read so far
    pub fn message_count(&self) -> u64 {
        self.reader.message_count()
    }
}

impl Iterator for MboxArchive {
    type Item = std::result::Result<MboxMessage, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next()
    }
}
