//! mbox to EML conversion
//!
//! A conversion runs in three phases: open the source archive, prepare the
//! destination directory, then write every record to `<index>.eml`. Only the
//! first two phases can fail the call. Once the loop starts, a bad record is
//! counted and skipped.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::archive::{ArchiveReader, MboxArchiveReader};
use crate::config::ConvertConfig;
use crate::eml::{MessageSerializer, Rfc5322Serializer};
use crate::error::{Mbox2EmlError, RecordError, Result};
use crate::mbox::MboxMessage;

/// Outcome of one conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// Messages written to disk
    pub converted: usize,
    /// Messages that could not be read, serialized or written
    pub failed: usize,
}

impl ConversionReport {
    /// `(success_count, failure_count)`
    pub fn counts(&self) -> (usize, usize) {
        (self.converted, self.failed)
    }

    /// Number of records the archive yielded
    pub fn total(&self) -> usize {
        self.converted + self.failed
    }
}

/// Converts mbox archives into directories of numbered `.eml` files
#[derive(Debug, Clone)]
pub struct Converter<R = MboxArchiveReader, S = Rfc5322Serializer> {
    reader: R,
    serializer: S,
    progress_interval: usize,
}

impl Converter {
    /// Create a converter for classic mbox input
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            reader: MboxArchiveReader,
            serializer: Rfc5322Serializer::new(config.line_ending),
            progress_interval: config.progress_interval,
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(&ConvertConfig::default())
    }
}

impl<R: ArchiveReader, S: MessageSerializer> Converter<R, S> {
    /// Swap the archive reader
    pub fn with_reader<R2: ArchiveReader>(self, reader: R2) -> Converter<R2, S> {
        Converter {
            reader,
            serializer: self.serializer,
            progress_interval: self.progress_interval,
        }
    }

    /// Swap the message serializer
    pub fn with_serializer<S2: MessageSerializer>(self, serializer: S2) -> Converter<R, S2> {
        Converter {
            reader: self.reader,
            serializer,
            progress_interval: self.progress_interval,
        }
    }

    /// Convert `source` into `<destination>/1.eml`, `2.eml`, ...
    ///
    /// Fails before touching the destination if the archive cannot be opened,
    /// and before processing any message if the destination is unusable.
    pub fn convert(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<ConversionReport> {
        let (source, destination) = (source.as_ref(), destination.as_ref());

        let records = self.reader.open(source)?;
        prepare_destination(destination)?;

        info!(
            source = %source.display(),
            destination = %destination.display(),
            "Converting mbox archive"
        );

        let mut report = ConversionReport::default();

        for (position, record) in records.enumerate() {
            let index = position + 1;

            match self.convert_one(index, record, destination) {
                Ok(()) => report.converted += 1,
                Err(e) => {
                    warn!(index, error = %e, "Failed to convert message");
                    report.failed += 1;
                }
            }

            if self.progress_interval > 0 && index % self.progress_interval == 0 {
                info!(processed = index, failed = report.failed, "Conversion progress");
            }
        }

        info!(
            converted = report.converted,
            failed = report.failed,
            "Conversion finished"
        );

        Ok(report)
    }

    fn convert_one(
        &self,
        index: usize,
        record: std::result::Result<MboxMessage, RecordError>,
        destination: &Path,
    ) -> std::result::Result<(), RecordError> {
        let message = record?;
        let bytes = self.serializer.serialize(&message)?;

        let path = eml_path(destination, index);
        fs::write(&path, &bytes).map_err(|source| RecordError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(
            index,
            sender = %message.from,
            date = ?message.date,
            bytes = bytes.len(),
            "Message {} converted to {}",
            index,
            path.display()
        );
        Ok(())
    }
}

/// Convert an mbox file with default settings.
///
/// Returns `(success_count, failure_count)`.
pub fn convert(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<(usize, usize)> {
    Converter::default()
        .convert(source, destination)
        .map(|report| report.counts())
}

/// Output file for the message at 1-based `index`
pub fn eml_path(destination: &Path, index: usize) -> PathBuf {
    destination.join(format!("{index}.eml"))
}

/// Make sure `destination` is a writable directory, creating it if needed.
fn prepare_destination(destination: &Path) -> Result<()> {
    match fs::metadata(destination) {
        Ok(metadata) if !metadata.is_dir() => {
            return Err(Mbox2EmlError::NotADirectory(destination.to_path_buf()));
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(destination)
                .map_err(|e| Mbox2EmlError::from_io(destination, e))?;
            debug!(path = %destination.display(), "Created output directory");
        }
        Err(e) => return Err(Mbox2EmlError::from_io(destination, e)),
    }

    // Probe file is removed on drop
    tempfile::Builder::new()
        .prefix(".mbox2eml-probe-")
        .tempfile_in(destination)
        .map_err(|e| Mbox2EmlError::from_io(destination, e))?;

    Ok(())
}
