//! mbox2eml: mbox archive to EML converter
//!
//! Splits an mbox file into standalone RFC 5322 messages, one numbered
//! `.eml` file per message.
//!
//! # Example
//!
//! ```no_run
//! let (converted, failed) = mbox2eml::convert("archive.mbox", "output")?;
//! println!("{converted} converted, {failed} failed");
//! # Ok::<(), mbox2eml::Mbox2EmlError>(())
//! ```
//!
//! # Modules
//!
//! - [`converter`]: The conversion routine
//! - [`archive`]: Opening and validating source archives
//! - [`mbox`]: mbox record splitting
//! - [`eml`]: Message serialization and `.eml` utilities
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling

pub mod archive;
pub mod config;
pub mod converter;
pub mod eml;
pub mod error;
pub mod logging;
pub mod mbox;

// Re-export commonly used types
pub use config::Config;
pub use converter::{convert, ConversionReport, Converter};
pub use error::{Mbox2EmlError, RecordError, Result};
