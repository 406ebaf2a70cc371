//! EML handling
//!
//! Serialization of archive records into `.eml` bytes, plus the small tools that
//! work on finished `.eml` files.

pub mod headers;
pub mod rewrite;
pub mod serializer;
pub mod summary;

pub use rewrite::{replace_header, rewrite_file};
pub use serializer::{LineEnding, MessageSerializer, Rfc5322Serializer};
pub use summary::EmlSummary;
