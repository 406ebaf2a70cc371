//! Message serialization
//!
//! Produces the standalone RFC 5322 bytes for one archive record.

use clap::ValueEnum;
use mail_parser::{MessageParser, MimeHeaders};
use serde::{Deserialize, Serialize};

use super::headers::{body_offset, parse_fields};
use crate::error::RecordError;
use crate::mbox::MboxMessage;

/// Capability: turn a record into the exact bytes of its `.eml` file.
pub trait MessageSerializer {
    fn serialize(&self, message: &MboxMessage) -> Result<Vec<u8>, RecordError>;
}

/// Line terminators written to `.eml` files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Keep whatever the archive used
    #[default]
    Preserve,
    /// Bare `\n`
    Lf,
    /// `\r\n`, as on the wire
    Crlf,
}

impl LineEnding {
    /// Rewrite line terminators in `bytes` according to this policy.
    pub fn apply(self, bytes: Vec<u8>) -> Vec<u8> {
        match self {
            Self::Preserve => bytes,
            Self::Lf => {
                let mut out = Vec::with_capacity(bytes.len());
                let mut iter = bytes.iter().peekable();
                while let Some(&b) = iter.next() {
                    if b == b'\r' && iter.peek() == Some(&&b'\n') {
                        continue;
                    }
                    out.push(b);
                }
                out
            }
            Self::Crlf => {
                let mut out = Vec::with_capacity(bytes.len() + bytes.len() / 32);
                let mut prev = 0u8;
                for &b in &bytes {
                    if b == b'\n' && prev != b'\r' {
                        out.push(b'\r');
                    }
                    out.push(b);
                    prev = b;
                }
                out
            }
        }
    }
}

/// Validates a record as RFC 5322 and emits its bytes unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc5322Serializer {
    line_ending: LineEnding,
}

impl Rfc5322Serializer {
    pub fn new(line_ending: LineEnding) -> Self {
        Self { line_ending }
    }

    fn validate(raw: &[u8]) -> Result<(), RecordError> {
        let fields = parse_fields(raw).map_err(|e| RecordError::MalformedHeader {
            line: e.line,
            reason: e.reason.to_string(),
        })?;

        // Nothing for a parser to look at: the whole record is body
        if fields.is_empty() {
            return Ok(());
        }

        let parsed = MessageParser::default()
            .parse(raw)
            .ok_or(RecordError::Unparseable)?;

        let Some(content_type) = parsed.content_type() else {
            return Ok(());
        };
        if !content_type.ctype().eq_ignore_ascii_case("multipart") {
            return Ok(());
        }

        let boundary = content_type
            .attribute("boundary")
            .filter(|b| !b.is_empty())
            .ok_or(RecordError::MissingBoundary)?;

        if !has_delimiters(&raw[body_offset(raw, &fields)..], boundary) {
            return Err(RecordError::TruncatedMultipart {
                boundary: boundary.to_string(),
            });
        }

        Ok(())
    }
}

impl MessageSerializer for Rfc5322Serializer {
    fn serialize(&self, message: &MboxMessage) -> Result<Vec<u8>, RecordError> {
        Self::validate(&message.content)?;
        Ok(self.line_ending.apply(message.content.clone()))
    }
}

/// Whether `body` contains both the opening and the closing delimiter line.
fn has_delimiters(body: &[u8], boundary: &str) -> bool {
    let open = format!("--{boundary}");
    let close = format!("--{boundary}--");
    let mut opened = false;

    for line in body.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let line = trim_trailing_whitespace(line);
        if line == close.as_bytes() {
            return opened;
        }
        if line == open.as_bytes() {
            opened = true;
        }
    }

    false
}

fn trim_trailing_whitespace(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&b| b != b' ' && b != b'\t')
        .map_or(0, |pos| pos + 1);
    &line[..end]
}
