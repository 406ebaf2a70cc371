//! Header block scanning
//!
//! Works on raw message bytes and never decodes field values, so field order,
//! duplicates and 8-bit content stay exactly as they were.

use std::ops::Range;

/// One header field, possibly folded over several lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// 1-based line number of the field name
    pub line: usize,
    /// Field name as written
    pub name: String,
    /// Byte range of the whole field, continuation lines and terminator included
    pub span: Range<usize>,
}

impl HeaderField {
    /// Case-insensitive name comparison
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A header line that cannot be kept as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSyntaxError {
    pub line: usize,
    pub reason: &'static str,
}

/// Scan a header block into fields.
///
/// The block ends early at the first line that is neither a field nor the
/// continuation of one; that line and everything after it is body.
pub fn parse_fields(block: &[u8]) -> Result<Vec<HeaderField>, HeaderSyntaxError> {
    let mut fields: Vec<HeaderField> = Vec::new();
    let mut pos = 0;
    let mut line_no = 0;

    while pos < block.len() {
        line_no += 1;
        let end = block[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(block.len(), |offset| pos + offset + 1);
        let line = &block[pos..end];

        let folded = line[0] == b' ' || line[0] == b'\t';
        let name = if folded { None } else { field_name(line) };
        if name.is_none() && (!folded || fields.is_empty()) {
            break;
        }

        if line.contains(&0) {
            return Err(HeaderSyntaxError {
                line: line_no,
                reason: "NUL byte in header",
            });
        }

        if let Some(name) = name {
            fields.push(HeaderField {
                line: line_no,
                name: name.to_string(),
                span: pos..end,
            });
        } else if let Some(field) = fields.last_mut() {
            field.span.end = end;
        }

        pos = end;
    }

    Ok(fields)
}

/// Field name of a `name: value` line. Names are printable ASCII without
/// colon; obsolete syntax allows blanks between the name and the colon.
fn field_name(line: &[u8]) -> Option<&str> {
    let colon = line.iter().position(|&b| b == b':')?;
    let name = &line[..colon];
    let name_end = name
        .iter()
        .rposition(|&b| b != b' ' && b != b'\t')
        .map_or(0, |pos| pos + 1);
    let name = &name[..name_end];
    if name.is_empty() || !name.iter().all(|&b| (33..=126).contains(&b)) {
        return None;
    }
    std::str::from_utf8(name).ok()
}

/// Offset where the body starts once the header fields of `raw` are consumed.
pub fn body_offset(raw: &[u8], fields: &[HeaderField]) -> usize {
    let end = fields.last().map_or(0, |f| f.span.end);
    if raw[end..].starts_with(b"\r\n") {
        end + 2
    } else if raw[end..].starts_with(b"\n") {
        end + 1
    } else {
        end
    }
}

/// Line terminator used by a header line, `\n` when it has none.
pub fn line_ending(line: &[u8]) -> &'static [u8] {
    if line.ends_with(b"\r\n") {
        b"\r\n"
    } else {
        b"\n"
    }
}
