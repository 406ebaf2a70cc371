//! In-place header replacement on raw message bytes

use std::path::Path;
use tracing::debug;

use super::headers::{line_ending, parse_fields};
use crate::error::{Mbox2EmlError, Result};

/// Replace the first `name` field of `raw` with `name: value`.
///
/// Folded continuation lines of the old field are dropped; every other byte of
/// the message is kept as-is.
pub fn replace_header(raw: &[u8], name: &str, value: &str) -> Result<Vec<u8>> {
    let fields = parse_fields(raw).map_err(|e| {
        Mbox2EmlError::Parse(format!("line {}: {}", e.line, e.reason))
    })?;

    let field = fields
        .iter()
        .find(|f| f.is(name))
        .ok_or_else(|| Mbox2EmlError::HeaderNotFound(name.to_string()))?;

    let old = &raw[field.span.clone()];
    let mut out = Vec::with_capacity(raw.len() + value.len());
    out.extend_from_slice(&raw[..field.span.start]);
    out.extend_from_slice(field.name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value.as_bytes());
    out.extend_from_slice(line_ending(old));
    out.extend_from_slice(&raw[field.span.end..]);

    Ok(out)
}

/// Read `input`, replace one header and write the result to `output`.
pub fn rewrite_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    name: &str,
    value: &str,
) -> Result<()> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let raw = std::fs::read(input).map_err(|e| Mbox2EmlError::from_io(input, e))?;
    let rewritten = replace_header(&raw, name, value)?;
    std::fs::write(output, rewritten).map_err(|e| Mbox2EmlError::from_io(output, e))?;

    debug!(
        input = %input.display(),
        output = %output.display(),
        header = name,
        "Rewrote header"
    );
    Ok(())
}
