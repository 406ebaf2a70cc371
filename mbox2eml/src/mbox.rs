//! MBOX format handling
//!
//! Splits an mbox byte stream into individual records. The stream is read as
//! raw bytes, so archives carrying 8-bit or non-UTF-8 content are fine.

use chrono::{DateTime, Utc};
use std::io::BufRead;

use crate::error::RecordError;

const SEPARATOR: &[u8] = b"From ";

/// MBOX reader yielding one record per `From ` separator
pub struct MboxReader<R: BufRead> {
    reader: R,
    current_line: Vec<u8>,
    message_count: u64,
    eof: bool,
    /// Flag indicating we already have a From_ line in current_line
    has_pending_from: bool,
    /// Leading data before the first From_ line has been dealt with
    preamble_checked: bool,
}

impl<R: BufRead> MboxReader<R> {
    /// Create a new MBOX reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            current_line: Vec::new(),
            message_count: 0,
            eof: false,
            has_pending_from: false,
            preamble_checked: false,
        }
    }

    /// Read the next message from the MBOX stream
    ///
    /// Returns `Ok(None)` at end of input. A record-level problem is returned as
    /// `Err`; the reader stays usable and the next call moves on to the next record.
    pub fn read_message(&mut self) -> Result<Option<MboxMessage>, RecordError> {
        if self.eof {
            return Ok(None);
        }

        if !self.preamble_checked {
            self.preamble_checked = true;
            let skipped = self.skip_preamble()?;
            if skipped > 0 {
                return Err(RecordError::MissingSeparator(skipped));
            }
            if self.eof {
                return Ok(None);
            }
        }

        if !self.has_pending_from && !self.find_separator()? {
            return Ok(None);
        }
        self.has_pending_from = false;

        let (from, date) = parse_from_line(&self.current_line);

        // Read the message content until next From_ line or EOF
        let mut content = Vec::new();

        loop {
            self.current_line.clear();
            let bytes_read = self.next_line()?;

            if bytes_read == 0 {
                self.eof = true;
                break;
            }

            if self.current_line.starts_with(SEPARATOR) {
                // Preserve the separator for the next call
                self.has_pending_from = true;
                break;
            }

            content.extend_from_slice(unquote_from(&self.current_line));
        }

        trim_separator(&mut content);
        self.message_count += 1;

        Ok(Some(MboxMessage {
            from,
            date,
            content,
        }))
    }

    /// Get the number of messages read
    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    /// Consume everything before the first From_ line.
    ///
    /// Returns how many non-blank bytes were found there.
    fn skip_preamble(&mut self) -> Result<usize, RecordError> {
        let mut stray = 0usize;
        loop {
            self.current_line.clear();
            if self.next_line()? == 0 {
                self.eof = true;
                return Ok(stray);
            }
            if self.current_line.starts_with(SEPARATOR) {
                self.has_pending_from = true;
                return Ok(stray);
            }
            stray += self
                .current_line
                .iter()
                .filter(|b| !b.is_ascii_whitespace())
                .count();
        }
    }

    fn find_separator(&mut self) -> Result<bool, RecordError> {
        loop {
            self.current_line.clear();
            if self.next_line()? == 0 {
                self.eof = true;
                return Ok(false);
            }
            if self.current_line.starts_with(SEPARATOR) {
                return Ok(true);
            }
        }
    }

    fn next_line(&mut self) -> Result<usize, RecordError> {
        self.reader
            .read_until(b'\n', &mut self.current_line)
            .map_err(|e| {
                // A failed read leaves the stream position undefined
                self.eof = true;
                RecordError::Io(e)
            })
    }
}

impl<R: BufRead> Iterator for MboxReader<R> {
    type Item = Result<MboxMessage, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_message().transpose()
    }
}

/// Undo mboxrd quoting: `>From ` becomes `From `, `>>From ` becomes `>From `.
fn unquote_from(line: &[u8]) -> &[u8] {
    let quotes = line.iter().take_while(|&&b| b == b'>').count();
    if quotes > 0 && line[quotes..].starts_with(SEPARATOR) {
        &line[1..]
    } else {
        line
    }
}

/// Drop the single blank line that separates this record from the next one.
fn trim_separator(content: &mut Vec<u8>) {
    for eol in [&b"\r\n"[..], b"\n"] {
        if let Some(rest) = content.strip_suffix(eol) {
            if rest.is_empty() || rest.ends_with(b"\n") {
                content.truncate(rest.len());
                return;
            }
        }
    }
}

/// Parse the From_ line to extract sender and date
fn parse_from_line(line: &[u8]) -> (String, Option<DateTime<Utc>>) {
    // Format: "From sender@example.com Wed Dec 25 12:00:00 2024"
    let line = String::from_utf8_lossy(line);
    let mut parts = line.trim_end().splitn(3, ' ').skip(1);

    let from_addr = match parts.next() {
        Some(addr) if !addr.is_empty() => addr.to_string(),
        _ => "MAILER-DAEMON".to_string(),
    };

    let date = parts.next().and_then(parse_mbox_date);

    (from_addr, date)
}

/// Parse MBOX date format
fn parse_mbox_date(date_str: &str) -> Option<DateTime<Utc>> {
    // Common MBOX date format: "Wed Dec 25 12:00:00 2024"
    // Single-digit days are space padded, so collapse runs of whitespace first
    let normalized = date_str.split_whitespace().collect::<Vec<_>>().join(" ");
    chrono::NaiveDateTime::parse_from_str(&normalized, "%a %b %d %H:%M:%S %Y")
        .ok()
        .map(|dt| dt.and_utc())
}

/// A message from an MBOX file
#[derive(Debug, Clone)]
pub struct MboxMessage {
    /// Sender from the From_ line
    pub from: String,
    /// Date from the From_ line
    pub date: Option<DateTime<Utc>>,
    /// Raw message content (headers + body)
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::io::Cursor;

    fn read_all(data: &[u8]) -> Vec<Result<MboxMessage, RecordError>> {
        MboxReader::new(Cursor::new(data.to_vec())).collect()
    }

    #[test]
    fn test_mbox_read_two_messages() {
        let data = b"From test@example.com Wed Dec 25 12:00:00 2024\n\
Subject: Test\n\nHello World\n\n\
From test2@example.com Thu Dec 26 08:30:00 2024\n\
Subject: Test 2\n\nHello Again\n";

        let mut reader = MboxReader::new(Cursor::new(&data[..]));

        let msg1 = reader.read_message().unwrap().unwrap();
        assert_eq!(msg1.from, "test@example.com");
        assert_eq!(msg1.content, b"Subject: Test\n\nHello World\n");
        assert_eq!(msg1.date.unwrap().day(), 25);

        let msg2 = reader.read_message().unwrap().unwrap();
        assert_eq!(msg2.from, "test2@example.com");
        assert_eq!(msg2.content, b"Subject: Test 2\n\nHello Again\n");

        assert!(reader.read_message().unwrap().is_none());
        assert_eq!(reader.message_count(), 2);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(read_all(b"").is_empty());
        assert!(read_all(b"\n\n  \n").is_empty());
    }

    #[test]
    fn test_preamble_is_one_failed_record() {
        let data = b"garbage line\nFrom a@b Mon Jan  1 00:00:00 2024\nSubject: ok\n\nbody\n";
        let items = read_all(data);

        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Err(RecordError::MissingSeparator(11))));
        assert_eq!(items[1].as_ref().unwrap().content, b"Subject: ok\n\nbody\n");
    }

    #[test]
    fn test_binary_without_separator() {
        let items = read_all(b"\x00\xFF\xFF\xFF");
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(RecordError::MissingSeparator(4))));
    }

    #[test]
    fn test_from_quoting_is_undone_once() {
        let data = b"From a@b Mon Jan  1 00:00:00 2024\n\nbody\n>From here\n>>From there\n";
        let items = read_all(data);

        assert_eq!(
            items[0].as_ref().unwrap().content,
            b"\nbody\nFrom here\n>From there\n"
        );
    }

    #[test]
    fn test_crlf_separator_is_trimmed() {
        let data = b"From a@b Mon Jan  1 00:00:00 2024\r\nSubject: x\r\n\r\nbody\r\n\r\nFrom c@d\r\n\r\nz\r\n";
        let items = read_all(data);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().content, b"Subject: x\r\n\r\nbody\r\n");
        assert_eq!(items[1].as_ref().unwrap().from, "c@d");
        assert!(items[1].as_ref().unwrap().date.is_none());
    }

    #[test]
    fn test_only_one_blank_line_is_trimmed() {
        let data = b"From a@b\nSubject: x\n\nHello\n\n\n\nFrom c@d\nSubject: y\n\n\nFrom e@f\n\n";
        let items = read_all(data);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().content, b"Subject: x\n\nHello\n\n\n");
        assert_eq!(items[1].as_ref().unwrap().content, b"Subject: y\n\n");
        assert!(items[2].as_ref().unwrap().content.is_empty());
    }

    #[test]
    fn test_record_without_separator_line_is_kept() {
        let data = b"From a@b\nSubject: x\n\nno trailing blank\nFrom c@d\nSubject: y\n\nend";
        let items = read_all(data);

        assert_eq!(items[0].as_ref().unwrap().content, b"Subject: x\n\nno trailing blank\n");
        assert_eq!(items[1].as_ref().unwrap().content, b"Subject: y\n\nend");
    }

    #[test]
    fn test_parse_from_line_defaults() {
        let (from, date) = parse_from_line(b"From  \n");
        assert_eq!(from, "MAILER-DAEMON");
        assert!(date.is_none());

        let (from, date) = parse_from_line(b"From MAILER-DAEMON Sat Mar  2 09:05:01 2024\n");
        assert_eq!(from, "MAILER-DAEMON");
        assert_eq!(date.unwrap().day(), 2);
    }

    #[test]
    fn test_non_utf8_content_survives() {
        let data = b"From a@b\nSubject: x\n\nInvalid \x80\x81 characters\n";
        let items = read_all(data);
        assert_eq!(
            items[0].as_ref().unwrap().content,
            b"Subject: x\n\nInvalid \x80\x81 characters\n"
        );
    }
}
