//! Shared helpers for integration tests

#![allow(dead_code)]

use mail_builder::MessageBuilder;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Builds mbox files the way a mail client appends to them
pub struct MboxWriter<W: Write> {
    writer: W,
    message_count: u64,
}

impl<W: Write> MboxWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            message_count: 0,
        }
    }

    /// Append a message, quoting body lines that start with `From `
    pub fn write_message(&mut self, from: &str, raw_message: &[u8]) -> std::io::Result<()> {
        let from_addr = if from.is_empty() { "MAILER-DAEMON" } else { from };
        writeln!(self.writer, "From {} Mon Jan  1 00:00:00 2024", from_addr)?;

        let mut in_body = false;
        let mut lines: Vec<&[u8]> = raw_message.split(|&b| b == b'\n').collect();
        if raw_message.ends_with(b"\n") {
            lines.pop();
        }
        for line in lines {
            if line.is_empty() || line == b"\r" {
                in_body = true;
            }
            let quotes = line.iter().take_while(|&&b| b == b'>').count();
            if in_body && line[quotes..].starts_with(b"From ") {
                self.writer.write_all(b">")?;
            }
            self.writer.write_all(line)?;
            self.writer.write_all(b"\n")?;
        }

        // Blank line separator
        writeln!(self.writer)?;

        self.message_count += 1;
        Ok(())
    }

    /// Append raw bytes with no quoting at all
    pub fn write_raw(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(bytes)
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    pub fn finish(self) -> W {
        self.writer
    }
}

/// Write an mbox file containing `messages`
pub fn write_mbox(path: &Path, messages: &[Vec<u8>]) -> PathBuf {
    let mut writer = MboxWriter::new(Vec::new());
    for message in messages {
        writer.write_message("sender@example.com", message).unwrap();
    }
    std::fs::write(path, writer.finish()).unwrap();
    path.to_path_buf()
}

/// Simple text message, like a mail client would produce
pub fn test_email(subject: &str, body: &str) -> Vec<u8> {
    MessageBuilder::new()
        .from("sender@example.com")
        .to("recipient@example.com")
        .subject(subject)
        .text_body(body)
        .write_to_vec()
        .unwrap()
}

/// Whether the current process ignores file permission bits (e.g. root).
#[cfg(unix)]
pub fn permissions_are_bypassed(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let probe_dir = dir.join("permission-probe");
    std::fs::create_dir(&probe_dir).unwrap();
    std::fs::set_permissions(&probe_dir, std::fs::Permissions::from_mode(0o555)).unwrap();
    let bypassed = std::fs::write(probe_dir.join("x"), b"x").is_ok();
    std::fs::set_permissions(&probe_dir, std::fs::Permissions::from_mode(0o755)).unwrap();
    bypassed
}
