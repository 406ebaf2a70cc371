//! Human-readable overview of a single `.eml` file

use mail_parser::{Addr, Address, MessageParser, MessagePart, MimeHeaders, PartType};
use std::fmt;
use std::path::Path;

use crate::error::{Mbox2EmlError, Result};

/// Envelope fields and plain-text body of one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmlSummary {
    pub subject: String,
    pub from: String,
    pub to: Vec<String>,
    pub date: String,
    pub text_body: Option<String>,
}

impl EmlSummary {
    /// Summarize an `.eml` file on disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| Mbox2EmlError::from_io(path, e))?;
        Self::from_bytes(&raw)
    }

    /// Summarize raw RFC 5322 bytes
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let message = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| Mbox2EmlError::Parse("not an RFC 5322 message".to_string()))?;

        let subject = message.subject().unwrap_or("No Subject").to_string();

        let from = message
            .from()
            .map(format_address)
            .filter(|list| !list.is_empty())
            .map(|list| list.join(", "))
            .unwrap_or_else(|| "No Sender".to_string());

        let to = message.to().map(format_address).unwrap_or_default();

        let date = message
            .date()
            .map(|d| d.to_rfc822())
            .unwrap_or_else(|| "No Date".to_string());

        let text_body = message
            .parts
            .iter()
            .filter(|part| !is_attachment(part))
            .find(|part| match part.content_type() {
                Some(ct) => {
                    ct.ctype().eq_ignore_ascii_case("text")
                        && ct.subtype().map_or(true, |s| s.eq_ignore_ascii_case("plain"))
                }
                None => matches!(part.body, PartType::Text(_)),
            })
            .and_then(|part| part.text_contents())
            .map(|text| text.to_string());

        Ok(Self {
            subject,
            from,
            to,
            date,
            text_body,
        })
    }
}

fn is_attachment(part: &MessagePart<'_>) -> bool {
    part.content_disposition()
        .map_or(false, |cd| cd.ctype().eq_ignore_ascii_case("attachment"))
}

fn format_address(address: &Address<'_>) -> Vec<String> {
    match address {
        Address::List(list) => list.iter().map(format_addr).collect(),
        Address::Group(groups) => groups
            .iter()
            .flat_map(|group| group.addresses.iter())
            .map(format_addr)
            .collect(),
    }
}

fn format_addr(addr: &Addr<'_>) -> String {
    match (addr.name(), addr.address()) {
        (Some(name), Some(email)) => format!("{name} <{email}>"),
        (None, Some(email)) => email.to_string(),
        (Some(name), None) => name.to_string(),
        (None, None) => String::new(),
    }
}

impl fmt::Display for EmlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subject: {}", self.subject)?;
        writeln!(f, "From: {}", self.from)?;
        writeln!(f, "To: {}", self.to.join(", "))?;
        writeln!(f, "Date: {}", self.date)?;
        match &self.text_body {
            Some(body) => write!(f, "\nBody:\n{body}"),
            None => write!(f, "\nNo plain text body found."),
        }
    }
}
