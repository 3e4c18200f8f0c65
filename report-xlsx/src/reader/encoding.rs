//! Candidate character encodings for report input
//!
//! Exports arrive as UTF-8 or as one of the Western single-byte code pages,
//! depending on which machine produced them. Each [`Candidate`] knows how to
//! decode raw bytes strictly: it either maps every byte to a character or
//! refuses the input.

use std::borrow::Cow;
use std::fmt;

use encoding_rs::{ISO_8859_15, UTF_8, WINDOWS_1252};

/// One encoding tried while reading the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Candidate {
    Utf8,
    /// ISO-8859-1, every byte is the code point of the same value
    Latin1,
    Windows1252,
    /// ISO-8859-15, Latin-1 with the euro sign and a few French/Finnish letters
    Latin9,
}

impl Candidate {
    /// Priority order used when nothing else is configured
    pub const DEFAULT_ORDER: [Candidate; 4] = [
        Candidate::Utf8,
        Candidate::Latin1,
        Candidate::Windows1252,
        Candidate::Latin9,
    ];

    /// Canonical name, used in logs and diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            Candidate::Utf8 => "UTF-8",
            Candidate::Latin1 => "ISO-8859-1",
            Candidate::Windows1252 => "windows-1252",
            Candidate::Latin9 => "ISO-8859-15",
        }
    }

    /// Resolve a user-supplied label such as `latin-1` or `cp1252`
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Some(Candidate::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" | "l1" => Some(Candidate::Latin1),
            "windows-1252" | "cp1252" | "cp-1252" => Some(Candidate::Windows1252),
            "iso-8859-15" | "iso8859-15" | "latin-9" | "latin9" => Some(Candidate::Latin9),
            _ => None,
        }
    }

    /// Decode `bytes` without any replacement.
    ///
    /// UTF-8 returns `None` only for malformed sequences. The single-byte
    /// encodings map every byte, so they refuse input that decodes to NUL or
    /// to a C1 control instead.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        let text = match self {
            Candidate::Utf8 => {
                return UTF_8.decode_without_bom_handling_and_without_replacement(bytes);
            }
            Candidate::Latin1 => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
            Candidate::Windows1252 => {
                WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)?
            }
            Candidate::Latin9 => {
                ISO_8859_15.decode_without_bom_handling_and_without_replacement(bytes)?
            }
        };

        if text.chars().any(is_binary_marker) {
            return None;
        }

        Some(text)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// NUL only shows up in binary data. C1 controls come from 0x80-0x9F in
// Latin-1/Latin-9 and from the undefined windows-1252 slots (0x81, 0x8D, 0x8F,
// 0x90, 0x9D), none of which a Western text export uses.
fn is_binary_marker(c: char) -> bool {
    c == '\0' || ('\u{80}'..='\u{9f}').contains(&c)
}
