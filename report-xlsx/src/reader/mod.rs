//! Load a CSV report, resolving its character encoding
//!
//! The file is read once into memory and a leading UTF-8 byte order mark is
//! dropped. Candidates are then tried in priority order and the first one that
//! both decodes the bytes and parses them into a table wins.

mod encoding;

pub use encoding::Candidate;

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::ReportError;
use crate::table::{Cell, Table};

/// A table together with the encoding it was decoded with
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub encoding: Candidate,
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Why a candidate was passed over
#[derive(Debug)]
enum Rejection {
    Decode,
    Parse(csv::Error),
    TooManyFields {
        line: Option<u64>,
        found: usize,
        expected: usize,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Decode => f.write_str("bytes do not decode"),
            Rejection::Parse(e) => write!(f, "{}", e),
            Rejection::TooManyFields {
                line,
                found,
                expected,
            } => {
                write!(f, "record has {} fields, header has {}", found, expected)?;
                if let Some(line) = line {
                    write!(f, " (line {})", line)?;
                }
                Ok(())
            }
        }
    }
}

impl From<csv::Error> for Rejection {
    fn from(e: csv::Error) -> Self {
        Rejection::Parse(e)
    }
}

/// Read `path` and decode it with the first candidate that yields a table
pub fn load(path: &Path, candidates: &[Candidate]) -> Result<LoadedTable, ReportError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ReportError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to read input file: {}", path.display()))
                .into());
        }
    };

    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    load_bytes(path, &bytes, candidates)
}

/// Decode already-read file contents. `path` is only used in errors.
pub fn load_bytes(
    path: &Path,
    bytes: &[u8],
    candidates: &[Candidate],
) -> Result<LoadedTable, ReportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ReportError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    let Some((encoding, table)) = candidates
        .iter()
        .find_map(|&candidate| match try_candidate(candidate, bytes) {
            Ok(table) => Some((candidate, table)),
            Err(rejection) => {
                log::debug!("Encoding {} rejected: {}", candidate, rejection);
                None
            }
        })
    else {
        return Err(ReportError::UnreadableFile {
            path: path.to_path_buf(),
            tried: candidates.iter().map(|c| c.label().to_string()).collect(),
        });
    };

    log::info!(
        "Decoded {} as {} ({} rows, {} columns)",
        path.display(),
        encoding,
        table.row_count(),
        table.column_count()
    );

    if table.is_empty() {
        return Err(ReportError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    Ok(LoadedTable { table, encoding })
}

fn try_candidate(candidate: Candidate, bytes: &[u8]) -> Result<Table, Rejection> {
    let text = candidate.decode(bytes).ok_or(Rejection::Decode)?;
    parse_csv(&text)
}

/// Parse comma-separated text with a header row.
///
/// Short records are padded with empty cells. A record with more fields than
/// the header means the text was split wrongly, so it rejects the candidate.
fn parse_csv(text: &str) -> Result<Table, Rejection> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut table = Table::new(headers.iter().enumerate().map(|(idx, name)| {
        if name.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name.to_string()
        }
    }));

    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(Rejection::TooManyFields {
                line: record.position().map(|p| p.line()),
                found: record.len(),
                expected: headers.len(),
            });
        }

        let row: Vec<Cell> = record
            .iter()
            .map(|field| (!field.is_empty()).then(|| field.to_string()))
            .collect();
        table.push_row(row);
    }

    Ok(table)
}
