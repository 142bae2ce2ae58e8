//! Case record loading.
//!
//! A [`CaseSource`] hands back raw rows keyed by header name. It does no
//! validation; the normalizer owns all type coercion. A source that does not
//! exist yet loads as zero rows.

use crate::models::RawRow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Failure to read a source that does exist.
#[derive(Debug)]
pub enum SourceError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { path, source } => {
                write!(f, "failed to read case source {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io { source, .. } => Some(source),
        }
    }
}

/// Read-only supplier of raw case rows.
///
/// Implementations are read again on every request and must be safe for
/// concurrent readers.
pub trait CaseSource: Send + Sync {
    /// Human-readable location, used in logs.
    fn describe(&self) -> String;

    /// Whether the backing data currently exists.
    fn is_available(&self) -> bool;

    /// Loads every data row. A missing source yields an empty vector.
    fn load(&self) -> Result<Vec<RawRow>, SourceError>;
}

/// CSV file with a header row, located by a configured path.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaseSource for CsvFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<Vec<RawRow>, SourceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(parse_csv(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Case source {} not found, loading no rows", self.path.display());
                Ok(Vec::new())
            }
            Err(source) => Err(SourceError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// CSV text held in memory. `None` behaves like a missing file.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    csv: Option<String>,
}

impl InMemorySource {
    pub fn from_csv(csv: impl Into<String>) -> Self {
        Self {
            csv: Some(csv.into()),
        }
    }

    pub fn missing() -> Self {
        Self { csv: None }
    }
}

impl CaseSource for InMemorySource {
    fn describe(&self) -> String {
        "in-memory".to_string()
    }

    fn is_available(&self) -> bool {
        self.csv.is_some()
    }

    fn load(&self) -> Result<Vec<RawRow>, SourceError> {
        Ok(self.csv.as_deref().map(parse_csv).unwrap_or_default())
    }
}

/// Splits CSV text into records, honouring double quotes and `""` escapes.
///
/// Quoted fields may span line breaks. Lines outside quotes end with `\n`
/// or `\r\n`; blank lines produce no record. A leading byte order mark is
/// dropped.
pub fn parse_csv_records(text: &str) -> Vec<Vec<String>> {
    fn finish(records: &mut Vec<Vec<String>>, record: Vec<String>) {
        let blank = record.len() == 1 && record[0].trim().is_empty();
        if !blank {
            records.push(record);
        }
    }

    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                buf.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => record.push(std::mem::take(&mut buf)),
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                record.push(std::mem::take(&mut buf));
                finish(&mut records, std::mem::take(&mut record));
            }
            _ => buf.push(ch),
        }
    }
    if !buf.is_empty() || !record.is_empty() {
        record.push(buf);
        finish(&mut records, record);
    }
    records
}

/// Quotes a field for CSV output when it contains a delimiter, quote or newline.
pub fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Parses CSV text with a header row into rows keyed by header name.
///
/// Blank lines are ignored. A short record leaves its trailing columns
/// absent; cells beyond the header are dropped.
pub fn parse_csv(text: &str) -> Vec<RawRow> {
    let mut records = parse_csv_records(text).into_iter();

    let Some(header) = records.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();

    records
        .map(|fields| headers.iter().cloned().zip(fields).collect::<RawRow>())
        .collect()
}
