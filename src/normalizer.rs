//! Conversion of raw source rows into typed [`Case`] values.
//!
//! A row that cannot be converted is never fatal: it comes back as a
//! [`SkipReason`] and the rest of the batch carries on.

use crate::classifier::classify;
use crate::models::{Case, Priority, RawRow};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_REGION: &str = "Unknown";

/// Why a row was left out of the normalized collection.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// A required column is absent or its cell is empty.
    MissingField(&'static str),
    /// A cell is present but is not a number of the expected kind.
    InvalidNumber { field: &'static str, value: String },
    /// The value parsed but breaks a case constraint (e.g. a negative amount).
    OutOfRange { field: &'static str, value: String },
    /// An earlier row already used this identifier.
    DuplicateId(i64),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField(field) => write!(f, "missing required field '{}'", field),
            SkipReason::InvalidNumber { field, value } => {
                write!(f, "field '{}' is not a valid number: {:?}", field, value)
            }
            SkipReason::OutOfRange { field, value } => {
                write!(f, "field '{}' is out of range: {}", field, value)
            }
            SkipReason::DuplicateId(id) => write!(f, "duplicate case_id {}", id),
        }
    }
}

/// A skipped row and where it sat in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSkip {
    /// 1-based index among the non-blank data records, header excluded.
    /// Not a file line number: a quoted cell spanning lines still counts once.
    pub row: usize,
    pub reason: SkipReason,
}

/// Output of [`normalize_rows`]: the valid cases in source order plus every skip.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub cases: Vec<Case>,
    pub skipped: Vec<RowSkip>,
}

impl NormalizedBatch {
    /// Emits one warning per skipped row.
    pub fn log_skipped(&self) {
        for skip in &self.skipped {
            tracing::warn!("Skipping invalid data row {}: {}", skip.row, skip.reason);
        }
    }
}

/// Returns the trimmed cell for `field`, treating an empty cell as absent.
fn cell<'a>(row: &'a RawRow, field: &str) -> Option<&'a str> {
    row.get(field)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_cell<T: FromStr>(field: &'static str, value: &str) -> Result<T, SkipReason> {
    value.parse::<T>().map_err(|_| SkipReason::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn required<T: FromStr>(row: &RawRow, field: &'static str) -> Result<T, SkipReason> {
    let value = cell(row, field).ok_or(SkipReason::MissingField(field))?;
    parse_cell(field, value)
}

fn optional<T: FromStr>(row: &RawRow, field: &'static str) -> Result<Option<T>, SkipReason> {
    cell(row, field)
        .map(|value| parse_cell(field, value))
        .transpose()
}

fn out_of_range(field: &'static str, value: impl fmt::Display) -> SkipReason {
    SkipReason::OutOfRange {
        field,
        value: value.to_string(),
    }
}

/// Converts one raw row into a [`Case`].
///
/// Required: `case_id`, `amount_due`, `days_overdue`, `recovery_probability`
/// (a finite number; "NaN" and "inf" are rejected).
/// Optional: `region` ("Unknown"), `past_defaults` (0), `recovered` (false),
/// `priority` (derived from the probability). A stored priority label wins
/// over the derived one; an unrecognised label falls back to derivation.
pub fn normalize_row(row: &RawRow) -> Result<Case, SkipReason> {
    let id: i64 = required(row, "case_id")?;
    let amount_due: f64 = required(row, "amount_due")?;
    let days_overdue: i64 = required(row, "days_overdue")?;
    let recovery_probability: f64 = required(row, "recovery_probability")?;
    if !recovery_probability.is_finite() {
        return Err(SkipReason::InvalidNumber {
            field: "recovery_probability",
            value: cell(row, "recovery_probability").unwrap_or_default().to_string(),
        });
    }
    let past_defaults: i64 = optional(row, "past_defaults")?.unwrap_or(0);
    let recovered = optional::<i64>(row, "recovered")?.unwrap_or(0) == 1;

    if id <= 0 {
        return Err(out_of_range("case_id", id));
    }
    if !amount_due.is_finite() || amount_due < 0.0 {
        return Err(out_of_range("amount_due", amount_due));
    }
    if days_overdue < 0 {
        return Err(out_of_range("days_overdue", days_overdue));
    }
    if past_defaults < 0 {
        return Err(out_of_range("past_defaults", past_defaults));
    }

    let region = cell(row, "region").unwrap_or(DEFAULT_REGION).to_string();
    let priority = match cell(row, "priority") {
        Some(label) => Priority::from_label(label).unwrap_or_else(|| {
            tracing::debug!(
                "Unrecognised priority {:?} for case {}, deriving from probability",
                label,
                id
            );
            classify(recovery_probability)
        }),
        None => classify(recovery_probability),
    };

    Ok(Case::new(
        id,
        amount_due,
        days_overdue,
        past_defaults,
        region,
        recovery_probability,
        recovered,
        priority,
    ))
}

/// Normalizes a batch in source order.
///
/// The first row carrying a given `case_id` is kept; later ones are skipped.
pub fn normalize_rows(rows: &[RawRow]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    let mut seen = HashSet::new();

    for (index, row) in rows.iter().enumerate() {
        let outcome = normalize_row(row).and_then(|case| {
            if seen.insert(case.id()) {
                Ok(case)
            } else {
                Err(SkipReason::DuplicateId(case.id()))
            }
        });
        match outcome {
            Ok(case) => batch.cases.push(case),
            Err(reason) => batch.skipped.push(RowSkip {
                row: index + 1,
                reason,
            }),
        }
    }

    batch
}
