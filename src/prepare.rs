//! Batch preparation of the case CSV served by the API.
//!
//! Every row gets a `priority` from the serving classifier and a
//! `region_encoded` label index (distinct regions sorted, index = position).

use crate::classifier::classify_raw;
use crate::normalizer::DEFAULT_REGION;
use crate::source::{csv_quote, parse_csv_records};
use std::collections::{BTreeMap, BTreeSet};

/// Result of [`prepare_csv`].
#[derive(Debug, Clone)]
pub struct PreparedCsv {
    pub csv: String,
    pub rows: usize,
    /// Region name to its encoded index.
    pub region_codes: BTreeMap<String, usize>,
}

fn column(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|h| h == name)
}

fn region_of(fields: &[String], region_col: usize) -> &str {
    fields
        .get(region_col)
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_REGION)
}

/// Adds or overwrites `region_encoded` and `priority` on every data row.
///
/// The input must have a header with `recovery_probability` and `region`
/// columns. A probability that does not parse is classified Low.
pub fn prepare_csv(text: &str) -> anyhow::Result<PreparedCsv> {
    let mut records = parse_csv_records(text);
    if records.is_empty() {
        anyhow::bail!("input CSV is empty");
    }
    let mut header: Vec<String> = records
        .remove(0)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let probability_col = column(&header, "recovery_probability")
        .ok_or_else(|| anyhow::anyhow!("input CSV has no 'recovery_probability' column"))?;
    let region_col = column(&header, "region")
        .ok_or_else(|| anyhow::anyhow!("input CSV has no 'region' column"))?;

    let region_codes: BTreeMap<String, usize> = records
        .iter()
        .map(|fields| region_of(fields, region_col).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(code, region)| (region, code))
        .collect();

    let encoded_col = column(&header, "region_encoded").unwrap_or_else(|| {
        header.push("region_encoded".to_string());
        header.len() - 1
    });
    let priority_col = column(&header, "priority").unwrap_or_else(|| {
        header.push("priority".to_string());
        header.len() - 1
    });

    let mut csv = header
        .iter()
        .map(|h| csv_quote(h))
        .collect::<Vec<_>>()
        .join(",");
    csv.push('\n');

    for mut fields in records.iter().cloned() {
        fields.resize(header.len(), String::new());
        let region = region_of(&fields, region_col).to_string();
        let priority = classify_raw(&fields[probability_col]);

        fields[encoded_col] = region_codes[&region].to_string();
        fields[priority_col] = priority.to_string();

        csv.push_str(
            &fields
                .iter()
                .map(|f| csv_quote(f))
                .collect::<Vec<_>>()
                .join(","),
        );
        csv.push('\n');
    }

    Ok(PreparedCsv {
        csv,
        rows: records.len(),
        region_codes,
    })
}
