//! CSV file source tests against real files on disk.

use dca_cases_api::normalizer::normalize_rows;
use dca_cases_api::prepare::prepare_csv;
use dca_cases_api::source::{CaseSource, CsvFileSource};
use std::io::Write;

#[test]
fn test_file_source_loads_rows() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "case_id,amount_due,days_overdue,region,recovery_probability")?;
    writeln!(file, "1,2500,12,\"North, Coast\",0.91")?;
    writeln!(file, "2,7300,133,South,0.28")?;

    let source = CsvFileSource::new(file.path());
    assert!(source.is_available());

    let rows = source.load()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["region"], "North, Coast");

    let batch = normalize_rows(&rows);
    assert_eq!(batch.cases.len(), 2);
    assert!(batch.skipped.is_empty());
    Ok(())
}

#[test]
fn test_missing_file_loads_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let source = CsvFileSource::new(dir.path().join("predicted_cases.csv"));

    assert!(!source.is_available());
    assert!(source.load()?.is_empty());
    Ok(())
}

#[test]
fn test_directory_is_not_a_usable_source() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let source = CsvFileSource::new(dir.path());

    assert!(!source.is_available());
    assert!(source.load().is_err());
    Ok(())
}

#[test]
fn test_source_is_reread_on_every_load() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cases.csv");
    let source = CsvFileSource::new(&path);

    std::fs::write(&path, "case_id,amount_due,days_overdue,recovery_probability\n1,10,1,0.5\n")?;
    assert_eq!(source.load()?.len(), 1);

    std::fs::write(
        &path,
        "case_id,amount_due,days_overdue,recovery_probability\n1,10,1,0.5\n2,20,2,0.6\n",
    )?;
    assert_eq!(source.load()?.len(), 2);
    Ok(())
}

#[test]
fn test_prepared_file_is_servable() -> anyhow::Result<()> {
    let raw = "case_id,amount_due,days_overdue,past_defaults,region,recovered,recovery_probability\n\
               1,4000,20,0,North,1,0.88\n\
               2,9000,120,4,West,0,0.33\n";
    let prepared = prepare_csv(raw)?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("predicted_cases.csv");
    std::fs::write(&path, &prepared.csv)?;

    let batch = normalize_rows(&CsvFileSource::new(&path).load()?);
    assert_eq!(batch.cases.len(), 2);
    assert_eq!(batch.cases[0].priority().as_str(), "High");
    assert_eq!(batch.cases[1].priority().as_str(), "Medium");
    Ok(())
}
