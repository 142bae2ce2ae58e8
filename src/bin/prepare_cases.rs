//! Prepares the case CSV served by the API.
//!
//! Usage: `prepare_cases [INPUT] [OUTPUT]`. Falls back to `PREPARE_INPUT`,
//! then `PREPARE_OUTPUT` / `CASES_CSV_PATH` for the output.

use anyhow::Context;
use dca_cases_api::config::DEFAULT_CASES_CSV_PATH;
use dca_cases_api::prepare::prepare_csv;
use std::env;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let input = args
        .next()
        .or_else(|| env::var("PREPARE_INPUT").ok())
        .context("input path required: pass it as the first argument or set PREPARE_INPUT")?;
    let output = args
        .next()
        .or_else(|| env::var("PREPARE_OUTPUT").ok())
        .or_else(|| env::var("CASES_CSV_PATH").ok())
        .unwrap_or_else(|| DEFAULT_CASES_CSV_PATH.to_string());

    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input))?;
    let prepared = prepare_csv(&text)?;

    tracing::info!(
        "Region encoding: {}",
        prepared
            .region_codes
            .iter()
            .map(|(region, code)| format!("{}={}", region, code))
            .collect::<Vec<_>>()
            .join(", ")
    );

    std::fs::write(&output, &prepared.csv)
        .with_context(|| format!("failed to write {}", output))?;
    tracing::info!("Wrote {} prepared cases to {}", prepared.rows, output);

    Ok(())
}
