//! # epi-ingest
//!
//! Header-driven CSV readers for epicast:
//! - [`read_aggregates`]: the aggregate outbreak table, one row per disease
//!   covering the whole observation window.
//! - [`read_yearly`]: optional real per-year counts (`disease,year,cases`),
//!   grouped into [`YearlySeries`] tagged `real`.
//!
//! Both have `parse_*` variants over any [`Read`] for in-memory input.

mod error;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use epi_core::entities::{OutbreakRecord, YearCount, YearlySeries};
use csv::{Position, StringRecord};
use epi_core::enums::Provenance;
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub use error::IngestError;

/// Aggregate row as it appears in the file. Counts are signed so negative
/// values get a domain error rather than a parse error.
#[derive(Debug, Deserialize)]
struct AggregateRow {
    disease: String,
    cases: i64,
    #[serde(default)]
    case_proportion_pct: f64,
    #[serde(default)]
    case_rank: i64,
    #[serde(default)]
    deaths: i64,
    #[serde(default)]
    death_proportion_pct: f64,
    #[serde(default)]
    death_rank: i64,
    #[serde(default)]
    outbreak_reports: i64,
    #[serde(default)]
    mortality_rate_pct: f64,
}

#[derive(Debug, Deserialize)]
struct YearlyRow {
    disease: String,
    year: i32,
    cases: i64,
}

/// Read the aggregate outbreak table from a CSV file.
///
/// # Errors
///
/// Returns `IngestError` if the file cannot be read, a row is malformed,
/// a disease name is blank, or a count is negative.
pub fn read_aggregates(path: &Path) -> Result<Vec<OutbreakRecord>, IngestError> {
    let records = parse_aggregates(open(path)?)?;
    tracing::info!(path = %path.display(), rows = records.len(), "read aggregate table");
    Ok(records)
}

/// Parse the aggregate outbreak table from any reader.
///
/// # Errors
///
/// See [`read_aggregates`].
pub fn parse_aggregates<R: Read>(input: R) -> Result<Vec<OutbreakRecord>, IngestError> {
    let mut out = Vec::new();

    for_each_row(input, |line, row: AggregateRow| {
        let disease = non_blank(row.disease, line)?;
        out.push(OutbreakRecord {
            disease,
            cases: count(row.cases, "cases", line)?,
            case_proportion_pct: row.case_proportion_pct,
            case_rank: rank(row.case_rank, "case_rank", line)?,
            deaths: count(row.deaths, "deaths", line)?,
            death_proportion_pct: row.death_proportion_pct,
            death_rank: rank(row.death_rank, "death_rank", line)?,
            outbreak_reports: count(row.outbreak_reports, "outbreak_reports", line)?,
            mortality_rate_pct: row.mortality_rate_pct,
        });
        Ok(())
    })?;
    Ok(out)
}

/// Read real per-year counts from a CSV file with `disease,year,cases` columns.
///
/// # Errors
///
/// Returns `IngestError` if the file cannot be read, a row is malformed,
/// a count is negative, or a `(disease, year)` pair repeats.
pub fn read_yearly(path: &Path) -> Result<Vec<YearlySeries>, IngestError> {
    let series = parse_yearly(open(path)?)?;
    tracing::info!(path = %path.display(), series = series.len(), "read yearly series");
    Ok(series)
}

/// Parse real per-year counts from any reader.
///
/// Series come back ordered by disease name, each sorted by year.
///
/// # Errors
///
/// See [`read_yearly`].
pub fn parse_yearly<R: Read>(input: R) -> Result<Vec<YearlySeries>, IngestError> {
    let mut grouped: BTreeMap<String, BTreeMap<i32, u64>> = BTreeMap::new();

    for_each_row(input, |line, row: YearlyRow| {
        let disease = non_blank(row.disease, line)?;
        let cases = count(row.cases, "cases", line)?;

        match grouped.entry(disease.clone()).or_default().entry(row.year) {
            Entry::Vacant(slot) => {
                slot.insert(cases);
                Ok(())
            }
            Entry::Occupied(_) => Err(IngestError::Duplicate {
                line,
                disease,
                year: row.year,
            }),
        }
    })?;

    Ok(grouped
        .into_iter()
        .map(|(disease, years)| {
            let points = years
                .into_iter()
                .map(|(year, cases)| YearCount { year, cases })
                .collect();
            YearlySeries::new(disease, points, Provenance::Real)
        })
        .collect())
}

fn open(path: &Path) -> Result<BufReader<File>, IngestError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// Deserialize each data record and hand it to `f` with the 1-based file
/// line the record starts on. Quoted fields may span lines.
fn for_each_row<R, T, F>(input: R, mut f: F) -> Result<(), IngestError>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(u64, T) -> Result<(), IngestError>,
{
    let mut reader = csv_reader(input);
    let headers = reader.headers()?.clone();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        let line = record.position().map_or(0, Position::line);
        let row = record.deserialize(Some(&headers))?;
        f(line, row)?;
    }
    Ok(())
}

fn non_blank(disease: String, line: u64) -> Result<String, IngestError> {
    if disease.trim().is_empty() {
        return Err(IngestError::InvalidRow {
            line,
            reason: "disease name is blank".into(),
        });
    }
    Ok(disease)
}

fn count(value: i64, field: &str, line: u64) -> Result<u64, IngestError> {
    u64::try_from(value).map_err(|_| IngestError::InvalidRow {
        line,
        reason: format!("{field} must be non-negative, got {value}"),
    })
}

fn rank(value: i64, field: &str, line: u64) -> Result<u32, IngestError> {
    u32::try_from(value).map_err(|_| IngestError::InvalidRow {
        line,
        reason: format!("{field} out of range: {value}"),
    })
}
