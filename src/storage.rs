//! Loading the monthly CSV exports and writing tidy copies back out.
//!
//! Input files have one row per (month, country):
//! `month,countries,value,country_code`, where `value` is a passenger count or
//! the literal `na`. Extra columns are ignored.

use crate::models::{Dataset, Direction, ParseMonthError, Record, YearMonth};
use anyhow::Result;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line}: {source}")]
    BadDate {
        line: u64,
        #[source]
        source: ParseMonthError,
    },
    #[error("line {line}: invalid passenger count '{value}'")]
    BadValue { line: u64, value: String },
}

#[derive(Debug, Deserialize)]
struct RawRow {
    month: String,
    countries: String,
    value: String,
    country_code: String,
}

/// Parse a passenger count. `na` and blanks are missing observations;
/// thousands separators are tolerated.
fn parse_value(raw: &str) -> Option<Option<f64>> {
    let t = raw.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("na") {
        return Some(None);
    }
    let cleaned: String = t.chars().filter(|c| *c != ',' && *c != '_').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(Some(v)),
        _ => None,
    }
}

fn line_of(rec: &StringRecord) -> u64 {
    rec.position().map(|p| p.line()).unwrap_or(0)
}

/// Read records for one direction from any reader.
pub fn load_csv_reader<R: Read>(reader: R, direction: Direction) -> Result<Vec<Record>, DataError> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = line_of(&row);
        let raw: RawRow = row.deserialize(Some(&headers))?;
        let date = raw
            .month
            .parse::<YearMonth>()
            .map_err(|source| DataError::BadDate { line, source })?;
        let value = parse_value(&raw.value).ok_or_else(|| DataError::BadValue {
            line,
            value: raw.value.clone(),
        })?;
        out.push(Record {
            date,
            name: raw.countries,
            code: raw.country_code,
            value,
            direction,
        });
    }
    Ok(out)
}

/// Read records for one direction from a CSV file.
pub fn load_csv<P: AsRef<Path>>(path: P, direction: Direction) -> Result<Vec<Record>, DataError> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = load_csv_reader(f, direction)?;
    debug!("loaded {} {} rows from {}", records.len(), direction, path.display());
    Ok(records)
}

/// Load both files into one dataset, arrivals first.
pub fn load_dataset<P: AsRef<Path>, Q: AsRef<Path>>(
    arrivals: P,
    departures: Q,
) -> Result<Dataset, DataError> {
    let mut records = load_csv(arrivals, Direction::Arrivals)?;
    records.extend(load_csv(departures, Direction::Departures)?);
    Ok(Dataset::new(records))
}

/// Spreadsheet apps evaluate cells starting with these characters as formulas.
pub(crate) fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{s}"),
        _ => s.to_string(),
    }
}

#[derive(Serialize)]
struct RecordRow<'a> {
    month: String,
    countries: String,
    value: Option<f64>,
    country_code: String,
    direction: &'a str,
}

/// Save records as CSV with header, using the input column names plus `direction`.
pub fn save_csv<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    for r in records {
        wtr.serialize(RecordRow {
            month: r.date.to_string(),
            countries: sanitize_cell(&r.name),
            value: r.value,
            country_code: sanitize_cell(&r.code),
            direction: r.direction.as_str(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save records as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
month,countries,value,country_code
2019-08,Germany,\"1,234\",276
2019-08,Japan,na,392
2009-08,Germany,1000,276
";

    #[test]
    fn parses_values_and_missing() {
        let rows = load_csv_reader(SAMPLE.as_bytes(), Direction::Arrivals).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].value, Some(1234.0));
        assert_eq!(rows[0].code, "276");
        assert_eq!(rows[1].value, None);
        assert_eq!(rows[2].date, YearMonth { year: 2009, month: 8 });
        assert!(rows.iter().all(|r| r.direction == Direction::Arrivals));
    }

    #[test]
    fn bad_value_reports_line() {
        let src = "month,countries,value,country_code\n2019-08,Germany,lots,276\n";
        let err = load_csv_reader(src.as_bytes(), Direction::Departures).unwrap_err();
        match err {
            DataError::BadValue { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_month_is_rejected() {
        let src = "month,countries,value,country_code\n2019/08,Germany,1,276\n";
        let err = load_csv_reader(src.as_bytes(), Direction::Arrivals).unwrap_err();
        assert!(matches!(err, DataError::BadDate { line: 2, .. }));
    }

    #[test]
    fn sanitize_prefixes_formula_starters() {
        assert_eq!(sanitize_cell("=1+1"), "'=1+1");
        assert_eq!(sanitize_cell("@x"), "'@x");
        assert_eq!(sanitize_cell("Germany"), "Germany");
    }
}
