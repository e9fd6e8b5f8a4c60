//! Loading of match columns from delimited files.
use std::io::Read;
use std::str::FromStr;

use crate::errors::{MatchError, Result};
use crate::normalize::Normalizer;
use crate::record::{records_from, Record};

/// Column to read, or several columns joined with a single space.
///
/// Written as `STREET` or `STREET_NAME+STREET_NO`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    columns: Vec<String>,
}

impl FromStr for ColumnSpec {
    type Err = MatchError;
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let columns: Vec<String> = spec.split('+').map(|c| c.trim().to_string()).collect();
        if columns.iter().any(String::is_empty) {
            return Err(MatchError::input(format!("Invalid column spec {spec:?}.")));
        }
        Ok(Self { columns })
    }
}

impl ColumnSpec {
    /// Names of the joined columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Converts a field delimiter into the byte the CSV reader and writer expect.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() && delimiter != '"' && delimiter != '\n' && delimiter != '\r' {
        Ok(delimiter as u8)
    } else {
        Err(MatchError::input(format!(
            "Invalid delimiter {delimiter:?}; an ASCII character other than a quote or a line break is expected."
        )))
    }
}

/// Reads the values of `spec` from CSV with a header row, split at `delimiter`.
///
/// A composed value is missing when any of its parts is missing; empty cells are missing.
pub fn read_column<R>(rdr: R, spec: &ColumnSpec, delimiter: u8) -> Result<Vec<Option<String>>>
where
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(rdr);
    let headers = reader.headers()?.clone();
    let positions = spec
        .columns
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| MatchError::input(format!("Column {name:?} not found.")))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut values = vec![];
    for row in reader.records() {
        let row = row?;
        let parts: Option<Vec<&str>> = positions
            .iter()
            .map(|&p| row.get(p).filter(|v| !v.is_empty()))
            .collect();
        values.push(parts.map(|parts| parts.join(" ")));
    }
    Ok(values)
}

/// Reads and normalizes the values of `spec`.
pub fn load_records<R>(
    rdr: R,
    spec: &ColumnSpec,
    normalizer: &Normalizer,
    delimiter: u8,
) -> Result<Vec<Record>>
where
    R: Read,
{
    Ok(records_from(read_column(rdr, spec, delimiter)?, normalizer))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = "\
FIRSTNAME,LASTNAME,STREET_NAME,STREET_NO
John,Smith,Goethestraße,5
Jane,,Schloßstraße,12
";

    #[test]
    fn test_single_column() {
        let spec: ColumnSpec = "FIRSTNAME".parse().unwrap();
        let values = read_column(PEOPLE.as_bytes(), &spec, b',').unwrap();
        assert_eq!(values, vec![Some("John".to_string()), Some("Jane".to_string())]);
    }

    #[test]
    fn test_composed_column() {
        let spec: ColumnSpec = "FIRSTNAME+LASTNAME".parse().unwrap();
        let values = read_column(PEOPLE.as_bytes(), &spec, b',').unwrap();
        assert_eq!(values, vec![Some("John Smith".to_string()), None]);
    }

    #[test]
    fn test_load_records() {
        let spec: ColumnSpec = "STREET_NAME + STREET_NO".parse().unwrap();
        let records = load_records(PEOPLE.as_bytes(), &spec, &Normalizer::new(), b',').unwrap();
        assert_eq!(records[0].original(), "Goethestraße 5");
        assert_eq!(records[0].normalized(), "goethestr 5");
        assert_eq!(records[1].normalized(), "schlossstr 12");
    }

    #[test]
    fn test_missing_column() {
        let spec: ColumnSpec = "CITY".parse().unwrap();
        assert!(read_column(PEOPLE.as_bytes(), &spec, b',').is_err());
    }

    #[test]
    fn test_semicolon_delimiter() {
        let table = "STREET;CITY\nGoethestraße 5;Berlin\n";
        let spec: ColumnSpec = "STREET".parse().unwrap();
        let values = read_column(table.as_bytes(), &spec, b';').unwrap();
        assert_eq!(values, vec![Some("Goethestraße 5".to_string())]);
        assert!(read_column(table.as_bytes(), &spec, b',').is_err());
    }

    #[test]
    fn test_delimiter_byte() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert!(delimiter_byte('§').is_err());
        assert!(delimiter_byte('"').is_err());
    }

    #[test]
    fn test_invalid_spec() {
        assert!("A++B".parse::<ColumnSpec>().is_err());
        assert!("".parse::<ColumnSpec>().is_err());
    }
}
