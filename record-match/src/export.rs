//! Result table handed to validation and evaluation.
use std::io::Write;

use serde::Serialize;

use crate::errors::Result;
use crate::search::MatchResult;

/// One row of the exported table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchRow {
    /// Original query text.
    #[serde(rename = "MATCH")]
    pub query: String,
    /// Original text of the best corpus record.
    #[serde(rename = "BEST_FOUND_MATCH")]
    pub best_found: Option<String>,
    /// Ground truth, filled in during validation.
    #[serde(rename = "TRUE_MATCH")]
    pub true_match: Option<bool>,
    /// Score of the best match.
    #[serde(rename = "BEST_MATCH")]
    pub score: Option<String>,
    /// Binary decision.
    #[serde(rename = "BEST_MATCH_BINARY")]
    pub decision: Option<bool>,
}

impl From<&MatchResult> for MatchRow {
    fn from(result: &MatchResult) -> Self {
        Self {
            query: result.query().original().to_string(),
            best_found: result.best_found().map(|r| r.original().to_string()),
            true_match: None,
            score: result.score().map(|s| s.to_string()),
            decision: result.decision(),
        }
    }
}

/// Writes `results` as CSV with a header row, in the given order.
pub fn write_csv<W>(results: &[MatchResult], wtr: W, delimiter: u8) -> Result<()>
where
    W: Write,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(wtr);
    for result in results {
        writer.serialize(MatchRow::from(result))?;
    }
    writer.flush()?;
    Ok(())
}
