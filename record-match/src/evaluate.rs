//! Classification metrics of validated match decisions.
use std::io::{Read, Write};

use serde::Serialize;

use crate::errors::{MatchError, Result};

/// Counts of a binary confusion matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    /// Predicted match, true match.
    pub true_positive: usize,
    /// Predicted match, no true match.
    pub false_positive: usize,
    /// Predicted no match, no true match.
    pub true_negative: usize,
    /// Predicted no match, true match.
    pub false_negative: usize,
}

impl ConfusionMatrix {
    /// Counts `(truth, prediction)` pairs, skipping pairs with an absent side.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Option<bool>, Option<bool>)>,
    {
        let mut matrix = Self::default();
        for pair in pairs {
            if let (Some(truth), Some(pred)) = pair {
                matrix.add(truth, pred);
            }
        }
        matrix
    }

    /// Counts one pair.
    pub fn add(&mut self, truth: bool, pred: bool) {
        match (truth, pred) {
            (true, true) => self.true_positive += 1,
            (false, true) => self.false_positive += 1,
            (false, false) => self.true_negative += 1,
            (true, false) => self.false_negative += 1,
        }
    }

    /// Number of counted pairs.
    pub const fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Fraction of correct predictions, 0 when empty.
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    /// `tp / (tp + fp)`, 0 when undefined.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// `tp / (tp + fn)`, 0 when undefined.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// Harmonic mean of precision and recall, 0 when undefined.
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0. {
            0.
        } else {
            2. * p * r / (p + r)
        }
    }

    /// Area under the ROC curve of hard decisions, `(TPR + TNR) / 2`.
    ///
    /// Undefined when only one class is present.
    pub fn roc_auc(&self) -> Option<f64> {
        let positives = self.true_positive + self.false_negative;
        let negatives = self.true_negative + self.false_positive;
        if positives == 0 || negatives == 0 {
            return None;
        }
        let tpr = self.true_positive as f64 / positives as f64;
        let tnr = self.true_negative as f64 / negatives as f64;
        Some((tpr + tnr) / 2.)
    }

    /// Summary of every metric.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            samples: self.total(),
            accuracy: self.accuracy(),
            precision: self.precision(),
            recall: self.recall(),
            f1_score: self.f1(),
            roc_auc: self.roc_auc(),
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.
    } else {
        num as f64 / den as f64
    }
}

/// Metrics of one evaluated table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Metrics {
    /// Number of pairs with both sides present.
    #[serde(rename = "Samples")]
    pub samples: usize,
    /// See [`ConfusionMatrix::accuracy`].
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    /// See [`ConfusionMatrix::precision`].
    #[serde(rename = "Precision")]
    pub precision: f64,
    /// See [`ConfusionMatrix::recall`].
    #[serde(rename = "Recall")]
    pub recall: f64,
    /// See [`ConfusionMatrix::f1`].
    #[serde(rename = "F1-Score")]
    pub f1_score: f64,
    /// See [`ConfusionMatrix::roc_auc`].
    #[serde(rename = "ROC-AUC")]
    pub roc_auc: Option<f64>,
}

/// Parses a truth value; blank text is absent.
pub fn parse_flag(value: &str) -> Result<Option<bool>> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "yes" => Ok(Some(true)),
        "false" | "0" | "no" => Ok(Some(false)),
        other => Err(MatchError::input(format!("Invalid truth value {other:?}."))),
    }
}

/// Reads `(TRUE_MATCH, BEST_MATCH_BINARY)` pairs from an exported and validated table.
pub fn read_labels<R>(rdr: R, delimiter: u8) -> Result<Vec<(Option<bool>, Option<bool>)>>
where
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(rdr);
    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| MatchError::input(format!("Column {name:?} not found.")))
    };
    let truth = position("TRUE_MATCH")?;
    let pred = position("BEST_MATCH_BINARY")?;

    let mut labels = vec![];
    for row in reader.records() {
        let row = row?;
        let flag = |i: usize| parse_flag(row.get(i).unwrap_or_default());
        labels.push((flag(truth)?, flag(pred)?));
    }
    Ok(labels)
}

/// Writes `metrics` as CSV with a header row.
pub fn write_metrics<W>(metrics: &Metrics, wtr: W, delimiter: u8) -> Result<()>
where
    W: Write,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(wtr);
    writer.serialize(metrics)?;
    writer.flush()?;
    Ok(())
}

/// Writes `matrix` as a 2x2 CSV table, actual classes in rows and predicted ones in columns.
pub fn write_confusion_matrix<W>(matrix: &ConfusionMatrix, wtr: W, delimiter: u8) -> Result<()>
where
    W: Write,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(wtr);
    writer.write_record(["Actual", "Predicted Negative", "Predicted Positive"])?;
    writer.write_record([
        "Actual Negative".to_string(),
        matrix.true_negative.to_string(),
        matrix.false_positive.to_string(),
    ])?;
    writer.write_record([
        "Actual Positive".to_string(),
        matrix.false_negative.to_string(),
        matrix.true_positive.to_string(),
    ])?;
    writer.flush()?;
    Ok(())
}
