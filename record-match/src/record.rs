//! Records compared by the matching engine.
use crate::normalize::Normalizer;

/// A raw value paired with its normalized form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    original: String,
    normalized: String,
}

impl Record {
    /// Creates a record from an already normalized value.
    pub fn new<O, N>(original: O, normalized: N) -> Self
    where
        O: Into<String>,
        N: Into<String>,
    {
        Self {
            original: original.into(),
            normalized: normalized.into(),
        }
    }

    /// Creates a record by normalizing `original`; a missing value becomes the empty string.
    pub fn from_raw(original: Option<&str>, normalizer: &Normalizer) -> Self {
        let original = original.unwrap_or_default();
        Self::new(original, normalizer.normalize(original))
    }

    /// Raw value as read from the source.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Normalized value used for comparison.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Checks if nothing is left to compare after normalization.
    pub fn is_blank(&self) -> bool {
        self.normalized.trim().is_empty()
    }
}

/// Normalizes every value with the same normalizer.
pub fn records_from<I, S>(values: I, normalizer: &Normalizer) -> Vec<Record>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| Record::from_raw(v.as_ref().map(|s| s.as_ref()), normalizer))
        .collect()
}
