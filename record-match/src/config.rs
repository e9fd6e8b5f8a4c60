//! Configuration of a matching run, read from TOML.
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::backend::SimilarityBackend;
use crate::dataset;
use crate::dispatch::Dispatcher;
use crate::errors::{MatchError, Result};
use crate::tfidf::{IdfWeights, TfWeights};
use crate::threshold::Thresholds;

/// Settings of a matching run. Every field has a default.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    /// Similarity backend.
    pub algorithm: SimilarityBackend,
    /// Cutoff per backend.
    pub thresholds: Thresholds,
    /// Size of the worker pool; `min(32, #cpus + 4)` when unset.
    pub num_workers: Option<usize>,
    /// Column spec of the corpus file.
    pub corpus_column: String,
    /// Column spec of the query file.
    pub query_column: String,
    /// TF weighting of the TF-IDF backend.
    pub tf: TfWeights,
    /// IDF weighting of the TF-IDF backend.
    pub idf: IdfWeights,
    /// Logs the progress of long batches?
    pub shows_progress: bool,
    /// Field delimiter of input and output tables.
    pub delimiter: char,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            algorithm: SimilarityBackend::EditDistance,
            thresholds: Thresholds::default(),
            num_workers: None,
            corpus_column: "STREET".to_string(),
            query_column: "STREET".to_string(),
            tf: TfWeights::default(),
            idf: IdfWeights::default(),
            shows_progress: false,
            delimiter: ',',
        }
    }
}

impl MatchConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| MatchError::input(format!("Invalid config: {e}")))
    }

    /// Reads a TOML file.
    pub fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| MatchError::input(format!("Could not read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Cutoff of the selected backend.
    pub const fn threshold(&self) -> f64 {
        self.thresholds.get(self.algorithm)
    }

    /// Field delimiter as the byte the CSV reader and writer expect.
    pub fn delimiter_byte(&self) -> Result<u8> {
        dataset::delimiter_byte(self.delimiter)
    }

    /// Configured pool size, or the default one.
    pub fn num_workers(&self) -> usize {
        self.num_workers.unwrap_or_else(Dispatcher::default_workers)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::from_toml_str("").unwrap();
        assert_eq!(config, MatchConfig::default());
        assert_eq!(config.threshold(), 0.8);
        assert!(config.num_workers() >= 1);
        assert_eq!(config.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn test_parse() {
        let config = MatchConfig::from_toml_str(
            r#"
algorithm = "cosine"
num_workers = 3
corpus_column = "FIRSTNAME+LASTNAME"
query_column = "FULLNAME"
tf = "sublinear"
idf = "standard"
delimiter = ";"

[thresholds]
tfidf = 0.65
"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, SimilarityBackend::Cosine);
        assert_eq!(config.num_workers(), 3);
        assert_eq!(config.threshold(), 0.65);
        assert_eq!(config.thresholds.levenshtein, 0.8);
        assert_eq!(config.tf, TfWeights::Sublinear);
        assert_eq!(config.idf, IdfWeights::Standard);
        assert_eq!(config.query_column, "FULLNAME");
        assert_eq!(config.delimiter_byte().unwrap(), b';');
    }

    #[test]
    fn test_unknown_algorithm() {
        assert!(MatchConfig::from_toml_str("algorithm = \"soundex\"").is_err());
        assert!(MatchConfig::from_toml_str("workers = 3").is_err());
    }

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "algorithm = \"regex\"").unwrap();
        let config = MatchConfig::load(file.path()).unwrap();
        assert_eq!(config.algorithm, SimilarityBackend::Substring);
        assert!(MatchConfig::load(file.path().with_extension("missing")).is_err());
    }
}
