//! End-to-end matching of a query set against a corpus.
use std::time::Instant;

use tracing::info;

use crate::backend::SimilarityBackend;
use crate::config::MatchConfig;
use crate::context::MatchContext;
use crate::dispatch::{BatchOutcome, CancelToken, Dispatcher};
use crate::errors::{MatchError, Result};
use crate::record::Record;
use crate::space::VectorSpaceBuilder;
use crate::tfidf::{IdfWeights, TfWeights};
use crate::threshold::Thresholds;

/// Best-match searcher with one backend.
///
/// # Examples
///
/// ```
/// use record_match::{Matcher, Normalizer, SimilarityBackend};
/// use record_match::record::records_from;
///
/// let normalizer = Normalizer::new();
/// let corpus = records_from([Some("johnsmith"), Some("janedoe")], &normalizer);
/// let queries = records_from([Some("johnsmith"), Some("")], &normalizer);
///
/// let outcome = Matcher::new(SimilarityBackend::Dice)
///     .num_workers(2)
///     .unwrap()
///     .run(&corpus, &queries)
///     .unwrap();
///
/// assert_eq!(outcome.results.len(), 2);
/// assert_eq!(outcome.results[0].best_found().unwrap().original(), "johnsmith");
/// assert_eq!(outcome.results[0].decision(), Some(true));
/// assert_eq!(outcome.results[1].best_found(), None);
/// assert_eq!(outcome.results[1].decision(), None);
/// ```
#[derive(Clone, Debug)]
pub struct Matcher {
    backend: SimilarityBackend,
    threshold: f64,
    num_workers: usize,
    shows_progress: bool,
    cancel: Option<CancelToken>,
    tf_weight: TfWeights,
    idf_weight: IdfWeights,
}

impl Matcher {
    /// Creates an instance with the default threshold of `backend` and the default pool size.
    pub fn new(backend: SimilarityBackend) -> Self {
        Self {
            backend,
            threshold: Thresholds::default().get(backend),
            num_workers: Dispatcher::default_workers(),
            shows_progress: false,
            cancel: None,
            tf_weight: TfWeights::default(),
            idf_weight: IdfWeights::default(),
        }
    }

    /// Creates an instance from a configuration.
    pub fn from_config(config: &MatchConfig) -> Result<Self> {
        Ok(Self::new(config.algorithm)
            .threshold(config.threshold())
            .num_workers(config.num_workers())?
            .shows_progress(config.shows_progress)
            .tf(config.tf)
            .idf(config.idf))
    }

    /// Sets the cutoff of decisions.
    pub const fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the pool size (must be more than 0).
    pub fn num_workers(mut self, num_workers: usize) -> Result<Self> {
        if num_workers == 0 {
            return Err(MatchError::input("Number of workers must not be 0."));
        }
        self.num_workers = num_workers;
        Ok(self)
    }

    /// Logs the progress every 1000 queries?
    pub const fn shows_progress(mut self, yes: bool) -> Self {
        self.shows_progress = yes;
        self
    }

    /// Stops starting new tasks once `token` is cancelled.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Sets the TF weighting of the TF-IDF backend.
    pub const fn tf(mut self, tf_weight: TfWeights) -> Self {
        self.tf_weight = tf_weight;
        self
    }

    /// Sets the IDF weighting of the TF-IDF backend.
    pub const fn idf(mut self, idf_weight: IdfWeights) -> Self {
        self.idf_weight = idf_weight;
        self
    }

    /// Selected backend.
    pub const fn backend(&self) -> SimilarityBackend {
        self.backend
    }

    fn dispatcher(&self) -> Result<Dispatcher> {
        let dispatcher = Dispatcher::new(self.num_workers)?.shows_progress(self.shows_progress);
        Ok(match &self.cancel {
            Some(token) => dispatcher.cancel_token(token.clone()),
            None => dispatcher,
        })
    }

    /// Matches every query against `corpus` and classifies the results.
    ///
    /// The vector space, when the backend needs one, is fitted on both sides before any
    /// worker starts.
    pub fn run(&self, corpus: &[Record], queries: &[Record]) -> Result<BatchOutcome> {
        info!(
            "Matching {} queries against {} records with {}",
            queries.len(),
            corpus.len(),
            self.backend
        );
        let start = Instant::now();

        let space = match self.backend.vector_mode() {
            Some(mode) => {
                let corpus: Vec<&str> = corpus.iter().map(Record::normalized).collect();
                let queries: Vec<&str> = queries.iter().map(Record::normalized).collect();
                let space = VectorSpaceBuilder::new(mode)
                    .tf(self.tf_weight)
                    .idf(self.idf_weight)
                    .build(&corpus, &queries)?;
                Some(space)
            }
            None => None,
        };

        let ctx = MatchContext::new(corpus, queries, space.as_ref())?;
        let outcome = self
            .dispatcher()?
            .dispatch(self.backend, &ctx)?
            .classify(self.threshold);
        info!("Done in {} sec", start.elapsed().as_secs_f64());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Score;
    use crate::normalize::Normalizer;
    use crate::record::records_from;

    #[test]
    fn test_substring_after_normalization() {
        let normalizer = Normalizer::new();
        let corpus = records_from([Some("main street 5")], &normalizer);
        let queries = records_from([Some("Main Street 5")], &normalizer);
        let outcome = Matcher::new(SimilarityBackend::Substring)
            .num_workers(1)
            .unwrap()
            .run(&corpus, &queries)
            .unwrap();
        let result = &outcome.results[0];
        assert_eq!(result.decision(), Some(true));
        assert_eq!(result.score(), Some(Score::Contained(true)));
        assert_eq!(result.best_found().unwrap().normalized(), "main street 5");
    }

    #[test]
    fn test_from_config() {
        let config = MatchConfig::from_toml_str(
            "algorithm = \"jaccard\"\nnum_workers = 2\n[thresholds]\njaccard = 0.9\n",
        )
        .unwrap();
        let matcher = Matcher::from_config(&config).unwrap();
        assert_eq!(matcher.backend(), SimilarityBackend::Jaccard);

        let normalizer = Normalizer::new();
        let corpus = records_from([Some("goethe str 5"), Some("schiller weg")], &normalizer);
        let queries = records_from([Some("Goethe Str. 7")], &normalizer);
        let outcome = matcher.run(&corpus, &queries).unwrap();
        let result = &outcome.results[0];
        assert_eq!(result.best_index(), Some(0));
        // House numbers are too short to be words.
        assert_eq!(result.score(), Some(Score::Similarity(1.)));
        assert_eq!(result.decision(), Some(true));

        let queries = records_from([Some("Goethe Weg")], &normalizer);
        let result = &matcher.run(&corpus, &queries).unwrap().results[0];
        // One of three distinct words is shared with either record.
        assert_eq!(result.best_index(), Some(0));
        assert_eq!(result.decision(), Some(false));
    }

    #[test]
    fn test_zero_workers() {
        assert!(Matcher::new(SimilarityBackend::Dice).num_workers(0).is_err());
    }

    #[test]
    fn test_cancelled() {
        let normalizer = Normalizer::new();
        let corpus = records_from([Some("alpha")], &normalizer);
        let queries = records_from([Some("alpha"), Some("beta")], &normalizer);
        let token = CancelToken::new();
        token.cancel();
        let outcome = Matcher::new(SimilarityBackend::Cosine)
            .cancel_token(token)
            .run(&corpus, &queries)
            .unwrap();
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.failures.len(), 2);
    }

    #[test]
    fn test_empty_corpus() {
        let queries = vec![Record::new("a", "a")];
        for backend in SimilarityBackend::ALL {
            assert!(Matcher::new(backend).run(&[], &queries).is_err());
        }
    }
}
