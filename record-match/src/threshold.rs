//! Conversion of scores into binary match decisions.
use serde::Deserialize;

use crate::backend::{Score, SimilarityBackend};

/// Decides whether a score counts as a match.
///
/// An absent score stays absent; a containment outcome is its own decision.
///
/// # Examples
///
/// ```
/// use record_match::backend::Score;
/// use record_match::threshold::decide;
///
/// assert_eq!(decide(Some(Score::Similarity(0.8)), 0.8), Some(true));
/// assert_eq!(decide(Some(Score::Contained(false)), 0.), Some(false));
/// assert_eq!(decide(None, 0.5), None);
/// ```
pub fn decide(score: Option<Score>, threshold: f64) -> Option<bool> {
    score.map(|score| match score {
        Score::Similarity(s) => s >= threshold,
        Score::Contained(b) => b,
    })
}

/// Cutoff per backend.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// Cutoff of [`SimilarityBackend::EditDistance`].
    pub levenshtein: f64,
    /// Cutoff of [`SimilarityBackend::Dice`].
    pub dice: f64,
    /// Cutoff of [`SimilarityBackend::Jaccard`].
    pub jaccard: f64,
    /// Cutoff of [`SimilarityBackend::Ngram`].
    pub ngram: f64,
    /// Cutoff of [`SimilarityBackend::Cosine`].
    pub tfidf: f64,
    /// Cutoff of [`SimilarityBackend::Substring`], kept for a uniform interface.
    #[serde(alias = "regex")]
    pub substring: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            levenshtein: 0.8,
            dice: 0.5,
            jaccard: 0.5,
            ngram: 0.5,
            tfidf: 0.5,
            substring: 0.5,
        }
    }
}

impl Thresholds {
    /// Cutoff of `backend`.
    pub const fn get(&self, backend: SimilarityBackend) -> f64 {
        match backend {
            SimilarityBackend::EditDistance => self.levenshtein,
            SimilarityBackend::Dice => self.dice,
            SimilarityBackend::Jaccard => self.jaccard,
            SimilarityBackend::Ngram => self.ngram,
            SimilarityBackend::Cosine => self.tfidf,
            SimilarityBackend::Substring => self.substring,
        }
    }

    /// Overrides the cutoff of `backend`.
    pub fn set(&mut self, backend: SimilarityBackend, threshold: f64) {
        let slot = match backend {
            SimilarityBackend::EditDistance => &mut self.levenshtein,
            SimilarityBackend::Dice => &mut self.dice,
            SimilarityBackend::Jaccard => &mut self.jaccard,
            SimilarityBackend::Ngram => &mut self.ngram,
            SimilarityBackend::Cosine => &mut self.tfidf,
            SimilarityBackend::Substring => &mut self.substring,
        };
        *slot = threshold;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_similarity() {
        assert_eq!(decide(Some(Score::Similarity(0.49)), 0.5), Some(false));
        assert_eq!(decide(Some(Score::Similarity(0.5)), 0.5), Some(true));
    }

    #[test]
    fn test_decide_passes_booleans() {
        assert_eq!(decide(Some(Score::Contained(true)), 2.), Some(true));
        assert_eq!(decide(Some(Score::Contained(false)), -1.), Some(false));
    }

    #[test]
    fn test_absent_is_not_false() {
        assert_eq!(decide(None, 0.), None);
    }

    #[test]
    fn test_thresholds() {
        let mut thresholds = Thresholds::default();
        assert_eq!(thresholds.get(SimilarityBackend::EditDistance), 0.8);
        assert_eq!(thresholds.get(SimilarityBackend::Cosine), 0.5);
        assert_eq!(thresholds.get(SimilarityBackend::Ngram), 0.5);
        thresholds.set(SimilarityBackend::Dice, 0.7);
        assert_eq!(thresholds.get(SimilarityBackend::Dice), 0.7);
    }
}
