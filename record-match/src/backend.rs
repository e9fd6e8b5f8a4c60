//! Interchangeable similarity backends.
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::context::MatchContext;
use crate::errors::{MatchError, Result};
use crate::space::{SparseVector, VectorMode};
use crate::{cosine, dice, jaccard, levenshtein, substring};

/// Score of a query against one corpus entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Score {
    /// Similarity in `[0,1]`.
    Similarity(f64),
    /// Outcome of a containment test.
    Contained(bool),
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Similarity(s) => write!(f, "{s}"),
            Self::Contained(b) => write!(f, "{b}"),
        }
    }
}

/// Similarity strategy used to search the corpus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum SimilarityBackend {
    /// Normalized Levenshtein similarity on normalized strings.
    #[serde(rename = "levenshtein", alias = "edit-distance")]
    EditDistance,
    /// Dice coefficient on character-bigram counts.
    #[serde(rename = "dice")]
    Dice,
    /// Jaccard similarity on binary word vectors.
    #[serde(rename = "jaccard")]
    Jaccard,
    /// Jaccard similarity on character-bigram counts.
    #[serde(rename = "ngram")]
    Ngram,
    /// Cosine similarity on TF-IDF vectors.
    #[serde(rename = "tfidf", alias = "cosine")]
    Cosine,
    /// Bidirectional case-insensitive containment.
    #[serde(rename = "substring", alias = "regex")]
    Substring,
}

impl FromStr for SimilarityBackend {
    type Err = MatchError;
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "levenshtein" | "edit-distance" => Ok(Self::EditDistance),
            "dice" => Ok(Self::Dice),
            "jaccard" => Ok(Self::Jaccard),
            "ngram" => Ok(Self::Ngram),
            "tfidf" | "cosine" => Ok(Self::Cosine),
            "substring" | "regex" => Ok(Self::Substring),
            _ => Err(MatchError::algorithm(format!(
                "Unsupported algorithm {name:?}; expected one of levenshtein, dice, jaccard, ngram, tfidf, substring."
            ))),
        }
    }
}

impl fmt::Display for SimilarityBackend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SimilarityBackend {
    /// Every backend.
    pub const ALL: [Self; 6] = [
        Self::EditDistance,
        Self::Dice,
        Self::Jaccard,
        Self::Ngram,
        Self::Cosine,
        Self::Substring,
    ];

    /// Configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::EditDistance => "levenshtein",
            Self::Dice => "dice",
            Self::Jaccard => "jaccard",
            Self::Ngram => "ngram",
            Self::Cosine => "tfidf",
            Self::Substring => "substring",
        }
    }

    /// Vector representation the backend compares, if any.
    pub const fn vector_mode(self) -> Option<VectorMode> {
        match self {
            Self::Dice | Self::Ngram => Some(VectorMode::CharBigramCount),
            Self::Jaccard => Some(VectorMode::BinaryTerm),
            Self::Cosine => Some(VectorMode::TfIdf),
            Self::EditDistance | Self::Substring => None,
        }
    }

    /// Checks if the backend yields [`Score::Contained`].
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::Substring)
    }

    /// Scores the `query`-th query against every corpus entry, in corpus order.
    pub fn scores(self, ctx: &MatchContext, query: usize) -> Result<Vec<Score>> {
        let record = ctx
            .query(query)
            .ok_or_else(|| MatchError::task(query, "Query index out of range."))?;
        let scores = match self {
            Self::EditDistance => ctx
                .corpus()
                .iter()
                .map(|c| {
                    let s = levenshtein::similarity(record.normalized().trim(), c.normalized());
                    Score::Similarity(s)
                })
                .collect(),
            Self::Dice => self.vector_scores(ctx, query, dice::coefficient)?,
            Self::Jaccard | Self::Ngram => self.vector_scores(ctx, query, jaccard::similarity)?,
            Self::Cosine => self.vector_scores(ctx, query, cosine::similarity)?,
            Self::Substring => ctx
                .corpus()
                .iter()
                .map(|c| {
                    let hit = substring::contains_either(record.normalized(), c.normalized());
                    Score::Contained(hit)
                })
                .collect(),
        };
        Ok(scores)
    }

    fn vector_scores<F>(self, ctx: &MatchContext, query: usize, measure: F) -> Result<Vec<Score>>
    where
        F: Fn(&SparseVector, &SparseVector) -> f64,
    {
        let space = ctx.space_for(self)?;
        let q = space
            .query_vector(query)
            .ok_or_else(|| MatchError::task(query, "No vector for the query."))?;
        Ok(space
            .corpus_vectors()
            .iter()
            .map(|c| Score::Similarity(measure(q, c)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::space::VectorSpace;

    #[test]
    fn test_parse() {
        assert_eq!(
            "levenshtein".parse::<SimilarityBackend>().unwrap(),
            SimilarityBackend::EditDistance
        );
        assert_eq!(
            "cosine".parse::<SimilarityBackend>().unwrap(),
            SimilarityBackend::Cosine
        );
        assert_eq!(
            "regex".parse::<SimilarityBackend>().unwrap(),
            SimilarityBackend::Substring
        );
        assert!(matches!(
            "soundex".parse::<SimilarityBackend>(),
            Err(MatchError::Algorithm(_))
        ));
    }

    #[test]
    fn test_name_round_trip() {
        for backend in SimilarityBackend::ALL {
            assert_eq!(backend.name().parse::<SimilarityBackend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_modes() {
        assert_eq!(SimilarityBackend::EditDistance.vector_mode(), None);
        assert_eq!(
            SimilarityBackend::Dice.vector_mode(),
            Some(VectorMode::CharBigramCount)
        );
        assert_eq!(
            SimilarityBackend::Ngram.vector_mode(),
            Some(VectorMode::CharBigramCount)
        );
        assert!(SimilarityBackend::Substring.is_boolean());
        assert!(!SimilarityBackend::Cosine.is_boolean());
    }

    #[test]
    fn test_edit_distance_trims_query() {
        let corpus = vec![Record::new("Goethestr. 5", "goethestr 5")];
        let queries = vec![Record::new("Goethestr. 5 -", "goethestr 5 ")];
        let ctx = MatchContext::new(&corpus, &queries, None).unwrap();
        let scores = SimilarityBackend::EditDistance.scores(&ctx, 0).unwrap();
        assert_eq!(scores, vec![Score::Similarity(1.)]);
    }

    #[test]
    fn test_ngram_counts_bigrams() {
        let corpus = vec![Record::new("aaa", "aaa"), Record::new("ab", "ab")];
        let queries = vec![Record::new("aa", "aa")];
        let space = VectorSpace::from_records(&corpus, &queries, VectorMode::CharBigramCount)
            .unwrap();
        let ctx = MatchContext::new(&corpus, &queries, Some(&space)).unwrap();
        let scores = SimilarityBackend::Ngram.scores(&ctx, 0).unwrap();
        // "aa" once against "aa" twice, and nothing shared with "ab".
        assert_eq!(scores, vec![Score::Similarity(0.5), Score::Similarity(0.)]);
    }

    #[test]
    fn test_score_display() {
        assert_eq!(Score::Similarity(0.5).to_string(), "0.5");
        assert_eq!(Score::Contained(true).to_string(), "true");
    }
}
