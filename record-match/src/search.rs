//! Exhaustive best-match search of a single query.
use crate::backend::{Score, SimilarityBackend};
use crate::context::MatchContext;
use crate::errors::{MatchError, Result};
use crate::record::Record;
use crate::threshold;

/// Outcome of matching one query.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    query_index: usize,
    query: Record,
    best_index: Option<usize>,
    best_found: Option<Record>,
    score: Option<Score>,
    decision: Option<bool>,
}

impl MatchResult {
    fn absent(query_index: usize, query: Record) -> Self {
        Self {
            query_index,
            query,
            best_index: None,
            best_found: None,
            score: None,
            decision: None,
        }
    }

    /// Sets the decision from `threshold`. See [`threshold::decide`].
    #[must_use]
    pub fn classify(self, threshold: f64) -> Self {
        let decision = threshold::decide(self.score, threshold);
        Self { decision, ..self }
    }

    /// Position of the query in the query set.
    pub const fn query_index(&self) -> usize {
        self.query_index
    }

    /// Matched query.
    pub const fn query(&self) -> &Record {
        &self.query
    }

    /// Position of the best match in the corpus.
    pub const fn best_index(&self) -> Option<usize> {
        self.best_index
    }

    /// Best corpus record, absent for a blank query or when nothing qualifies.
    pub const fn best_found(&self) -> Option<&Record> {
        self.best_found.as_ref()
    }

    /// Score of the best match, absent only for a blank query.
    pub const fn score(&self) -> Option<Score> {
        self.score
    }

    /// Binary decision, absent until classified or when the score is absent.
    pub const fn decision(&self) -> Option<bool> {
        self.decision
    }
}

/// Picks the maximal similarity, or the first containment hit.
///
/// Ties are resolved by the smallest index. Returns `None` for empty input and when no
/// containment test succeeds.
pub fn select_best(scores: &[Score]) -> Option<(usize, Score)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match score {
            Score::Contained(true) => return Some((i, score)),
            Score::Contained(false) => {}
            Score::Similarity(s) => {
                if best.map_or(true, |(_, b)| s > b) {
                    best = Some((i, s));
                }
            }
        }
    }
    best.map(|(i, s)| (i, Score::Similarity(s)))
}

/// Searches the corpus for the best match of the `query`-th query.
///
/// A blank query yields an absent result without scanning the corpus.
pub fn best_match(
    backend: SimilarityBackend,
    ctx: &MatchContext,
    query: usize,
) -> Result<MatchResult> {
    let record = ctx
        .query(query)
        .ok_or_else(|| MatchError::task(query, "Query index out of range."))?;
    if record.is_blank() {
        return Ok(MatchResult::absent(query, record.clone()));
    }

    let scores = backend.scores(ctx, query)?;
    let mut result = MatchResult::absent(query, record.clone());
    match select_best(&scores) {
        Some((i, score)) => {
            result.best_index = Some(i);
            result.best_found = ctx.corpus().get(i).cloned();
            result.score = Some(score);
        }
        // Only a boolean backend can come up empty here, as the corpus is never empty.
        None => result.score = Some(Score::Contained(false)),
    }
    Ok(result)
}
