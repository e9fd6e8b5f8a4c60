//! Read-only state shared by every task of one batch.
use crate::backend::SimilarityBackend;
use crate::errors::{MatchError, Result};
use crate::record::Record;
use crate::space::VectorSpace;

/// Corpus, queries, and the optional vector space of one matching run.
///
/// The context only borrows its parts, so it is `Sync` and can be handed by reference
/// to every worker. Several contexts can coexist without sharing anything.
#[derive(Clone, Copy, Debug)]
pub struct MatchContext<'a> {
    corpus: &'a [Record],
    queries: &'a [Record],
    space: Option<&'a VectorSpace>,
}

impl<'a> MatchContext<'a> {
    /// Creates an instance.
    ///
    /// # Arguments
    ///
    /// * `corpus` - Records to be searched (must not be empty).
    /// * `queries` - Records to be matched.
    /// * `space` - Vectors aligned to `corpus` and `queries`, required by vector backends.
    pub fn new(
        corpus: &'a [Record],
        queries: &'a [Record],
        space: Option<&'a VectorSpace>,
    ) -> Result<Self> {
        if corpus.is_empty() {
            return Err(MatchError::input("Corpus must not be empty."));
        }
        if let Some(space) = space {
            if space.corpus_vectors().len() != corpus.len()
                || space.query_vectors().len() != queries.len()
            {
                return Err(MatchError::input(
                    "The vector space is not aligned to the corpus and the queries.",
                ));
            }
        }
        Ok(Self {
            corpus,
            queries,
            space,
        })
    }

    /// Checks that `backend` can run on this context.
    pub fn ensure_supports(&self, backend: SimilarityBackend) -> Result<()> {
        if backend.vector_mode().is_some() {
            self.space_for(backend)?;
        }
        Ok(())
    }

    pub(crate) fn space_for(&self, backend: SimilarityBackend) -> Result<&'a VectorSpace> {
        let mode = backend.vector_mode();
        match self.space {
            Some(space) if Some(space.mode()) == mode => Ok(space),
            Some(space) => Err(MatchError::algorithm(format!(
                "{backend} needs {mode:?} vectors, but the space holds {:?} vectors.",
                space.mode()
            ))),
            None => Err(MatchError::algorithm(format!(
                "{backend} needs a vector space."
            ))),
        }
    }

    /// Records to be searched.
    pub const fn corpus(&self) -> &'a [Record] {
        self.corpus
    }

    /// Records to be matched.
    pub const fn queries(&self) -> &'a [Record] {
        self.queries
    }

    /// The `i`-th query.
    pub fn query(&self, i: usize) -> Option<&'a Record> {
        self.queries.get(i)
    }

    /// Number of queries.
    pub fn num_queries(&self) -> usize {
        self.queries.len()
    }
}
