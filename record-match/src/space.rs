//! Vector space shared by the corpus and the queries of one matching run.
use std::time::Instant;

use hashbrown::HashMap;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::errors::{MatchError, Result};
use crate::feature::{FeatureConfig, FeatureExtractor};
use crate::record::Record;
use crate::tfidf::{Idf, IdfWeights, TfWeights};

/// Representation produced for token-based backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorMode {
    /// Occurrence counts of character bigrams.
    CharBigramCount,
    /// Presence of words.
    BinaryTerm,
    /// TF-IDF weighted words, L2-normalized.
    TfIdf,
}

impl VectorMode {
    /// Shingling used to tokenize texts in this mode.
    pub const fn feature_config(self) -> FeatureConfig {
        match self {
            Self::CharBigramCount => FeatureConfig::char_bigram(),
            Self::BinaryTerm | Self::TfIdf => FeatureConfig::word_unigram(),
        }
    }
}

/// Sparse vector of non-negative weights, sorted by dimension.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Creates a vector from `(dimension, weight)` entries.
    ///
    /// Entries must be strictly increasing in dimension, below `dim`, and non-negative.
    pub fn new(dim: usize, entries: Vec<(usize, f64)>) -> Result<Self> {
        for pair in entries.windows(2) {
            if pair[0].0 >= pair[1].0 {
                return Err(MatchError::input(
                    "Sparse entries must be strictly increasing in dimension.",
                ));
            }
        }
        if let Some(&(i, _)) = entries.last() {
            if i >= dim {
                return Err(MatchError::dimension(dim, i + 1, "sparse"));
            }
        }
        if entries.iter().any(|&(_, w)| !(w >= 0.)) {
            return Err(MatchError::input("Sparse weights must be non-negative."));
        }
        Ok(Self { dim, entries })
    }

    /// Creates the all-zero vector.
    pub const fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: vec![],
        }
    }

    /// Number of dimensions.
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Checks if every weight is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, w)| w == 0.)
    }

    /// Stored `(dimension, weight)` entries.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Sum of weights.
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w).sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Inner product.
    pub fn dot(&self, other: &Self) -> f64 {
        let mut acc = 0.;
        self.for_each_shared(other, |x, y| acc += x * y);
        acc
    }

    /// Sum of element-wise minima; dimensions missing on one side contribute nothing.
    pub fn min_sum(&self, other: &Self) -> f64 {
        let mut acc = 0.;
        self.for_each_shared(other, |x, y| acc += x.min(y));
        acc
    }

    fn for_each_shared<F>(&self, other: &Self, mut f: F)
    where
        F: FnMut(f64, f64),
    {
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, x) = self.entries[i];
            let (b, y) = other.entries[j];
            if a < b {
                i += 1;
            } else if b < a {
                j += 1;
            } else {
                f(x, y);
                i += 1;
                j += 1;
            }
        }
    }

    fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm > 0. {
            self.entries.iter_mut().for_each(|(_, w)| *w /= norm);
        }
    }
}

/// Token-to-dimension mapping.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    terms: Vec<String>,
}

impl Vocabulary {
    /// Creates a vocabulary assigning dimensions in first-seen order.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::default();
        for term in terms {
            vocab.insert(term.as_ref());
        }
        vocab
    }

    fn insert(&mut self, term: &str) -> usize {
        if let Some(&i) = self.index.get(term) {
            return i;
        }
        let i = self.terms.len();
        self.index.insert(term.to_string(), i);
        self.terms.push(term.to_string());
        i
    }

    /// Dimension of `term`.
    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Checks if no term is registered.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Builder of [`VectorSpace`].
#[derive(Clone, Debug)]
pub struct VectorSpaceBuilder {
    mode: VectorMode,
    tf_weight: TfWeights,
    idf_weight: IdfWeights,
}

impl VectorSpaceBuilder {
    /// Creates a builder with standard TF and smooth IDF weighting.
    pub fn new(mode: VectorMode) -> Self {
        Self {
            mode,
            tf_weight: TfWeights::default(),
            idf_weight: IdfWeights::default(),
        }
    }

    /// Sets the TF weighting, used only in [`VectorMode::TfIdf`].
    pub const fn tf(mut self, tf_weight: TfWeights) -> Self {
        self.tf_weight = tf_weight;
        self
    }

    /// Sets the IDF weighting, used only in [`VectorMode::TfIdf`].
    pub const fn idf(mut self, idf_weight: IdfWeights) -> Self {
        self.idf_weight = idf_weight;
        self
    }

    /// Fits the vocabulary on the union of both sides and vectorizes them.
    ///
    /// # Arguments
    ///
    /// * `corpus` - Normalized corpus texts.
    /// * `queries` - Normalized query texts.
    pub fn build<S>(&self, corpus: &[S], queries: &[S]) -> Result<VectorSpace>
    where
        S: AsRef<str> + Sync,
    {
        let start = Instant::now();

        let mut vocabulary = Vocabulary::default();
        let mut extractor = FeatureExtractor::new(self.mode.feature_config());
        let mut docs = Vec::with_capacity(corpus.len() + queries.len());
        for text in corpus.iter().chain(queries.iter()) {
            let text = extractor.prepare(text.as_ref());
            let mut feature = vec![];
            extractor.extract(&text, &mut feature);
            let terms: Vec<usize> = feature.iter().map(|f| vocabulary.insert(f)).collect();
            docs.push(terms);
        }
        debug!(
            "Fitted {} terms on {} documents",
            vocabulary.len(),
            docs.len()
        );

        let idf = if self.mode == VectorMode::TfIdf {
            let mut idf = Idf::new();
            docs.iter().for_each(|terms| idf.add(terms));
            Some(idf)
        } else {
            None
        };

        let dim = vocabulary.len();
        let mut vectors: Vec<SparseVector> = docs
            .par_iter()
            .map(|terms| self.vectorize(dim, terms, idf.as_ref()))
            .collect();
        let query_vectors = vectors.split_off(corpus.len());

        let space = VectorSpace::from_parts(self.mode, vocabulary, vectors, query_vectors)?;
        info!(
            "Built {:?} vectors over {} terms in {} sec",
            self.mode,
            space.vocabulary().len(),
            start.elapsed().as_secs_f64()
        );
        Ok(space)
    }

    fn vectorize(&self, dim: usize, terms: &[usize], idf: Option<&Idf<usize>>) -> SparseVector {
        let mut counter = HashMap::<usize, usize>::new();
        for &term in terms {
            *counter.entry(term).or_insert(0) += 1;
        }
        let mut entries: Vec<(usize, f64)> = counter
            .into_iter()
            .map(|(term, count)| {
                let weight = match self.mode {
                    VectorMode::CharBigramCount => count as f64,
                    VectorMode::BinaryTerm => 1.,
                    VectorMode::TfIdf => {
                        let tf = self.tf_weight.weight(count, terms.len());
                        idf.map_or(tf, |idf| tf * self.idf_weight.weight(idf, term))
                    }
                };
                (term, weight)
            })
            .collect();
        entries.sort_unstable_by_key(|&(term, _)| term);

        let mut vector = SparseVector { dim, entries };
        if self.mode == VectorMode::TfIdf {
            vector.l2_normalize();
        }
        vector
    }
}

/// Vocabulary and aligned vectors of the corpus and the queries.
///
/// The vocabulary is fixed at construction; there is no way to extend it afterwards.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    mode: VectorMode,
    vocabulary: Vocabulary,
    corpus: Vec<SparseVector>,
    queries: Vec<SparseVector>,
}

impl VectorSpace {
    /// Builds a space with default weighting. See [`VectorSpaceBuilder::build`].
    pub fn build<S>(corpus: &[S], queries: &[S], mode: VectorMode) -> Result<Self>
    where
        S: AsRef<str> + Sync,
    {
        VectorSpaceBuilder::new(mode).build(corpus, queries)
    }

    /// Builds a space from the normalized values of records.
    pub fn from_records(corpus: &[Record], queries: &[Record], mode: VectorMode) -> Result<Self> {
        let corpus: Vec<&str> = corpus.iter().map(Record::normalized).collect();
        let queries: Vec<&str> = queries.iter().map(Record::normalized).collect();
        Self::build(&corpus, &queries, mode)
    }

    /// Assembles a space from precomputed parts, checking every dimensionality.
    pub fn from_parts(
        mode: VectorMode,
        vocabulary: Vocabulary,
        corpus: Vec<SparseVector>,
        queries: Vec<SparseVector>,
    ) -> Result<Self> {
        let space = Self {
            mode,
            vocabulary,
            corpus,
            queries,
        };
        space.validate()?;
        Ok(space)
    }

    fn validate(&self) -> Result<()> {
        let dim = self.vocabulary.len();
        for (side, vectors) in [("corpus", &self.corpus), ("query", &self.queries)] {
            if let Some(v) = vectors.iter().find(|v| v.dim() != dim) {
                return Err(MatchError::dimension(dim, v.dim(), side));
            }
        }
        Ok(())
    }

    /// Mode the vectors were built in.
    pub const fn mode(&self) -> VectorMode {
        self.mode
    }

    /// Shared vocabulary.
    pub const fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Vectors aligned to the corpus order.
    pub fn corpus_vectors(&self) -> &[SparseVector] {
        &self.corpus
    }

    /// Vectors aligned to the query order.
    pub fn query_vectors(&self) -> &[SparseVector] {
        &self.queries
    }

    /// Vector of the `i`-th query.
    pub fn query_vector(&self, i: usize) -> Option<&SparseVector> {
        self.queries.get(i)
    }
}
