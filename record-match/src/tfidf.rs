//! Weighting schemes of TF-IDF.
use std::hash::Hash;
use std::str::FromStr;

use hashbrown::{HashMap, HashSet};
use serde::Deserialize;

/// Weighting variant of term frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TfWeights {
    /// The boolean frequency.
    Binary,
    /// The number of occurrences divided by the document length.
    Standard,
    /// The logarithmically scaled frequency.
    Sublinear,
}

impl Default for TfWeights {
    fn default() -> Self {
        Self::Standard
    }
}

impl FromStr for TfWeights {
    type Err = &'static str;
    fn from_str(w: &str) -> Result<Self, Self::Err> {
        match w {
            "binary" => Ok(Self::Binary),
            "standard" => Ok(Self::Standard),
            "sublinear" => Ok(Self::Sublinear),
            _ => Err("Could not parse a tf-weighting value"),
        }
    }
}

impl TfWeights {
    /// Weight of a term occurring `count` times in a document of `total` terms.
    pub fn weight(self, count: usize, total: usize) -> f64 {
        if count == 0 {
            return 0.;
        }
        match self {
            Self::Binary => 1.,
            Self::Standard => count as f64 / total as f64,
            Self::Sublinear => (count as f64).ln() + 1.,
        }
    }
}

/// Weighting variant of inverse document frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfWeights {
    /// Always 1.
    Unary,
    /// The standard inverse document frequency.
    Standard,
    /// The smoothed inverse document frequency.
    Smooth,
}

impl Default for IdfWeights {
    fn default() -> Self {
        Self::Smooth
    }
}

impl FromStr for IdfWeights {
    type Err = &'static str;
    fn from_str(w: &str) -> Result<Self, Self::Err> {
        match w {
            "unary" => Ok(Self::Unary),
            "standard" => Ok(Self::Standard),
            "smooth" => Ok(Self::Smooth),
            _ => Err("Could not parse a idf-weighting value"),
        }
    }
}

impl IdfWeights {
    /// Weight of `term` under the given document frequencies.
    pub fn weight<T>(self, idf: &Idf<T>, term: T) -> f64
    where
        T: Hash + Eq + Copy,
    {
        match self {
            Self::Unary => 1.,
            Self::Standard => idf.idf(term),
            Self::Smooth => idf.idf_smooth(term),
        }
    }
}

/// Document frequencies of terms.
pub struct Idf<T> {
    counter: HashMap<T, usize>,
    dedup: HashSet<T>,
    num_docs: usize,
}

impl<T> Default for Idf<T> {
    fn default() -> Self {
        Self {
            counter: HashMap::new(),
            dedup: HashSet::new(),
            num_docs: 0,
        }
    }
}

impl<T> Idf<T>
where
    T: Hash + Eq + Copy,
{
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the terms of one document.
    pub fn add(&mut self, terms: &[T]) {
        self.dedup.clear();
        for &term in terms {
            if self.dedup.insert(term) {
                *self.counter.entry(term).or_insert(0) += 1;
            }
        }
        self.num_docs += 1;
    }

    /// Number of added documents.
    pub const fn num_docs(&self) -> usize {
        self.num_docs
    }

    /// Number of documents containing `term`.
    pub fn doc_freq(&self, term: T) -> usize {
        self.counter.get(&term).copied().unwrap_or(0)
    }

    /// `ln(n / df) + 1`. An unseen term is treated as seen once.
    pub fn idf(&self, term: T) -> f64 {
        let n = self.num_docs.max(1) as f64;
        let m = self.doc_freq(term).max(1) as f64;
        (n / m).ln() + 1.
    }

    /// `ln((n + 1) / (df + 1)) + 1`, as if one extra document contained every term.
    pub fn idf_smooth(&self, term: T) -> f64 {
        let n = (self.num_docs + 1) as f64;
        let m = (self.doc_freq(term) + 1) as f64;
        (n / m).ln() + 1.
    }
}
