//! Best-match search of noisy records against a canonical corpus.
//!
//! Every query is compared with every corpus record by one of several similarity
//! backends, the best candidate is kept, and its score is turned into a binary decision.
#![deny(missing_docs)]

pub mod backend;
pub mod config;
pub mod context;
pub mod cosine;
pub mod dataset;
pub mod dice;
pub mod dispatch;
pub mod errors;
pub mod evaluate;
pub mod export;
pub mod feature;
pub mod jaccard;
pub mod levenshtein;
pub mod matcher;
pub mod normalize;
pub mod record;
pub mod search;
pub mod space;
pub mod substring;
pub mod tfidf;
pub mod threshold;

pub use backend::{Score, SimilarityBackend};
pub use config::MatchConfig;
pub use dispatch::{BatchOutcome, CancelToken};
pub use matcher::Matcher;
pub use normalize::Normalizer;
pub use record::Record;
pub use search::MatchResult;
