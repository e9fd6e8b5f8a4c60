//! Cosine similarity over TF-IDF vectors.
use crate::space::SparseVector;

/// Computes `a·b / (|a| |b|)`, clamped to `[0,1]`.
///
/// Returns 0 when either side is all zero.
pub fn similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let norms = a.norm() * b.norm();
    if norms <= 0. {
        return 0.;
    }
    (a.dot(b) / norms).clamp(0., 1.)
}
