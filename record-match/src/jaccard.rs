//! Jaccard similarity over term vectors, binary or counted.
use crate::space::SparseVector;

/// Computes `|A ∩ B| / |A ∪ B|`.
///
/// Weights are read as multiset counts, so binary vectors give the set similarity.
/// Returns 0 when the union is empty.
///
/// # Examples
///
/// ```
/// use record_match::jaccard::similarity;
/// use record_match::space::SparseVector;
///
/// let x = SparseVector::new(5, vec![(1, 1.), (2, 1.), (4, 1.)]).unwrap();
/// let y = SparseVector::new(5, vec![(1, 1.), (2, 1.), (3, 1.)]).unwrap();
/// assert_eq!(similarity(&x, &y), 0.5);
/// ```
pub fn similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let intersection = a.min_sum(b);
    let union = a.sum() + b.sum() - intersection;
    if union <= 0. {
        return 0.;
    }
    (intersection / union).clamp(0., 1.)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity() {
        let x = SparseVector::new(6, vec![(0, 1.), (1, 1.), (2, 1.)]).unwrap();
        let y = SparseVector::new(6, vec![(2, 1.), (3, 1.)]).unwrap();
        assert_eq!(similarity(&x, &y), 0.25);
        assert_eq!(similarity(&x, &x), 1.);
    }

    #[test]
    fn test_counts() {
        // "aaa" has the bigram "aa" twice, "aa" once.
        let x = SparseVector::new(1, vec![(0, 2.)]).unwrap();
        let y = SparseVector::new(1, vec![(0, 1.)]).unwrap();
        assert_eq!(similarity(&x, &y), 0.5);
    }

    #[test]
    fn test_disjoint() {
        let x = SparseVector::new(4, vec![(0, 1.)]).unwrap();
        let y = SparseVector::new(4, vec![(3, 1.)]).unwrap();
        assert_eq!(similarity(&x, &y), 0.);
    }

    #[test]
    fn test_empty_union() {
        let zero = SparseVector::zeros(2);
        assert_eq!(similarity(&zero, &zero), 0.);
    }
}
