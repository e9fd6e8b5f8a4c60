//! Dice coefficient over character-bigram count vectors.
use crate::space::SparseVector;

/// Computes `2 * sum(min(a_i, b_i)) / (sum(a) + sum(b))`.
///
/// Returns 0 when both vectors are all zero.
pub fn coefficient(a: &SparseVector, b: &SparseVector) -> f64 {
    let denominator = a.sum() + b.sum();
    if denominator <= 0. {
        return 0.;
    }
    (2. * a.min_sum(b) / denominator).clamp(0., 1.)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient() {
        let x = SparseVector::new(4, vec![(0, 1.), (1, 1.), (2, 1.)]).unwrap();
        let y = SparseVector::new(4, vec![(1, 1.), (2, 1.), (3, 1.)]).unwrap();
        assert!((coefficient(&x, &y) - 4. / 6.).abs() < 1e-12);
        assert_eq!(coefficient(&x, &x), 1.);
    }

    #[test]
    fn test_repeated_bigrams() {
        // "aaa" against "aa": counts 2 and 1 share only one bigram.
        let x = SparseVector::new(1, vec![(0, 2.)]).unwrap();
        let y = SparseVector::new(1, vec![(0, 1.)]).unwrap();
        assert!((coefficient(&x, &y) - 2. / 3.).abs() < 1e-12);
        assert_eq!(coefficient(&x, &x), 1.);
    }

    #[test]
    fn test_zero_vectors() {
        let zero = SparseVector::zeros(3);
        let x = SparseVector::new(3, vec![(1, 1.)]).unwrap();
        assert_eq!(coefficient(&zero, &zero), 0.);
        assert_eq!(coefficient(&zero, &x), 0.);
    }
}
