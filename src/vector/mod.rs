//! Dense vector primitives
//!
//! Word vectors are stored as `f32`; similarity and distance results are
//! returned as `f64`. Every pairwise operation checks that both operands have
//! the same length and reports [`SummarizeError::DimensionMismatch`] otherwise.

use std::ops::AddAssign;

use crate::errors::{Result, SummarizeError};

/// A dense embedding vector
pub type Vector = Vec<f32>;

#[inline]
fn check_dims(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(SummarizeError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Element-wise `a + b`
pub fn add(a: &[f32], b: &[f32]) -> Result<Vector> {
    check_dims(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

/// Element-wise `a - b`
pub fn sub(a: &[f32], b: &[f32]) -> Result<Vector> {
    check_dims(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

/// Add `v` into `acc` in place
pub fn add_assign(acc: &mut [f32], v: &[f32]) -> Result<()> {
    check_dims(acc, v)?;
    for (a, x) in acc.iter_mut().zip(v) {
        *a += x;
    }
    Ok(())
}

/// Dot product, accumulated in `f64`
pub fn dot(a: &[f32], b: &[f32]) -> Result<f64> {
    check_dims(a, b)?;
    Ok(dot_unchecked(a, b))
}

#[inline]
fn dot_unchecked(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum()
}

/// Euclidean (L2) norm
pub fn norm(a: &[f32]) -> f64 {
    dot_unchecked(a, a).sqrt()
}

/// Euclidean distance between two vectors
pub fn euclidean(a: &[f32], b: &[f32]) -> Result<f64> {
    check_dims(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        .sqrt())
}

/// Cosine similarity in `[-1, 1]`
///
/// A zero vector has no direction; its similarity to anything is `0.0`.
pub fn cosine(a: &[f32], b: &[f32]) -> Result<f64> {
    check_dims(a, b)?;
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok(dot_unchecked(a, b) / denom)
}

/// Scale `a` to unit length. A zero vector is returned unchanged.
pub fn normalize(a: &[f32]) -> Vector {
    let mut out = a.to_vec();
    normalize_in_place(&mut out);
    out
}

/// Scale `a` to unit length in place. A zero vector is left unchanged.
pub fn normalize_in_place(a: &mut [f32]) {
    let n = norm(a);
    if n > 0.0 {
        for x in a.iter_mut() {
            *x = (f64::from(*x) / n) as f32;
        }
    }
}

/// Element-wise sum across equal-length rows
///
/// Returns an empty vector when `rows` is empty.
pub fn sum_columns<T, R>(rows: &[R]) -> Result<Vec<T>>
where
    T: Copy + Default + AddAssign,
    R: AsRef<[T]>,
{
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let width = first.as_ref().len();
    let mut sums = vec![T::default(); width];
    for row in rows {
        let row = row.as_ref();
        if row.len() != width {
            return Err(SummarizeError::DimensionMismatch {
                left: width,
                right: row.len(),
            });
        }
        for (acc, &x) in sums.iter_mut().zip(row) {
            *acc += x;
        }
    }
    Ok(sums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_and_sub() {
        let a = [1.0, 2.0, 3.0];
        let b = [0.5, 0.5, 0.5];
        assert_eq!(add(&a, &b).unwrap(), vec![1.5, 2.5, 3.5]);
        assert_eq!(sub(&a, &b).unwrap(), vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_mismatched_lengths_fail() {
        let a = [1.0, 2.0];
        let b = [1.0, 2.0, 3.0];
        assert!(matches!(
            add(&a, &b),
            Err(SummarizeError::DimensionMismatch { left: 2, right: 3 })
        ));
        assert!(cosine(&a, &b).is_err());
        assert!(dot(&a, &b).is_err());
        assert!(euclidean(&a, &b).is_err());
        let mut acc = vec![0.0; 2];
        assert!(add_assign(&mut acc, &b).is_err());
    }

    #[test]
    fn test_norm_and_euclidean() {
        assert!((norm(&[3.0, 4.0]) - 5.0).abs() < 1e-9);
        assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]).unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        let zero = vec![0.0f32; 4];
        assert_eq!(normalize(&zero), zero);
    }

    #[test]
    fn test_cosine_with_zero_vector_is_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_sum_columns() {
        let rows = vec![vec![1.0f64, 2.0], vec![3.0, 4.0], vec![0.5, 0.5]];
        assert_eq!(sum_columns(&rows).unwrap(), vec![4.5, 6.5]);

        let empty: Vec<Vec<f32>> = Vec::new();
        assert!(sum_columns(&empty).unwrap().is_empty());

        let ragged = vec![vec![1.0f32, 2.0], vec![1.0]];
        assert!(sum_columns(&ragged).is_err());
    }

    fn non_zero_vector() -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-10.0f32..10.0, 1..64)
            .prop_filter("non-zero", |v| norm(v) > 1e-3)
    }

    proptest! {
        #[test]
        fn prop_cosine_self_is_one(v in non_zero_vector()) {
            let sim = cosine(&v, &v).unwrap();
            prop_assert!((sim - 1.0).abs() < 1e-5);
        }

        #[test]
        fn prop_cosine_negated_is_minus_one(v in non_zero_vector()) {
            let neg: Vec<f32> = v.iter().map(|x| -x).collect();
            let sim = cosine(&v, &neg).unwrap();
            prop_assert!((sim + 1.0).abs() < 1e-5);
        }

        #[test]
        fn prop_normalized_has_unit_norm(v in non_zero_vector()) {
            prop_assert!((norm(&normalize(&v)) - 1.0).abs() < 1e-4);
        }
    }
}
