use crate::error::{Result, VectorStoreError};

/// Cosine of the angle between `a` and `b`.
///
/// Fails on length mismatch, on zero-norm input and on non-finite
/// components instead of returning `NaN` or a sentinel score. Sums are
/// accumulated in `f64` so large or tiny `f32` components neither overflow
/// nor underflow when squared.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(VectorStoreError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    if !a.iter().chain(b.iter()).all(|x| x.is_finite()) {
        return Err(VectorStoreError::NonFiniteVector);
    }

    let (mut dot_product, mut sum_a, mut sum_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot_product += x * y;
        sum_a += x * x;
        sum_b += y * y;
    }

    if sum_a == 0.0 || sum_b == 0.0 {
        return Err(VectorStoreError::DegenerateVector);
    }

    #[allow(clippy::cast_possible_truncation)]
    Ok((dot_product / (sum_a.sqrt() * sum_b.sqrt())) as f32)
}
