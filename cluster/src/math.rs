//! Vector helpers shared by the clustering pass.
//!
//! Components are stored as `f32`; sums are accumulated in `f64` so that
//! results do not depend on vector length as much as plain `f32` folds do.

/// Returns a unit-length copy of `v`.
///
/// A zero-norm vector normalizes to the all-zero vector of the same length,
/// so its cosine similarity against anything is 0.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let mut sum: f64 = 0.0;
    for &x in v {
        sum += (x as f64) * (x as f64);
    }
    let norm = sum.sqrt();
    if norm == 0.0 {
        return vec![0.0; v.len()];
    }
    v.iter().map(|&x| ((x as f64) / norm) as f32).collect()
}

/// Cosine similarity between two vectors of any length.
/// Returns 0 when either vector has zero norm.
pub fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    let mut dot: f64 = 0.0;
    let mut na: f64 = 0.0;
    let mut nb: f64 = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let denom = na.sqrt() * nb.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (dot / denom) as f32
}

/// Component-wise arithmetic mean. All vectors must have length `dim`.
pub(crate) fn mean<'a, I>(vectors: I, dim: usize) -> Vec<f32>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut totals = vec![0.0f64; dim];
    let mut n = 0usize;
    for v in vectors {
        for (t, &x) in totals.iter_mut().zip(v) {
            *t += x as f64;
        }
        n += 1;
    }
    if n == 0 {
        return Vec::new();
    }
    let n = n as f64;
    totals.into_iter().map(|t| (t / n) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l2_normalize_unit() {
        let v = l2_normalize(&[3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        let norm: f64 = v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6, "should be unit length, got {norm}");
    }

    #[test]
    fn l2_normalize_zero() {
        assert_eq!(l2_normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn l2_normalize_empty() {
        assert!(l2_normalize(&[]).is_empty());
    }

    #[test]
    fn cosine_sim_identical() {
        let sim = cosine_sim(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-6, "same direction, got {sim}");
    }

    #[test]
    fn cosine_sim_orthogonal() {
        let sim = cosine_sim(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(sim.abs() < 1e-6, "expected no overlap, got {sim}");
    }

    #[test]
    fn cosine_sim_opposite() {
        let sim = cosine_sim(&[1.0, 0.0], &[-2.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-6, "reversed direction, got {sim}");
    }

    #[test]
    fn cosine_sim_zero_vector() {
        assert_eq!(cosine_sim(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn mean_of_raw_vectors() {
        let a = [1.0f32, 0.0];
        let b = [3.0f32, 2.0];
        let m = mean([&a[..], &b[..]], 2);
        assert_eq!(m, vec![2.0, 1.0]);
    }

    #[test]
    fn mean_of_nothing() {
        assert!(mean(std::iter::empty::<&[f32]>(), 3).is_empty());
    }
}
