//! Similarity and distance kernels.
//!
//! Binary kernels run on u64 words with popcounts. Dense kernels operate on
//! f32 slices; the engine batches them into matrix products, these scalar
//! forms are the reference semantics and the small-input path.

use molscreen_chem::Fingerprint;

/// Tanimoto (Jaccard) similarity between two fingerprints, in [0, 1].
///
/// 1.0 only for identical non-empty vectors, 0.0 for disjoint ones.
/// Two empty fingerprints score 0.0: a degenerate encoding must not look
/// like a perfect match.
///
/// # Panics
///
/// Panics if the fingerprints have different lengths; vectors of one space
/// share a length by construction.
pub fn tanimoto(a: &Fingerprint, b: &Fingerprint) -> f64 {
    assert_eq!(a.nbits(), b.nbits(), "fingerprint length mismatch");

    let mut intersection = 0u32;
    let mut union = 0u32;
    for (wa, wb) in a.words().iter().zip(b.words().iter()) {
        intersection += (wa & wb).count_ones();
        union += (wa | wb).count_ones();
    }
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Dice similarity, in [0, 1]. Weighs shared bits more heavily than
/// Tanimoto.
pub fn dice(a: &Fingerprint, b: &Fingerprint) -> f64 {
    assert_eq!(a.nbits(), b.nbits(), "fingerprint length mismatch");

    let mut intersection = 0u32;
    for (wa, wb) in a.words().iter().zip(b.words().iter()) {
        intersection += (wa & wb).count_ones();
    }
    let total = a.count_ones() + b.count_ones();
    if total == 0 {
        return 0.0;
    }
    2.0 * intersection as f64 / total as f64
}

/// Tversky similarity with asymmetry parameters `alpha` and `beta`.
///
/// `alpha = beta = 1` recovers Tanimoto; `alpha = 1, beta = 0` asks whether
/// `a` is contained in `b`.
pub fn tversky(a: &Fingerprint, b: &Fingerprint, alpha: f64, beta: f64) -> f64 {
    assert_eq!(a.nbits(), b.nbits(), "fingerprint length mismatch");

    let mut intersection = 0u32;
    for (wa, wb) in a.words().iter().zip(b.words().iter()) {
        intersection += (wa & wb).count_ones();
    }
    let only_a = a.count_ones() - intersection;
    let only_b = b.count_ones() - intersection;

    let denominator = intersection as f64 + alpha * only_a as f64 + beta * only_b as f64;
    if denominator == 0.0 {
        return 0.0;
    }
    intersection as f64 / denominator
}

/// Cosine similarity between two dense vectors, in [-1, 1].
///
/// Zero-norm or length-mismatched inputs score 0.0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Euclidean (L2) distance between two dense vectors. Lower is closer.
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use molscreen_chem::{morgan_fingerprint_default, parse_smiles};

    #[test]
    fn tanimoto_self_similarity_is_one() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        let fp = morgan_fingerprint_default(&mol);
        assert!((tanimoto(&fp, &fp) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tanimoto_is_symmetric() {
        let a = morgan_fingerprint_default(&parse_smiles("CCO").unwrap());
        let b = morgan_fingerprint_default(&parse_smiles("CCCO").unwrap());
        assert_eq!(tanimoto(&a, &b), tanimoto(&b, &a));
    }

    #[test]
    fn tanimoto_bounded() {
        let a = morgan_fingerprint_default(&parse_smiles("CCO").unwrap());
        let b = morgan_fingerprint_default(&parse_smiles("c1ccncc1").unwrap());
        let sim = tanimoto(&a, &b);
        assert!((0.0..=1.0).contains(&sim), "sim={sim}");
    }

    #[test]
    fn empty_vs_empty_is_zero() {
        let a = Fingerprint::new(2048);
        let b = Fingerprint::new(2048);
        assert_eq!(tanimoto(&a, &b), 0.0);
        assert_eq!(dice(&a, &b), 0.0);
        assert_eq!(tversky(&a, &b, 0.8, 0.2), 0.0);
    }

    #[test]
    fn disjoint_fingerprints_score_zero() {
        let mut a = Fingerprint::new(128);
        let mut b = Fingerprint::new(128);
        a.set_bit(3);
        b.set_bit(77);
        assert_eq!(tanimoto(&a, &b), 0.0);
    }

    #[test]
    fn dice_weighs_overlap_higher() {
        let a = morgan_fingerprint_default(&parse_smiles("CCO").unwrap());
        let b = morgan_fingerprint_default(&parse_smiles("CCCO").unwrap());
        assert!(dice(&a, &b) >= tanimoto(&a, &b));
    }

    #[test]
    fn tversky_degenerates_to_tanimoto() {
        let a = morgan_fingerprint_default(&parse_smiles("CCO").unwrap());
        let b = morgan_fingerprint_default(&parse_smiles("CCN").unwrap());
        assert!((tversky(&a, &b, 1.0, 1.0) - tanimoto(&a, &b)).abs() < 1e-12);
    }

    #[test]
    fn cosine_identical_is_one() {
        let v = vec![0.5, -1.5, 2.0, 3.0];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite_is_minus_one() {
        let v = vec![1.0, 2.0, 3.0];
        let w: Vec<f32> = v.iter().map(|x| -x).collect();
        assert!((cosine(&v, &w) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_is_zero() {
        assert!((cosine(&[1.0, 0.0], &[0.0, 1.0])).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_norm_is_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn euclidean_pythagorean() {
        assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-6);
    }
}
