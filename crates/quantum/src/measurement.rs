use rng::ONDRng;

/// Draw `reps` outcomes from `probs` and return the histogram.
///
/// Every draw consumes one step of `rng` under the `MEASURE` context, so a
/// forked generator reproduces the same histogram.
pub fn sample_counts(probs: &[f64], reps: usize, rng: &mut ONDRng) -> Vec<usize> {
    let mut counts = vec![0usize; probs.len()];
    for _ in 0..reps {
        if let Some(idx) = rng.sample_weighted(probs, b"MEASURE") {
            counts[idx] += 1;
        }
    }
    counts
}

/// Empirical frequencies. An empty histogram stays all-zero.
pub fn frequencies(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}
