/// Root-mean-square energy of a block of normalized samples.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_of_squares / samples.len() as f64).sqrt() as f32
}

/// Moves `threshold` toward `energy * ratio`, weighted by how much audio the
/// block covered. `damping` is the fraction of the old threshold kept per second.
pub fn adapt_threshold(
    threshold: f32,
    energy: f32,
    block_seconds: f32,
    ratio: f32,
    damping: f32,
) -> f32 {
    let weight = damping.powf(block_seconds);
    let target = energy * ratio;
    threshold * weight + target * (1.0 - weight)
}
