//! Pure numeric helpers shared by the scoring engines.

/// Weighted mean of `(value, weight)` pairs.
///
/// Returns 0.0 when the total weight is zero so callers never divide by
/// zero; an outcome whose every contribution is missing scores 0 through
/// this path.
pub fn weighted_mean(pairs: &[(f64, f64)]) -> f64 {
    let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = pairs.iter().map(|(v, w)| v * w).sum();
    weighted_sum / total_weight
}

/// Weighted population variance of `(value, weight)` pairs.
///
/// Returns 0.0 for fewer than two pairs or zero total weight.
pub fn weighted_variance(pairs: &[(f64, f64)]) -> f64 {
    let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
    if pairs.len() < 2 || total_weight <= 0.0 {
        return 0.0;
    }
    let mean = weighted_mean(pairs);
    let sum_sq: f64 = pairs.iter().map(|(v, w)| w * (v - mean).powi(2)).sum();
    sum_sq / total_weight
}

/// Mean of a plain slice; 0.0 when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentile rank of `value` within `population`, on a 0-100 scale.
///
/// Uses the midpoint convention for ties: rank = (below + ties/2) / n.
/// Returns `None` for an empty population; a rank among nobody is not 50.
pub fn percentile_rank(value: f64, population: &[f64]) -> Option<f64> {
    if population.is_empty() {
        return None;
    }
    let below = population.iter().filter(|&&p| p < value).count() as f64;
    let ties = population.iter().filter(|&&p| p == value).count() as f64;
    Some((below + ties * 0.5) / population.len() as f64 * 100.0)
}
