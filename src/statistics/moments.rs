use itertools::Itertools;

/// Arithmetic mean, or zero for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[expect(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    values.iter().sum::<f64>() / n
}

/// Bessel-corrected standard deviation around the precomputed mean.
///
/// Fewer than two values carry no spread information, hence zero.
#[must_use]
pub fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_of_squares = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>();
    #[expect(clippy::cast_precision_loss)]
    let degrees_of_freedom = (values.len() - 1) as f64;
    (sum_of_squares / degrees_of_freedom).sqrt()
}

/// Median of the values, or zero for an empty slice.
///
/// Even-sized inputs average the two middle values.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = values.iter().copied().sorted_unstable_by(f64::total_cmp).collect_vec();
    let index = sorted.len() / 2;
    if sorted.len() % 2 == 1 { sorted[index] } else { (sorted[index - 1] + sorted[index]) / 2.0 }
}
