use ndarray::Array1;

/// Evenly spaced axis from the minimum up to (excluding) the maximum of `values`.
pub fn create_grid(values: &[f64], spacing: f64) -> Array1<f64> {
    if values.is_empty() || spacing.is_nan() || spacing <= 0.0 {
        return Array1::zeros(0);
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Array1::range(min, max, spacing)
}
