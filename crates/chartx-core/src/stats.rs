//! Descriptive statistics used by selection evaluation.

use crate::CoreError;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with divisor `n`, `None` for an empty slice.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let center = mean(values)?;
    let variance = values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

/// Pearson correlation coefficient of two equally long sequences.
///
/// Returns `0.0` when the sequences are empty or either has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64, CoreError> {
    if xs.len() != ys.len() {
        return Err(CoreError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    let (Some(mean_x), Some(mean_y)) = (mean(xs), mean(ys)) else {
        return Ok(0.0);
    };

    let mut covariance = 0.0;
    let mut spread_x = 0.0;
    let mut spread_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        spread_x += dx * dx;
        spread_y += dy * dy;
    }

    let denominator = (spread_x * spread_y).sqrt();
    if denominator == 0.0 {
        return Ok(0.0);
    }
    Ok(covariance / denominator)
}
