//! Small statistics helpers shared by the metric calculators. All of them
//! return `None` on empty input rather than producing NaN.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Root mean square.
pub fn rms(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some((values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().min_by(f64::total_cmp)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().max_by(f64::total_cmp)
}

/// `max - min`, or `None` on empty input.
pub fn range(values: &[f64]) -> Option<f64> {
    Some(max(values)? - min(values)?)
}

/// Pearson correlation coefficient over the common prefix of `a` and `b`.
/// `None` when fewer than two samples overlap or either side has zero
/// variance.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let a = &a[..n];
    let b = &b[..n];
    let mean_a = mean(a)?;
    let mean_b = mean(b)?;

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    Some(covariance / (var_a.sqrt() * var_b.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn basic_moments() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(mean(&values).unwrap(), 2.5);
        assert_relative_eq!(std_dev(&values).unwrap(), 1.118_033_988_75, epsilon = 1e-9);
        assert_relative_eq!(rms(&values).unwrap(), 2.738_612_787_5, epsilon = 1e-9);
        assert_eq!(min(&values), Some(1.0));
        assert_eq!(max(&values), Some(4.0));
        assert_eq!(range(&values), Some(3.0));
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(std_dev(&[]), None);
        assert_eq!(rms(&[]), None);
        assert_eq!(range(&[]), None);
    }

    #[test]
    fn pearson_detects_linear_relationships() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert_relative_eq!(pearson(&a, &up).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&a, &down).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn pearson_is_undefined_for_constant_series() {
        let a = [1.0, 2.0, 3.0];
        let flat = [5.0, 5.0, 5.0];
        assert_eq!(pearson(&a, &flat), None);
        assert_eq!(pearson(&a[..1], &flat[..1]), None);
    }
}
