//! Summary statistics shared by the z-score engines.
//!
//! Standard deviation here is the population form (denominator = n), since
//! both engines score against the full distribution they were given, not a
//! sample of it.

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation around a precomputed mean.
pub fn population_stddev(values: &[f64], avg: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Mean and population standard deviation of one metric's distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricStats {
    pub mean: f64,
    pub stddev: f64,
}

impl MetricStats {
    /// Compute stats over a distribution. `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let avg = mean(values)?;
        let sd = population_stddev(values, avg)?;
        Some(Self { mean: avg, stddev: sd })
    }

    /// Z-score of a value against this distribution.
    ///
    /// `None` when the value is absent or the distribution is degenerate
    /// (stddev == 0); a z-score is never fabricated and division by zero
    /// never happens.
    pub fn zscore(&self, value: Option<f64>) -> Option<f64> {
        let v = value?;
        if self.stddev == 0.0 {
            return None;
        }
        Some((v - self.mean) / self.stddev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn population_stddev_uses_n_denominator() {
        // Sample stddev of [10, 20, 30] would be 10; population is ~8.165.
        let values = [10.0, 20.0, 30.0];
        let avg = mean(&values).unwrap();
        let sd = population_stddev(&values, avg).unwrap();
        assert!((avg - 20.0).abs() < 1e-9);
        assert!((sd - 8.16496580927726).abs() < 1e-9);
    }

    #[test]
    fn zscore_of_mean_is_zero() {
        let stats = MetricStats::from_values(&[10.0, 20.0, 30.0]).unwrap();
        assert!((stats.zscore(Some(20.0)).unwrap()).abs() < 1e-9);
        assert!((stats.zscore(Some(10.0)).unwrap() + 1.224744871391589).abs() < 1e-9);
        assert!((stats.zscore(Some(30.0)).unwrap() - 1.224744871391589).abs() < 1e-9);
    }

    #[test]
    fn zscore_degenerate_distribution_is_none() {
        let stats = MetricStats::from_values(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(stats.stddev, 0.0);
        assert_eq!(stats.zscore(Some(5.0)), None);
    }

    #[test]
    fn zscore_missing_value_is_none() {
        let stats = MetricStats::from_values(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(stats.zscore(None), None);
    }
}
