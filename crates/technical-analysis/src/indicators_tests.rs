#[cfg(test)]
mod tests {
    use super::super::indicators::*;

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3).unwrap();

        // Mean of exactly the last 3 values: (3+4+5)/3
        assert!((result - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let data = vec![1.0, 2.0];
        assert_eq!(sma(&data, 5), None);
    }

    #[test]
    fn test_sma_exact_length() {
        let prices = sample_prices();
        let result = sma(&prices, prices.len()).unwrap();
        let expected = prices.iter().sum::<f64>() / prices.len() as f64;
        assert!((result - expected).abs() < 0.001);
    }

    #[test]
    fn test_ema_insufficient_data() {
        let data = vec![22.0, 24.0];
        assert_eq!(ema(&data, 3), None);
    }

    #[test]
    fn test_ema_seed_and_smoothing() {
        // period 3 over [10, 20, 30]: seed = 10, k = 0.5
        // step 1: 20*0.5 + 10*0.5 = 15; step 2: 30*0.5 + 15*0.5 = 22.5
        let data = vec![10.0, 20.0, 30.0];
        let result = ema(&data, 3).unwrap();
        assert!((result - 22.5).abs() < 0.001);
    }

    #[test]
    fn test_ema_uses_tail_only() {
        // Values before the seed position must not affect the result.
        let short = vec![10.0, 20.0, 30.0];
        let long = vec![999.0, -50.0, 10.0, 20.0, 30.0];
        assert_eq!(ema(&short, 3), ema(&long, 3));
    }

    #[test]
    fn test_rsi_bounds() {
        let prices = sample_prices();
        let result = rsi(&prices, 14).unwrap();
        assert!((0.0..=100.0).contains(&result));
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let data = vec![1.0, 2.0, 3.0];
        assert_eq!(rsi(&data, 14), None);
    }

    #[test]
    fn test_rsi_needs_period_plus_one() {
        let data: Vec<f64> = (1..=14).map(f64::from).collect();
        assert_eq!(rsi(&data, 14), None);
        let data: Vec<f64> = (1..=15).map(f64::from).collect();
        assert!(rsi(&data, 14).is_some());
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        // Monotone uptrend: average loss is zero, RSI pegs at 100.
        let uptrend: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&uptrend, 14), Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses_near_zero() {
        let downtrend: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let result = rsi(&downtrend, 14).unwrap();
        assert!(result < 1.0);
    }

    #[test]
    fn test_indicator_set_from_short_series() {
        // Closes 1..=25: sma20 covers 6..=25, sma50 lacks data.
        let closes: Vec<f64> = (1..=25).map(f64::from).collect();
        let set = IndicatorSet::from_closes(&closes);

        assert!((set.sma20.unwrap() - 15.5).abs() < 0.001);
        assert_eq!(set.sma50, None);
        assert!(set.ema12.is_some());
        assert_eq!(set.rsi14, Some(100.0));
    }

    #[test]
    fn test_indicator_set_empty_series() {
        let set = IndicatorSet::from_closes(&[]);
        assert_eq!(set.sma20, None);
        assert_eq!(set.sma50, None);
        assert_eq!(set.ema12, None);
        assert_eq!(set.rsi14, None);
    }
}
