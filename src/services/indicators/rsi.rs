// File: src/services/indicators/rsi.rs
use super::error::IndicatorError;
use super::params::check_period;

/// Relative Strength Index with Wilder smoothing, aligned to `closes`.
///
/// The first `period` entries are `None`. The averages are seeded with the
/// mean gain/loss of the first `period` differences, which yields the value at
/// index `period`; every later difference updates them with
/// `avg = (avg * (period - 1) + x) / period`.
///
/// Fewer than `period` differences leave the whole series undefined.
pub fn compute_rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    check_period("RSI", period)?;

    let mut rsi = vec![None; closes.len()];
    let diffs = closes.len().saturating_sub(1);
    if diffs < period {
        return Ok(rsi);
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|pair| {
            let diff = pair[1] - pair[0];
            (diff.max(0.0), (-diff).max(0.0))
        })
        .unzip();

    let p = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / p;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / p;
    rsi[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    // Difference j moves the series from close j to close j + 1.
    for j in period..diffs {
        avg_gain = (avg_gain * (p - 1.0) + gains[j]) / p;
        avg_loss = (avg_loss * (p - 1.0) + losses[j]) / p;
        rsi[j + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(rsi)
}

/// RS is +inf when there is no average loss, which pins RSI to 100.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
