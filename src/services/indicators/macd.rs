// File: src/services/indicators/macd.rs
use super::error::IndicatorError;
use super::params::check_period;
use super::series::ema;

/// MACD line, signal line and histogram, each aligned to the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal_line: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl MacdSeries {
    fn undefined(len: usize) -> Self {
        Self {
            macd: vec![None; len],
            signal_line: vec![None; len],
            histogram: vec![None; len],
        }
    }
}

/// Number of leading undefined entries in every MACD output.
pub fn macd_pad_width(slow: usize, signal: usize) -> usize {
    (slow - 1) + (signal - 1)
}

/// Computes MACD from EMAs seeded with a simple mean (the signal EMA over the
/// MACD line uses the same seeding).
///
/// All three outputs start at input index `(slow - 1) + (signal - 1)`. With
/// fewer than `slow + signal` closes every output is undefined.
pub fn compute_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdSeries, IndicatorError> {
    check_period("MACD fast", fast)?;
    check_period("MACD slow", slow)?;
    check_period("MACD signal", signal)?;
    if fast > slow {
        return Err(IndicatorError::InvalidMacdPeriods { fast, slow });
    }

    let len = closes.len();
    if len < slow + signal {
        return Ok(MacdSeries::undefined(len));
    }

    let ema_fast = ema(closes, 0, fast);
    let ema_slow = ema(closes, 0, slow);

    let macd_line = ema_fast.difference(&ema_slow);
    debug_assert_eq!(macd_line.first_index(), slow - 1);

    let signal_line = macd_line.ema(signal);
    let pad = macd_pad_width(slow, signal);
    debug_assert_eq!(signal_line.first_index(), pad);

    let histogram = macd_line.difference(&signal_line);
    let macd_line = macd_line.starting_at(signal_line.first_index());

    debug_assert_eq!(histogram.first_index(), pad);
    debug_assert_eq!(macd_line.end_index(), len);
    debug_assert_eq!(signal_line.end_index(), len);
    debug_assert_eq!(histogram.end_index(), len);

    Ok(MacdSeries {
        macd: macd_line.into_padded(len),
        signal_line: signal_line.into_padded(len),
        histogram: histogram.into_padded(len),
    })
}
