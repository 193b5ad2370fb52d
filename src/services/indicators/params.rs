// File: src/services/indicators/params.rs
use super::error::IndicatorError;
use serde::Deserialize;

/// Indicator windows, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
}

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
        }
    }
}

impl IndicatorParams {
    /// Checks the same constraints the engines enforce, so a bad config is
    /// rejected at startup instead of failing every cycle.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        check_period("RSI", self.rsi_period)?;
        check_period("MACD fast", self.macd_fast)?;
        check_period("MACD slow", self.macd_slow)?;
        check_period("MACD signal", self.macd_signal)?;

        if self.macd_fast > self.macd_slow {
            return Err(IndicatorError::InvalidMacdPeriods {
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }

        Ok(())
    }

    /// Number of leading positions that can never produce a full row.
    pub fn warmup_len(&self) -> usize {
        let macd_pad = (self.macd_slow - 1) + (self.macd_signal - 1);
        self.rsi_period.max(macd_pad)
    }
}

pub(crate) fn check_period(name: &'static str, value: usize) -> Result<(), IndicatorError> {
    if value == 0 {
        return Err(IndicatorError::InvalidPeriod { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_classic_windows() {
        let params = IndicatorParams::default();
        assert_eq!(params.rsi_period, 14);
        assert_eq!(
            (params.macd_fast, params.macd_slow, params.macd_signal),
            (12, 26, 9)
        );
        assert!(params.validate().is_ok());
        assert_eq!(params.warmup_len(), 33);
    }

    #[test]
    fn test_validate_rejects_bad_periods() {
        let zero_rsi = IndicatorParams {
            rsi_period: 0,
            ..IndicatorParams::default()
        };
        assert_eq!(
            zero_rsi.validate(),
            Err(IndicatorError::InvalidPeriod {
                name: "RSI",
                value: 0
            })
        );

        let inverted = IndicatorParams {
            macd_fast: 30,
            ..IndicatorParams::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(IndicatorError::InvalidMacdPeriods { fast: 30, slow: 26 })
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let params: IndicatorParams = toml::from_str("rsi_period = 7").unwrap();
        assert_eq!(params.rsi_period, 7);
        assert_eq!(params.macd_slow, 26);
    }
}
