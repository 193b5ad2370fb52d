// File: src/services/indicators/synchronizer.rs
use super::error::IndicatorError;
use crate::db::postgres::models::indicator_row::IndicatorRow;
use chrono::{DateTime, Utc};

/// Zips timestamps with the computed series and keeps only the positions
/// where both RSI and MACD are defined.
///
/// All inputs must have the same length. Signal and histogram share MACD's
/// warm-up boundary, so a gap in either of them next to a defined MACD value
/// is reported instead of skipped.
pub fn synchronize(
    timestamps: &[DateTime<Utc>],
    rsi: &[Option<f64>],
    macd: &[Option<f64>],
    signal_line: &[Option<f64>],
    histogram: &[Option<f64>],
) -> Result<Vec<IndicatorRow>, IndicatorError> {
    let expected = timestamps.len();
    check_len("rsi", expected, rsi.len())?;
    check_len("macd", expected, macd.len())?;
    check_len("signal_line", expected, signal_line.len())?;
    check_len("histogram", expected, histogram.len())?;

    let mut rows = Vec::new();
    for (index, timestamp) in timestamps.iter().enumerate() {
        let (Some(rsi14), Some(macd)) = (rsi[index], macd[index]) else {
            continue;
        };
        let macd_signal = signal_line[index].ok_or(IndicatorError::MisalignedSeries {
            series: "signal_line",
            index,
        })?;
        let macd_hist = histogram[index].ok_or(IndicatorError::MisalignedSeries {
            series: "histogram",
            index,
        })?;

        rows.push(IndicatorRow {
            timestamp: *timestamp,
            rsi14,
            macd,
            macd_signal,
            macd_hist,
        });
    }

    Ok(rows)
}

fn check_len(series: &'static str, expected: usize, actual: usize) -> Result<(), IndicatorError> {
    if expected != actual {
        return Err(IndicatorError::LengthMismatch {
            series,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn minutes(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::minutes(i as i64))
            .collect()
    }

    #[test]
    fn test_rows_only_where_rsi_and_macd_defined() {
        let ts = minutes(5);
        let rsi = [None, Some(60.0), Some(55.0), None, Some(40.0)];
        let macd = [None, None, Some(0.1), Some(0.2), Some(0.3)];
        let signal = [None, None, Some(0.05), Some(0.1), Some(0.2)];
        let hist = [None, None, Some(0.05), Some(0.1), Some(0.1)];

        let rows = synchronize(&ts, &rsi, &macd, &signal, &hist).unwrap();

        let both_defined = rsi
            .iter()
            .zip(&macd)
            .filter(|(r, m)| r.is_some() && m.is_some())
            .count();
        assert_eq!(rows.len(), both_defined);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            IndicatorRow {
                timestamp: ts[2],
                rsi14: 55.0,
                macd: 0.1,
                macd_signal: 0.05,
                macd_hist: 0.05,
            }
        );
        assert_eq!(rows[1].timestamp, ts[4]);
    }

    #[test]
    fn test_all_warmup_yields_no_rows() {
        let ts = minutes(3);
        let none = [None; 3];
        let rows = synchronize(&ts, &none, &none, &none, &none).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_length_mismatch_fails_fast() {
        let ts = minutes(3);
        let full = [Some(1.0); 3];
        let short = [Some(1.0); 2];
        assert_eq!(
            synchronize(&ts, &full, &short, &full, &full),
            Err(IndicatorError::LengthMismatch {
                series: "macd",
                expected: 3,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_signal_gap_next_to_macd_is_reported() {
        let ts = minutes(2);
        let defined = [Some(1.0); 2];
        let gap = [Some(1.0), None];
        assert_eq!(
            synchronize(&ts, &defined, &defined, &gap, &defined),
            Err(IndicatorError::MisalignedSeries {
                series: "signal_line",
                index: 1,
            })
        );
    }
}
