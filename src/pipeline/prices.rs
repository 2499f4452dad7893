//! Stock price evolution around a contract announcement.
//!
//! For freshly detected contracts the announcement is at most a few days old,
//! so the most recent closes stand in for the announcement price. Windows that
//! the series cannot cover stay `None`.

use crate::market::PriceSeries;
use crate::models::PriceEvolution;

/// Percentage changes before and after the announcement, derived from the
/// minute, hourly and daily candle series.
pub fn evolution(series: &PriceSeries) -> PriceEvolution {
    let mut result = PriceEvolution::default();

    let Some(last_daily) = series.daily.last() else {
        return result;
    };

    let price_at_contract = last_daily.close;
    result.price_at_contract = Some(round4(price_at_contract));

    // Before the announcement: % change from that point up to the announcement
    if series.daily.len() > 1 {
        let day_before = series.daily[series.daily.len() - 2].close;
        result.price_before_24h = Some(pct_change(day_before, price_at_contract));
    }
    if series.hourly.len() > 6 {
        let six_hours_before = series.hourly[series.hourly.len() - 7].close;
        result.price_before_6h = Some(pct_change(six_hours_before, price_at_contract));
    }
    if series.hourly.len() > 1 {
        let hour_before = series.hourly[series.hourly.len() - 2].close;
        result.price_before_1h = Some(pct_change(hour_before, price_at_contract));
    }

    // After the announcement: % change from the announcement onward
    if let Some(last_minute) = series.minute.last() {
        if last_minute.open > 0.0 {
            result.price_after_1m = Some(pct_change(last_minute.open, last_minute.close));
        }
    }
    if series.hourly.len() > 1 {
        let last = series.hourly[series.hourly.len() - 1].close;
        let prev = series.hourly[series.hourly.len() - 2].close;
        result.price_after_1h = Some(pct_change(prev, last));
    }
    if series.hourly.len() > 6 {
        let last = series.hourly[series.hourly.len() - 1].close;
        let six_ago = series.hourly[series.hourly.len() - 7].close;
        result.price_after_6h = Some(pct_change(six_ago, last));
    }
    if series.daily.len() > 1 {
        let prev_day = series.daily[series.daily.len() - 2].close;
        result.price_after_24h = Some(pct_change(prev_day, last_daily.close));
    }

    result
}

fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    round2((to - from) / from * 100.0)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Candle;
    use chrono::{Duration, Utc};

    fn candles(closes: &[f64], step: Duration) -> Vec<Candle> {
        let now = Utc::now();
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| Candle {
                ts: now - step * (closes.len() - 1 - i) as i32,
                open: close - 0.5,
                close: *close,
            })
            .collect()
    }

    #[test]
    fn test_empty_series_yields_defaults() {
        assert_eq!(evolution(&PriceSeries::default()), PriceEvolution::default());
    }

    #[test]
    fn test_daily_only_series() {
        let series = PriceSeries {
            minute: Vec::new(),
            hourly: Vec::new(),
            daily: candles(&[100.0, 110.0], Duration::days(1)),
        };

        let result = evolution(&series);
        assert_eq!(result.price_at_contract, Some(110.0));
        assert_eq!(result.price_before_24h, Some(10.0));
        assert_eq!(result.price_after_24h, Some(10.0));
        assert!(result.price_before_1h.is_none());
        assert!(result.price_after_1m.is_none());
    }

    #[test]
    fn test_full_series_windows() {
        let series = PriceSeries {
            minute: candles(&[20.0, 20.5], Duration::minutes(1)),
            hourly: candles(&[20.0, 20.2, 20.4, 20.6, 20.8, 21.0, 21.2, 21.4], Duration::hours(1)),
            daily: candles(&[20.0, 21.4], Duration::days(1)),
        };

        let result = evolution(&series);
        assert_eq!(result.price_at_contract, Some(21.4));
        // 1h before: 21.2 -> 21.4
        assert_eq!(result.price_before_1h, Some(0.94));
        // 6h before: hourly[-7] = 20.2 -> 21.4
        assert_eq!(result.price_before_6h, Some(5.94));
        assert_eq!(result.price_before_24h, Some(7.0));
        // 1m after: open 20.0 (close 20.5 - 0.5) -> close 20.5
        assert_eq!(result.price_after_1m, Some(2.5));
        assert_eq!(result.price_after_1h, Some(0.94));
        assert_eq!(result.price_after_6h, Some(5.94));
        assert_eq!(result.price_after_24h, Some(7.0));
    }

    #[test]
    fn test_single_daily_candle_has_price_only() {
        let series = PriceSeries {
            minute: Vec::new(),
            hourly: Vec::new(),
            daily: candles(&[42.1234], Duration::days(1)),
        };

        let result = evolution(&series);
        assert_eq!(result.price_at_contract, Some(42.1234));
        assert!(result.price_before_24h.is_none());
        assert!(result.price_after_24h.is_none());
    }
}
