//! Embedded market data served in mock mode.
//!
//! Quotes cover the seeded contractor universe; candle series are synthetic
//! but deterministic so pipeline runs and tests are reproducible.

use chrono::{Duration, Utc};

use super::{Candle, PriceSeries, Quote};

/// (ticker, market cap, 3-month average volume, sector, last price)
const MOCK_QUOTES: &[(&str, i64, i64, &str, f64)] = &[
    ("LMT", 110_000_000_000, 1_200_000, "Industrials", 465.20),
    ("RTX", 155_000_000_000, 5_600_000, "Industrials", 116.75),
    ("NOC", 70_000_000_000, 900_000, "Industrials", 480.10),
    ("GD", 75_000_000_000, 1_100_000, "Industrials", 272.35),
    ("BA", 110_000_000_000, 6_800_000, "Industrials", 178.90),
    ("LHX", 42_000_000_000, 1_400_000, "Industrials", 221.40),
    ("HII", 11_000_000_000, 450_000, "Industrials", 280.55),
    ("LDOS", 19_000_000_000, 1_000_000, "Technology", 142.80),
    ("SAIC", 7_000_000_000, 500_000, "Technology", 135.60),
    ("BAH", 16_000_000_000, 1_300_000, "Technology", 124.15),
    ("CACI", 10_500_000_000, 300_000, "Technology", 470.25),
    ("PSN", 9_000_000_000, 700_000, "Industrials", 85.40),
    ("KBR", 8_500_000_000, 1_200_000, "Industrials", 63.10),
    ("KTOS", 1_800_000_000, 1_900_000, "Industrials", 22.45),
    ("AVAV", 8_500_000_000, 600_000, "Industrials", 295.30),
    ("RKLB", 12_000_000_000, 14_000_000, "Industrials", 24.85),
    ("MRCY", 2_500_000_000, 700_000, "Technology", 43.20),
    ("BWXT", 10_000_000_000, 600_000, "Industrials", 109.80),
    ("AMRC", 1_200_000_000, 500_000, "Industrials", 23.10),
    ("EBS", 350_000_000, 1_500_000, "Healthcare", 6.85),
    ("SIGA", 500_000_000, 800_000, "Healthcare", 7.05),
    ("GEO", 3_500_000_000, 2_400_000, "Industrials", 27.60),
    ("CXW", 2_400_000_000, 1_100_000, "Industrials", 21.90),
    ("ACN", 190_000_000_000, 2_900_000, "Technology", 305.15),
    ("GIB", 22_000_000_000, 400_000, "Technology", 98.70),
];

pub fn quote(ticker: &str) -> Option<Quote> {
    MOCK_QUOTES
        .iter()
        .find(|(t, _, _, _, _)| *t == ticker)
        .map(|(t, market_cap, avg_volume, sector, price)| Quote {
            ticker: t.to_string(),
            market_cap: Some(*market_cap),
            avg_volume: Some(*avg_volume),
            sector: Some(sector.to_string()),
            current_price: Some(*price),
        })
}

pub fn price_series(ticker: &str) -> PriceSeries {
    let base = quote(ticker)
        .and_then(|q| q.current_price)
        .unwrap_or(50.0);

    PriceSeries {
        minute: synth_series(base, 120, Duration::minutes(1)),
        hourly: synth_series(base, 60, Duration::hours(1)),
        daily: synth_series(base, 60, Duration::days(1)),
    }
}

/// Candles ending now, oldest first, wiggling around `base` in a fixed
/// seven-step pattern.
fn synth_series(base: f64, points: usize, step: Duration) -> Vec<Candle> {
    let now = Utc::now();

    (0..points)
        .map(|i| {
            let wiggle = ((i % 7) as f64 - 3.0) * 0.002;
            let close = base * (1.0 + wiggle);
            let open = base * (1.0 + wiggle - 0.001);
            Candle {
                ts: now - step * (points - 1 - i) as i32,
                open,
                close,
            }
        })
        .collect()
}
