//! Market data: quotes and price history per ticker.
//!
//! Live mode talks to the Yahoo Finance public endpoints; mock mode serves
//! embedded quotes and deterministic synthetic candles.

mod mock;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::Config;
use crate::errors::AppError;

/// Snapshot quote for a ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub ticker: String,
    /// `None` usually means the company is not publicly traded.
    pub market_cap: Option<i64>,
    pub avg_volume: Option<i64>,
    pub sector: Option<String>,
    pub current_price: Option<f64>,
}

/// A single OHLC bar, reduced to what the pipeline needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub ts: DateTime<Utc>,
    pub open: f64,
    pub close: f64,
}

/// Intraday and daily candles around the present, oldest first.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    pub minute: Vec<Candle>,
    pub hourly: Vec<Candle>,
    pub daily: Vec<Candle>,
}

const QUOTE_PATH: &str = "/v7/finance/quote";
const CHART_PATH: &str = "/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteBody,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    #[serde(default)]
    result: Vec<QuoteRow>,
}

#[derive(Debug, Deserialize)]
struct QuoteRow {
    #[serde(rename = "marketCap")]
    market_cap: Option<i64>,
    #[serde(rename = "averageDailyVolume3Month")]
    avg_volume: Option<i64>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    open: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
}

enum Mode {
    Live {
        http: reqwest::Client,
        base_url: String,
    },
    Mock,
}

/// Client for quote and price-history lookups.
pub struct MarketClient {
    mode: Mode,
}

const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

impl MarketClient {
    pub fn from_config(config: &Config) -> Self {
        if config.mock_mode() {
            Self::mock()
        } else {
            Self::live(YAHOO_BASE_URL)
        }
    }

    pub fn live(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            mode: Mode::Live {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
            },
        }
    }

    pub fn mock() -> Self {
        Self { mode: Mode::Mock }
    }

    /// Current quote for a ticker. `Ok(None)` when the symbol is unknown.
    pub async fn quote(&self, ticker: &str) -> Result<Option<Quote>, AppError> {
        match &self.mode {
            Mode::Mock => Ok(mock::quote(ticker)),
            Mode::Live { http, base_url } => {
                let url = format!("{}{}?symbols={}", base_url, QUOTE_PATH, ticker);
                let envelope: QuoteEnvelope = http
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;

                let Some(row) = envelope.quote_response.result.into_iter().next() else {
                    return Ok(None);
                };

                Ok(Some(Quote {
                    ticker: ticker.to_string(),
                    market_cap: row.market_cap,
                    avg_volume: row.avg_volume,
                    // The quote endpoint carries no sector information
                    sector: None,
                    current_price: row.regular_market_price,
                }))
            }
        }
    }

    /// Minute (last 7 days), hourly and daily (last 60 days) candles.
    pub async fn price_series(&self, ticker: &str) -> Result<PriceSeries, AppError> {
        match &self.mode {
            Mode::Mock => Ok(mock::price_series(ticker)),
            Mode::Live { http, base_url } => {
                let minute = self.fetch_chart(http, base_url, ticker, "7d", "1m").await?;
                let hourly = self.fetch_chart(http, base_url, ticker, "60d", "1h").await?;
                let daily = self.fetch_chart(http, base_url, ticker, "60d", "1d").await?;

                Ok(PriceSeries {
                    minute,
                    hourly,
                    daily,
                })
            }
        }
    }

    async fn fetch_chart(
        &self,
        http: &reqwest::Client,
        base_url: &str,
        ticker: &str,
        range: &str,
        interval: &str,
    ) -> Result<Vec<Candle>, AppError> {
        let url = format!(
            "{}{}/{}?range={}&interval={}",
            base_url, CHART_PATH, ticker, range, interval
        );

        let envelope: ChartEnvelope = http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };

        let timestamps = result.timestamp.unwrap_or_default();
        let Some(quote) = result.indicators.quote.into_iter().next() else {
            return Ok(Vec::new());
        };
        let opens = quote.open.unwrap_or_default();
        let closes = quote.close.unwrap_or_default();

        let mut candles = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            let close = closes.get(i).copied().flatten();
            let open = opens.get(i).copied().flatten();
            // Bars with no close are market holidays / gaps
            let (Some(close), Some(ts)) = (close, DateTime::from_timestamp(*ts, 0)) else {
                continue;
            };
            candles.push(Candle {
                ts,
                open: open.unwrap_or(close),
                close,
            });
        }

        Ok(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_quote_known_ticker() {
        let client = MarketClient::mock();
        let quote = client.quote("KTOS").await.unwrap().unwrap();
        assert_eq!(quote.ticker, "KTOS");
        assert!(quote.market_cap.unwrap() > 0);
        assert!(quote.sector.is_some());
    }

    #[tokio::test]
    async fn test_mock_quote_unknown_ticker() {
        let client = MarketClient::mock();
        assert!(client.quote("ZZZZZ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_series_is_deterministic_and_ordered() {
        let client = MarketClient::mock();
        let a = client.price_series("KTOS").await.unwrap();
        let b = client.price_series("KTOS").await.unwrap();

        assert_eq!(a.daily.len(), b.daily.len());
        assert!(a.daily.len() >= 30);
        assert!(a.hourly.len() >= 8);
        assert!(a.minute.len() >= 2);
        // Oldest first
        assert!(a.daily.first().unwrap().ts < a.daily.last().unwrap().ts);
        for (x, y) in a.daily.iter().zip(&b.daily) {
            assert_eq!(x.close, y.close);
        }
    }

    #[test]
    fn test_chart_envelope_parsing() {
        let payload = serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": [1722300000, 1722386400, 1722472800],
                    "indicators": {
                        "quote": [{
                            "open": [10.0, null, 10.4],
                            "close": [10.2, null, 10.5],
                        }]
                    }
                }],
                "error": null
            }
        });

        let envelope: ChartEnvelope = serde_json::from_value(payload).unwrap();
        let result = envelope.chart.result.unwrap().remove(0);
        assert_eq!(result.timestamp.unwrap().len(), 3);
    }
}
