//! Valuation and scoring: impact ratios and the kill-switch filter.

use crate::config::Config;
use crate::market::Quote;

/// Thresholds applied by the kill switch.
#[derive(Debug, Clone, Copy)]
pub struct ScoreLimits {
    pub min_impact_ratio: f64,
    pub max_market_cap: i64,
    pub min_award_amount: f64,
}

impl ScoreLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_impact_ratio: config.min_impact_ratio,
            max_market_cap: config.max_market_cap,
            min_award_amount: config.min_award_amount,
        }
    }
}

/// Why a matched contract was discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    PrivateCompany,
    MarketCapTooLarge { market_cap: i64, limit: i64 },
    ImpactTooSmall { ratio: f64, minimum: f64 },
    AwardTooSmall { amount: f64, minimum: f64 },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::PrivateCompany => write!(f, "Private company (no market cap)"),
            Rejection::MarketCapTooLarge { market_cap, limit } => write!(
                f,
                "Market cap ${:.1}B exceeds ${:.0}B limit",
                *market_cap as f64 / 1e9,
                *limit as f64 / 1e9
            ),
            Rejection::ImpactTooSmall { ratio, minimum } => {
                write!(f, "Impact ratio {}% below {}% threshold", ratio, minimum)
            }
            Rejection::AwardTooSmall { amount, minimum } => write!(
                f,
                "Award ${:.1}M below ${:.0}M minimum",
                amount / 1e6,
                minimum / 1e6
            ),
        }
    }
}

/// Impact ratio as a percentage of market cap, rounded to two decimals.
pub fn impact_ratio(award_amount: f64, market_cap: i64) -> f64 {
    if market_cap <= 0 {
        return 0.0;
    }
    round2(award_amount / market_cap as f64 * 100.0)
}

/// Filtering rules deciding whether a matched contract becomes a signal.
pub fn kill_switch(
    award_amount: f64,
    market_cap: Option<i64>,
    impact: f64,
    limits: &ScoreLimits,
) -> Result<(), Rejection> {
    let Some(market_cap) = market_cap else {
        return Err(Rejection::PrivateCompany);
    };

    if market_cap > limits.max_market_cap {
        return Err(Rejection::MarketCapTooLarge {
            market_cap,
            limit: limits.max_market_cap,
        });
    }

    if impact < limits.min_impact_ratio {
        return Err(Rejection::ImpactTooSmall {
            ratio: impact,
            minimum: limits.min_impact_ratio,
        });
    }

    // Already filtered during ingestion, but double-check
    if award_amount < limits.min_award_amount {
        return Err(Rejection::AwardTooSmall {
            amount: award_amount,
            minimum: limits.min_award_amount,
        });
    }

    Ok(())
}

/// A contract that survived the kill switch.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalScore {
    pub market_cap: i64,
    pub avg_volume: Option<i64>,
    pub sector: Option<String>,
    pub impact_ratio: f64,
    /// Impact of the ceiling for IDV contracts, when larger than the award.
    pub ceiling_impact: Option<f64>,
}

/// Full scoring for a matched contract: impact ratio plus kill switch.
pub fn score_signal(
    quote: &Quote,
    award_amount: f64,
    potential_ceiling: Option<f64>,
    limits: &ScoreLimits,
) -> Option<SignalScore> {
    let impact = quote
        .market_cap
        .map(|cap| impact_ratio(award_amount, cap))
        .unwrap_or(0.0);

    if let Err(reason) = kill_switch(award_amount, quote.market_cap, impact, limits) {
        tracing::debug!(ticker = %quote.ticker, %reason, "Signal rejected");
        return None;
    }

    let market_cap = quote.market_cap?;
    let ceiling_impact = potential_ceiling
        .filter(|ceiling| *ceiling > award_amount)
        .map(|ceiling| impact_ratio(ceiling, market_cap));

    Some(SignalScore {
        market_cap,
        avg_volume: quote.avg_volume,
        sector: quote.sector.clone(),
        impact_ratio: impact,
        ceiling_impact,
    })
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: ScoreLimits = ScoreLimits {
        min_impact_ratio: 5.0,
        max_market_cap: 50_000_000_000,
        min_award_amount: 1_000_000.0,
    };

    fn quote(market_cap: Option<i64>) -> Quote {
        Quote {
            ticker: "TEST".to_string(),
            market_cap,
            avg_volume: Some(1_000_000),
            sector: Some("Industrials".to_string()),
            current_price: Some(25.0),
        }
    }

    #[test]
    fn test_impact_ratio_rounding() {
        assert_eq!(impact_ratio(150_000_000.0, 1_800_000_000), 8.33);
        assert_eq!(impact_ratio(120_000_000.0, 500_000_000), 24.0);
        assert_eq!(impact_ratio(1_000_000.0, 0), 0.0);
    }

    #[test]
    fn test_kill_switch_private_company() {
        assert_eq!(
            kill_switch(10_000_000.0, None, 0.0, &LIMITS),
            Err(Rejection::PrivateCompany)
        );
    }

    #[test]
    fn test_kill_switch_market_cap_limit() {
        let err = kill_switch(1_200_000_000.0, Some(110_000_000_000), 1.09, &LIMITS).unwrap_err();
        assert!(matches!(err, Rejection::MarketCapTooLarge { .. }));
        assert_eq!(err.to_string(), "Market cap $110.0B exceeds $50B limit");
    }

    #[test]
    fn test_kill_switch_impact_threshold() {
        let err = kill_switch(45_000_000.0, Some(16_000_000_000), 0.28, &LIMITS).unwrap_err();
        assert!(matches!(err, Rejection::ImpactTooSmall { .. }));
    }

    #[test]
    fn test_kill_switch_passes_qualifying_signal() {
        assert!(kill_switch(150_000_000.0, Some(1_800_000_000), 8.33, &LIMITS).is_ok());
    }

    #[test]
    fn test_score_signal_end_to_end() {
        let score = score_signal(&quote(Some(1_800_000_000)), 150_000_000.0, None, &LIMITS).unwrap();
        assert_eq!(score.impact_ratio, 8.33);
        assert_eq!(score.market_cap, 1_800_000_000);
        assert!(score.ceiling_impact.is_none());
    }

    #[test]
    fn test_score_signal_ceiling_impact() {
        let score = score_signal(
            &quote(Some(1_800_000_000)),
            150_000_000.0,
            Some(400_000_000.0),
            &LIMITS,
        )
        .unwrap();
        assert_eq!(score.ceiling_impact, Some(22.22));
    }

    #[test]
    fn test_score_signal_rejects() {
        assert!(score_signal(&quote(None), 150_000_000.0, None, &LIMITS).is_none());
        assert!(score_signal(&quote(Some(110_000_000_000)), 1_200_000_000.0, None, &LIMITS).is_none());
        assert!(score_signal(&quote(Some(16_000_000_000)), 45_000_000.0, None, &LIMITS).is_none());
    }
}
