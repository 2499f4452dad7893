//! Company seeding: populates the companies table on first startup.
//!
//! The catalog covers publicly traded companies that regularly receive
//! federal contracts; market data is refreshed from the market client.

use crate::db::Repository;
use crate::errors::AppError;
use crate::market::MarketClient;
use crate::models::CompanySeed;
use crate::resolve::normalize_company_name;

/// (ticker, company name, sector fallback)
pub const SEED_COMPANIES: &[(&str, &str, &str)] = &[
    // Major defense primes
    ("LMT", "Lockheed Martin Corporation", "Industrials"),
    ("RTX", "RTX Corporation", "Industrials"),
    ("NOC", "Northrop Grumman Corporation", "Industrials"),
    ("GD", "General Dynamics Corporation", "Industrials"),
    ("BA", "The Boeing Company", "Industrials"),
    ("LHX", "L3Harris Technologies, Inc.", "Industrials"),
    ("HII", "Huntington Ingalls Industries, Inc.", "Industrials"),
    // Defense IT & services
    ("LDOS", "Leidos Holdings, Inc.", "Technology"),
    ("SAIC", "Science Applications International Corporation", "Technology"),
    ("BAH", "Booz Allen Hamilton Holding Corporation", "Technology"),
    ("CACI", "CACI International Inc", "Technology"),
    ("PSN", "Parsons Corporation", "Industrials"),
    ("KBR", "KBR, Inc.", "Industrials"),
    // Aerospace
    ("RKLB", "Rocket Lab USA, Inc.", "Industrials"),
    ("KTOS", "Kratos Defense & Security Solutions, Inc.", "Industrials"),
    ("AVAV", "AeroVironment, Inc.", "Industrials"),
    ("TDG", "TransDigm Group Incorporated", "Industrials"),
    ("HEI", "HEICO Corporation", "Industrials"),
    ("TXT", "Textron Inc.", "Industrials"),
    ("CW", "Curtiss-Wright Corporation", "Industrials"),
    // Cybersecurity
    ("CRWD", "CrowdStrike Holdings, Inc.", "Technology"),
    ("PANW", "Palo Alto Networks, Inc.", "Technology"),
    ("FTNT", "Fortinet, Inc.", "Technology"),
    ("ZS", "Zscaler, Inc.", "Technology"),
    ("TENB", "Tenable Holdings, Inc.", "Technology"),
    // IT services & consulting
    ("ACN", "Accenture plc", "Technology"),
    ("IBM", "International Business Machines Corporation", "Technology"),
    ("ORCL", "Oracle Corporation", "Technology"),
    ("MSFT", "Microsoft Corporation", "Technology"),
    ("GOOGL", "Alphabet Inc.", "Technology"),
    ("AMZN", "Amazon.com, Inc.", "Technology"),
    ("GIB", "CGI Inc.", "Technology"),
    ("DXC", "DXC Technology Company", "Technology"),
    // Analytics
    ("PLTR", "Palantir Technologies Inc.", "Technology"),
    // Healthcare & pharma with government contracts
    ("EBS", "Emergent BioSolutions Inc.", "Healthcare"),
    ("MRNA", "Moderna, Inc.", "Healthcare"),
    ("NVAX", "Novavax, Inc.", "Healthcare"),
    ("SIGA", "SIGA Technologies, Inc.", "Healthcare"),
    ("UNH", "UnitedHealth Group Incorporated", "Healthcare"),
    ("CVS", "CVS Health Corporation", "Healthcare"),
    // Nuclear & energy
    ("BWXT", "BWX Technologies, Inc.", "Industrials"),
    ("CEG", "Constellation Energy Corporation", "Utilities"),
    ("AMRC", "Ameresco, Inc.", "Industrials"),
    // Specialty defense
    ("MRCY", "Mercury Systems, Inc.", "Technology"),
    ("AXON", "Axon Enterprise, Inc.", "Industrials"),
    ("OSIS", "OSI Systems, Inc.", "Industrials"),
    ("TDY", "Teledyne Technologies Incorporated", "Industrials"),
    // Private prisons / government services
    ("GEO", "The GEO Group, Inc.", "Industrials"),
    ("CXW", "CoreCivic, Inc.", "Industrials"),
    // Construction & engineering
    ("FLR", "Fluor Corporation", "Industrials"),
    ("J", "Jacobs Solutions Inc.", "Industrials"),
    ("PWR", "Quanta Services, Inc.", "Industrials"),
    ("ACM", "AECOM", "Industrials"),
    // Telecom
    ("T", "AT&T Inc.", "Communication Services"),
    ("VZ", "Verizon Communications Inc.", "Communication Services"),
];

/// Populate the companies table when empty. Returns how many rows were seeded.
pub async fn seed_if_empty(repo: &Repository, market: &MarketClient) -> Result<usize, AppError> {
    if repo.count_companies().await? > 0 {
        return Ok(0);
    }

    tracing::info!(count = SEED_COMPANIES.len(), "Seeding companies");

    let mut seeded = 0;
    for (ticker, name, sector) in SEED_COMPANIES {
        // Market data is best-effort; the catalog row goes in regardless
        let quote = match market.quote(ticker).await {
            Ok(quote) => quote,
            Err(e) => {
                tracing::warn!(%ticker, error = %e, "Quote lookup failed during seeding");
                None
            }
        };

        let seed = CompanySeed {
            ticker: ticker.to_string(),
            name: name.to_string(),
            name_normalized: normalize_company_name(name),
            market_cap: quote.as_ref().and_then(|q| q.market_cap),
            avg_volume: quote.as_ref().and_then(|q| q.avg_volume),
            sector: quote
                .as_ref()
                .and_then(|q| q.sector.clone())
                .or_else(|| Some(sector.to_string())),
        };

        repo.upsert_company(&seed).await?;
        seeded += 1;
    }

    tracing::info!(seeded, "Company seeding complete");
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog_has_unique_tickers() {
        let mut tickers: Vec<&str> = SEED_COMPANIES.iter().map(|(t, _, _)| *t).collect();
        tickers.sort_unstable();
        let len = tickers.len();
        tickers.dedup();
        assert_eq!(tickers.len(), len);
    }

    #[test]
    fn test_seed_catalog_normalizes_cleanly() {
        for (_, name, _) in SEED_COMPANIES {
            assert!(!normalize_company_name(name).is_empty(), "bad name: {}", name);
        }
    }
}
