//! Entity resolution: map awardee names to stock tickers.
//!
//! Resolution order: explicit federal-contractor overrides, exact match
//! against the company table, fuzzy token-sort matching as fallback.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::Company;

/// Explicit mappings for subsidiaries and trading names that don't fuzzy-match
/// well. `None` marks awardees known to be privately held, which short-circuits
/// resolution to no-match.
static CONTRACTOR_OVERRIDES: Lazy<Vec<(&'static str, Option<&'static str>)>> = Lazy::new(|| {
    vec![
        // Aerospace & Defense
        ("aerojet rocketdyne", Some("LHX")),
        ("aerojet", Some("LHX")),
        ("l3harris", Some("LHX")),
        ("l3 harris", Some("LHX")),
        // IT Services & Consulting
        ("accenture federal services", Some("ACN")),
        ("accenture federal", Some("ACN")),
        ("cgi federal", Some("GIB")),
        ("general dynamics information technology", Some("GD")),
        ("gdit", Some("GD")),
        ("elsevier", Some("RELX")),
        ("deloitte consulting", None),
        ("kpmg", None),
        ("mckinsey", None),
        // Defense contractors
        ("booz allen hamilton", Some("BAH")),
        ("booz allen", Some("BAH")),
        ("parsons government services", Some("PSN")),
        ("parsons", Some("PSN")),
        ("mantech advanced systems", Some("MANT")),
        ("mantech", Some("MANT")),
        ("leidos", Some("LDOS")),
        ("peraton enterprise", None),
        ("peraton", None),
        // Energy & Environment
        ("ameresco", Some("AMRC")),
        // Private prisons / gov services
        ("geo transport", Some("GEO")),
        ("geo group", Some("GEO")),
        ("geo reentry", Some("GEO")),
        ("corecivic", Some("CXW")),
        // Healthcare
        ("emergent biosolutions", Some("EBS")),
        ("siga technologies", Some("SIGA")),
        // Other common contractors
        ("raytheon", Some("RTX")),
        ("northrop grumman", Some("NOC")),
        ("lockheed martin", Some("LMT")),
        ("general dynamics", Some("GD")),
        ("boeing", Some("BA")),
        ("huntington ingalls", Some("HII")),
        ("science applications international", Some("SAIC")),
        ("saic", Some("SAIC")),
        ("caci international", Some("CACI")),
        ("caci nss", Some("CACI")),
        ("kratos defense", Some("KTOS")),
        ("kratos", Some("KTOS")),
        ("bwx technologies", Some("BWXT")),
        ("amentum services", None),
        ("amentum", None),
    ]
});

/// Corporate suffix tokens stripped during normalization.
static SUFFIX_TOKENS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "inc",
        "incorporated",
        "corp",
        "corporation",
        "llc",
        "llp",
        "lp",
        "ltd",
        "limited",
        "co",
        "company",
        "holding",
        "holdings",
        "group",
        "plc",
        "sa",
        "nv",
        "ag",
        "gmbh",
        "the",
        "and",
        "of",
        "de",
    ]
});

/// Clean a company name for matching.
///
/// "KRATOS DEFENSE & SECURITY SOLUTIONS, INC." -> "kratos defense security solutions"
pub fn normalize_company_name(name: &str) -> String {
    let lowered = name.to_lowercase();

    // Replace punctuation with spaces, then drop suffix tokens
    let cleaned: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !SUFFIX_TOKENS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity score (0-100) between two names, insensitive to word order.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let sort = |s: &str| {
        let mut tokens: Vec<&str> = s.split_whitespace().collect();
        tokens.sort_unstable();
        tokens.join(" ")
    };

    strsim::normalized_levenshtein(&sort(a), &sort(b)) * 100.0
}

/// A successful awardee-to-ticker resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    pub ticker: String,
    pub company_name: String,
    /// 100 for override/exact matches, the fuzzy score otherwise.
    pub confidence: f64,
}

/// Resolves awardee names against a snapshot of the company table.
pub struct EntityResolver {
    /// normalized name -> (ticker, display name)
    companies: HashMap<String, (String, String)>,
    threshold: f64,
}

impl EntityResolver {
    pub fn new(companies: &[Company], threshold: f64) -> Self {
        let companies = companies
            .iter()
            .map(|c| {
                let key = c
                    .name_normalized
                    .clone()
                    .unwrap_or_else(|| normalize_company_name(&c.name));
                (key, (c.ticker.clone(), c.name.clone()))
            })
            .collect();

        Self {
            companies,
            threshold,
        }
    }

    /// Match an awardee name to a stock ticker.
    pub fn resolve(&self, awardee_name: &str) -> Option<ResolvedEntity> {
        let normalized = normalize_company_name(awardee_name);

        // Priority 1: explicit contractor overrides
        for (pattern, ticker) in CONTRACTOR_OVERRIDES.iter() {
            if normalized.contains(pattern) {
                let ticker = (*ticker)?; // known-private awardee
                let company_name = self
                    .companies
                    .values()
                    .find(|(t, _)| t == ticker)
                    .map(|(_, name)| name.clone())
                    .unwrap_or_else(|| awardee_name.to_string());

                return Some(ResolvedEntity {
                    ticker: ticker.to_string(),
                    company_name,
                    confidence: 100.0,
                });
            }
        }

        // Priority 2: exact match on the normalized name
        if let Some((ticker, name)) = self.companies.get(&normalized) {
            return Some(ResolvedEntity {
                ticker: ticker.clone(),
                company_name: name.clone(),
                confidence: 100.0,
            });
        }

        // Priority 3: fuzzy match
        let mut best: Option<(f64, &String, &(String, String))> = None;
        for (key, entry) in &self.companies {
            let score = token_sort_ratio(&normalized, key);
            if score >= self.threshold && best.map(|(s, _, _)| score > s).unwrap_or(true) {
                best = Some((score, key, entry));
            }
        }

        best.map(|(score, _, (ticker, name))| ResolvedEntity {
            ticker: ticker.clone(),
            company_name: name.clone(),
            confidence: score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn company(ticker: &str, name: &str) -> Company {
        Company {
            ticker: ticker.to_string(),
            name: name.to_string(),
            name_normalized: Some(normalize_company_name(name)),
            market_cap: None,
            avg_volume: None,
            sector: None,
            updated_at: Utc::now(),
        }
    }

    fn resolver() -> EntityResolver {
        EntityResolver::new(
            &[
                company("KTOS", "Kratos Defense & Security Solutions, Inc."),
                company("LDOS", "Leidos Holdings, Inc."),
                company("LHX", "L3Harris Technologies, Inc."),
                company("AVAV", "AeroVironment, Inc."),
            ],
            90.0,
        )
    }

    #[test]
    fn test_normalize_strips_suffixes_and_punctuation() {
        assert_eq!(
            normalize_company_name("KRATOS DEFENSE & SECURITY SOLUTIONS, INC."),
            "kratos defense security solutions"
        );
        assert_eq!(normalize_company_name("The Boeing Company"), "boeing");
        assert_eq!(
            normalize_company_name("Booz Allen Hamilton Holding Corp"),
            "booz allen hamilton"
        );
    }

    #[test]
    fn test_override_beats_fuzzy() {
        let resolved = resolver().resolve("AEROJET ROCKETDYNE OF DE, INC.").unwrap();
        assert_eq!(resolved.ticker, "LHX");
        assert_eq!(resolved.confidence, 100.0);
        // Display name comes from the company table when the ticker is known
        assert_eq!(resolved.company_name, "L3Harris Technologies, Inc.");
    }

    #[test]
    fn test_known_private_awardee_is_unmatchable() {
        assert!(resolver().resolve("PERATON ENTERPRISE SOLUTIONS LLC").is_none());
        assert!(resolver().resolve("KPMG LLP").is_none());
    }

    #[test]
    fn test_exact_match() {
        // Not in the override table, hits the normalized-name index
        let resolved = resolver().resolve("AEROVIRONMENT, INC.").unwrap();
        assert_eq!(resolved.ticker, "AVAV");
        assert_eq!(resolved.confidence, 100.0);
    }

    #[test]
    fn test_fuzzy_match_tolerates_typos() {
        let resolved = resolver().resolve("AEROVIRONMENTS INC").unwrap();
        assert_eq!(resolved.ticker, "AVAV");
        assert!(resolved.confidence >= 90.0);
        assert!(resolved.confidence < 100.0);
    }

    #[test]
    fn test_no_match_below_threshold() {
        assert!(resolver().resolve("Completely Unrelated Enterprises").is_none());
    }

    #[test]
    fn test_token_sort_ratio_symmetry() {
        let a = "kratos defense security solutions";
        let b = "defense kratos solutions security";
        assert_eq!(token_sort_ratio(a, b), 100.0);
    }
}
