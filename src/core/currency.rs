//! Exchange rate abstractions

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;

const PREFERRED_FROM: &str = "EUR";
const PREFERRED_TO: &str = "USD";

/// Unit rate published for a currency pair on `date`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateQuote {
    pub date: NaiveDate,
    pub rate: f64,
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Supported currency codes mapped to their display names, sorted by code.
    async fn currencies(&self) -> Result<BTreeMap<String, String>>;

    /// Most recently published rate for one unit of `from` in `to`.
    async fn latest_rate(&self, from: &str, to: &str) -> Result<RateQuote>;

    /// Rate for one unit of `from` in `to` on `date`.
    async fn historical_rate(&self, date: NaiveDate, from: &str, to: &str) -> Result<f64>;
}

/// Normalizes user input into an upper-case currency code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Fails unless `code` is one of the provider's currencies.
pub fn ensure_listed(currencies: &BTreeMap<String, String>, code: &str) -> Result<()> {
    if currencies.contains_key(code) {
        Ok(())
    } else {
        Err(anyhow!("Unsupported currency: {}", code))
    }
}

/// Picks the conversion pair used when the user names neither side.
///
/// Configured codes win when listed. Otherwise `from` falls back to EUR, then
/// the first code; `to` falls back to USD, then the first code other than `from`.
pub fn default_pair(
    currencies: &BTreeMap<String, String>,
    preferred_from: Option<&str>,
    preferred_to: Option<&str>,
) -> Option<(String, String)> {
    let listed = |code: &str| currencies.contains_key(code);

    let from = preferred_from
        .filter(|c| listed(*c))
        .or_else(|| Some(PREFERRED_FROM).filter(|c| listed(*c)))
        .or_else(|| currencies.keys().next().map(String::as_str))?
        .to_string();

    let to = preferred_to
        .filter(|c| listed(*c) && *c != from)
        .or_else(|| Some(PREFERRED_TO).filter(|c| listed(*c) && *c != from))
        .or_else(|| {
            currencies
                .keys()
                .map(String::as_str)
                .find(|c| *c != from)
        })
        .unwrap_or(from.as_str())
        .to_string();

    Some((from, to))
}
