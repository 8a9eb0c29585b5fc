pub mod convert;
pub mod currencies;
pub mod setup;
pub mod trend;
pub mod ui;

use crate::core::config::AppConfig;
use crate::core::currency::{self, ExchangeRateProvider};
use anyhow::{Context, Result, anyhow};
use std::collections::BTreeMap;

/// Currency pair to convert, resolved against the provider's currency list.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyPair {
    pub from: String,
    pub to: String,
}

/// Fills in missing codes from config or defaults and checks both are supported.
pub async fn resolve_pair(
    provider: &dyn ExchangeRateProvider,
    config: &AppConfig,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(CurrencyPair, BTreeMap<String, String>)> {
    let currencies = provider
        .currencies()
        .await
        .context("Unable to retrieve currency list from Frankfurter API")?;

    let from = from.or(config.from.as_deref()).map(currency::normalize_code);
    let to = to.or(config.to.as_deref()).map(currency::normalize_code);
    let (default_from, default_to) =
        currency::default_pair(&currencies, from.as_deref(), to.as_deref())
            .ok_or_else(|| anyhow!("Frankfurter API returned no currencies"))?;

    let pair = CurrencyPair {
        from: from.unwrap_or(default_from),
        to: to.unwrap_or(default_to),
    };
    currency::ensure_listed(&currencies, &pair.from)?;
    currency::ensure_listed(&currencies, &pair.to)?;
    Ok((pair, currencies))
}
