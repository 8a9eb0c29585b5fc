//! Quarterly rate trend built from repeated historical lookups

use crate::core::cache::Cache;
use crate::core::currency::ExchangeRateProvider;
use chrono::{Months, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

const MONTHS_PER_QUARTER: u32 = 3;
const QUARTERS_PER_YEAR: u32 = 4;

/// Subtracts whole months, clamping the day to the end of the target month.
///
/// Returns `None` only when the result falls outside chrono's date range.
pub fn subtract_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(months))
}

/// Sample dates 3, 6, 9, ... months before `today`, newest first.
///
/// Stops early if a date would fall before chrono's minimum date.
pub fn quarter_dates(today: NaiveDate, years: u32) -> Vec<NaiveDate> {
    (1..=years.saturating_mul(QUARTERS_PER_YEAR))
        .map_while(|i| {
            i.checked_mul(MONTHS_PER_QUARTER)
                .and_then(|months| subtract_months(today, months))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    Rate(f64),
    /// The lookup failed; holds the reason.
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSample {
    pub date: NaiveDate,
    pub outcome: SampleOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateTrend {
    pub from: String,
    pub to: String,
    pub samples: Vec<TrendSample>,
}

impl RateTrend {
    /// Successful samples in chronological order.
    pub fn series(&self) -> BTreeMap<NaiveDate, f64> {
        self.samples
            .iter()
            .filter_map(|s| match s.outcome {
                SampleOutcome::Rate(rate) => Some((s.date, rate)),
                SampleOutcome::Skipped(_) => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &TrendSample> {
        self.samples
            .iter()
            .filter(|s| matches!(s.outcome, SampleOutcome::Skipped(_)))
    }

    /// True when no sample produced a rate.
    pub fn is_empty(&self) -> bool {
        self.series().is_empty()
    }
}

/// Looks up the unit rate at every quarter boundary of the last `years` years.
///
/// Lookups run one after another. A failed lookup is recorded as skipped and
/// never aborts the remaining ones, so the result may be partial or empty.
#[instrument(name = "RateTrend", skip(provider))]
pub async fn build_trend(
    provider: &dyn ExchangeRateProvider,
    from: &str,
    to: &str,
    years: u32,
    today: NaiveDate,
) -> RateTrend {
    let mut samples = Vec::new();
    for date in quarter_dates(today, years) {
        let outcome = match provider.historical_rate(date, from, to).await {
            Ok(rate) => SampleOutcome::Rate(rate),
            Err(e) => {
                warn!(%date, error = %e, "Skipping trend sample");
                SampleOutcome::Skipped(e.to_string())
            }
        };
        samples.push(TrendSample { date, outcome });
    }

    let trend = RateTrend {
        from: from.to_string(),
        to: to.to_string(),
        samples,
    };
    debug!(
        fetched = trend.series().len(),
        skipped = trend.skipped().count(),
        "Built rate trend"
    );
    trend
}

type TrendKey = (String, String, u32, NaiveDate);

/// Memoizes trends per pair, horizon and day for the life of the process.
#[derive(Clone, Default)]
pub struct TrendCache {
    cache: Cache<TrendKey, RateTrend>,
}

impl TrendCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(
        &self,
        provider: &dyn ExchangeRateProvider,
        from: &str,
        to: &str,
        years: u32,
        today: NaiveDate,
    ) -> RateTrend {
        let key = (from.to_string(), to.to_string(), years, today);
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }
        let trend = build_trend(provider, from, to, years, today).await;
        self.cache.put(key, trend.clone()).await;
        trend
    }
}
