use super::trend::{display_trend, load_trend};
use super::{CurrencyPair, resolve_pair, ui};
use crate::core::config::{AppConfig, check_trend_years};
use crate::core::trend::{RateTrend, TrendCache};
use crate::core::{Conversion, ExchangeRateProvider};
use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use comfy_table::{Cell, Table};
use serde_json::{Value, json};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ConvertRequest {
    pub amount: f64,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Historical dates to convert at; the latest rate is used when empty.
    pub dates: Vec<NaiveDate>,
    pub trend: bool,
    pub years: Option<u32>,
    pub json: bool,
}

pub async fn run(
    provider: &dyn ExchangeRateProvider,
    config: &AppConfig,
    request: ConvertRequest,
) -> Result<()> {
    let today = Local::now().date_naive();
    let years = request.years.unwrap_or(config.trend_years);
    validate(&request, years, today)?;

    let (pair, _) = resolve_pair(
        provider,
        config,
        request.from.as_deref(),
        request.to.as_deref(),
    )
    .await?;
    debug!(?pair, amount = request.amount, "Converting");

    let conversions = if request.dates.is_empty() {
        vec![convert_latest(provider, &pair, request.amount).await?]
    } else {
        let mut conversions = Vec::with_capacity(request.dates.len());
        for date in &request.dates {
            conversions.push(convert_historical(provider, &pair, *date, request.amount).await?);
        }
        conversions
    };

    let trend_cache = TrendCache::new();

    if request.json {
        let trend = if request.trend {
            Some(load_trend(&trend_cache, provider, &pair.from, &pair.to, years, today).await)
        } else {
            None
        };
        let output = json_report(&conversions, trend.as_ref());
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let count = conversions.len();
    for (i, conversion) in conversions.iter().enumerate() {
        display_conversion(conversion);
        if request.trend {
            // Same pair and horizon every time, so only the first load fetches.
            let trend =
                load_trend(&trend_cache, provider, &pair.from, &pair.to, years, today).await;
            display_trend(&trend, years);
        }
        if i < count - 1 {
            ui::print_separator();
        }
    }
    Ok(())
}

fn validate(request: &ConvertRequest, years: u32, today: NaiveDate) -> Result<()> {
    if !request.amount.is_finite() || request.amount <= 0.0 {
        bail!("Please enter an amount greater than zero to convert.");
    }
    if let Some(date) = request.dates.iter().find(|d| **d > today) {
        bail!("Date {} is in the future; the latest rate is for {}", date, today);
    }
    if request.trend {
        check_trend_years(years)?;
    }
    Ok(())
}

/// Conversions plus, when requested, the trend keyed by ISO date.
fn json_report(conversions: &[Conversion], trend: Option<&RateTrend>) -> Value {
    json!({
        "conversions": conversions,
        "trend": trend.map(RateTrend::series),
    })
}

async fn convert_latest(
    provider: &dyn ExchangeRateProvider,
    pair: &CurrencyPair,
    amount: f64,
) -> Result<Conversion> {
    let pb = ui::new_spinner("Fetching latest rate...");
    let result = provider.latest_rate(&pair.from, &pair.to).await;
    pb.finish_and_clear();

    let quote = result.context("Unable to fetch latest conversion rate")?;
    Ok(Conversion::new(quote.date, &pair.from, &pair.to, quote.rate, amount))
}

async fn convert_historical(
    provider: &dyn ExchangeRateProvider,
    pair: &CurrencyPair,
    date: NaiveDate,
    amount: f64,
) -> Result<Conversion> {
    let pb = ui::new_spinner(&format!("Fetching rate for {date}..."));
    let result = provider.historical_rate(date, &pair.from, &pair.to).await;
    pb.finish_and_clear();

    let rate =
        result.with_context(|| format!("Unable to fetch historical conversion rate for {date}"))?;
    Ok(Conversion::new(date, &pair.from, &pair.to, rate, amount))
}

fn display_conversion(conversion: &Conversion) {
    println!(
        "\n{}",
        ui::style_text(&conversion.summary(), ui::StyleType::Success)
    );
    println!("{}", conversion_table(conversion));
}

fn conversion_table(conversion: &Conversion) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell(&format!("Converted Amount ({})", conversion.to)),
        ui::header_cell("Inverse Rate"),
    ]);
    table.add_row(vec![
        Cell::new(conversion.date),
        ui::number_cell(conversion.rounded_rate()),
        ui::highlight_cell(conversion.converted_amount),
        ui::number_cell(conversion.inverse_rate),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trend::{SampleOutcome, TrendSample};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(amount: f64) -> ConvertRequest {
        ConvertRequest {
            amount,
            ..ConvertRequest::default()
        }
    }

    #[test]
    fn test_validate_rejects_non_positive_amount() {
        let today = ymd(2024, 6, 1);
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = validate(&request(amount), 2, today).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Please enter an amount greater than zero to convert."
            );
        }
        assert!(validate(&request(0.01), 2, today).is_ok());
    }

    #[test]
    fn test_validate_rejects_future_date() {
        let today = ymd(2024, 6, 1);
        let mut req = request(10.0);
        req.dates = vec![ymd(2024, 6, 1), ymd(2024, 6, 2)];
        let err = validate(&req, 2, today).unwrap_err();
        assert!(err.to_string().starts_with("Date 2024-06-02 is in the future"));

        req.dates = vec![ymd(2024, 6, 1), ymd(1999, 1, 4)];
        assert!(validate(&req, 2, today).is_ok());
    }

    #[test]
    fn test_validate_checks_resolved_trend_years() {
        let today = ymd(2024, 6, 1);
        let mut req = request(10.0);
        assert!(validate(&req, 0, today).is_ok());

        req.trend = true;
        for years in [0, 26] {
            let err = validate(&req, years, today).unwrap_err();
            assert!(err.to_string().starts_with("Trend horizon must be between 1 and 25"));
        }
        assert!(validate(&req, 25, today).is_ok());
    }

    #[test]
    fn test_json_report_shape() {
        let conversion = Conversion::new(ymd(2024, 1, 1), "EUR", "USD", 1.1, 100.0);
        let trend = RateTrend {
            from: "EUR".to_string(),
            to: "USD".to_string(),
            samples: vec![
                TrendSample {
                    date: ymd(2023, 10, 1),
                    outcome: SampleOutcome::Rate(1.05),
                },
                TrendSample {
                    date: ymd(2023, 7, 1),
                    outcome: SampleOutcome::Skipped("HTTP error: 500".to_string()),
                },
            ],
        };

        let report = json_report(std::slice::from_ref(&conversion), Some(&trend));
        let conversions = report["conversions"].as_array().unwrap();
        assert_eq!(conversions.len(), 1);
        assert_eq!(conversions[0]["date"], "2024-01-01");
        assert_eq!(conversions[0]["converted_amount"], 110.0);
        assert_eq!(conversions[0]["inverse_rate"], 0.9091);

        let trend_json = report["trend"].as_object().unwrap();
        assert_eq!(trend_json.len(), 1);
        assert_eq!(trend_json["2023-10-01"], 1.05);

        let report = json_report(&[conversion], None);
        assert!(report["trend"].is_null());
    }

    #[test]
    fn test_conversion_table_contents() {
        let conversion = Conversion::new(ymd(2024, 1, 1), "EUR", "USD", 1.1, 100.0);
        let rendered = conversion_table(&conversion).to_string();
        assert!(rendered.contains("Converted Amount (USD)"));
        assert!(rendered.contains("2024-01-01"));
        assert!(rendered.contains("1.1"));
        assert!(rendered.contains("110"));
        assert!(rendered.contains("0.9091"));
    }
}
