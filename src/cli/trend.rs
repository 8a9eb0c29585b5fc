use super::{resolve_pair, ui};
use crate::core::config::{AppConfig, check_trend_years};
use crate::core::trend::{RateTrend, TrendCache};
use crate::core::{ExchangeRateProvider, round_rate};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use comfy_table::{Cell, Color, Table};
use tracing::info;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Default)]
pub struct TrendRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub years: Option<u32>,
}

pub async fn run(
    provider: &dyn ExchangeRateProvider,
    config: &AppConfig,
    request: TrendRequest,
) -> Result<()> {
    let years = check_trend_years(request.years.unwrap_or(config.trend_years))?;
    let (pair, _) = resolve_pair(
        provider,
        config,
        request.from.as_deref(),
        request.to.as_deref(),
    )
    .await?;

    let today = Local::now().date_naive();
    let cache = TrendCache::new();
    let trend = load_trend(&cache, provider, &pair.from, &pair.to, years, today).await;
    display_trend(&trend, years);
    Ok(())
}

/// Loads a trend through `cache` behind a spinner.
pub async fn load_trend(
    cache: &TrendCache,
    provider: &dyn ExchangeRateProvider,
    from: &str,
    to: &str,
    years: u32,
    today: NaiveDate,
) -> RateTrend {
    info!(from, to, years, "Loading rate trend");
    let pb = ui::new_spinner(&format!("Fetching {from}/{to} rates for the last {years} years..."));
    let trend = cache.load(provider, from, to, years, today).await;
    pb.finish_and_clear();
    trend
}

pub fn display_trend(trend: &RateTrend, years: u32) {
    if trend.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "Rate trend data is not available right now. Please try again later.",
                ui::StyleType::Info
            )
        );
        return;
    }

    let title = format!(
        "{}/{} Rate Trend Over the Last {} {}",
        trend.from,
        trend.to,
        years,
        if years == 1 { "Year" } else { "Years" }
    );
    println!("\n{}", ui::style_text(&title, ui::StyleType::Title));
    println!("{}", trend_table(trend));

    let skipped = trend.skipped().count();
    if skipped > 0 {
        let note = format!(
            "{} of {} quarterly samples were unavailable.",
            skipped,
            trend.samples.len()
        );
        println!("{}", ui::style_text(&note, ui::StyleType::Subtle));
    }
}

fn trend_table(trend: &RateTrend) -> Table {
    let series = trend.series();
    let (min, max) = series
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(*r), hi.max(*r))
        });

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell(""),
    ]);
    for (date, rate) in &series {
        table.add_row(vec![
            Cell::new(date),
            ui::number_cell(round_rate(*rate)),
            Cell::new(ui::trend_bar(*rate, min, max, BAR_WIDTH)).fg(Color::Blue),
        ]);
    }
    table
}
