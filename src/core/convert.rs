//! Rate rounding, inversion and conversion rendering

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Display;

const RATE_SCALE: f64 = 10_000.0;

/// Rounds to 4 decimal places. Non-finite input is returned unchanged.
pub fn round_rate(rate: f64) -> f64 {
    if !rate.is_finite() {
        return rate;
    }
    (rate * RATE_SCALE).round() / RATE_SCALE
}

/// Inverse of `rate` rounded to 4 decimal places.
///
/// A missing, zero or non-finite rate has no meaningful inverse and yields `0.0`.
pub fn reverse_rate(rate: impl Into<Option<f64>>) -> f64 {
    match rate.into() {
        Some(r) if r != 0.0 && r.is_finite() => round_rate(1.0 / r),
        _ => 0.0,
    }
}

/// Renders a one-sentence summary of converting `amount` at `rate`.
pub fn format_output(
    date: impl Display,
    from_currency: &str,
    to_currency: &str,
    rate: f64,
    amount: f64,
) -> String {
    let rounded_rate = round_rate(rate);
    let converted_amount = round_rate(amount * rounded_rate);
    let inverse = reverse_rate(rounded_rate);
    let amount_rounded = round_rate(amount);

    format!(
        "The conversion rate on {date} from {from_currency} to {to_currency} was {rounded_rate}. \
         So {amount_rounded} in {from_currency} correspond to {converted_amount} in {to_currency}. \
         The inverse rate was {inverse}."
    )
}

/// Result of converting an amount at the rate published for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub date: NaiveDate,
    pub from: String,
    pub to: String,
    /// Unit rate as returned by the provider.
    pub rate: f64,
    pub amount: f64,
    pub converted_amount: f64,
    pub inverse_rate: f64,
}

impl Conversion {
    /// Derived amounts use the 4-decimal rate so they agree with [`format_output`].
    pub fn new(date: NaiveDate, from: &str, to: &str, rate: f64, amount: f64) -> Self {
        let rounded_rate = round_rate(rate);
        Conversion {
            date,
            from: from.to_string(),
            to: to.to_string(),
            rate,
            amount,
            converted_amount: round_rate(amount * rounded_rate),
            inverse_rate: reverse_rate(rounded_rate),
        }
    }

    pub fn rounded_rate(&self) -> f64 {
        round_rate(self.rate)
    }

    pub fn summary(&self) -> String {
        format_output(self.date, &self.from, &self.to, self.rate, self.amount)
    }
}
