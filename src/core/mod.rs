//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod convert;
pub mod currency;
pub mod log;
pub mod trend;

// Re-export main types for cleaner imports
pub use convert::{Conversion, format_output, reverse_rate, round_rate};
pub use currency::{ExchangeRateProvider, RateQuote};
pub use trend::{RateTrend, SampleOutcome, TrendSample};
