//! Accessor for the Frankfurter exchange rate API.
//!
//! Rates are always requested without an `amount`, so the server answers with
//! the unit rate and callers scale amounts locally.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, instrument};

use super::http::{FetchResponse, HttpClient, HttpFetcher};
use crate::core::currency::{ExchangeRateProvider, RateQuote};

pub struct FrankfurterProvider<F: HttpFetcher = HttpClient> {
    fetcher: F,
}

impl FrankfurterProvider<HttpClient> {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(FrankfurterProvider {
            fetcher: HttpClient::new(base_url, timeout)?,
        })
    }
}

impl<F: HttpFetcher> FrankfurterProvider<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        FrankfurterProvider { fetcher }
    }

    async fn fetch_rates(&self, endpoint: &str, from: &str, to: &str) -> Result<RatesResponse> {
        let response = self
            .fetcher
            .get(endpoint, &[("from", from), ("to", to)])
            .await?;
        let body = ensure_ok(&response, endpoint)?;
        serde_json::from_str(body)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", endpoint, e))
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    date: Option<String>,
    rates: HashMap<String, f64>,
}

impl RatesResponse {
    fn rate_for(&self, to: &str) -> Result<f64> {
        let rate = *self
            .rates
            .get(to)
            .ok_or_else(|| anyhow!("No rate for {} in response", to))?;
        if !rate.is_finite() || rate < 0.0 {
            return Err(anyhow!("Invalid rate {} for {}", rate, to));
        }
        Ok(rate)
    }
}

fn ensure_ok<'a>(response: &'a FetchResponse, endpoint: &str) -> Result<&'a str> {
    if !response.is_ok() {
        return Err(anyhow!(
            "HTTP error: {} for endpoint: {}",
            response.status,
            endpoint
        ));
    }
    Ok(&response.body)
}

#[async_trait]
impl<F: HttpFetcher> ExchangeRateProvider for FrankfurterProvider<F> {
    #[instrument(name = "FrankfurterCurrencies", skip(self))]
    async fn currencies(&self) -> Result<BTreeMap<String, String>> {
        let endpoint = "/currencies";
        let response = self.fetcher.get(endpoint, &[]).await?;
        let body = ensure_ok(&response, endpoint)?;
        let currencies: BTreeMap<String, String> = serde_json::from_str(body)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", endpoint, e))?;
        debug!(count = currencies.len(), "Received currency list");
        Ok(currencies)
    }

    #[instrument(name = "FrankfurterLatest", skip(self))]
    async fn latest_rate(&self, from: &str, to: &str) -> Result<RateQuote> {
        let data = self.fetch_rates("/latest", from, to).await?;
        let rate = data.rate_for(to)?;
        let date = data
            .date
            .as_deref()
            .ok_or_else(|| anyhow!("No date in latest rate response"))?
            .parse::<NaiveDate>()
            .map_err(|e| anyhow!("Invalid date in latest rate response: {}", e))?;
        Ok(RateQuote { date, rate })
    }

    #[instrument(name = "FrankfurterHistorical", skip(self))]
    async fn historical_rate(&self, date: NaiveDate, from: &str, to: &str) -> Result<f64> {
        let endpoint = format!("/{date}");
        let data = self.fetch_rates(&endpoint, from, to).await?;
        if let Some(published) = data.date.as_deref() {
            debug!(requested = %date, published, "Historical rate date");
        }
        data.rate_for(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(mock_server: &MockServer) -> FrankfurterProvider {
        FrankfurterProvider::new(&mock_server.uri(), Duration::from_secs(10)).unwrap()
    }

    async fn mount(mock_server: &MockServer, url_path: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_currencies_success() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            "/currencies",
            200,
            r#"{"USD":"US Dollar","EUR":"Euro"}"#,
        )
        .await;

        let currencies = provider(&mock_server).currencies().await.unwrap();
        assert_eq!(
            currencies.keys().cloned().collect::<Vec<_>>(),
            vec!["EUR".to_string(), "USD".to_string()]
        );
        assert_eq!(currencies["USD"], "US Dollar");
    }

    #[tokio::test]
    async fn test_currencies_not_found() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, "/currencies", 404, "").await;

        let result = provider(&mock_server).currencies().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 404 for endpoint: /currencies"
        );
    }

    #[tokio::test]
    async fn test_currencies_malformed_json() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, "/currencies", 200, "<html>").await;

        let result = provider(&mock_server).currencies().await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for /currencies")
        );
    }

    #[tokio::test]
    async fn test_latest_rate_uses_unit_rate() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", "EUR"))
            .and(query_param("to", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"amount":1.0,"base":"EUR","date":"2024-05-17","rates":{"USD":1.0867}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let quote = provider(&mock_server)
            .latest_rate("EUR", "USD")
            .await
            .unwrap();
        assert_eq!(quote.rate, 1.0867);
        assert_eq!(quote.date, NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
    }

    #[tokio::test]
    async fn test_latest_rate_missing_target_code() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            "/latest",
            200,
            r#"{"date":"2024-05-17","rates":{"GBP":0.85}}"#,
        )
        .await;

        let result = provider(&mock_server).latest_rate("EUR", "USD").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rate for USD in response"
        );
    }

    #[tokio::test]
    async fn test_latest_rate_missing_date() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, "/latest", 200, r#"{"rates":{"USD":1.08}}"#).await;

        let result = provider(&mock_server).latest_rate("EUR", "USD").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No date in latest rate response"
        );
    }

    #[tokio::test]
    async fn test_latest_rate_non_numeric_value() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            "/latest",
            200,
            r#"{"date":"2024-05-17","rates":{"USD":"1.08"}}"#,
        )
        .await;

        let result = provider(&mock_server).latest_rate("EUR", "USD").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for /latest")
        );
    }

    #[tokio::test]
    async fn test_historical_rate_uses_date_path() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2024-01-02"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "JPY"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"amount":1.0,"base":"USD","date":"2024-01-02","rates":{"JPY":141.84}}"#,
            ))
            .mount(&mock_server)
            .await;

        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let rate = provider(&mock_server)
            .historical_rate(date, "USD", "JPY")
            .await
            .unwrap();
        assert_eq!(rate, 141.84);
    }

    #[tokio::test]
    async fn test_historical_rate_ignores_published_date() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            "/2024-01-06",
            200,
            r#"{"date":"2024-01-05","rates":{"USD":1.0921}}"#,
        )
        .await;

        let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let rate = provider(&mock_server)
            .historical_rate(date, "EUR", "USD")
            .await
            .unwrap();
        assert_eq!(rate, 1.0921);
    }

    #[tokio::test]
    async fn test_historical_rate_server_error() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, "/2024-01-02", 500, "").await;

        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let result = provider(&mock_server)
            .historical_rate(date, "EUR", "USD")
            .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 for endpoint: /2024-01-02"
        );
    }

    #[test]
    fn test_rate_for_rejects_negative_rate() {
        let data = RatesResponse {
            date: None,
            rates: HashMap::from([("USD".to_string(), -1.0)]),
        };
        assert!(data.rate_for("USD").is_err());
    }
}
