//! Remote rate source over HTTP.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use bookstore_common::Currency;
use reqwest::header::ACCEPT;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::RateSourceConfig;
use crate::error::{FxError, FxResult};
use crate::provider::{record_outcome, RateProvider};
use crate::rate::ExchangeRate;

/// Body of the rate source: `{"base": "USD", "rates": {"EUR": 0.92, ...}}`.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, serde_json::Value>,
}

/// Provider issuing one GET per lookup, with no retries.
pub struct HttpRateProvider {
    client: Client,
    config: RateSourceConfig,
}

impl HttpRateProvider {
    /// Create a provider for the configured endpoint.
    pub fn new(config: RateSourceConfig) -> FxResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FxError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RateSourceConfig {
        &self.config
    }

    async fn request_rate(&self, currency: &Currency) -> FxResult<Decimal> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FxError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        parse_rate(&body, currency)
    }

    fn classify(&self, err: reqwest::Error) -> FxError {
        if err.is_timeout() {
            FxError::Timeout(self.config.timeout)
        } else if err.is_decode() {
            FxError::Parse(err.to_string())
        } else {
            FxError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(endpoint = %self.config.endpoint))]
    async fn fetch(&self, target: Option<&Currency>) -> ExchangeRate {
        let currency = target
            .cloned()
            .unwrap_or_else(|| self.config.fallback.currency().clone());

        debug!(currency = %currency, "Requesting exchange rate");

        // The client timeout covers the request; this also bounds the body read.
        let result = match tokio::time::timeout(self.config.timeout, self.request_rate(&currency))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(FxError::Timeout(self.config.timeout)),
        };

        let rate = match result.and_then(|rate| ExchangeRate::live(rate, currency.clone())) {
            Ok(live) => live,
            Err(reason) => self.config.fallback.substitute(reason),
        };

        record_outcome(self.name(), &currency, &rate);
        rate
    }
}

/// Extract the rate for `currency` from a response body.
///
/// Numbers keep their JSON text (serde_json `arbitrary_precision`), so
/// `1.235` stays exactly `1.235` and long rates are not cut to `f64`.
fn parse_rate(body: &[u8], currency: &Currency) -> FxResult<Decimal> {
    let parsed: RatesResponse =
        serde_json::from_slice(body).map_err(|e| FxError::Parse(e.to_string()))?;

    let value = parsed
        .rates
        .get(currency.code())
        .ok_or_else(|| FxError::CurrencyNotFound(currency.clone()))?;

    let text = match value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => {
            return Err(FxError::Parse(format!(
                "rate for {} is not a number: {}",
                currency, other
            )))
        }
    };

    let rate = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| FxError::InvalidRate {
            currency: currency.clone(),
            rate: text.clone(),
        })?;

    if rate <= Decimal::ZERO {
        return Err(FxError::InvalidRate {
            currency: currency.clone(),
            rate: text,
        });
    }

    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackRate;
    use rust_decimal_macros::dec;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const RATES_BODY: &str =
        r#"{"base":"USD","date":"2024-05-01","rates":{"USD":1,"EUR":0.92,"COP":3907.5,"MXN":1.235}}"#;

    /// Serve `status` + `body` to every connection after `delay`.
    async fn serve(status: &'static str, body: &'static str, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    tokio::time::sleep(delay).await;
                    let response = format!(
                        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}/v4/latest/USD", addr)
    }

    fn provider(endpoint: String, timeout: Duration) -> HttpRateProvider {
        HttpRateProvider::new(RateSourceConfig {
            endpoint,
            timeout,
            fallback: FallbackRate::new(dec!(4000), Currency::new("COP")).unwrap(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_live_rate() {
        let url = serve("200 OK", RATES_BODY, Duration::ZERO).await;
        let rate = provider(url, Duration::from_secs(5))
            .fetch(Some(&Currency::new("EUR")))
            .await;

        assert_eq!(
            rate,
            ExchangeRate::Live {
                rate: dec!(0.92),
                currency: Currency::new("EUR")
            }
        );
    }

    #[tokio::test]
    async fn test_rate_keeps_decimal_text() {
        let url = serve("200 OK", RATES_BODY, Duration::ZERO).await;
        let rate = provider(url, Duration::from_secs(5))
            .fetch(Some(&Currency::new("MXN")))
            .await;

        assert_eq!(rate.rate(), dec!(1.235));
        assert_eq!(rate.rate().to_string(), "1.235");
    }

    #[tokio::test]
    async fn test_default_currency_is_requested_when_omitted() {
        let url = serve("200 OK", RATES_BODY, Duration::ZERO).await;
        let rate = provider(url, Duration::from_secs(5)).fetch(None).await;

        assert!(rate.is_live());
        assert_eq!(rate.currency().code(), "COP");
        assert_eq!(rate.rate(), dec!(3907.5));
    }

    #[tokio::test]
    async fn test_missing_currency_falls_back() {
        let url = serve("200 OK", RATES_BODY, Duration::ZERO).await;
        let rate = provider(url, Duration::from_secs(5))
            .fetch(Some(&Currency::new("JPY")))
            .await;

        assert!(!rate.is_live());
        assert_eq!(rate.rate(), dec!(4000));
        assert_eq!(rate.currency().code(), "COP");
        assert_eq!(rate.fallback_reason().map(|r| r.outcome()), Some("currency_not_found"));
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let url = serve("200 OK", "<html>oops</html>", Duration::ZERO).await;
        let rate = provider(url, Duration::from_secs(5))
            .fetch(Some(&Currency::new("EUR")))
            .await;

        assert!(!rate.is_live());
        assert!(matches!(rate.fallback_reason(), Some(FxError::Parse(_))));
    }

    #[tokio::test]
    async fn test_missing_rates_key_falls_back() {
        let url = serve("200 OK", r#"{"result":"error"}"#, Duration::ZERO).await;
        let rate = provider(url, Duration::from_secs(5))
            .fetch(Some(&Currency::new("EUR")))
            .await;

        assert!(matches!(rate.fallback_reason(), Some(FxError::Parse(_))));
    }

    #[tokio::test]
    async fn test_non_positive_rate_falls_back() {
        let url = serve("200 OK", r#"{"rates":{"EUR":0}}"#, Duration::ZERO).await;
        let rate = provider(url, Duration::from_secs(5))
            .fetch(Some(&Currency::new("EUR")))
            .await;

        assert!(!rate.is_live());
        assert_eq!(rate.rate(), dec!(4000));
        assert!(matches!(rate.fallback_reason(), Some(FxError::InvalidRate { .. })));
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let url = serve("500 Internal Server Error", "{}", Duration::ZERO).await;
        let rate = provider(url, Duration::from_secs(5))
            .fetch(Some(&Currency::new("EUR")))
            .await;

        assert_eq!(rate.fallback_reason(), Some(&FxError::Status(500)));
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let url = serve("200 OK", RATES_BODY, Duration::from_secs(5)).await;
        let started = std::time::Instant::now();
        let rate = provider(url, Duration::from_millis(200))
            .fetch(Some(&Currency::new("EUR")))
            .await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!rate.is_live());
        assert!(matches!(rate.fallback_reason(), Some(FxError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_unreachable_source_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let rate = provider(format!("http://{}/latest", addr), Duration::from_secs(5))
            .fetch(Some(&Currency::new("EUR")))
            .await;

        assert!(!rate.is_live());
        assert_eq!(rate.currency().code(), "COP");
        assert!(matches!(rate.fallback_reason(), Some(FxError::Transport(_))));
    }

    #[test]
    fn test_parse_rate_accepts_string_and_scientific() {
        let eur = Currency::new("EUR");
        assert_eq!(parse_rate(br#"{"rates":{"EUR":"0.92"}}"#, &eur).unwrap(), dec!(0.92));
        assert_eq!(parse_rate(br#"{"rates":{"EUR":9.2e-1}}"#, &eur).unwrap(), dec!(0.92));
        assert!(parse_rate(br#"{"rates":{"EUR":null}}"#, &eur).is_err());
        assert!(parse_rate(br#"{"rates":[]}"#, &eur).is_err());
    }

    #[test]
    fn test_parse_rate_keeps_digits_beyond_f64() {
        let cop = Currency::new("COP");
        let rate = parse_rate(br#"{"rates":{"COP":3907.123456789012345678}}"#, &cop).unwrap();

        assert_eq!(rate, dec!(3907.123456789012345678));
        assert_eq!(rate.to_string(), "3907.123456789012345678");
    }
}
