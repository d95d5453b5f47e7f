//! AllTick trade-tick integration.
//!
//! Fetches the latest traded price for a fixed symbol list in one GET
//! per cycle.
//!
//! API: `https://quote.alltick.io/quote-stock-b-api/trade-tick`
//! Auth: static token passed as the `token` query parameter.
//! Query: `query=<url-encoded compact JSON>` of the form
//! `{"trace":"<uuid>","data":{"symbol_list":[{"code":"<SYM>"},...]}}`.
//! Response: `{"data":{"tick_list":[{"code":"<SYM>","price":"<decimal>"}]}}`
//! with prices as decimal strings.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::QuoteSource;
use crate::types::{MonitorError, Quote};

const SOURCE_NAME: &str = "alltick";

// ---------------------------------------------------------------------------
// Request payload (Rust → AllTick JSON)
// ---------------------------------------------------------------------------

/// Top-level query payload. Serialized compact (no whitespace) before
/// URL-encoding, which is the form the endpoint expects.
#[derive(Debug, Serialize)]
struct QuoteQuery {
    trace: String,
    data: SymbolList,
}

#[derive(Debug, Serialize)]
struct SymbolList {
    symbol_list: Vec<SymbolRef>,
}

#[derive(Debug, Serialize)]
struct SymbolRef {
    code: String,
}

// ---------------------------------------------------------------------------
// API response types (AllTick JSON → Rust)
// ---------------------------------------------------------------------------

// No serde defaults here: a body missing `data` or `tick_list` must fail
// decode and surface as a Parse error, not read as an empty cycle.

#[derive(Debug, Deserialize)]
struct TickResponse {
    data: TickData,
}

#[derive(Debug, Deserialize)]
struct TickData {
    tick_list: Vec<TickEntry>,
}

/// One tick as the API sends it. `Quote`'s `Decimal` deserializer
/// accepts the decimal-string price directly.
#[derive(Debug, Deserialize)]
struct TickEntry {
    code: String,
    price: rust_decimal::Decimal,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// AllTick trade-tick client. The request URL is fixed per run: the
/// symbol list is static and the trace UUID is generated once at
/// construction.
pub struct AllTickClient {
    http: Client,
    url: String,
}

impl AllTickClient {
    pub fn new(
        base_url: &str,
        token: &str,
        symbols: &[String],
        timeout: Duration,
    ) -> Result<Self, MonitorError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("TICKWATCH/0.1.0 (stock-monitor)")
            .build()
            .map_err(|e| MonitorError::Network(format!("Failed to build HTTP client: {e}")))?;

        let url = build_url(base_url, token, symbols)?;

        Ok(Self { http, url })
    }

    /// The full request URL (token included). Exposed for tests.
    #[cfg(test)]
    pub(crate) fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteSource for AllTickClient {
    async fn fetch_ticks(&self) -> Result<Vec<Quote>, MonitorError> {
        debug!(source = SOURCE_NAME, "Fetching ticks");

        let resp = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| MonitorError::Network(format!("AllTick request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MonitorError::Network(format!(
                "AllTick API error {status}: {body}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| MonitorError::Network(format!("Failed to read response body: {e}")))?;

        decode_ticks(&body)
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Wire helpers
// ---------------------------------------------------------------------------

/// Build the full GET URL: `<base>?token=<token>&query=<encoded payload>`.
fn build_url(base_url: &str, token: &str, symbols: &[String]) -> Result<String, MonitorError> {
    let query = QuoteQuery {
        trace: uuid::Uuid::new_v4().to_string(),
        data: SymbolList {
            symbol_list: symbols
                .iter()
                .map(|code| SymbolRef { code: code.clone() })
                .collect(),
        },
    };

    // serde_json compact form matches what the endpoint expects.
    let query_json = serde_json::to_string(&query)
        .map_err(|e| MonitorError::Parse(format!("Failed to serialize query payload: {e}")))?;
    let encoded = urlencoding::encode(&query_json);

    Ok(format!("{base_url}?token={token}&query={encoded}"))
}

/// Decode a response body into quotes. Any shape mismatch is a Parse
/// error; the cycle is skipped, never crashed.
fn decode_ticks(body: &str) -> Result<Vec<Quote>, MonitorError> {
    let parsed: TickResponse = serde_json::from_str(body)
        .map_err(|e| MonitorError::Parse(format!("Malformed AllTick response: {e}")))?;

    Ok(parsed
        .data
        .tick_list
        .into_iter()
        .map(|tick| Quote {
            code: tick.code,
            price: tick.price,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn symbols() -> Vec<String> {
        vec!["3690.HK".to_string(), "9618.HK".to_string()]
    }

    #[test]
    fn test_build_url_encodes_compact_payload() {
        let url = build_url("https://quote.example.io/trade-tick", "tok-123", &symbols()).unwrap();

        assert!(url.starts_with("https://quote.example.io/trade-tick?token=tok-123&query="));
        let encoded = url.split("&query=").nth(1).unwrap();
        let decoded = urlencoding::decode(encoded).unwrap();

        // Compact JSON: no spaces, exact key order.
        assert!(decoded.contains(r#""data":{"symbol_list":[{"code":"3690.HK"},{"code":"9618.HK"}]}"#));
        assert!(!decoded.contains(' '));
        assert!(decoded.starts_with(r#"{"trace":""#));
    }

    #[test]
    fn test_url_is_static_per_client() {
        let client = AllTickClient::new(
            "https://quote.example.io/trade-tick",
            "tok-123",
            &symbols(),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(client.url(), client.url());
        assert_eq!(client.name(), "alltick");
    }

    #[test]
    fn test_decode_ticks_happy_path() {
        let body = r#"{
            "data": {
                "tick_list": [
                    {"code": "3690.HK", "price": "118.35"},
                    {"code": "9618.HK", "price": "130.1"}
                ]
            }
        }"#;
        let quotes = decode_ticks(body).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].code, "3690.HK");
        assert_eq!(quotes[0].price, dec!(118.35));
        assert_eq!(quotes[1].price, dec!(130.1));
    }

    #[test]
    fn test_decode_ticks_empty_list() {
        let quotes = decode_ticks(r#"{"data":{"tick_list":[]}}"#).unwrap();
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_decode_ticks_missing_tick_list_is_parse_error() {
        let err = decode_ticks(r#"{"data":{}}"#).unwrap_err();
        assert!(matches!(err, MonitorError::Parse(_)));
    }

    #[test]
    fn test_decode_ticks_missing_data_is_parse_error() {
        let err = decode_ticks(r#"{"ret": 200}"#).unwrap_err();
        assert!(matches!(err, MonitorError::Parse(_)));
    }

    #[test]
    fn test_decode_ticks_non_json_is_parse_error() {
        let err = decode_ticks("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, MonitorError::Parse(_)));
    }
}
