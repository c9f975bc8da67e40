//! Payment service client.
//!
//! Checkout treats payment as an opaque asynchronous call: card details plus
//! the cart total go in, `{success, message}` comes out. Two interchangeable
//! backends satisfy that contract: a fixed stub (the default) and a
//! model-backed processor that forwards the request to the Anthropic
//! Messages API and parses the model's JSON verdict. Neither performs a real
//! financial transaction.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::PaymentConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 512;

/// Default message for an approved payment with no service-provided detail.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Payment processed successfully.";
/// Default message for a declined payment with no service-provided detail.
pub const DEFAULT_DECLINED_MESSAGE: &str = "Payment was declined.";

/// Instructions for the model acting as the payment processor.
const PROCESSOR_SYSTEM_PROMPT: &str = "You are an expert payment processor. \
You will take the payment information provided and process the payment. \
Respond with a single JSON object of the form \
{\"success\": boolean, \"message\": string} and nothing else.";

/// Errors that can occur when calling the payment service.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the service's verdict.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A payment request forwarded to the payment service.
///
/// The amount is always derived from the cart, never user-supplied.
/// Implements `Debug` manually to redact card data.
#[derive(Clone)]
pub struct PaymentRequest {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub amount: Decimal,
}

impl std::fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("card_number", &"[REDACTED]")
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"[REDACTED]")
            .field("amount", &self.amount)
            .finish()
    }
}

/// The payment service verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Whether the payment was accepted.
    pub success: bool,
    /// Detail message for display; may be empty.
    #[serde(default)]
    pub message: String,
}

impl PaymentResult {
    /// The stub verdict: approved with the default message.
    #[must_use]
    pub fn approved() -> Self {
        Self {
            success: true,
            message: DEFAULT_SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Message to surface to the user, falling back to a default when the
    /// service returned none.
    #[must_use]
    pub fn display_message(&self) -> &str {
        if !self.message.is_empty() {
            &self.message
        } else if self.success {
            DEFAULT_SUCCESS_MESSAGE
        } else {
            DEFAULT_DECLINED_MESSAGE
        }
    }
}

/// Client for the payment service.
///
/// Cheaply cloneable via `Arc`. Makes a single call per checkout attempt;
/// retries are the caller's decision (and checkout never retries).
#[derive(Clone)]
pub struct PaymentClient {
    inner: Arc<PaymentBackend>,
}

enum PaymentBackend {
    /// Returns a fixed result without any external call.
    Fixed(PaymentResult),
    /// Forwards the request to a language model acting as the processor.
    Model {
        client: reqwest::Client,
        endpoint: String,
        model: String,
    },
}

impl PaymentClient {
    /// Create a payment client from configuration.
    ///
    /// With an API key configured this is the model-backed processor;
    /// without one it is the always-approve stub.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        let backend = match &config.api_key {
            Some(api_key) => {
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                headers.insert(
                    "x-api-key",
                    HeaderValue::from_str(api_key.expose_secret())
                        .expect("Invalid API key for header"),
                );
                headers.insert(
                    "anthropic-version",
                    HeaderValue::from_static(ANTHROPIC_VERSION),
                );

                let client = reqwest::Client::builder()
                    .default_headers(headers)
                    .build()
                    .expect("Failed to build HTTP client");

                PaymentBackend::Model {
                    client,
                    endpoint: config.api_url.clone(),
                    model: config.model.clone(),
                }
            }
            None => PaymentBackend::Fixed(PaymentResult::approved()),
        };

        Self {
            inner: Arc::new(backend),
        }
    }

    /// Create a client that returns a fixed result without any external
    /// call. Used for local runs and tests.
    #[must_use]
    pub fn fixed(result: PaymentResult) -> Self {
        Self {
            inner: Arc::new(PaymentBackend::Fixed(result)),
        }
    }

    /// Process a payment request.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails or its verdict cannot be
    /// parsed. The stub backend never fails.
    #[instrument(skip(self, request), fields(amount = %request.amount))]
    pub async fn process(&self, request: &PaymentRequest) -> Result<PaymentResult, PaymentError> {
        match self.inner.as_ref() {
            PaymentBackend::Fixed(result) => Ok(result.clone()),
            PaymentBackend::Model {
                client,
                endpoint,
                model,
            } => process_via_model(client, endpoint, model, request).await,
        }
    }
}

// =============================================================================
// Model-backed processor
// =============================================================================

#[derive(Serialize)]
struct ModelRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ModelMessage<'a>>,
}

#[derive(Serialize)]
struct ModelMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ModelResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

async fn process_via_model(
    client: &reqwest::Client,
    endpoint: &str,
    model: &str,
    request: &PaymentRequest,
) -> Result<PaymentResult, PaymentError> {
    let body = ModelRequest {
        model,
        max_tokens: MAX_TOKENS,
        system: PROCESSOR_SYSTEM_PROMPT,
        messages: vec![ModelMessage {
            role: "user",
            content: format!(
                "Card Number: {}\nExpiry Date: {}\nCVV: {}\nAmount: {}",
                request.card_number, request.expiry_date, request.cvv, request.amount
            ),
        }],
    };

    let response = client.post(endpoint).json(&body).send().await?;
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(PaymentError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let reply: ModelResponse = response.json().await?;
    let text = reply
        .content
        .iter()
        .find(|block| block.kind == "text")
        .map(|block| block.text.as_str())
        .ok_or_else(|| PaymentError::Parse("no text content in model reply".to_string()))?;

    parse_verdict(text)
}

/// Parse the model's `{success, message}` verdict, tolerating a fenced code
/// block around the JSON.
fn parse_verdict(text: &str) -> Result<PaymentResult, PaymentError> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(trimmed)
        .map_err(|e| PaymentError::Parse(format!("invalid payment verdict: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PaymentRequest {
        PaymentRequest {
            card_number: "4242424242424242".to_string(),
            expiry_date: "12/30".to_string(),
            cvv: "123".to_string(),
            amount: Decimal::new(800, 2),
        }
    }

    #[test]
    fn test_payment_request_debug_redacts_card_data() {
        let debug_output = format!("{:?}", request());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("4242424242424242"));
        assert!(!debug_output.contains("123"));
        assert!(debug_output.contains("12/30"));
    }

    #[test]
    fn test_display_message_prefers_service_detail() {
        let result = PaymentResult {
            success: false,
            message: "Card expired.".to_string(),
        };
        assert_eq!(result.display_message(), "Card expired.");
    }

    #[test]
    fn test_display_message_falls_back_to_defaults() {
        let approved = PaymentResult {
            success: true,
            message: String::new(),
        };
        assert_eq!(approved.display_message(), DEFAULT_SUCCESS_MESSAGE);

        let declined = PaymentResult {
            success: false,
            message: String::new(),
        };
        assert_eq!(declined.display_message(), DEFAULT_DECLINED_MESSAGE);
    }

    #[test]
    fn test_parse_verdict_plain_json() {
        let result = parse_verdict(r#"{"success": true, "message": "Approved."}"#)
            .expect("verdict parses");
        assert!(result.success);
        assert_eq!(result.message, "Approved.");
    }

    #[test]
    fn test_parse_verdict_fenced_json() {
        let result = parse_verdict("```json\n{\"success\": false, \"message\": \"Declined.\"}\n```")
            .expect("verdict parses");
        assert!(!result.success);
    }

    #[test]
    fn test_parse_verdict_missing_message_defaults_empty() {
        let result = parse_verdict(r#"{"success": true}"#).expect("verdict parses");
        assert!(result.success);
        assert!(result.message.is_empty());
    }

    #[test]
    fn test_parse_verdict_garbage_is_parse_error() {
        let result = parse_verdict("the payment went through, probably");
        assert!(matches!(result, Err(PaymentError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fixed_client_returns_its_result() {
        let declined = PaymentResult {
            success: false,
            message: "Insufficient funds.".to_string(),
        };
        let client = PaymentClient::fixed(declined.clone());
        let result = client.process(&request()).await.expect("stub never fails");
        assert_eq!(result, declined);
    }

    #[tokio::test]
    async fn test_default_stub_approves() {
        let config = PaymentConfig {
            api_key: None,
            model: "claude-3-5-haiku-latest".to_string(),
            api_url: "https://api.anthropic.com/v1/messages".to_string(),
        };
        let client = PaymentClient::new(&config);
        let result = client.process(&request()).await.expect("stub never fails");
        assert!(result.success);
        assert_eq!(result.message, DEFAULT_SUCCESS_MESSAGE);
    }
}
