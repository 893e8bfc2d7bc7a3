//! Shared HTTP plumbing for the engines.
//!
//! Every engine owns a `reqwest::Client` built from its options (total
//! timeout, optional proxy, rustls). Non-2xx responses are funneled through
//! [`error_from_response`], which probes the common vendor error envelopes
//! before falling back to a raw-body excerpt.

use std::time::Duration;

use serde_json::Value;

use crate::error::{TranslateError, excerpt};
use crate::options::EngineOptions;

/// Build the engine's HTTP client from the common options.
pub(crate) fn build_client(options: &EngineOptions) -> Result<reqwest::Client, TranslateError> {
    let mut builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.request_timeout()))
        .user_agent(concat!("fanyi/", env!("CARGO_PKG_VERSION")));
    if let Some(uri) = options.proxy_uri() {
        let proxy = reqwest::Proxy::all(uri)
            .map_err(|e| TranslateError::ConfigurationError(format!("invalid proxy {uri}: {e}")))?;
        builder = builder.proxy(proxy);
    }
    builder
        .build()
        .map_err(|e| TranslateError::HttpError(format!("failed to build HTTP client: {e}")))
}

/// Map a non-2xx response into an `ApiError`, extracting the vendor
/// diagnostic when the body matches a known envelope.
pub(crate) async fn error_from_response(
    engine: &str,
    response: reqwest::Response,
) -> TranslateError {
    let code = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = vendor_error_message(&body).unwrap_or_else(|| excerpt(&body));
    tracing::warn!(engine, code, %message, "vendor reported an error");
    TranslateError::ApiError {
        code,
        message: format!("{engine}: {message}"),
    }
}

/// Probe the error envelopes used across the supported vendors:
/// `{"error": {"message": ...}}` (OpenAI, Google, Anthropic),
/// `{"error": "..."}`, `{"message": "..."}` and `{"error_msg": "..."}`.
pub(crate) fn vendor_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    if let Some(error) = json.get("error") {
        if let Some(message) = error.get("message").and_then(Value::as_str) {
            return Some(message.to_string());
        }
        if let Some(message) = error.as_str() {
            return Some(message.to_string());
        }
    }
    if let Some(message) = json.get("error_msg").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    json.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Send a request and hand back the successful response, mapping transport
/// failures and non-2xx statuses into `TranslateError`.
pub(crate) async fn send(
    engine: &str,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, TranslateError> {
    let response = request
        .send()
        .await
        .map_err(|e| TranslateError::HttpError(format!("{engine}: request failed: {e}")))?;
    if !response.status().is_success() {
        return Err(error_from_response(engine, response).await);
    }
    Ok(response)
}

/// Send a request and parse the successful body as JSON.
pub(crate) async fn send_json(
    engine: &str,
    request: reqwest::RequestBuilder,
) -> Result<Value, TranslateError> {
    let response = send(engine, request).await?;
    let body = response
        .text()
        .await
        .map_err(|e| TranslateError::HttpError(format!("{engine}: failed to read body: {e}")))?;
    serde_json::from_str(&body)
        .map_err(|e| TranslateError::unexpected(&format!("{engine}: invalid JSON ({e})"), &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_error_message() {
        let body = r#"{"error":{"message":"Incorrect API key","type":"invalid_request_error"}}"#;
        assert_eq!(
            vendor_error_message(body).as_deref(),
            Some("Incorrect API key")
        );
    }

    #[test]
    fn extracts_flat_error_string() {
        assert_eq!(
            vendor_error_message(r#"{"error":"quota exceeded"}"#).as_deref(),
            Some("quota exceeded")
        );
    }

    #[test]
    fn extracts_baidu_style_error_msg() {
        let body = r#"{"error_code":"54001","error_msg":"Invalid Sign"}"#;
        assert_eq!(vendor_error_message(body).as_deref(), Some("Invalid Sign"));
    }

    #[test]
    fn non_json_body_yields_none() {
        assert!(vendor_error_message("<html>502</html>").is_none());
    }
}
