//! Microsoft Edge translation engine.
//!
//! The Edge client gets a short-lived JWT from a keyless auth endpoint and
//! spends it against the cognitive translator API. The token is cached for
//! slightly less than its ten-minute lifetime.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::TranslateError;
use crate::http;
use crate::lang;
use crate::options::EngineOptions;

use super::Translator;

const AUTH_ENDPOINT: &str = "https://edge.microsoft.com/translate/auth";
const TRANSLATE_ENDPOINT: &str = "https://api-edge.cognitive.microsofttranslator.com/translate";
const API_VERSION: &str = "3.0";

/// Tokens live ten minutes; refresh with a margin.
const TOKEN_TTL_SECONDS: i64 = 480;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    fetched_unix: i64,
}

#[derive(Debug)]
pub struct MicrosoftEdgeTranslator {
    auth_endpoint: String,
    endpoint: String,
    token_cache: tokio::sync::Mutex<Option<CachedToken>>,
    http: reqwest::Client,
}

impl MicrosoftEdgeTranslator {
    pub const NAME: &'static str = "microsoft-edge";
    pub const ALIAS: &'static str = "Microsoft Edge";

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        Ok(Self {
            auth_endpoint: options
                .get_str("auth_endpoint")
                .unwrap_or(AUTH_ENDPOINT)
                .to_string(),
            endpoint: options.endpoint_or(TRANSLATE_ENDPOINT),
            token_cache: tokio::sync::Mutex::new(None),
            http: http::build_client(options)?,
        })
    }

    async fn auth_token(&self) -> Result<String, TranslateError> {
        let mut cache = self.token_cache.lock().await;
        let now = chrono::Utc::now().timestamp();
        if let Some(cached) = cache.as_ref()
            && now - cached.fetched_unix < TOKEN_TTL_SECONDS
        {
            return Ok(cached.token.clone());
        }
        let response = http::send(Self::NAME, self.http.get(&self.auth_endpoint)).await?;
        let token = response
            .text()
            .await
            .map_err(|e| TranslateError::HttpError(format!("failed to read auth token: {e}")))?
            .trim()
            .to_string();
        if token.is_empty() {
            return Err(TranslateError::UnexpectedResult(
                "Microsoft auth endpoint returned an empty token".to_string(),
            ));
        }
        *cache = Some(CachedToken {
            token: token.clone(),
            fetched_unix: now,
        });
        Ok(token)
    }

    /// `[0].translations[0].text` from the response array.
    fn parse_response(data: &Value) -> Option<String> {
        data.pointer("/0/translations/0/text")?
            .as_str()
            .map(str::to_string)
    }
}

#[async_trait]
impl Translator for MicrosoftEdgeTranslator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn alias(&self) -> &'static str {
        Self::ALIAS
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        let source = lang::MICROSOFT.source_code(source_lang)?;
        let target = lang::MICROSOFT.target_code(target_lang)?;
        let token = self.auth_token().await?;
        let mut query = vec![("api-version", API_VERSION), ("to", target)];
        if let Some(source) = source {
            query.push(("from", source));
        }
        let request = self
            .http
            .post(&self.endpoint)
            .query(&query)
            .bearer_auth(token)
            .json(&json!([{"Text": text}]));
        let data = http::send_json(Self::NAME, request).await?;
        Self::parse_response(&data).ok_or_else(|| {
            TranslateError::unexpected("Microsoft response lacks a translation", &data.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_first_translation() {
        let data = json!([
            {"translations": [{"text": "Hallo", "to": "de"}]}
        ]);
        assert_eq!(
            MicrosoftEdgeTranslator::parse_response(&data).unwrap(),
            "Hallo"
        );
        assert!(MicrosoftEdgeTranslator::parse_response(&json!([])).is_none());
    }
}
