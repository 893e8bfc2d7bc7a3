//! Youdao translation engine (openapi, v3 signatures).

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::TranslateError;
use crate::http;
use crate::lang;
use crate::options::EngineOptions;

use super::Translator;

const YOUDAO_ENDPOINT: &str = "https://openapi.youdao.com/api";

#[derive(Debug)]
pub struct YoudaoTranslator {
    app_key: String,
    app_secret: String,
    endpoint: String,
    vocab_id: Option<String>,
    http: reqwest::Client,
}

impl YoudaoTranslator {
    pub const NAME: &'static str = "youdao";
    pub const ALIAS: &'static str = "Youdao";

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        // Youdao issues an app key/secret pair rather than a single key; the
        // options carry them as "app_key" and "app_secret".
        let app_key = options.get_str("app_key").map(str::to_string).ok_or_else(|| {
            TranslateError::ConfigurationError(format!("{}: app_key is required", Self::ALIAS))
        })?;
        let app_secret = options
            .get_str("app_secret")
            .map(str::to_string)
            .ok_or_else(|| {
                TranslateError::ConfigurationError(format!(
                    "{}: app_secret is required",
                    Self::ALIAS
                ))
            })?;
        Ok(Self {
            app_key,
            app_secret,
            endpoint: options.endpoint_or(YOUDAO_ENDPOINT),
            vocab_id: options.get_str("vocab_id").map(str::to_string),
            http: http::build_client(options)?,
        })
    }

    /// The v3 signature input truncates long texts: over 20 characters, the
    /// first ten + the character count + the last ten are hashed.
    fn sign_input(text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= 20 {
            return text.to_string();
        }
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[chars.len() - 10..].iter().collect();
        format!("{}{}{}", head, chars.len(), tail)
    }

    fn sign(&self, text: &str, salt: &str, curtime: &str) -> String {
        let input = Self::sign_input(text);
        let mut hasher = Sha256::new();
        hasher.update(&self.app_key);
        hasher.update(&input);
        hasher.update(salt);
        hasher.update(curtime);
        hasher.update(&self.app_secret);
        format!("{:x}", hasher.finalize())
    }

    /// The payload reports failures in-band via `errorCode`.
    fn parse_response(data: &Value) -> Result<String, TranslateError> {
        let error_code = data.get("errorCode").and_then(Value::as_str).unwrap_or("");
        if error_code != "0" {
            return Err(TranslateError::UnexpectedResult(format!(
                "Youdao error code: {error_code}"
            )));
        }
        let translations = data
            .get("translation")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                TranslateError::unexpected(
                    "Youdao response lacks a translation",
                    &data.to_string(),
                )
            })?;
        let texts: Vec<&str> = translations.iter().filter_map(Value::as_str).collect();
        if texts.is_empty() {
            return Err(TranslateError::unexpected(
                "Youdao response lacks a translation",
                &data.to_string(),
            ));
        }
        Ok(texts.join("\n"))
    }
}

#[async_trait]
impl Translator for YoudaoTranslator {
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
        let source = lang::YOUDAO.source_code(source_lang)?.unwrap_or("auto");
        let target = lang::YOUDAO.target_code(target_lang)?;
        let salt = uuid::Uuid::new_v4().to_string();
        let curtime = chrono::Utc::now().timestamp().to_string();
        let sign = self.sign(text, &salt, &curtime);
        let mut form = vec![
            ("q", text.to_string()),
            ("from", source.to_string()),
            ("to", target.to_string()),
            ("appKey", self.app_key.clone()),
            ("salt", salt),
            ("sign", sign),
            ("signType", "v3".to_string()),
            ("curtime", curtime),
        ];
        if let Some(vocab_id) = &self.vocab_id {
            form.push(("vocabId", vocab_id.clone()));
        }
        let request = self.http.post(&self.endpoint).form(&form);
        let data = http::send_json(Self::NAME, request).await?;
        Self::parse_response(&data)
    }
}
