//! Baidu translation engine (fanyi-api, MD5 signatures).

use async_trait::async_trait;
use md5::{Digest, Md5};
use serde_json::Value;

use crate::error::TranslateError;
use crate::http;
use crate::lang;
use crate::options::EngineOptions;

use super::Translator;

const BAIDU_ENDPOINT: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";

#[derive(Debug)]
pub struct BaiduTranslator {
    app_id: String,
    app_key: String,
    endpoint: String,
    http: reqwest::Client,
}

impl BaiduTranslator {
    pub const NAME: &'static str = "baidu";
    pub const ALIAS: &'static str = "Baidu";

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        let app_id = options.get_str("app_id").map(str::to_string).ok_or_else(|| {
            TranslateError::ConfigurationError(format!("{}: app_id is required", Self::ALIAS))
        })?;
        Ok(Self {
            app_id,
            app_key: options.require_api_key(Self::ALIAS)?,
            endpoint: options.endpoint_or(BAIDU_ENDPOINT),
            http: http::build_client(options)?,
        })
    }

    /// `md5(appid + q + salt + key)`, lowercase hex.
    fn sign(&self, text: &str, salt: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(&self.app_id);
        hasher.update(text);
        hasher.update(salt);
        hasher.update(&self.app_key);
        format!("{:x}", hasher.finalize())
    }

    /// Failures arrive in-band as `error_code`/`error_msg`; success carries
    /// one `trans_result` entry per source line.
    fn parse_response(data: &Value) -> Result<String, TranslateError> {
        if let Some(code) = data.get("error_code").and_then(Value::as_str) {
            let message = data
                .get("error_msg")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(TranslateError::UnexpectedResult(format!(
                "Baidu error {code}: {message}"
            )));
        }
        let results = data
            .get("trans_result")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                TranslateError::unexpected(
                    "Baidu response lacks a translation",
                    &data.to_string(),
                )
            })?;
        let lines: Vec<&str> = results
            .iter()
            .filter_map(|r| r.get("dst").and_then(Value::as_str))
            .collect();
        if lines.is_empty() {
            return Err(TranslateError::unexpected(
                "Baidu response lacks a translation",
                &data.to_string(),
            ));
        }
        Ok(lines.join("\n"))
    }
}

#[async_trait]
impl Translator for BaiduTranslator {
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
        let source = lang::BAIDU.source_code(source_lang)?.unwrap_or("auto");
        let target = lang::BAIDU.target_code(target_lang)?;
        let salt = chrono::Utc::now().timestamp_millis().to_string();
        let sign = self.sign(text, &salt);
        let form = [
            ("q", text.to_string()),
            ("from", source.to_string()),
            ("to", target.to_string()),
            ("appid", self.app_id.clone()),
            ("salt", salt),
            ("sign", sign),
        ];
        let request = self.http.post(&self.endpoint).form(&form);
        let data = http::send_json(Self::NAME, request).await?;
        Self::parse_response(&data)
    }
}
