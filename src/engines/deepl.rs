//! DeepL engines: the v2 API (free and pro plans) and the keyless web
//! JSON-RPC endpoint.

use async_trait::async_trait;
use rand::Rng;
use serde_json::{Value, json};

use crate::error::TranslateError;
use crate::http;
use crate::lang;
use crate::options::EngineOptions;

use super::Translator;

const DEEPL_FREE_ENDPOINT: &str = "https://api-free.deepl.com/v2/translate";
const DEEPL_PRO_ENDPOINT: &str = "https://api.deepl.com/v2/translate";
const DEEPL_WEB_ENDPOINT: &str = "https://www2.deepl.com/jsonrpc";

/// Shared v2 form body; `source_lang` is omitted for detection.
fn v2_form(text: &str, source: Option<&str>, target: &str) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("text", text.to_string()),
        ("target_lang", target.to_string()),
    ];
    if let Some(source) = source {
        form.push(("source_lang", source.to_string()));
    }
    form
}

/// `translations[*].text`, joined; the API returns one entry per `text`
/// parameter and we always send exactly one.
fn parse_v2_response(data: &Value) -> Option<String> {
    let translations = data.get("translations")?.as_array()?;
    let texts: Vec<&str> = translations
        .iter()
        .filter_map(|t| t.get("text").and_then(Value::as_str))
        .collect();
    (!texts.is_empty()).then(|| texts.join("\n"))
}

async fn v2_translate(
    name: &'static str,
    http: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> Result<String, TranslateError> {
    let source = lang::DEEPL.source_code(source_lang)?;
    let target = lang::DEEPL.target_code(target_lang)?;
    let request = http
        .post(endpoint)
        .header("Authorization", format!("DeepL-Auth-Key {api_key}"))
        .form(&v2_form(text, source, target));
    let data = http::send_json(name, request).await?;
    parse_v2_response(&data).ok_or_else(|| {
        TranslateError::unexpected("DeepL response lacks a translation", &data.to_string())
    })
}

/// DeepL API, free plan.
#[derive(Debug)]
pub struct DeepLTranslator {
    api_key: String,
    endpoint: String,
    http: reqwest::Client,
}

impl DeepLTranslator {
    pub const NAME: &'static str = "deepl";
    pub const ALIAS: &'static str = "DeepL";

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        Ok(Self {
            api_key: options.require_api_key(Self::ALIAS)?,
            endpoint: options.endpoint_or(DEEPL_FREE_ENDPOINT),
            http: http::build_client(options)?,
        })
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
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
        v2_translate(
            Self::NAME,
            &self.http,
            &self.endpoint,
            &self.api_key,
            text,
            source_lang,
            target_lang,
        )
        .await
    }
}

/// DeepL API, pro plan. Same contract, different host.
#[derive(Debug)]
pub struct DeepLProTranslator {
    api_key: String,
    endpoint: String,
    http: reqwest::Client,
}

impl DeepLProTranslator {
    pub const NAME: &'static str = "deepl-pro";
    pub const ALIAS: &'static str = "DeepL Pro";

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        Ok(Self {
            api_key: options.require_api_key(Self::ALIAS)?,
            endpoint: options.endpoint_or(DEEPL_PRO_ENDPOINT),
            http: http::build_client(options)?,
        })
    }
}

#[async_trait]
impl Translator for DeepLProTranslator {
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
        v2_translate(
            Self::NAME,
            &self.http,
            &self.endpoint,
            &self.api_key,
            text,
            source_lang,
            target_lang,
        )
        .await
    }
}

/// The keyless web endpoint. The browser client carries two fingerprinting
/// quirks that the server checks: the timestamp must be divisible by the
/// count of `i` characters in the text plus one, and the spacing around the
/// `"method"` key depends on the request id.
#[derive(Debug)]
pub struct DeepLFreeTranslator {
    endpoint: String,
    http: reqwest::Client,
}

impl DeepLFreeTranslator {
    pub const NAME: &'static str = "deepl-free";
    pub const ALIAS: &'static str = "DeepL (Free)";

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        Ok(Self {
            endpoint: options.endpoint_or(DEEPL_WEB_ENDPOINT),
            http: http::build_client(options)?,
        })
    }

    fn adjusted_timestamp(text: &str, now_millis: i64) -> i64 {
        let i_count = text.matches('i').count() as i64 + 1;
        now_millis - now_millis % i_count + i_count
    }

    fn request_body(id: i64, text: &str, source: &str, target: &str, timestamp: i64) -> Value {
        json!({
            "jsonrpc": "2.0",
            "method": "LMT_handle_jobs",
            "id": id,
            "params": {
                "jobs": [{
                    "kind": "default",
                    "sentences": [{"text": text, "id": 1, "prefix": ""}],
                    "raw_en_context_before": [],
                    "raw_en_context_after": [],
                    "preferred_num_beams": 4,
                }],
                "lang": {
                    "source_lang_user_selected": source,
                    "target_lang": target,
                },
                "priority": -1,
                "commonJobParams": {"mode": "translate", "browserType": 1},
                "timestamp": timestamp,
            },
        })
    }

    /// Serialize with the id-dependent `"method"` spacing.
    fn serialize_body(id: i64, body: &Value) -> String {
        let serialized = body.to_string();
        let replacement = if (id + 5) % 29 == 0 || (id + 3) % 13 == 0 {
            "\"method\" : \""
        } else {
            "\"method\": \""
        };
        serialized.replacen("\"method\":\"", replacement, 1)
    }

    fn parse_response(data: &Value) -> Option<String> {
        data.pointer("/result/translations/0/beams/0/sentences/0/text")?
            .as_str()
            .map(str::to_string)
    }
}

#[async_trait]
impl Translator for DeepLFreeTranslator {
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
        let source = lang::DEEPL.source_code(source_lang)?.unwrap_or("auto");
        let target = lang::DEEPL.target_code(target_lang)?;
        let id = {
            let mut rng = rand::thread_rng();
            rng.gen_range(100..10_000) * 10_000 + rng.gen_range(0..10_000)
        };
        let timestamp = Self::adjusted_timestamp(text, chrono::Utc::now().timestamp_millis());
        let body = Self::request_body(id, text, source, target, timestamp);
        let request = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(Self::serialize_body(id, &body));
        let data = http::send_json(Self::NAME, request).await?;
        Self::parse_response(&data).ok_or_else(|| {
            TranslateError::unexpected("DeepL response lacks a translation", &data.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v2_form_omits_source_on_auto() {
        let source = lang::DEEPL.source_code(lang::AUTO).unwrap();
        let form = v2_form("hi", source, "DE");
        assert!(form.iter().all(|(k, _)| *k != "source_lang"));
    }

    #[test]
    fn v2_response_parsing() {
        let data = json!({
            "translations": [{"detected_source_language": "EN", "text": "Hallo"}]
        });
        assert_eq!(parse_v2_response(&data).unwrap(), "Hallo");
        assert!(parse_v2_response(&json!({"translations": []})).is_none());
    }

    #[test]
    fn timestamp_is_divisible_by_i_count() {
        // "institution" has 3 i's, so i_count is 4.
        let ts = DeepLFreeTranslator::adjusted_timestamp("institution", 1_700_000_000_123);
        assert_eq!(ts % 4, 0);
        assert!(ts >= 1_700_000_000_123);
        // No i's: divisible by 1, bumped by exactly 1.
        let ts = DeepLFreeTranslator::adjusted_timestamp("xyz", 1000);
        assert_eq!(ts, 1001);
    }

    #[test]
    fn method_spacing_depends_on_request_id() {
        let body = DeepLFreeTranslator::request_body(42, "hi", "auto", "DE", 1000);
        // (42 + 3) % 13 != 0 and (42 + 5) % 29 != 0
        let plain = DeepLFreeTranslator::serialize_body(42, &body);
        assert!(plain.contains("\"method\": \"LMT_handle_jobs\""));
        // (23 + 3) % 13 == 0 triggers the spaced variant.
        let spaced = DeepLFreeTranslator::serialize_body(23, &body);
        assert!(spaced.contains("\"method\" : \"LMT_handle_jobs\""));
    }

    #[test]
    fn web_response_parsing() {
        let data = json!({
            "jsonrpc": "2.0",
            "result": {
                "translations": [{
                    "beams": [{"sentences": [{"text": "Hallo Welt"}]}]
                }]
            }
        });
        assert_eq!(
            DeepLFreeTranslator::parse_response(&data).unwrap(),
            "Hallo Welt"
        );
    }
}
