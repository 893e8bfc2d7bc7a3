//! Google Gemini engine (Generative Language API).

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::TranslateError;
use crate::http;
use crate::options::EngineOptions;
use crate::prompt;
use crate::stream::{TextStream, sse_text_stream};

use super::{StreamingTranslator, Translator};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Sampling defaults for translation work.
const DEFAULT_TEMPERATURE: f64 = 0.9;
const DEFAULT_TOP_P: f64 = 1.0;

#[derive(Debug)]
pub struct GeminiTranslator {
    api_key: String,
    endpoint: String,
    model: String,
    prompt_template: String,
    temperature: f64,
    top_p: f64,
    top_k: Option<u32>,
    merge_enabled: bool,
    http: reqwest::Client,
}

impl GeminiTranslator {
    pub const NAME: &'static str = "gemini";
    pub const ALIAS: &'static str = "Gemini";
    pub const MODELS: &'static [&'static str] = &[
        "gemini-1.5-flash",
        "gemini-1.5-pro",
        "gemini-2.0-flash",
    ];
    pub const DEFAULT_MODEL: &'static str = "gemini-1.5-flash";

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        Ok(Self {
            api_key: options.require_api_key(Self::ALIAS)?,
            endpoint: options.endpoint_or(GEMINI_ENDPOINT),
            model: options
                .get_str("model")
                .unwrap_or(Self::DEFAULT_MODEL)
                .to_string(),
            prompt_template: options
                .get_str("prompt")
                .unwrap_or(prompt::DEFAULT_PROMPT)
                .to_string(),
            temperature: options.get_f64("temperature").unwrap_or(DEFAULT_TEMPERATURE),
            top_p: options.get_f64("top_p").unwrap_or(DEFAULT_TOP_P),
            top_k: options.get_u32("top_k"),
            merge_enabled: options.merge_enabled(),
            http: http::build_client(options)?,
        })
    }

    fn request_url(&self, stream: bool) -> String {
        if stream {
            format!(
                "{}/models/{}:streamGenerateContent?alt=sse",
                self.endpoint, self.model
            )
        } else {
            format!("{}/models/{}:generateContent", self.endpoint, self.model)
        }
    }

    fn request_body(&self, text: &str, source_lang: &str, target_lang: &str) -> Value {
        let system = prompt::render(
            &self.prompt_template,
            source_lang,
            target_lang,
            self.merge_enabled,
        );
        let mut config = json!({
            "temperature": self.temperature,
            "topP": self.top_p,
        });
        if let Some(top_k) = self.top_k {
            config["topK"] = json!(top_k);
        }
        generate_content_body(text, &system, config)
    }
}

/// The generateContent envelope shared with the Vertex AI engine.
pub(crate) fn generate_content_body(text: &str, system: &str, generation_config: Value) -> Value {
    json!({
        "contents": [{"role": "user", "parts": [{"text": text}]}],
        "system_instruction": {"parts": [{"text": system}]},
        "generationConfig": generation_config,
    })
}

/// Join `candidates[0].content.parts[*].text`.
pub(crate) fn parse_candidate_text(data: &Value) -> Option<String> {
    let parts = data
        .pointer("/candidates/0/content/parts")?
        .as_array()?;
    let mut out = String::new();
    for part in parts {
        if let Some(text) = part.get("text").and_then(Value::as_str) {
            out.push_str(text);
        }
    }
    (!out.is_empty()).then_some(out)
}

/// A 2xx body without candidates still carries an `error` object sometimes.
pub(crate) fn candidates_missing_error(engine: &str, data: &Value) -> TranslateError {
    let detail = data
        .get("error")
        .map(Value::to_string)
        .unwrap_or_else(|| "no candidates in response".to_string());
    TranslateError::unexpected(&format!("{engine} returned no candidates"), &detail)
}

#[async_trait]
impl Translator for GeminiTranslator {
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
        let body = self.request_body(text, source_lang, target_lang);
        tracing::debug!(engine = Self::NAME, model = %self.model, "sending request");
        let request = self
            .http
            .post(self.request_url(false))
            .header("x-goog-api-key", &self.api_key)
            .json(&body);
        let data = http::send_json(Self::NAME, request).await?;
        parse_candidate_text(&data).ok_or_else(|| candidates_missing_error(Self::ALIAS, &data))
    }
}

#[async_trait]
impl StreamingTranslator for GeminiTranslator {
    async fn translate_stream(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<TextStream, TranslateError> {
        let body = self.request_body(text, source_lang, target_lang);
        let request = self
            .http
            .post(self.request_url(true))
            .header("x-goog-api-key", &self.api_key)
            .json(&body);
        let response = http::send(Self::NAME, request).await?;
        Ok(sse_text_stream(response, |data| {
            let event: Value = serde_json::from_str(data).map_err(|e| {
                TranslateError::unexpected(&format!("invalid stream event ({e})"), data)
            })?;
            Ok(parse_candidate_text(&event))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> GeminiTranslator {
        let options = EngineOptions::new()
            .with("api_keys", json!(["gm-key"]))
            .with("top_k", 1);
        GeminiTranslator::new(&options).unwrap()
    }

    #[test]
    fn request_body_carries_prompt_and_sampling() {
        let body = engine().request_body("Hello", "English", "Japanese");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        let system = body["system_instruction"]["parts"][0]["text"]
            .as_str()
            .unwrap();
        assert!(system.contains("from English to Japanese"));
        assert_eq!(body["generationConfig"]["topK"], 1);
        assert_eq!(body["generationConfig"]["topP"], 1.0);
    }

    #[test]
    fn stream_url_uses_sse() {
        let url = engine().request_url(true);
        assert!(url.ends_with("models/gemini-1.5-flash:streamGenerateContent?alt=sse"));
    }

    #[test]
    fn parses_candidate_parts() {
        let data = json!({
            "candidates": [{"content": {"parts": [{"text": "Kon"}, {"text": "nichiwa"}]}}]
        });
        assert_eq!(parse_candidate_text(&data).unwrap(), "Konnichiwa");
    }

    #[test]
    fn missing_candidates_surface_vendor_error() {
        let data = json!({"error": {"code": 400, "message": "API key not valid"}});
        let err = candidates_missing_error("Gemini", &data);
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn missing_api_key_is_rejected() {
        assert!(GeminiTranslator::new(&EngineOptions::new()).is_err());
    }
}
