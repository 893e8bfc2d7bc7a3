//! Anthropic Claude engine.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::TranslateError;
use crate::http;
use crate::options::EngineOptions;
use crate::prompt;
use crate::stream::{TextStream, sse_text_stream};

use super::openai::Sampling;
use super::{StreamingTranslator, Translator};

const CLAUDE_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug)]
pub struct ClaudeTranslator {
    api_key: String,
    endpoint: String,
    model: String,
    prompt_template: String,
    sampling: Sampling,
    top_k: Option<u32>,
    merge_enabled: bool,
    http: reqwest::Client,
}

impl ClaudeTranslator {
    pub const NAME: &'static str = "claude";
    pub const ALIAS: &'static str = "Claude";
    pub const MODELS: &'static [&'static str] = &[
        "claude-3-5-haiku-latest",
        "claude-3-5-sonnet-latest",
        "claude-3-opus-latest",
    ];
    pub const DEFAULT_MODEL: &'static str = "claude-3-5-haiku-latest";
    const DEFAULT_TEMPERATURE: f64 = 1.0;

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        Ok(Self {
            api_key: options.require_api_key(Self::ALIAS)?,
            endpoint: options.endpoint_or(CLAUDE_ENDPOINT),
            model: options
                .get_str("model")
                .unwrap_or(Self::DEFAULT_MODEL)
                .to_string(),
            prompt_template: options
                .get_str("prompt")
                .unwrap_or(prompt::DEFAULT_PROMPT)
                .to_string(),
            sampling: Sampling::from_options(options, Self::DEFAULT_TEMPERATURE),
            top_k: options.get_u32("top_k"),
            merge_enabled: options.merge_enabled(),
            http: http::build_client(options)?,
        })
    }

    fn request_body(&self, text: &str, source: &str, target: &str, stream: bool) -> Value {
        let system = prompt::render(&self.prompt_template, source, target, self.merge_enabled);
        let mut body = json!({
            "model": self.model,
            "system": system,
            "messages": [{"role": "user", "content": text}],
            "max_tokens": MAX_TOKENS,
            "stream": stream,
        });
        match self.sampling {
            Sampling::Temperature(v) => body["temperature"] = json!(v),
            Sampling::TopP(v) => body["top_p"] = json!(v),
        }
        if let Some(top_k) = self.top_k {
            body["top_k"] = json!(top_k);
        }
        body
    }

    fn request(&self, body: &Value) -> reqwest::RequestBuilder {
        self.http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
    }

    /// `content[0].text` from a non-streaming response.
    fn parse_response(data: &Value) -> Option<String> {
        data.pointer("/content/0/text")?.as_str().map(str::to_string)
    }

    /// Text deltas arrive as `content_block_delta` events; everything else
    /// (message_start, content_block_start, message_stop, ping) is
    /// bookkeeping.
    fn parse_stream_event(data: &str) -> Result<Option<String>, TranslateError> {
        let event: Value = serde_json::from_str(data)
            .map_err(|e| TranslateError::unexpected(&format!("invalid stream event ({e})"), data))?;
        if event.get("type").and_then(Value::as_str) != Some("content_block_delta") {
            return Ok(None);
        }
        Ok(event
            .pointer("/delta/text")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

#[async_trait]
impl Translator for ClaudeTranslator {
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
        let body = self.request_body(text, source_lang, target_lang, false);
        tracing::debug!(engine = Self::NAME, model = %self.model, "sending request");
        let data = http::send_json(Self::NAME, self.request(&body)).await?;
        Self::parse_response(&data).ok_or_else(|| {
            TranslateError::unexpected("Claude response lacks text content", &data.to_string())
        })
    }
}

#[async_trait]
impl StreamingTranslator for ClaudeTranslator {
    async fn translate_stream(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<TextStream, TranslateError> {
        let body = self.request_body(text, source_lang, target_lang, true);
        let response = http::send(Self::NAME, self.request(&body)).await?;
        Ok(sse_text_stream(response, Self::parse_stream_event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> ClaudeTranslator {
        let options = EngineOptions::new()
            .with("api_keys", json!(["sk-ant-test"]))
            .with("top_k", 1);
        ClaudeTranslator::new(&options).unwrap()
    }

    #[test]
    fn body_carries_system_prompt_and_limits() {
        let body = engine().request_body("Hello", "English", "Korean", false);
        assert_eq!(body["model"], "claude-3-5-haiku-latest");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["top_k"], 1);
        assert_eq!(body["messages"][0]["content"], "Hello");
        let system = body["system"].as_str().unwrap();
        assert!(system.contains("from English to Korean"));
    }

    #[test]
    fn parses_content_text() {
        let data = json!({"content": [{"type": "text", "text": "안녕하세요"}]});
        assert_eq!(ClaudeTranslator::parse_response(&data).unwrap(), "안녕하세요");
        assert!(ClaudeTranslator::parse_response(&json!({"content": []})).is_none());
    }

    #[test]
    fn stream_event_filtering() {
        let start = r#"{"type":"message_start","message":{}}"#;
        assert_eq!(ClaudeTranslator::parse_stream_event(start).unwrap(), None);
        let delta =
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"안"}}"#;
        assert_eq!(
            ClaudeTranslator::parse_stream_event(delta).unwrap().as_deref(),
            Some("안")
        );
    }
}
