//! OpenAI ChatGPT engine, plus the chat-completions pieces shared with the
//! Azure and DeepSeek engines.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::TranslateError;
use crate::http;
use crate::options::EngineOptions;
use crate::prompt;
use crate::stream::{TextStream, sse_text_stream};

use super::{StreamingTranslator, Translator};

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Exactly one sampling parameter goes into a chat-completions body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Sampling {
    Temperature(f64),
    TopP(f64),
}

impl Sampling {
    /// Read the `sampling`/`temperature`/`top_p` options; temperature wins
    /// by default.
    pub(crate) fn from_options(options: &EngineOptions, default_temperature: f64) -> Self {
        match options.get_str("sampling") {
            Some("top_p") => Self::TopP(options.get_f64("top_p").unwrap_or(1.0)),
            _ => Self::Temperature(
                options
                    .get_f64("temperature")
                    .unwrap_or(default_temperature),
            ),
        }
    }

    fn apply(&self, body: &mut Value) {
        match self {
            Self::Temperature(v) => body["temperature"] = json!(v),
            Self::TopP(v) => body["top_p"] = json!(v),
        }
    }
}

/// Build a chat-completions request body.
pub(crate) fn chat_body(
    model: &str,
    system: &str,
    text: &str,
    sampling: Sampling,
    stream: bool,
) -> Value {
    let mut body = json!({
        "model": model,
        "messages": [
            {"role": "system", "content": system},
            {"role": "user", "content": text},
        ],
        "stream": stream,
    });
    sampling.apply(&mut body);
    body
}

/// `choices[0].message.content` from a non-streaming response.
pub(crate) fn parse_chat_response(data: &Value) -> Option<String> {
    data.pointer("/choices/0/message/content")?
        .as_str()
        .map(str::to_string)
}

/// `choices[0].delta.content` from one SSE event; bookkeeping events (role
/// prelude, finish chunk) carry no content and map to `None`.
pub(crate) fn parse_chat_delta(data: &str) -> Result<Option<String>, TranslateError> {
    let event: Value = serde_json::from_str(data)
        .map_err(|e| TranslateError::unexpected(&format!("invalid stream event ({e})"), data))?;
    Ok(event
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .map(str::to_string))
}

#[derive(Debug)]
pub struct ChatGptTranslator {
    api_key: String,
    endpoint: String,
    model: String,
    prompt_template: String,
    sampling: Sampling,
    merge_enabled: bool,
    http: reqwest::Client,
}

impl ChatGptTranslator {
    pub const NAME: &'static str = "chatgpt";
    pub const ALIAS: &'static str = "ChatGPT";
    pub const MODELS: &'static [&'static str] = &[
        "gpt-4o",
        "gpt-4o-mini",
        "gpt-4-turbo",
        "gpt-3.5-turbo",
    ];
    pub const DEFAULT_MODEL: &'static str = "gpt-4o";
    const DEFAULT_TEMPERATURE: f64 = 1.0;

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        Ok(Self {
            api_key: options.require_api_key(Self::ALIAS)?,
            endpoint: options.endpoint_or(OPENAI_ENDPOINT),
            model: options
                .get_str("model")
                .unwrap_or(Self::DEFAULT_MODEL)
                .to_string(),
            prompt_template: options
                .get_str("prompt")
                .unwrap_or(prompt::DEFAULT_PROMPT)
                .to_string(),
            sampling: Sampling::from_options(options, Self::DEFAULT_TEMPERATURE),
            merge_enabled: options.merge_enabled(),
            http: http::build_client(options)?,
        })
    }

    fn request_body(&self, text: &str, source: &str, target: &str, stream: bool) -> Value {
        let system = prompt::render(&self.prompt_template, source, target, self.merge_enabled);
        chat_body(&self.model, &system, text, self.sampling, stream)
    }
}

#[async_trait]
impl Translator for ChatGptTranslator {
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
        let request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        let data = http::send_json(Self::NAME, request).await?;
        parse_chat_response(&data).ok_or_else(|| {
            TranslateError::unexpected("ChatGPT response lacks message content", &data.to_string())
        })
    }
}

#[async_trait]
impl StreamingTranslator for ChatGptTranslator {
    async fn translate_stream(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<TextStream, TranslateError> {
        let body = self.request_body(text, source_lang, target_lang, true);
        let request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        let response = http::send(Self::NAME, request).await?;
        Ok(sse_text_stream(response, parse_chat_delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine(options: EngineOptions) -> ChatGptTranslator {
        ChatGptTranslator::new(&options.with("api_keys", json!(["sk-test"]))).unwrap()
    }

    #[test]
    fn body_substitutes_languages_into_system_prompt() {
        let body = engine(EngineOptions::new()).request_body("Hello", "English", "German", false);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        let system = body["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("from English to German"));
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn temperature_is_the_default_sampling() {
        let body = engine(EngineOptions::new().with("temperature", 0.3)).request_body(
            "x", "English", "French", false,
        );
        assert_eq!(body["temperature"], 0.3);
        assert!(body.get("top_p").is_none());
    }

    #[test]
    fn top_p_sampling_excludes_temperature() {
        let options = EngineOptions::new()
            .with("sampling", "top_p")
            .with("top_p", 0.9)
            .with("temperature", 0.3);
        let body = engine(options).request_body("x", "English", "French", false);
        assert_eq!(body["top_p"], 0.9);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn merge_enabled_appends_retention_clause() {
        let body = engine(EngineOptions::new().with("merge_enabled", true)).request_body(
            "x", "English", "French", false,
        );
        let system = body["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("{{id_\\d+}}"));
    }

    #[test]
    fn parses_message_content() {
        let data = json!({"choices": [{"message": {"role": "assistant", "content": "Hallo"}}]});
        assert_eq!(parse_chat_response(&data).unwrap(), "Hallo");
        assert!(parse_chat_response(&json!({"choices": []})).is_none());
    }

    #[test]
    fn delta_parsing_skips_bookkeeping_events() {
        let role = r#"{"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_chat_delta(role).unwrap(), None);
        let content = r#"{"choices":[{"delta":{"content":"Ha"}}]}"#;
        assert_eq!(parse_chat_delta(content).unwrap().as_deref(), Some("Ha"));
        assert!(parse_chat_delta("not json").is_err());
    }
}
