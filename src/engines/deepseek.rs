//! DeepSeek engine.
//!
//! DeepSeek exposes an OpenAI-compatible chat-completions API; only the base
//! URL, default model and Bearer key differ.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TranslateError;
use crate::http;
use crate::options::EngineOptions;
use crate::prompt;
use crate::stream::{TextStream, sse_text_stream};

use super::openai::{Sampling, chat_body, parse_chat_delta, parse_chat_response};
use super::{StreamingTranslator, Translator};

const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";

#[derive(Debug)]
pub struct DeepSeekTranslator {
    api_key: String,
    endpoint: String,
    model: String,
    prompt_template: String,
    sampling: Sampling,
    merge_enabled: bool,
    http: reqwest::Client,
}

impl DeepSeekTranslator {
    pub const NAME: &'static str = "deepseek";
    pub const ALIAS: &'static str = "DeepSeek";
    pub const MODELS: &'static [&'static str] = &["deepseek-chat", "deepseek-reasoner"];
    pub const DEFAULT_MODEL: &'static str = "deepseek-chat";
    /// DeepSeek documents 1.3 as the sweet spot for translation work.
    const DEFAULT_TEMPERATURE: f64 = 1.3;

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        Ok(Self {
            api_key: options.require_api_key(Self::ALIAS)?,
            endpoint: options.endpoint_or(DEEPSEEK_ENDPOINT),
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
impl Translator for DeepSeekTranslator {
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
        let request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        let data = http::send_json(Self::NAME, request).await?;
        parse_chat_response(&data).ok_or_else(|| {
            TranslateError::unexpected(
                "DeepSeek response lacks message content",
                &data.to_string(),
            )
        })
    }
}

#[async_trait]
impl StreamingTranslator for DeepSeekTranslator {
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
