//! Azure OpenAI ChatGPT engine.
//!
//! Same chat-completions payload as the OpenAI engine; the differences are
//! the deployment-scoped endpoint and the `api-key` header.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TranslateError;
use crate::http;
use crate::options::EngineOptions;
use crate::prompt;
use crate::stream::{TextStream, sse_text_stream};

use super::openai::{Sampling, chat_body, parse_chat_delta, parse_chat_response};
use super::{StreamingTranslator, Translator};

#[derive(Debug)]
pub struct AzureChatGptTranslator {
    api_key: String,
    endpoint: String,
    model: String,
    prompt_template: String,
    sampling: Sampling,
    merge_enabled: bool,
    http: reqwest::Client,
}

impl AzureChatGptTranslator {
    pub const NAME: &'static str = "azure-chatgpt";
    pub const ALIAS: &'static str = "ChatGPT (Azure)";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o";
    const DEFAULT_API_VERSION: &'static str = "2024-02-01";

    pub fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        // No usable default exists: the resource name is part of the host.
        let base = options.get_str("endpoint").ok_or_else(|| {
            TranslateError::ConfigurationError(format!(
                "{}: the endpoint option is required (https://<resource>.openai.azure.com)",
                Self::ALIAS
            ))
        })?;
        let deployment = options.get_str("deployment").ok_or_else(|| {
            TranslateError::ConfigurationError(format!(
                "{}: the deployment option is required",
                Self::ALIAS
            ))
        })?;
        let api_version = options
            .get_str("api_version")
            .unwrap_or(Self::DEFAULT_API_VERSION);
        let endpoint = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            base.trim_end_matches('/'),
            deployment,
            api_version
        );
        Ok(Self {
            api_key: options.require_api_key(Self::ALIAS)?,
            endpoint,
            model: options
                .get_str("model")
                .unwrap_or(Self::DEFAULT_MODEL)
                .to_string(),
            prompt_template: options
                .get_str("prompt")
                .unwrap_or(prompt::DEFAULT_PROMPT)
                .to_string(),
            sampling: Sampling::from_options(options, 1.0),
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
impl Translator for AzureChatGptTranslator {
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
            .header("api-key", &self.api_key)
            .json(&body);
        let data = http::send_json(Self::NAME, request).await?;
        parse_chat_response(&data).ok_or_else(|| {
            TranslateError::unexpected(
                "Azure ChatGPT response lacks message content",
                &data.to_string(),
            )
        })
    }
}

#[async_trait]
impl StreamingTranslator for AzureChatGptTranslator {
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
            .header("api-key", &self.api_key)
            .json(&body);
        let response = http::send(Self::NAME, request).await?;
        Ok(sse_text_stream(response, parse_chat_delta))
    }
}
