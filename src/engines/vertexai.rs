//! Google Vertex AI engine (Gemini models, service-account auth).
//!
//! Unlike the API-key Gemini engine, this one authenticates with a Bearer
//! token minted from a service-account credential file and forces the model
//! through a function call (`translation_output`) so the reply is structured
//! rather than free-form prose.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::auth::TokenProvider;
use crate::auth::service_account::{ServiceAccountTokenProvider, resolve_key};
use crate::error::TranslateError;
use crate::http;
use crate::options::EngineOptions;
use crate::prompt;

use super::Translator;
use super::gemini::generate_content_body;

const DEFAULT_LOCATION: &str = "us-central1";
const DEFAULT_TEMPERATURE: f64 = 0.5;
const DEFAULT_TOP_P: f64 = 1.0;
const DEFAULT_TOP_K: u32 = 1;

/// Name of the forced output function.
const OUTPUT_FUNCTION: &str = "translation_output";

pub struct VertexAiTranslator {
    project_id: String,
    location: String,
    model: String,
    prompt_template: String,
    temperature: f64,
    top_p: f64,
    top_k: u32,
    merge_enabled: bool,
    endpoint_override: Option<String>,
    token_provider: Box<dyn TokenProvider>,
    http: reqwest::Client,
}

impl std::fmt::Debug for VertexAiTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexAiTranslator")
            .field("project_id", &self.project_id)
            .field("location", &self.location)
            .field("model", &self.model)
            .field("prompt_template", &self.prompt_template)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("merge_enabled", &self.merge_enabled)
            .field("endpoint_override", &self.endpoint_override)
            .finish()
    }
}

impl VertexAiTranslator {
    pub const NAME: &'static str = "vertex-ai";
    pub const ALIAS: &'static str = "Vertex AI (Gemini)";
    pub const MODELS: &'static [&'static str] = &[
        "gemini-2.0-flash-lite",
        "gemini-1.5-pro-001",
        "gemini-1.0-pro-002",
        "gemini-1.0-pro",
    ];
    pub const DEFAULT_MODEL: &'static str = "gemini-2.0-flash-lite";

    pub async fn new(options: &EngineOptions) -> Result<Self, TranslateError> {
        let http = http::build_client(options)?;
        let key = resolve_key(options).await?;
        // The credential file names the project; an explicit option is the
        // fallback, not the override.
        let project_id = key
            .project_id
            .clone()
            .or_else(|| options.get_str("project_id").map(str::to_string))
            .ok_or_else(|| {
                TranslateError::ConfigurationError(format!(
                    "{}: no project id in credential file or options",
                    Self::ALIAS
                ))
            })?;
        Ok(Self {
            project_id,
            location: options
                .get_str("location")
                .unwrap_or(DEFAULT_LOCATION)
                .to_string(),
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
            top_k: options.get_u32("top_k").unwrap_or(DEFAULT_TOP_K),
            merge_enabled: options.merge_enabled(),
            endpoint_override: options.get_str("endpoint").map(str::to_string),
            token_provider: Box::new(ServiceAccountTokenProvider::new(key, http.clone())),
            http,
        })
    }

    /// Swap the token source, e.g. for an externally managed credential.
    pub fn with_token_provider(mut self, provider: Box<dyn TokenProvider>) -> Self {
        self.token_provider = provider;
        self
    }

    fn request_url(&self) -> String {
        let base = match &self.endpoint_override {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}-aiplatform.googleapis.com/v1", self.location),
        };
        format!(
            "{}/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            base, self.project_id, self.location, self.model
        )
    }

    fn tool_declarations() -> Value {
        json!({
            "function_declarations": [{
                "name": OUTPUT_FUNCTION,
                "description": "This is the translated text.",
                "parameters": {
                    "type": "OBJECT",
                    "properties": {
                        "translation": {
                            "type": "STRING",
                            "description": "The final translated text.",
                        }
                    },
                    "required": ["translation"],
                },
            }]
        })
    }

    fn request_body(&self, text: &str, source_lang: &str, target_lang: &str) -> Value {
        let system = prompt::render(
            &self.prompt_template,
            source_lang,
            target_lang,
            self.merge_enabled,
        );
        let config = json!({
            "temperature": self.temperature,
            "topP": self.top_p,
            "topK": self.top_k,
        });
        let mut body = generate_content_body(text, &system, config);
        body["tools"] = json!([Self::tool_declarations()]);
        // Force the model through the declared function.
        body["tool_config"] = json!({
            "function_calling_config": {
                "mode": "ANY",
                "allowed_function_names": [OUTPUT_FUNCTION],
            }
        });
        body
    }

    fn parse_response(data: &Value) -> Result<String, TranslateError> {
        let candidates = data.get("candidates").and_then(Value::as_array);
        if candidates.is_none_or(|c| c.is_empty()) {
            return Err(super::gemini::candidates_missing_error(Self::ALIAS, data));
        }
        let call = data.pointer("/candidates/0/content/parts/0/functionCall");
        if let Some(call) = call
            && call.get("name").and_then(Value::as_str) == Some(OUTPUT_FUNCTION)
            && let Some(translation) = call.pointer("/args/translation").and_then(Value::as_str)
        {
            return Ok(translation.to_string());
        }
        Err(TranslateError::unexpected(
            "Vertex AI response did not contain the expected function call",
            &data.to_string(),
        ))
    }
}

#[async_trait]
impl Translator for VertexAiTranslator {
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
        let token = self.token_provider.token().await?;
        let body = self.request_body(text, source_lang, target_lang);
        tracing::debug!(engine = Self::NAME, model = %self.model, "sending request");
        let request = self
            .http
            .post(self.request_url())
            .bearer_auth(token)
            .json(&body);
        let data = http::send_json(Self::NAME, request).await?;
        Self::parse_response(&data)
    }
}
