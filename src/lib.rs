//! # fanyi
//!
//! A unified translation engine interface library for Rust.
//!
//! One object-safe contract — [`Translator`] — with adapters for the common
//! translation and generative-model vendors: Google Translate (free, Basic,
//! Advanced), Gemini, Vertex AI, OpenAI ChatGPT, Azure OpenAI, Anthropic
//! Claude, DeepSeek, DeepL, Microsoft Edge, Youdao and Baidu. Each adapter
//! builds the vendor's request, sends it with a timeout and parses the
//! response into plain translated text.
//!
//! ```rust,no_run
//! use fanyi::{EngineOptions, create_engine};
//!
//! # async fn demo() -> Result<(), fanyi::TranslateError> {
//! let options = EngineOptions::new().with("api_keys", serde_json::json!(["sk-..."]));
//! let engine = create_engine("chatgpt", &options).await?;
//! let translated = engine.translate("Hello there!", "English", "Japanese").await?;
//! println!("{translated}");
//! # Ok(())
//! # }
//! ```
//!
//! Generative engines also implement [`StreamingTranslator`] and can yield
//! the translation incrementally; see [`stream::TextStream`].

pub mod auth;
pub mod engines;
pub mod error;
pub mod glossary;
mod http;
pub mod lang;
pub mod options;
pub mod prompt;
pub mod registry;
pub mod stream;

pub use engines::anthropic::ClaudeTranslator;
pub use engines::azure::AzureChatGptTranslator;
pub use engines::baidu::BaiduTranslator;
pub use engines::deepl::{DeepLFreeTranslator, DeepLProTranslator, DeepLTranslator};
pub use engines::deepseek::DeepSeekTranslator;
pub use engines::gemini::GeminiTranslator;
pub use engines::google::{
    GoogleAdvancedTranslator, GoogleBasicAdcTranslator, GoogleBasicTranslator,
    GoogleFreeHtmlTranslator, GoogleFreeTranslator, GoogleLegacyTranslator,
};
pub use engines::microsoft::MicrosoftEdgeTranslator;
pub use engines::openai::ChatGptTranslator;
pub use engines::vertexai::VertexAiTranslator;
pub use engines::youdao::YoudaoTranslator;
pub use engines::{StreamingTranslator, Translator};
pub use error::TranslateError;
pub use glossary::Glossary;
pub use options::EngineOptions;
pub use registry::{BUILTIN_ENGINES, builtin_engine_names, create_engine};
pub use stream::TextStream;
