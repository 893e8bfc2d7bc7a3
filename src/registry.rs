//! Engine registry: stable ids → constructors.

use crate::engines::Translator;
use crate::engines::anthropic::ClaudeTranslator;
use crate::engines::azure::AzureChatGptTranslator;
use crate::engines::baidu::BaiduTranslator;
use crate::engines::deepl::{DeepLFreeTranslator, DeepLProTranslator, DeepLTranslator};
use crate::engines::deepseek::DeepSeekTranslator;
use crate::engines::gemini::GeminiTranslator;
use crate::engines::google::{
    GoogleAdvancedTranslator, GoogleBasicAdcTranslator, GoogleBasicTranslator,
    GoogleFreeHtmlTranslator, GoogleFreeTranslator, GoogleLegacyTranslator,
};
use crate::engines::microsoft::MicrosoftEdgeTranslator;
use crate::engines::openai::ChatGptTranslator;
use crate::engines::vertexai::VertexAiTranslator;
use crate::engines::youdao::YoudaoTranslator;
use crate::error::TranslateError;
use crate::options::EngineOptions;

/// `(name, alias)` pairs for every builtin engine, in presentation order.
pub const BUILTIN_ENGINES: &[(&str, &str)] = &[
    (GoogleFreeTranslator::NAME, GoogleFreeTranslator::ALIAS),
    (
        GoogleFreeHtmlTranslator::NAME,
        GoogleFreeHtmlTranslator::ALIAS,
    ),
    (GoogleLegacyTranslator::NAME, GoogleLegacyTranslator::ALIAS),
    (GoogleBasicTranslator::NAME, GoogleBasicTranslator::ALIAS),
    (
        GoogleBasicAdcTranslator::NAME,
        GoogleBasicAdcTranslator::ALIAS,
    ),
    (
        GoogleAdvancedTranslator::NAME,
        GoogleAdvancedTranslator::ALIAS,
    ),
    (ChatGptTranslator::NAME, ChatGptTranslator::ALIAS),
    (AzureChatGptTranslator::NAME, AzureChatGptTranslator::ALIAS),
    (GeminiTranslator::NAME, GeminiTranslator::ALIAS),
    (ClaudeTranslator::NAME, ClaudeTranslator::ALIAS),
    (DeepSeekTranslator::NAME, DeepSeekTranslator::ALIAS),
    (DeepLTranslator::NAME, DeepLTranslator::ALIAS),
    (DeepLProTranslator::NAME, DeepLProTranslator::ALIAS),
    (DeepLFreeTranslator::NAME, DeepLFreeTranslator::ALIAS),
    (
        MicrosoftEdgeTranslator::NAME,
        MicrosoftEdgeTranslator::ALIAS,
    ),
    (YoudaoTranslator::NAME, YoudaoTranslator::ALIAS),
    (BaiduTranslator::NAME, BaiduTranslator::ALIAS),
    (VertexAiTranslator::NAME, VertexAiTranslator::ALIAS),
];

/// The stable ids accepted by [`create_engine`].
pub fn builtin_engine_names() -> Vec<&'static str> {
    BUILTIN_ENGINES.iter().map(|(name, _)| *name).collect()
}

/// Construct a boxed engine by its stable id.
pub async fn create_engine(
    name: &str,
    options: &EngineOptions,
) -> Result<Box<dyn Translator>, TranslateError> {
    let engine: Box<dyn Translator> = match name {
        GoogleFreeTranslator::NAME => Box::new(GoogleFreeTranslator::new(options)?),
        GoogleFreeHtmlTranslator::NAME => Box::new(GoogleFreeHtmlTranslator::new(options)?),
        GoogleLegacyTranslator::NAME => Box::new(GoogleLegacyTranslator::new(options)?),
        GoogleBasicTranslator::NAME => Box::new(GoogleBasicTranslator::new(options)?),
        GoogleBasicAdcTranslator::NAME => Box::new(GoogleBasicAdcTranslator::new(options).await?),
        GoogleAdvancedTranslator::NAME => Box::new(GoogleAdvancedTranslator::new(options).await?),
        ChatGptTranslator::NAME => Box::new(ChatGptTranslator::new(options)?),
        AzureChatGptTranslator::NAME => Box::new(AzureChatGptTranslator::new(options)?),
        GeminiTranslator::NAME => Box::new(GeminiTranslator::new(options)?),
        ClaudeTranslator::NAME => Box::new(ClaudeTranslator::new(options)?),
        DeepSeekTranslator::NAME => Box::new(DeepSeekTranslator::new(options)?),
        DeepLTranslator::NAME => Box::new(DeepLTranslator::new(options)?),
        DeepLProTranslator::NAME => Box::new(DeepLProTranslator::new(options)?),
        DeepLFreeTranslator::NAME => Box::new(DeepLFreeTranslator::new(options)?),
        MicrosoftEdgeTranslator::NAME => Box::new(MicrosoftEdgeTranslator::new(options)?),
        YoudaoTranslator::NAME => Box::new(YoudaoTranslator::new(options)?),
        BaiduTranslator::NAME => Box::new(BaiduTranslator::new(options)?),
        VertexAiTranslator::NAME => Box::new(VertexAiTranslator::new(options).await?),
        other => {
            return Err(TranslateError::ConfigurationError(format!(
                "unknown engine: {other}"
            )));
        }
    };
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn creates_keyless_engines() {
        let options = EngineOptions::new();
        let engine = create_engine("google-free", &options).await.unwrap();
        assert_eq!(engine.name(), "google-free");
        let engine = create_engine("deepl-free", &options).await.unwrap();
        assert_eq!(engine.alias(), "DeepL (Free)");
    }

    #[tokio::test]
    async fn unknown_engine_is_rejected() {
        let err = create_engine("babelfish", &EngineOptions::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("babelfish"));
    }

    #[tokio::test]
    async fn keyed_engine_requires_its_key() {
        assert!(create_engine("chatgpt", &EngineOptions::new()).await.is_err());
        let options = EngineOptions::new().with("api_keys", json!(["sk-x"]));
        let engine = create_engine("chatgpt", &options).await.unwrap();
        assert_eq!(engine.name(), "chatgpt");
    }

    #[test]
    fn names_are_unique() {
        let names = builtin_engine_names();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
        assert_eq!(names.len(), 18);
    }
}
