//! The vendor adapter set.
//!
//! One module per vendor family. Every engine implements [`Translator`];
//! the generative engines additionally implement [`StreamingTranslator`].

use async_trait::async_trait;

use crate::error::TranslateError;
use crate::stream::TextStream;

pub mod anthropic;
pub mod azure;
pub mod baidu;
pub mod deepl;
pub mod deepseek;
pub mod gemini;
pub mod google;
pub mod microsoft;
pub mod openai;
pub mod vertexai;
pub mod youdao;

/// The uniform translation contract every engine implements.
///
/// `source_lang` and `target_lang` are display names ("English"); the
/// classic engines map them to vendor codes through [`crate::lang`], the
/// generative engines substitute them into the prompt. `Auto detect` is
/// accepted as a source wherever the vendor supports detection.
#[async_trait]
pub trait Translator: Send + Sync + std::fmt::Debug {
    /// Stable engine id ("chatgpt", "deepl", ...).
    fn name(&self) -> &'static str;

    /// Human-readable engine name.
    fn alias(&self) -> &'static str;

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError>;
}

/// Engines that can yield the translation incrementally.
#[async_trait]
pub trait StreamingTranslator: Translator {
    async fn translate_stream(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<TextStream, TranslateError>;
}
