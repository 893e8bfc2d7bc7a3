//! Error types shared by every translation engine.

use thiserror::Error;

/// Errors surfaced by translation engines.
///
/// Vendor-reported failures are folded into `ApiError` when the HTTP status
/// is non-2xx and into `UnexpectedResult` when a 2xx body does not carry the
/// expected fields.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// Invalid or missing engine configuration (option keys, credential files).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Transport-level failure before a response body was obtained.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-2xx vendor response, with the vendor diagnostic when extractable.
    #[error("API error {code}: {message}")]
    ApiError { code: u16, message: String },

    /// A 2xx response that could not be parsed or lacks the expected fields.
    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),

    /// The engine has no code for the requested language name.
    #[error("{engine} does not support the language: {language}")]
    UnsupportedLanguage {
        engine: &'static str,
        language: String,
    },
}

impl TranslateError {
    /// Build an `UnexpectedResult` that embeds a truncated raw-body excerpt.
    pub fn unexpected(context: &str, body: &str) -> Self {
        Self::UnexpectedResult(format!("{}: {}", context, excerpt(body)))
    }
}

/// Truncate a response body for inclusion in a diagnostic message.
pub(crate) fn excerpt(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.chars().count() <= LIMIT {
        body.to_string()
    } else {
        let cut: String = body.chars().take(LIMIT).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let short = excerpt(&long);
        assert_eq!(short.chars().count(), 203);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn excerpt_is_char_safe() {
        let body = "文".repeat(300);
        let short = excerpt(&body);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn unexpected_embeds_context_and_body() {
        let err = TranslateError::unexpected("no candidates", "{\"error\":{}}");
        assert!(err.to_string().contains("no candidates"));
        assert!(err.to_string().contains("error"));
    }
}
