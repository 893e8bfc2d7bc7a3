//! Authentication helpers for engines that use Bearer tokens.
//!
//! Currently this covers the Google Cloud engines: the advanced translation
//! APIs and Vertex AI authenticate with OAuth2 access tokens minted from a
//! service-account credential file.

use async_trait::async_trait;

use crate::error::TranslateError;

/// Supplies access tokens for `Authorization: Bearer <token>` headers.
///
/// Implementations may cache internally and refresh when necessary.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String, TranslateError>;
}

/// A fixed token managed externally. Useful for tests and for hosts that
/// run their own credential machinery.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<String, TranslateError> {
        Ok(self.token.clone())
    }
}

pub mod service_account;
