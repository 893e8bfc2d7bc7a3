//! Per-engine configuration options.
//!
//! The host application hands each engine a flat, string-keyed map of scalar
//! values when it is constructed. The map is read once in `Engine::new` and
//! never mutated afterward.

use serde_json::{Map, Value};

use crate::error::TranslateError;

/// Default total request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 10;

/// A flat map of engine options.
///
/// Keys understood by every engine: `api_keys` (array of strings; the first
/// entry is used), `request_timeout` (seconds), `proxy_uri` and `endpoint`.
/// Generative engines additionally read `model`, `prompt`, `temperature`,
/// `top_p`, `top_k`, `sampling` and `merge_enabled`.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    map: Map<String, Value>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object; anything else is a configuration error.
    pub fn from_value(value: Value) -> Result<Self, TranslateError> {
        match value {
            Value::Object(map) => Ok(Self { map }),
            other => Err(TranslateError::ConfigurationError(format!(
                "engine options must be a JSON object, got: {other}"
            ))),
        }
    }

    /// Set an option, consuming and returning `self` for chaining.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.map.insert(key.to_string(), value.into());
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.map.get(key).and_then(Value::as_f64)
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.map.get(key).and_then(Value::as_u64).map(|v| v as u32)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.map.get(key).and_then(Value::as_bool)
    }

    pub fn get_str_array(&self, key: &str) -> Option<Vec<String>> {
        self.map.get(key).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }

    /// The first configured API key. Engines that require a key call
    /// [`EngineOptions::require_api_key`] instead.
    pub fn api_key(&self) -> Option<String> {
        if let Some(keys) = self.get_str_array("api_keys") {
            return keys.into_iter().next();
        }
        self.get_str("api_key").map(str::to_string)
    }

    pub fn require_api_key(&self, engine: &str) -> Result<String, TranslateError> {
        self.api_key().ok_or_else(|| {
            TranslateError::ConfigurationError(format!("{engine}: an API key is required"))
        })
    }

    /// Total request timeout in seconds.
    pub fn request_timeout(&self) -> u64 {
        self.get_u32("request_timeout")
            .map(u64::from)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn proxy_uri(&self) -> Option<&str> {
        self.get_str("proxy_uri")
    }

    /// Endpoint override, with the engine default as fallback.
    pub fn endpoint_or(&self, default: &str) -> String {
        self.get_str("endpoint")
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn merge_enabled(&self) -> bool {
        self.get_bool("merge_enabled").unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_getters() {
        let options = EngineOptions::from_value(json!({
            "model": "gpt-4o",
            "temperature": 0.7,
            "top_k": 40,
            "merge_enabled": true,
            "api_keys": ["first", "second"],
        }))
        .unwrap();

        assert_eq!(options.get_str("model"), Some("gpt-4o"));
        assert_eq!(options.get_f64("temperature"), Some(0.7));
        assert_eq!(options.get_u32("top_k"), Some(40));
        assert!(options.merge_enabled());
        assert_eq!(options.api_key().as_deref(), Some("first"));
    }

    #[test]
    fn api_key_falls_back_to_scalar_key() {
        let options = EngineOptions::new().with("api_key", "solo");
        assert_eq!(options.api_key().as_deref(), Some("solo"));
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = EngineOptions::new().require_api_key("DeepL").unwrap_err();
        assert!(matches!(err, TranslateError::ConfigurationError(_)));
    }

    #[test]
    fn non_object_options_are_rejected() {
        assert!(EngineOptions::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn timeout_default() {
        assert_eq!(EngineOptions::new().request_timeout(), 10);
        let options = EngineOptions::new().with("request_timeout", 30);
        assert_eq!(options.request_timeout(), 30);
    }
}
