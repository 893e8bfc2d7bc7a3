//! Language-code tables for the classic translation APIs.
//!
//! Every classic engine maps display names ("English") to its own vendor
//! codes. The distinguished name `Auto detect` is only valid as a source
//! language, and only for vendors that support detection. The generative
//! engines do not use these tables: language names are substituted into the
//! prompt as-is.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::TranslateError;

/// Source-language name selecting vendor-side detection.
pub const AUTO: &str = "Auto detect";

/// One vendor family's display-name → code table.
pub struct LangTable {
    engine: &'static str,
    codes: HashMap<&'static str, &'static str>,
    /// Code sent when the source is `Auto detect`; `None` means the vendor
    /// expects the parameter to be omitted entirely.
    auto_code: Option<&'static str>,
}

impl LangTable {
    /// Resolve a source-language name, honoring `Auto detect`.
    ///
    /// Returns `Ok(None)` when detection is requested and the vendor wants
    /// the source parameter omitted.
    pub fn source_code(&self, name: &str) -> Result<Option<&'static str>, TranslateError> {
        if name == AUTO {
            return Ok(self.auto_code);
        }
        self.lookup(name).map(Some)
    }

    /// Resolve a target-language name. `Auto detect` is never a target.
    pub fn target_code(&self, name: &str) -> Result<&'static str, TranslateError> {
        if name == AUTO {
            return Err(TranslateError::UnsupportedLanguage {
                engine: self.engine,
                language: name.to_string(),
            });
        }
        self.lookup(name)
    }

    fn lookup(&self, name: &str) -> Result<&'static str, TranslateError> {
        self.codes
            .get(name)
            .copied()
            .ok_or_else(|| TranslateError::UnsupportedLanguage {
                engine: self.engine,
                language: name.to_string(),
            })
    }
}

macro_rules! lang_map {
    ($($name:literal => $code:literal),+ $(,)?) => {{
        let mut map = HashMap::new();
        $(map.insert($name, $code);)+
        map
    }};
}

lazy_static! {
    /// Google endpoints accept `auto` for detection.
    pub static ref GOOGLE: LangTable = LangTable {
        engine: "Google",
        auto_code: Some("auto"),
        codes: lang_map! {
            "English" => "en",
            "Chinese (Simplified)" => "zh-CN",
            "Chinese (Traditional)" => "zh-TW",
            "Japanese" => "ja",
            "Korean" => "ko",
            "French" => "fr",
            "German" => "de",
            "Spanish" => "es",
            "Italian" => "it",
            "Portuguese" => "pt",
            "Russian" => "ru",
            "Arabic" => "ar",
            "Hindi" => "hi",
            "Thai" => "th",
            "Vietnamese" => "vi",
            "Dutch" => "nl",
            "Polish" => "pl",
            "Turkish" => "tr",
            "Ukrainian" => "uk",
            "Swedish" => "sv",
            "Danish" => "da",
            "Finnish" => "fi",
            "Norwegian" => "no",
            "Czech" => "cs",
            "Greek" => "el",
            "Hebrew" => "iw",
            "Indonesian" => "id",
            "Malay" => "ms",
            "Romanian" => "ro",
            "Hungarian" => "hu",
        },
    };

    /// The v3 API detects the source when the parameter is omitted.
    pub static ref MICROSOFT: LangTable = LangTable {
        engine: "Microsoft",
        auto_code: None,
        codes: lang_map! {
            "English" => "en",
            "Chinese (Simplified)" => "zh-Hans",
            "Chinese (Traditional)" => "zh-Hant",
            "Japanese" => "ja",
            "Korean" => "ko",
            "French" => "fr",
            "German" => "de",
            "Spanish" => "es",
            "Italian" => "it",
            "Portuguese" => "pt",
            "Russian" => "ru",
            "Arabic" => "ar",
            "Hindi" => "hi",
            "Thai" => "th",
            "Vietnamese" => "vi",
            "Dutch" => "nl",
            "Polish" => "pl",
            "Turkish" => "tr",
            "Ukrainian" => "uk",
            "Swedish" => "sv",
            "Danish" => "da",
            "Finnish" => "fi",
            "Norwegian" => "nb",
            "Czech" => "cs",
            "Greek" => "el",
            "Hebrew" => "he",
            "Indonesian" => "id",
            "Malay" => "ms",
            "Romanian" => "ro",
            "Hungarian" => "hu",
        },
    };

    /// DeepL detects the source when `source_lang` is omitted.
    pub static ref DEEPL: LangTable = LangTable {
        engine: "DeepL",
        auto_code: None,
        codes: lang_map! {
            "English" => "EN",
            "Chinese (Simplified)" => "ZH",
            "Japanese" => "JA",
            "Korean" => "KO",
            "French" => "FR",
            "German" => "DE",
            "Spanish" => "ES",
            "Italian" => "IT",
            "Portuguese" => "PT",
            "Russian" => "RU",
            "Dutch" => "NL",
            "Polish" => "PL",
            "Turkish" => "TR",
            "Ukrainian" => "UK",
            "Swedish" => "SV",
            "Danish" => "DA",
            "Finnish" => "FI",
            "Norwegian" => "NB",
            "Czech" => "CS",
            "Greek" => "EL",
            "Indonesian" => "ID",
            "Romanian" => "RO",
            "Hungarian" => "HU",
            "Bulgarian" => "BG",
            "Estonian" => "ET",
            "Latvian" => "LV",
            "Lithuanian" => "LT",
            "Slovak" => "SK",
            "Slovenian" => "SL",
        },
    };

    pub static ref YOUDAO: LangTable = LangTable {
        engine: "Youdao",
        auto_code: Some("auto"),
        codes: lang_map! {
            "English" => "en",
            "Chinese (Simplified)" => "zh-CHS",
            "Chinese (Traditional)" => "zh-CHT",
            "Japanese" => "ja",
            "Korean" => "ko",
            "French" => "fr",
            "German" => "de",
            "Spanish" => "es",
            "Italian" => "it",
            "Portuguese" => "pt",
            "Russian" => "ru",
            "Arabic" => "ar",
            "Hindi" => "hi",
            "Thai" => "th",
            "Vietnamese" => "vi",
            "Dutch" => "nl",
            "Indonesian" => "id",
        },
    };

    pub static ref BAIDU: LangTable = LangTable {
        engine: "Baidu",
        auto_code: Some("auto"),
        codes: lang_map! {
            "English" => "en",
            "Chinese (Simplified)" => "zh",
            "Chinese (Traditional)" => "cht",
            "Japanese" => "jp",
            "Korean" => "kor",
            "French" => "fra",
            "German" => "de",
            "Spanish" => "spa",
            "Italian" => "it",
            "Portuguese" => "pt",
            "Russian" => "ru",
            "Arabic" => "ara",
            "Thai" => "th",
            "Vietnamese" => "vie",
            "Dutch" => "nl",
            "Polish" => "pl",
            "Greek" => "el",
            "Bulgarian" => "bul",
            "Estonian" => "est",
            "Danish" => "dan",
            "Finnish" => "fin",
            "Czech" => "cs",
            "Romanian" => "rom",
            "Swedish" => "swe",
            "Hungarian" => "hu",
        },
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_lookup() {
        assert_eq!(GOOGLE.target_code("Japanese").unwrap(), "ja");
        assert_eq!(GOOGLE.source_code("English").unwrap(), Some("en"));
        assert_eq!(GOOGLE.source_code(AUTO).unwrap(), Some("auto"));
    }

    #[test]
    fn deepl_auto_omits_source() {
        assert_eq!(DEEPL.source_code(AUTO).unwrap(), None);
        assert_eq!(DEEPL.target_code("German").unwrap(), "DE");
    }

    #[test]
    fn auto_is_never_a_target() {
        assert!(matches!(
            BAIDU.target_code(AUTO),
            Err(TranslateError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn unknown_language_is_rejected() {
        let err = YOUDAO.target_code("Klingon").unwrap_err();
        match err {
            TranslateError::UnsupportedLanguage { engine, language } => {
                assert_eq!(engine, "Youdao");
                assert_eq!(language, "Klingon");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn chinese_variants_differ_per_vendor() {
        assert_eq!(GOOGLE.target_code("Chinese (Simplified)").unwrap(), "zh-CN");
        assert_eq!(
            MICROSOFT.target_code("Chinese (Simplified)").unwrap(),
            "zh-Hans"
        );
        assert_eq!(YOUDAO.target_code("Chinese (Simplified)").unwrap(), "zh-CHS");
        assert_eq!(BAIDU.target_code("Chinese (Simplified)").unwrap(), "zh");
    }
}
