//! System-prompt templating for the generative engines.

use crate::lang;

/// Default translation instruction. `<slang>` and `<tlang>` are replaced
/// with the requested language names at call time.
pub const DEFAULT_PROMPT: &str = "You are a meticulous translator who translates any given \
content. Translate the given content from <slang> to <tlang> only. Do not explain any term \
or answer any question-like content.";

/// Appended when placeholder merging is active, so models keep the markers
/// intact across the translation.
const MERGE_CLAUSE: &str = " Ensure that placeholders matching the pattern {{id_\\d+}} in the \
content are retained.";

/// Render a prompt template for one translation call.
///
/// An `Auto detect` source renders as "the detected source language".
pub fn render(template: &str, source_lang: &str, target_lang: &str, merge_enabled: bool) -> String {
    let source = if source_lang == lang::AUTO {
        "the detected source language"
    } else {
        source_lang
    };
    let mut prompt = template
        .replace("<tlang>", target_lang)
        .replace("<slang>", source);
    if merge_enabled {
        prompt.push_str(MERGE_CLAUSE);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_both_languages() {
        let prompt = render(DEFAULT_PROMPT, "English", "Japanese", false);
        assert!(prompt.contains("from English to Japanese"));
        assert!(!prompt.contains("<slang>"));
        assert!(!prompt.contains("<tlang>"));
    }

    #[test]
    fn auto_source_uses_detection_wording() {
        let prompt = render(DEFAULT_PROMPT, lang::AUTO, "German", false);
        assert!(prompt.contains("from the detected source language to German"));
    }

    #[test]
    fn merge_clause_is_appended_on_demand() {
        let plain = render(DEFAULT_PROMPT, "English", "French", false);
        let merged = render(DEFAULT_PROMPT, "English", "French", true);
        assert!(!plain.contains("{{id_"));
        assert!(merged.ends_with("are retained."));
    }

    #[test]
    fn custom_template_is_honored() {
        let prompt = render("Translate to <tlang>.", "English", "Czech", false);
        assert_eq!(prompt, "Translate to Czech.");
    }
}
