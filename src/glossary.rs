//! Glossary substitution around a translation call.
//!
//! Terms are swapped for opaque `{{id_NNNNNN}}` placeholders before the text
//! is sent to an engine and swapped back afterward, so vendor models cannot
//! mangle them. Restoration tolerates whitespace that engines occasionally
//! inject inside the braces.

use regex::Regex;

/// An ordered set of (term, replacement) pairs.
///
/// The source format is plain text: entries are separated by blank lines;
/// within an entry the first line is the term and the optional second line
/// is the substitute (a single-line entry keeps the term untranslated).
#[derive(Debug, Default)]
pub struct Glossary {
    entries: Vec<(String, String)>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse glossary content. Empty or whitespace-only content yields an
    /// empty glossary.
    pub fn parse(content: &str) -> Self {
        let content = content.trim_start_matches('\u{feff}').trim();
        if content.is_empty() {
            return Self::default();
        }
        let mut entries = Vec::new();
        for group in split_groups(content) {
            let mut lines = group.lines().map(str::trim).filter(|l| !l.is_empty());
            let Some(term) = lines.next() else { continue };
            let replacement = lines.next().unwrap_or(term);
            entries.push((term.to_string(), replacement.to_string()));
        }
        Self { entries }
    }

    /// Read a glossary from a file path; unreadable files yield an empty
    /// glossary, matching a disabled glossary.
    pub async fn load(path: &str) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Swap each term for its positional placeholder.
    pub fn replace(&self, content: &str) -> String {
        let mut content = content.to_string();
        for (id, (term, _)) in self.entries.iter().enumerate() {
            content = content.replace(term, &placeholder(id));
        }
        content
    }

    /// Swap placeholders back for the replacement words. Replacement happens
    /// through a callback so backslashes in the words are taken literally.
    pub fn restore(&self, content: &str) -> String {
        if self.entries.is_empty() {
            return content.to_string();
        }
        let pattern = Regex::new(r"\{\{\s*id\s*_\s*(\d{6})\s*\}\}").expect("static pattern");
        pattern
            .replace_all(content, |caps: &regex::Captures| {
                let id: usize = caps[1].parse().unwrap_or(usize::MAX);
                match self.entries.get(id) {
                    Some((_, replacement)) => replacement.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

fn placeholder(id: usize) -> String {
    format!("{{{{id_{id:06}}}}}")
}

/// Split on runs of two or more newlines, tolerating CRLF.
fn split_groups(content: &str) -> Vec<String> {
    let normalized = content.replace("\r\n", "\n");
    let splitter = Regex::new(r"\n{2,}").expect("static pattern");
    splitter.split(&normalized).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_groups() {
        let glossary = Glossary::parse("Hobbit\n霍比特人\n\nShire\n\n\nGandalf\n甘道夫");
        assert_eq!(glossary.len(), 3);
        // A single-line entry keeps the term as its own replacement.
        let replaced = glossary.replace("the Shire");
        assert_eq!(replaced, "the {{id_000001}}");
        assert_eq!(glossary.restore(&replaced), "the Shire");
    }

    #[test]
    fn replace_and_restore_round_trip() {
        let glossary = Glossary::parse("Hobbit\n霍比特人");
        let replaced = glossary.replace("A Hobbit lived in a hole.");
        assert_eq!(replaced, "A {{id_000000}} lived in a hole.");
        assert_eq!(
            glossary.restore(&replaced),
            "A 霍比特人 lived in a hole."
        );
    }

    #[test]
    fn restore_tolerates_injected_whitespace() {
        let glossary = Glossary::parse("Hobbit\n霍比特人");
        assert_eq!(glossary.restore("{{ id _ 000000 }}"), "霍比特人");
    }

    #[test]
    fn restore_is_backslash_safe() {
        let glossary = Glossary::parse(r"dir\path");
        let content = glossary.replace(r"see dir\path");
        assert_eq!(glossary.restore(&content), r"see dir\path");
    }

    #[test]
    fn unknown_placeholder_is_left_alone() {
        let glossary = Glossary::parse("Hobbit\n霍比特人");
        assert_eq!(glossary.restore("{{id_000042}}"), "{{id_000042}}");
    }

    #[test]
    fn empty_content_yields_empty_glossary() {
        assert!(Glossary::parse("").is_empty());
        assert!(Glossary::parse("\u{feff}  \n ").is_empty());
    }
}
