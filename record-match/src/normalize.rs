//! Text canonicalization applied identically to corpus and query values.

const ABBREVIATIONS: &[(&str, &str)] = &[("straße", "str."), ("Straße", "Str.")];
const MUTATIONS: &[(&str, &str)] = &[("ä", "ae"), ("ö", "oe"), ("ü", "ue"), ("ß", "ss")];

/// Deterministic text normalizer.
///
/// Replacements run in insertion order over the raw text. The result is then lowercased,
/// trimmed, and stripped of every character that is neither a word character nor
/// whitespace.
#[derive(Clone, Debug)]
pub struct Normalizer {
    replacements: Vec<(String, String)>,
}

impl Default for Normalizer {
    fn default() -> Self {
        let replacements = ABBREVIATIONS
            .iter()
            .chain(MUTATIONS.iter())
            .map(|&(from, to)| (from.to_string(), to.to_string()))
            .collect();
        Self { replacements }
    }
}

impl Normalizer {
    /// Creates a normalizer with the default abbreviation and umlaut tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a normalizer without any replacement.
    pub const fn plain() -> Self {
        Self {
            replacements: vec![],
        }
    }

    /// Appends a replacement applied after the existing ones.
    pub fn replacement<F, T>(mut self, from: F, to: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        self.replacements.push((from.into(), to.into()));
        self
    }

    /// Normalizes `text`.
    pub fn normalize<S>(&self, text: S) -> String
    where
        S: AsRef<str>,
    {
        let mut text = text.as_ref().to_string();
        for (from, to) in &self.replacements {
            if text.contains(from.as_str()) {
                text = text.replace(from.as_str(), to);
            }
        }
        text.to_lowercase()
            .trim()
            .chars()
            .filter(|&c| is_word_char(c) || c.is_whitespace())
            .collect()
    }
}

#[inline(always)]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_umlauts_and_abbreviations() {
        let normalizer = Normalizer::new();
        assert_eq!(
            normalizer.normalize("Dr. Müller-Straße 123"),
            "dr muellerstr 123"
        );
        assert_eq!(normalizer.normalize("Schloßstraße"), "schlossstr");
        assert_eq!(normalizer.normalize("Überlinger Str."), "überlinger str");
    }

    #[test]
    fn test_case_and_spacing() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("  Main Street 5 "), "main street 5");
        assert_eq!(normalizer.normalize("main street 5"), "main street 5");
    }

    #[test]
    fn test_empty() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize(" .,- "), "");
    }

    #[test]
    fn test_custom_replacement() {
        let normalizer = Normalizer::plain().replacement("Str.", "Strasse");
        assert_eq!(normalizer.normalize("Goethe Str."), "goethe strasse");
    }
}
