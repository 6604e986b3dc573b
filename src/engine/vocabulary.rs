//! Completion vocabulary: the keyword and builtin-type tables offered at every cursor position.
//!
//! The static tables come from the `mu_core::lang` registries. Configured extras are appended to the matching
//! table; spellings already present are skipped so a label never appears twice within a table.

use mu_core::lang::{keywords, types};

use crate::config::EngineConfig;

/// One vocabulary word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub label: String,
    pub documentation: Option<String>,
}

/// Keyword and type tables used by the completion engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    keywords: Vec<VocabularyEntry>,
    types: Vec<VocabularyEntry>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Vocabulary {
    /// Registry tables only.
    pub fn builtin() -> Self {
        let keywords = keywords::KEYWORDS
            .iter()
            .map(|k| VocabularyEntry {
                label: k.item.canonical.to_string(),
                documentation: Some(k.item.description.to_string()),
            })
            .collect();
        let types = types::BUILTIN_TYPES
            .iter()
            .map(|t| VocabularyEntry {
                label: t.canonical.to_string(),
                documentation: Some(t.description.to_string()),
            })
            .collect();
        Self { keywords, types }
    }

    /// Registry tables extended with the configured extras.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut vocabulary = Self::builtin();
        for word in &config.extra_keywords {
            push_unique(&mut vocabulary.keywords, word);
        }
        for name in &config.extra_types {
            push_unique(&mut vocabulary.types, name);
        }
        vocabulary
    }

    pub fn keywords(&self) -> &[VocabularyEntry] {
        &self.keywords
    }

    pub fn types(&self) -> &[VocabularyEntry] {
        &self.types
    }
}

fn push_unique(table: &mut Vec<VocabularyEntry>, label: &str) {
    if label.is_empty() || table.iter().any(|e| e.label == label) {
        return;
    }
    table.push(VocabularyEntry {
        label: label.to_string(),
        documentation: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_mirror_registries() {
        let vocabulary = Vocabulary::builtin();
        assert_eq!(vocabulary.keywords().len(), keywords::KEYWORDS.len());
        assert_eq!(vocabulary.types().len(), types::BUILTIN_TYPES.len());
        assert!(vocabulary.keywords().iter().all(|e| e.documentation.is_some()));
    }

    #[test]
    fn test_extras_are_appended_once() {
        let config = EngineConfig::new()
            .with_extra_keywords(["print", "print", "class", ""])
            .with_extra_types(["Image"]);
        let vocabulary = Vocabulary::from_config(&config);
        assert_eq!(vocabulary.keywords().len(), keywords::KEYWORDS.len() + 1);
        assert_eq!(vocabulary.types().len(), types::BUILTIN_TYPES.len() + 1);
        let print = vocabulary.keywords().last().unwrap();
        assert_eq!(print.label, "print");
        assert_eq!(print.documentation, None);
    }
}
