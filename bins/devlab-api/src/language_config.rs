// Language configuration management
// Loads the editor's language options from languages.json

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One selectable language and its judge-service numeric id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOption {
    pub key: String,
    pub label: String,
    pub judge_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LanguagesFile {
    languages: Vec<LanguageOption>,
}

/// Registry of configured languages, in display order
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<LanguageOption>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        let option = |key: &str, label: &str, judge_id| LanguageOption {
            key: key.to_string(),
            label: label.to_string(),
            judge_id,
        };
        Self {
            languages: vec![
                option("cpp", "C++", 54),
                option("java", "Java", 62),
                option("python", "Python", 71),
            ],
        }
    }
}

impl LanguageRegistry {
    /// Load language configuration from languages.json
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read languages.json: {}", e))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        let config: LanguagesFile = serde_json::from_str(content)
            .map_err(|e| format!("Failed to parse languages.json: {}", e))?;

        let mut seen = HashSet::new();
        for language in &config.languages {
            if language.judge_id == 0 {
                return Err(format!("Language '{}' has no judge id", language.key));
            }
            if !seen.insert(language.key.as_str()) {
                return Err(format!("Duplicate language '{}' in languages.json", language.key));
            }
        }

        if config.languages.is_empty() {
            return Err("No languages configured in languages.json".to_string());
        }

        Ok(Self {
            languages: config.languages,
        })
    }

    pub fn languages(&self) -> &[LanguageOption] {
        &self.languages
    }

    /// Judge id for a language key
    pub fn judge_id(&self, key: &str) -> Option<u32> {
        self.languages
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.judge_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_registry() {
        let registry = LanguageRegistry::load_from_file("../../config/languages.json");
        assert!(registry.is_ok());

        if let Ok(reg) = registry {
            assert_eq!(reg.judge_id("python"), Some(71));
        }
    }

    #[test]
    fn test_default_registry() {
        let registry = LanguageRegistry::default();
        assert_eq!(registry.judge_id("cpp"), Some(54));
        assert_eq!(registry.judge_id("java"), Some(62));
        assert_eq!(registry.judge_id("cobol"), None);
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let dup = r#"{"languages":[
            {"key":"cpp","label":"C++","judgeId":54},
            {"key":"cpp","label":"C++17","judgeId":76}
        ]}"#;
        assert!(LanguageRegistry::from_json(dup).is_err());
        assert!(LanguageRegistry::from_json(r#"{"languages":[]}"#).is_err());
        assert!(LanguageRegistry::from_json(
            r#"{"languages":[{"key":"go","label":"Go","judgeId":0}]}"#
        )
        .is_err());
    }
}
