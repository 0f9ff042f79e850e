// 🏷️ Category Rules - Rules as Data
// Ordered keyword groups mapping transaction descriptions to spending categories.
//
// Evaluation order is the table order: the first group with any keyword
// contained in the lowercased description wins. Reordering the table changes
// which label a multi-match description receives.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{Error, Result};

pub const FOOD_AND_GROCERIES: &str = "Food & Groceries";
pub const ENTERTAINMENT: &str = "Entertainment";
pub const SUBSCRIPTIONS: &str = "Subscriptions";
pub const RENT_AND_UTILITIES: &str = "Rent & Utilities";
pub const SHOPPING: &str = "Shopping";
pub const TRANSPORT: &str = "Transport";

/// Label returned when no keyword group matches.
pub const OTHER: &str = "Other";

// ============================================================================
// KEYWORD GROUP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup {
    /// Category label assigned on match
    pub label: String,

    /// Substrings to look for (stored lowercase)
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        KeywordGroup {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Check whether any keyword occurs in an already-lowercased description.
    ///
    /// Plain substring search: "dpz" matches inside a longer token.
    fn matches_lowercase(&self, description_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| description_lower.contains(keyword.as_str()))
    }

    /// Case-insensitive match against a raw description
    pub fn matches(&self, description: &str) -> bool {
        self.matches_lowercase(&description.to_lowercase())
    }
}

// ============================================================================
// RULE ENGINE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RuleEngine {
    groups: Vec<KeywordGroup>,
}

impl RuleEngine {
    /// The built-in table, in priority order.
    pub fn builtin() -> Self {
        RuleEngine {
            groups: vec![
                KeywordGroup::new(
                    FOOD_AND_GROCERIES,
                    &["mcdonald", "deli", "lidl", "domino", "starbucks"],
                ),
                KeywordGroup::new(
                    ENTERTAINMENT,
                    &["bookstore", "concert", "gamestore", "cinema"],
                ),
                KeywordGroup::new(SUBSCRIPTIONS, &["spotify", "netflix"]),
                // dpz shows up on the utility provider's statements
                KeywordGroup::new(RENT_AND_UTILITIES, &["dpz", "monthlyren"]),
                KeywordGroup::new(SHOPPING, &["zara", "amazon", "amzn", "tech store"]),
                KeywordGroup::new(TRANSPORT, &["parking", "publicparkin", "parkinggar"]),
            ],
        }
    }

    /// Load a rules table from a JSON file.
    ///
    /// The file holds an array of `{"label": ..., "keywords": [...]}` objects;
    /// array order is evaluation order.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let engine = RuleEngine::from_json(&content)?;
        tracing::debug!(
            "Loaded {} keyword groups from {}",
            engine.group_count(),
            path.display()
        );

        Ok(engine)
    }

    /// Parse a rules table from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let groups: Vec<KeywordGroup> = serde_json::from_str(content)?;
        RuleEngine::from_groups(groups)
    }

    /// Create engine from keyword groups, keeping their order.
    pub fn from_groups(groups: Vec<KeywordGroup>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(groups.len());

        for group in groups {
            let label = group.label.trim().to_string();
            if label.is_empty() {
                return Err(Error::InvalidRules("group with empty label".to_string()));
            }
            if label == OTHER {
                return Err(Error::InvalidRules(format!(
                    "\"{OTHER}\" is the fallback label and cannot have keywords"
                )));
            }
            if group.keywords.is_empty() {
                return Err(Error::InvalidRules(format!("\"{label}\" has no keywords")));
            }

            let mut keywords = Vec::with_capacity(group.keywords.len());
            for keyword in group.keywords {
                let keyword = keyword.to_lowercase();
                // An empty keyword would match every description
                if keyword.trim().is_empty() {
                    return Err(Error::InvalidRules(format!(
                        "\"{label}\" has an empty keyword"
                    )));
                }
                keywords.push(keyword);
            }

            normalized.push(KeywordGroup { label, keywords });
        }

        Ok(RuleEngine { groups: normalized })
    }

    /// Classify a description. Always returns a label, [`OTHER`] if nothing matches.
    pub fn classify(&self, description: &str) -> &str {
        let description_lower = description.to_lowercase();

        self.groups
            .iter()
            .find(|group| group.matches_lowercase(&description_lower))
            .map(|group| group.label.as_str())
            .unwrap_or(OTHER)
    }

    /// Labels in evaluation order, followed by the fallback.
    pub fn labels(&self) -> Vec<&str> {
        self.groups
            .iter()
            .map(|group| group.label.as_str())
            .chain(std::iter::once(OTHER))
            .collect()
    }

    pub fn groups(&self) -> &[KeywordGroup] {
        &self.groups
    }

    /// Get number of keyword groups loaded
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Classify a description with the built-in table.
pub fn classify(description: &str) -> &'static str {
    static BUILTIN: OnceLock<RuleEngine> = OnceLock::new();
    BUILTIN.get_or_init(RuleEngine::builtin).classify(description)
}

// ============================================================================
// TESTS
// ============================================================================
