//! Command metadata: categories, ordering and the catalog that maps names to them

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Order given to commands that do not declare one. Sorts last.
pub const DEFAULT_ORDER: i32 = 999;

/// Priority shared by `other` and every custom category.
const FALLBACK_PRIORITY: u32 = 999;

/// Help menu section a command belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Mandatory,
    Utilities,
    Admin,
    Other,
    Custom(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Mandatory => "mandatory",
            Category::Utilities => "utilities",
            Category::Admin => "admin",
            Category::Other => "other",
            Category::Custom(s) => s,
        }
    }

    /// Position of the category in the help menu, lower first
    pub fn priority(&self) -> u32 {
        match self {
            Category::Mandatory => 0,
            Category::Utilities => 1,
            Category::Admin => 2,
            Category::Other | Category::Custom(_) => FALLBACK_PRIORITY,
        }
    }

    /// Section title: the name with its first letter upper-cased
    pub fn label(&self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "mandatory" => Category::Mandatory,
            "utilities" => Category::Utilities,
            "admin" => Category::Admin,
            "other" | "" => Category::Other,
            _ => Category::Custom(trimmed.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from(value.as_str())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Display metadata for one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    pub category: Category,
    pub order: i32,
    pub description: Option<String>,
}

impl CommandMetadata {
    pub fn new(category: impl Into<Category>, order: i32) -> Self {
        Self {
            category: category.into(),
            order,
            description: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Mapping from command name to its display metadata.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataCatalog {
    entries: HashMap<String, CommandMetadata>,
}

impl MetadataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, metadata: CommandMetadata) -> Option<CommandMetadata> {
        self.entries.insert(name.into(), metadata)
    }

    pub fn get(&self, name: &str) -> Option<&CommandMetadata> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Overlay `other` on top of this catalog; its entries win on conflict
    pub fn merge(&mut self, other: MetadataCatalog) {
        self.entries.extend(other.entries);
    }

    /// Entries sorted by name
    pub fn sorted(&self) -> Vec<(&str, &CommandMetadata)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, CommandMetadata)> for MetadataCatalog {
    fn from_iter<I: IntoIterator<Item = (String, CommandMetadata)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing_is_case_insensitive() {
        assert_eq!(Category::from("Mandatory"), Category::Mandatory);
        assert_eq!(Category::from(" UTILITIES "), Category::Utilities);
        assert_eq!(Category::from(""), Category::Other);
        assert_eq!(Category::from("Fun"), Category::Custom("Fun".to_string()));
    }

    #[test]
    fn test_category_priority_table() {
        assert_eq!(Category::Mandatory.priority(), 0);
        assert_eq!(Category::Utilities.priority(), 1);
        assert_eq!(Category::Admin.priority(), 2);
        assert_eq!(Category::Other.priority(), 999);
        assert_eq!(Category::from("music").priority(), 999);
    }

    #[test]
    fn test_category_label_capitalizes() {
        assert_eq!(Category::Utilities.label(), "Utilities");
        assert_eq!(Category::from("music").label(), "Music");
    }

    #[test]
    fn test_merge_prefers_incoming_entries() {
        let mut base = MetadataCatalog::new();
        base.insert("ping", CommandMetadata::new("utilities", 1));
        base.insert("help", CommandMetadata::new("mandatory", 1));

        let mut overlay = MetadataCatalog::new();
        overlay.insert("ping", CommandMetadata::new("admin", 5).with_description("Latency"));

        base.merge(overlay);

        assert_eq!(base.len(), 2);
        let ping = base.get("ping").unwrap();
        assert_eq!(ping.category, Category::Admin);
        assert_eq!(ping.order, 5);
        assert_eq!(ping.description.as_deref(), Some("Latency"));
    }
}
