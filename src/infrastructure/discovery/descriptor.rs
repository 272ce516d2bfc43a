//! Command descriptor files

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::errors::DiscoveryError;
use crate::domain::entities::{Category, CommandMetadata};

/// Metadata a command declares in its descriptor file.
///
/// ```yaml
/// COMMAND_NAME: ping
/// CATEGORY: utilities
/// ORDER: 1
/// DESCRIPTION: Check bot latency
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandDescriptor {
    #[serde(rename = "COMMAND_NAME")]
    pub command_name: String,

    #[serde(rename = "CATEGORY")]
    pub category: Category,

    #[serde(rename = "ORDER")]
    pub order: i32,

    #[serde(rename = "DESCRIPTION", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CommandDescriptor {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DiscoveryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse descriptor text; `path` is only used for error reporting
    pub fn parse(content: &str, path: &Path) -> Result<Self, DiscoveryError> {
        let descriptor: Self = serde_yaml::from_str(content).map_err(|e| DiscoveryError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        descriptor.validate(path)?;
        Ok(descriptor)
    }

    fn validate(&self, path: &Path) -> Result<(), DiscoveryError> {
        let name = &self.command_name;
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(DiscoveryError::Invalid {
                path: path.to_path_buf(),
                reason: format!("bad COMMAND_NAME '{}'", self.command_name),
            });
        }
        Ok(())
    }

    pub fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            category: self.category.clone(),
            order: self.order,
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<CommandDescriptor, DiscoveryError> {
        CommandDescriptor::parse(content, Path::new("test.yaml"))
    }

    #[test]
    fn test_parse_full_descriptor() {
        let d = parse("COMMAND_NAME: ping\nCATEGORY: utilities\nORDER: 1\nDESCRIPTION: Check bot latency\n").unwrap();
        assert_eq!(d.command_name, "ping");
        assert_eq!(d.category, Category::Utilities);
        assert_eq!(d.order, 1);
        assert_eq!(d.description.as_deref(), Some("Check bot latency"));
    }

    #[test]
    fn test_description_is_optional_and_extra_keys_ignored() {
        let d = parse("COMMAND_NAME: roll\nCATEGORY: fun\nORDER: 3\nAUTHOR: someone\n").unwrap();
        assert_eq!(d.description, None);
        assert_eq!(d.category, Category::Custom("fun".to_string()));
    }

    #[test]
    fn test_missing_required_key_is_malformed() {
        let err = parse("COMMAND_NAME: ping\nCATEGORY: utilities\n").unwrap_err();
        assert!(matches!(err, DiscoveryError::Malformed { .. }));
    }

    #[test]
    fn test_non_integer_order_is_malformed() {
        let err = parse("COMMAND_NAME: ping\nCATEGORY: utilities\nORDER: first\n").unwrap_err();
        assert!(matches!(err, DiscoveryError::Malformed { .. }));
    }

    #[test]
    fn test_bad_name_is_invalid() {
        let err = parse("COMMAND_NAME: two words\nCATEGORY: utilities\nORDER: 1\n").unwrap_err();
        assert!(matches!(err, DiscoveryError::Invalid { .. }));
    }
}
