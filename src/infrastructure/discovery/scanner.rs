//! Command directory scanner - builds the metadata catalog from descriptor files

use std::path::{Path, PathBuf};

use super::descriptor::CommandDescriptor;
use crate::application::errors::DiscoveryError;
use crate::domain::entities::MetadataCatalog;

/// File extensions recognized as descriptors
const DESCRIPTOR_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// File name prefixes reserved for internal files
const RESERVED_PREFIXES: &[char] = &['_', '.'];

/// Scans a command directory for descriptor files
pub struct DiscoveryScanner {
    command_dir: PathBuf,
}

impl DiscoveryScanner {
    pub fn new(command_dir: impl Into<PathBuf>) -> Self {
        Self {
            command_dir: command_dir.into(),
        }
    }

    pub fn command_dir(&self) -> &Path {
        &self.command_dir
    }

    /// Whether a file name marks a descriptor candidate
    pub fn is_candidate(file_name: &str) -> bool {
        if file_name.starts_with(RESERVED_PREFIXES) {
            return false;
        }
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| DESCRIPTOR_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
    }

    /// Candidate files, sorted by file name
    pub fn candidates(&self) -> Result<Vec<PathBuf>, DiscoveryError> {
        if !self.command_dir.exists() {
            tracing::warn!("Command directory does not exist: {}", self.command_dir.display());
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.command_dir).map_err(|source| DiscoveryError::Io {
            path: self.command_dir.clone(),
            source,
        })?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_candidate = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(Self::is_candidate)
                .unwrap_or(false);
            if is_candidate {
                candidates.push(path);
            }
        }

        candidates.sort();
        Ok(candidates)
    }

    /// Parse every candidate, skipping the ones that fail
    pub fn descriptors(&self) -> Result<Vec<(PathBuf, CommandDescriptor)>, DiscoveryError> {
        let mut descriptors = Vec::new();
        for path in self.candidates()? {
            match CommandDescriptor::from_file(&path) {
                Ok(descriptor) => descriptors.push((path, descriptor)),
                Err(e) => tracing::warn!("Skipping command descriptor: {}", e),
            }
        }
        Ok(descriptors)
    }

    /// Build a fresh catalog from the directory.
    ///
    /// Files are read in name order; when two declare the same command the
    /// later file wins.
    pub fn scan(&self) -> Result<MetadataCatalog, DiscoveryError> {
        let mut catalog = MetadataCatalog::new();

        for (path, descriptor) in self.descriptors()? {
            if catalog
                .insert(descriptor.command_name.clone(), descriptor.metadata())
                .is_some()
            {
                tracing::warn!(
                    "Command '{}' declared again in {}, replacing earlier entry",
                    descriptor.command_name,
                    path.display()
                );
            }
        }

        tracing::info!(
            "Discovered {} commands in {}",
            catalog.len(),
            self.command_dir.display()
        );
        Ok(catalog)
    }
}
