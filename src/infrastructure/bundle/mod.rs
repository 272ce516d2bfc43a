//! Bundle builder - copies a chosen subset of command descriptors and the
//! bot credentials into a self-contained deployment directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::errors::{BotError, ConfigError};
use crate::infrastructure::config::{Config, CredentialsConfig, TOKEN_PLACEHOLDER};
use crate::infrastructure::discovery::DiscoveryScanner;

/// What to put in a bundle
#[derive(Debug, Clone)]
pub struct BundleRequest {
    pub commands: Vec<String>,
    pub output: PathBuf,
    pub credentials: CredentialsConfig,
}

/// What a bundle ended up containing
#[derive(Debug, Clone, Default)]
pub struct BundleReport {
    pub copied: Vec<PathBuf>,
    /// Requested commands with no descriptor in the source directory
    pub missing: Vec<String>,
}

impl BundleRequest {
    fn validate(&self) -> Result<(), ConfigError> {
        let token = self.credentials.token.as_deref().map(str::trim).unwrap_or_default();
        if token.is_empty() || token == TOKEN_PLACEHOLDER {
            return Err(ConfigError::MissingField("a valid bot token".to_string()));
        }
        if self.commands.is_empty() {
            return Err(ConfigError::InvalidValue("select at least one command".to_string()));
        }
        Ok(())
    }
}

fn env_file(credentials: &CredentialsConfig) -> String {
    let value = |v: &Option<String>| v.clone().unwrap_or_default();
    format!(
        "BOT_TOKEN=\"{}\"\nBOT_SERVER_ID=\"{}\"\nBOT_ALERTS_CHANNEL_ID=\"{}\"\n",
        value(&credentials.token),
        value(&credentials.server_id),
        value(&credentials.alerts_channel_id),
    )
}

/// Build a bundle from the descriptors in `source_dir`.
///
/// The output holds `commands/` with the selected descriptors, a `.env`
/// with the credentials, and a `config.yaml` that connects to the platform
/// and enables exactly the selected commands that were found.
pub fn build_bundle(source_dir: &Path, request: &BundleRequest) -> Result<BundleReport, BotError> {
    request.validate()?;

    let by_name: HashMap<String, PathBuf> = DiscoveryScanner::new(source_dir)
        .descriptors()?
        .into_iter()
        .map(|(path, d)| (d.command_name, path))
        .collect();

    let commands_dir = request.output.join("commands");
    fs::create_dir_all(&commands_dir)?;

    let mut report = BundleReport::default();
    let mut enabled = Vec::new();
    for name in &request.commands {
        let Some(src) = by_name.get(name) else {
            tracing::warn!("No descriptor for '{}' in {}", name, source_dir.display());
            report.missing.push(name.clone());
            continue;
        };
        let Some(file_name) = src.file_name() else {
            continue;
        };
        let dest = commands_dir.join(file_name);
        fs::copy(src, &dest)?;
        tracing::debug!("Bundled {}", dest.display());
        report.copied.push(dest);
        enabled.push(name.clone());
    }

    fs::write(request.output.join(".env"), env_file(&request.credentials))?;

    let mut config = Config::default();
    config.commands.directory = PathBuf::from("./commands");
    config.commands.enabled = Some(enabled);
    config.adapters.telegram.enabled = true;
    config.adapters.console.enabled = false;
    fs::write(request.output.join("config.yaml"), config.to_yaml()?)?;

    tracing::info!(
        "Bundle written to {} ({} commands)",
        request.output.display(),
        report.copied.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(output: PathBuf, commands: &[&str], token: Option<&str>) -> BundleRequest {
        BundleRequest {
            commands: commands.iter().map(|s| s.to_string()).collect(),
            output,
            credentials: CredentialsConfig {
                token: token.map(str::to_string),
                server_id: Some("123".to_string()),
                alerts_channel_id: None,
            },
        }
    }

    #[test]
    fn test_rejects_placeholder_token_and_empty_selection() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let err = build_bundle(dir.path(), &request(out.clone(), &["ping"], Some(TOKEN_PLACEHOLDER)));
        assert!(matches!(err, Err(BotError::Config(ConfigError::MissingField(_)))));

        let err = build_bundle(dir.path(), &request(out.clone(), &[], Some("tok")));
        assert!(matches!(err, Err(BotError::Config(ConfigError::InvalidValue(_)))));
        assert!(!out.exists());
    }

    #[test]
    fn test_writes_env_and_config() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("ping.yaml"), "COMMAND_NAME: ping\nCATEGORY: utilities\nORDER: 1\n").unwrap();
        let out = tempfile::tempdir().unwrap();

        let report = build_bundle(src.path(), &request(out.path().to_path_buf(), &["ping", "ghost"], Some("tok"))).unwrap();

        assert_eq!(report.copied, vec![out.path().join("commands").join("ping.yaml")]);
        assert_eq!(report.missing, vec!["ghost".to_string()]);

        let env = fs::read_to_string(out.path().join(".env")).unwrap();
        assert!(env.contains("BOT_TOKEN=\"tok\""));
        assert!(env.contains("BOT_SERVER_ID=\"123\""));

        let mut config = Config::load(out.path().join("config.yaml")).unwrap();
        assert_eq!(config.commands.enabled, Some(vec!["ping".to_string()]));
        assert!(!config.adapters.console.enabled);

        // the token only arrives through .env at run time
        assert_eq!(config.telegram_token(), None);
        config.apply_env(|k| (k == "BOT_TOKEN").then(|| "tok".to_string()));
        assert_eq!(config.telegram_token(), Some("tok"));
    }
}
