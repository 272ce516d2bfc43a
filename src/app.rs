//! Startup wiring: catalog, registry and dispatcher from a config

use std::sync::Arc;

use crate::application::services::{load_registry, CommandService, LoadReport};
use crate::commands;
use crate::domain::entities::{Command, MetadataCatalog, Shutdown};
use crate::domain::traits::Bot;
use crate::infrastructure::config::Config;
use crate::infrastructure::discovery::DiscoveryScanner;

/// Declared metadata of `units`, overlaid with whatever the command directory
/// declares. A directory that cannot be listed is logged and ignored.
pub fn build_catalog(config: &Config, units: &[Command]) -> MetadataCatalog {
    let mut catalog = commands::declared_catalog(units);

    match DiscoveryScanner::new(&config.commands.directory).scan() {
        Ok(scanned) => catalog.merge(scanned),
        Err(e) => tracing::warn!("Command discovery failed, using declared metadata: {}", e),
    }

    catalog
}

/// Build the dispatcher for `bot` with the built-in commands
pub fn build_command_service(
    config: &Config,
    bot: Arc<dyn Bot>,
    shutdown: Shutdown,
) -> (CommandService, LoadReport) {
    build_command_service_with(config, commands::builtin(), bot, shutdown)
}

/// Build the dispatcher for `bot` from an explicit registration list
pub fn build_command_service_with(
    config: &Config,
    units: Vec<Command>,
    bot: Arc<dyn Bot>,
    shutdown: Shutdown,
) -> (CommandService, LoadReport) {
    let prefix = config.bot.prefix;
    let catalog = build_catalog(config, &units);
    let (registry, report) = load_registry(units, config.commands.enabled.as_deref(), prefix);

    let owner = config.bot.owner.clone().or_else(|| bot.bot_info().owner_id);
    if owner.is_none() {
        tracing::warn!("No owner configured; owner-only commands are disabled");
    }

    let service = CommandService::new(registry, catalog, prefix, bot)
        .with_owner(owner)
        .with_shutdown(shutdown);
    (service, report)
}
