//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Discovery: Command directory scanning
//! - Adapters: Platform integrations (console, Telegram, in-memory)
//! - Bundle: Packaging a command subset with credentials

pub mod adapters;
pub mod bundle;
pub mod config;
pub mod discovery;
