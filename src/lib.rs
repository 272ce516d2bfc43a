//! discbot - a prefix-command chat bot
//!
//! Commands are compiled in as a registration list (`commands::builtin`).
//! Their menu placement comes from the metadata they declare, overlaid with
//! YAML descriptors found in the command directory.

pub mod app;
pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;
