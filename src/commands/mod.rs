//! Built-in commands
//!
//! The registration list below is the full set of commands compiled into the
//! bot. Config may narrow it to an enabled subset at startup.

pub mod help;
pub mod ping;
pub mod terminate;

use crate::domain::entities::{Command, MetadataCatalog};

/// Every built-in command, in registration order
pub fn builtin() -> Vec<Command> {
    vec![terminate::command(), help::command(), ping::command()]
}

/// Catalog of the metadata the given commands declare
pub fn declared_catalog(commands: &[Command]) -> MetadataCatalog {
    commands
        .iter()
        .map(|c| (c.name.clone(), c.metadata()))
        .collect()
}
