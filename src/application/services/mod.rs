//! Application services - Dispatching, help aggregation and the message loop

pub mod command_service;
pub mod help_service;
pub mod message_service;

pub use command_service::{load_registry, CommandService, DispatchOutcome, LoadReport};
pub use help_service::{HelpEntry, HelpSection, HelpService};
pub use message_service::MessageService;
