//! Domain entities - Core business objects

pub mod catalog;
pub mod command;
pub mod context;
pub mod message;
pub mod user;

pub use catalog::{Category, CommandMetadata, MetadataCatalog, DEFAULT_ORDER};
pub use command::{Access, Command, CommandAction, CommandRegistry};
pub use context::{CommandContext, Shutdown};
pub use message::{Content, Message};
pub use user::User;
