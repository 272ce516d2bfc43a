//! Messaging platform adapters

pub mod console;
pub mod memory;
pub mod telegram;

pub use console::ConsoleAdapter;
pub use memory::{MemoryAdapter, Outbound};
pub use telegram::TelegramAdapter;
