//! Message handling - Turning inbound text into commands

pub mod parser;

pub use parser::MessageParser;
