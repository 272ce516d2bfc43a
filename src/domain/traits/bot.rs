use async_trait::async_trait;
use crate::domain::entities::Message;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Connect and authenticate
    async fn start(&self) -> Result<(), BotError>;

    /// Wait for the next inbound message. `Ok(None)` means the stream has ended.
    async fn next_message(&self) -> Result<Option<Message>, BotError>;

    /// Send a message to a chat
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError>;

    /// Tear down the connection. No messages are received afterwards.
    async fn close(&self) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
    /// Platform-designated owner, if the platform has that notion
    pub owner_id: Option<String>,
}
