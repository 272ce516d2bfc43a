//! In-process adapter: inbound messages are queued by the caller and every
//! outbound effect is recorded, in order.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::application::errors::BotError;
use crate::domain::entities::Message;
use crate::domain::traits::{Bot, BotInfo};

/// Something the bot did towards the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Sent { chat_id: String, text: String },
    Closed,
}

/// Scripted bot for embedding and tests
pub struct MemoryAdapter {
    info: BotInfo,
    inbound: Mutex<VecDeque<Message>>,
    outbound: Mutex<Vec<Outbound>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "memory".to_string(),
                name: "discbot".to_string(),
                username: "memory".to_string(),
                owner_id: None,
            },
            inbound: Mutex::new(VecDeque::new()),
            outbound: Mutex::new(Vec::new()),
        }
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.info.owner_id = Some(owner_id.into());
        self
    }

    /// Queue messages to be returned by `next_message`
    pub fn with_script(self, messages: impl IntoIterator<Item = Message>) -> Self {
        if let Ok(mut inbound) = self.inbound.lock() {
            inbound.extend(messages);
        }
        self
    }

    /// Everything sent or closed so far
    pub fn outbound(&self) -> Vec<Outbound> {
        self.outbound
            .lock()
            .map(|o| o.clone())
            .unwrap_or_default()
    }

    /// Texts of sent messages only
    pub fn sent_texts(&self) -> Vec<String> {
        self.outbound()
            .into_iter()
            .filter_map(|o| match o {
                Outbound::Sent { text, .. } => Some(text),
                Outbound::Closed => None,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.outbound().contains(&Outbound::Closed)
    }

    fn record(&self, event: Outbound) -> Result<(), BotError> {
        self.outbound
            .lock()
            .map_err(|_| BotError::Internal("Lock poisoned".to_string()))?
            .push(event);
        Ok(())
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for MemoryAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::debug!("Starting in-memory bot");
        Ok(())
    }

    async fn next_message(&self) -> Result<Option<Message>, BotError> {
        if self.is_closed() {
            return Ok(None);
        }
        let mut inbound = self
            .inbound
            .lock()
            .map_err(|_| BotError::Internal("Lock poisoned".to_string()))?;
        Ok(inbound.pop_front())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        if self.is_closed() {
            return Err(BotError::Network("connection closed".to_string()));
        }
        self.record(Outbound::Sent {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        })?;
        Ok(uuid::Uuid::new_v4().to_string())
    }

    async fn close(&self) -> Result<(), BotError> {
        self.record(Outbound::Closed)
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
