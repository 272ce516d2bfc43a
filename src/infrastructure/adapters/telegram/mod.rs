//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::application::errors::BotError;
use crate::domain::entities::{Message as BotMessage, User as BotUser};
use crate::domain::traits::{Bot, BotInfo};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Long-poll timeout for getUpdates
const POLL_TIMEOUT_SECS: i64 = 30;

/// Pause after a failed poll before trying again
const POLL_BACKOFF: Duration = Duration::from_secs(5);

/// First characters of a token, safe to log
fn token_hint(token: &str) -> String {
    token.chars().take(8).collect()
}

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    result: T,
}

/// Telegram bot adapter using long polling
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: RwLock<BotInfo>,
    offset: Mutex<i64>,
    /// Received but not yet handed out, keyed by update id
    pending: Mutex<VecDeque<(i64, BotMessage)>>,
    closed: AtomicBool,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: RwLock::new(BotInfo {
                id: "unknown".to_string(),
                name: "discbot".to_string(),
                username: "discbot".to_string(),
                owner_id: None,
            }),
            offset: Mutex::new(0),
            pending: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let url = self.api_url("getMe");
        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: ApiResponse<BotInfoResponse> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        let mut info = self.info
            .write()
            .map_err(|_| BotError::Internal("Lock poisoned".to_string()))?;
        info.id = data.result.id.to_string();
        info.name = data.result.first_name;
        info.username = data.result.username;

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        let url = self.api_url("getUpdates");
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: ApiResponse<Vec<Update>> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result)
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
    }

    /// Offset that acknowledges every handed-out update but none still pending.
    ///
    /// Telegram drops updates below the offset of the next `getUpdates` call,
    /// so undelivered ones must stay above it to be redelivered on restart.
    pub fn confirm_offset(pending: &VecDeque<(i64, BotMessage)>, offset: i64) -> i64 {
        pending.front().map(|(id, _)| *id).unwrap_or(offset)
    }

    /// Convert a text update from a human into a domain message
    fn to_message(update: &Update) -> Option<BotMessage> {
        let msg = update.message.as_ref()?;
        let text = msg.text.clone()?;
        let from = msg.from.as_ref()?;
        if from.is_bot {
            return None;
        }

        let mut sender = BotUser::new(from.id.to_string());
        if let Some(username) = &from.username {
            sender = sender.with_username(username);
        }

        let mut message = BotMessage::from_text(msg.chat.id.to_string(), text)
            .with_sender(sender)
            .with_platform("telegram");
        if let Ok(raw) = serde_json::to_value(update) {
            message = message.with_raw(raw);
        }
        Some(message)
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", token_hint(&self.token));
        self.fetch_bot_info().await?;
        tracing::info!("Bot started: @{}", self.bot_info().username);
        Ok(())
    }

    async fn next_message(&self) -> Result<Option<BotMessage>, BotError> {
        loop {
            if self.closed.load(Ordering::SeqCst) {
                return Ok(None);
            }
            if let Some((_, message)) = self.pending.lock().await.pop_front() {
                return Ok(Some(message));
            }

            let mut offset = self.offset.lock().await;
            match self.get_updates(*offset, POLL_TIMEOUT_SECS).await {
                Ok(updates) => {
                    if !updates.is_empty() {
                        tracing::debug!("Received {} updates", updates.len());
                    }
                    *offset = Self::get_next_offset(&updates, *offset);
                    let received = updates
                        .iter()
                        .filter_map(|u| Self::to_message(u).map(|m| (u.update_id, m)));
                    self.pending.lock().await.extend(received);
                }
                Err(e) => {
                    tracing::error!("Failed to get updates: {}", e);
                    tokio::time::sleep(POLL_BACKOFF).await;
                }
            }
        }
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        tracing::debug!("Sending to {}: {}", chat_id, text);

        let url = self.api_url("sendMessage");
        let response = self.client
            .post(&url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: ApiResponse<MessageResult> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result.message_id.to_string())
    }

    async fn close(&self) -> Result<(), BotError> {
        self.closed.store(true, Ordering::SeqCst);

        let offset = *self.offset.lock().await;
        if offset > 0 {
            let confirm = Self::confirm_offset(&*self.pending.lock().await, offset);
            if let Err(e) = self.get_updates(confirm, 0).await {
                tracing::warn!("Failed to confirm handled updates: {}", e);
            }
        }

        tracing::info!("Telegram bot closed");
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info
            .read()
            .map(|info| info.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}
