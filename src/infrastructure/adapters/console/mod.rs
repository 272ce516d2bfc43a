//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::application::errors::BotError;
use crate::domain::entities::{Message, User};
use crate::domain::traits::{Bot, BotInfo};

const CONSOLE_CHAT: &str = "console";
const CONSOLE_USER: &str = "console-user";

/// Console bot adapter for local development.
///
/// Each stdin line is one message from the local user, who owns the bot.
pub struct ConsoleAdapter {
    info: BotInfo,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "discbot".to_string(),
                username: "console".to_string(),
                owner_id: Some(CONSOLE_USER.to_string()),
            },
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn next_message(&self) -> Result<Option<Message>, BotError> {
        let mut lines = self.lines.lock().await;
        loop {
            let Some(line) = lines.next_line().await? else {
                return Ok(None);
            };
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let message = Message::from_text(CONSOLE_CHAT, text)
                .with_sender(User::new(CONSOLE_USER).with_username("you"))
                .with_platform("console");
            return Ok(Some(message));
        }
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    async fn close(&self) -> Result<(), BotError> {
        tracing::info!("Console bot closed");
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
