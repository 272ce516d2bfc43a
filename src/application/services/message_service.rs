use crate::application::errors::BotError;
use crate::application::services::command_service::CommandService;

/// Pulls messages from the bot one at a time and dispatches them
pub struct MessageService {
    commands: CommandService,
}

impl MessageService {
    pub fn new(commands: CommandService) -> Self {
        Self { commands }
    }

    /// Run until the inbound stream ends or shutdown is requested.
    ///
    /// Each dispatch, replies included, finishes before the next message is
    /// read and before the connection is closed.
    pub async fn run(&self) -> Result<(), BotError> {
        let bot = self.commands.bot().clone();
        let shutdown = self.commands.shutdown().clone();
        let mut stop = shutdown.subscribe();

        bot.start().await?;
        tracing::info!("Listening for {}-prefixed commands", self.commands.prefix());

        let result = loop {
            if shutdown.is_triggered() {
                tracing::info!("Shutdown requested");
                break Ok(());
            }

            let next = tokio::select! {
                _ = stop.changed() => continue,
                next = bot.next_message() => next,
            };

            match next {
                Ok(Some(message)) => {
                    let outcome = self.commands.dispatch(message).await;
                    tracing::debug!("Dispatch outcome: {:?}", outcome);
                }
                Ok(None) => {
                    tracing::info!("Message stream ended");
                    break Ok(());
                }
                Err(e) => {
                    tracing::error!("Failed to receive message: {}", e);
                    break Err(e);
                }
            }
        };

        bot.close().await?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::command_service::load_registry;
    use crate::domain::entities::{Command, Message, MetadataCatalog, User};
    use crate::infrastructure::adapters::memory::{MemoryAdapter, Outbound};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reply_then_close_and_nothing_after() {
        let stop = Command::new("stop").owner_only().with_handler(|ctx| async move {
            ctx.reply("bye").await?;
            ctx.request_shutdown();
            Ok(())
        });
        let echo = Command::new("echo").with_handler(|ctx| async move { ctx.reply("echo").await });
        let (registry, _) = load_registry(vec![stop, echo], None, '$');

        let bot = Arc::new(MemoryAdapter::new().with_script([
            Message::from_text("c", "$echo").with_sender(User::new("owner")),
            Message::from_text("c", "$stop").with_sender(User::new("owner")),
            Message::from_text("c", "$echo").with_sender(User::new("owner")),
        ]));
        let commands = CommandService::new(registry, MetadataCatalog::new(), '$', bot.clone())
            .with_owner(Some("owner".to_string()));

        MessageService::new(commands).run().await.unwrap();

        let sent = |t: &str| Outbound::Sent {
            chat_id: "c".to_string(),
            text: t.to_string(),
        };
        assert_eq!(bot.outbound(), vec![sent("echo"), sent("bye"), Outbound::Closed]);
    }

    #[tokio::test]
    async fn test_stream_end_closes() {
        let bot = Arc::new(MemoryAdapter::new());
        let commands = CommandService::new(
            load_registry(Vec::new(), None, '$').0,
            MetadataCatalog::new(),
            '$',
            bot.clone(),
        );

        MessageService::new(commands).run().await.unwrap();
        assert_eq!(bot.outbound(), vec![Outbound::Closed]);
    }
}
