//! Invocation context handed to command actions

use std::sync::Arc;
use tokio::sync::watch;

use super::{CommandRegistry, Message, MetadataCatalog};
use crate::application::errors::CommandError;
use crate::domain::traits::Bot;

/// Cloneable handle used to stop the message loop
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything an action can see and do for one invocation
#[derive(Clone)]
pub struct CommandContext {
    pub message: Message,
    pub name: String,
    pub args: Vec<String>,
    prefix: char,
    bot: Arc<dyn Bot>,
    registry: Arc<CommandRegistry>,
    catalog: Arc<MetadataCatalog>,
    shutdown: Shutdown,
}

impl CommandContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        message: Message,
        name: String,
        args: Vec<String>,
        prefix: char,
        bot: Arc<dyn Bot>,
        registry: Arc<CommandRegistry>,
        catalog: Arc<MetadataCatalog>,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            message,
            name,
            args,
            prefix,
            bot,
            registry,
            catalog,
            shutdown,
        }
    }

    /// Send a reply to the chat the command came from
    pub async fn reply(&self, text: impl AsRef<str>) -> Result<(), CommandError> {
        self.bot
            .send_message(&self.message.chat_id, text.as_ref())
            .await
            .map(|_| ())
            .map_err(|e| CommandError::ExecutionFailed(format!("reply failed: {}", e)))
    }

    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn author_id(&self) -> Option<&str> {
        self.message.sender_id()
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &MetadataCatalog {
        &self.catalog
    }

    /// Ask the message loop to stop once this invocation returns
    pub fn request_shutdown(&self) {
        self.shutdown.trigger();
    }
}
