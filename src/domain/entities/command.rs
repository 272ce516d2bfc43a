use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::catalog::{Category, CommandMetadata, DEFAULT_ORDER};
use super::context::CommandContext;
use crate::application::errors::CommandError;

/// Who may invoke a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Public,
    /// Only the bot owner
    Owner,
}

/// Executable behaviour of a command
#[async_trait]
pub trait CommandAction: Send + Sync {
    async fn execute(&self, ctx: CommandContext) -> Result<(), CommandError>;
}

/// Adapts an async closure into a `CommandAction`
struct FnAction<F>(F);

#[async_trait]
impl<F, Fut> CommandAction for FnAction<F>
where
    F: Fn(CommandContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
{
    async fn execute(&self, ctx: CommandContext) -> Result<(), CommandError> {
        (self.0)(ctx).await
    }
}

/// Represents a bot command: its declaration plus the action it runs
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub category: Category,
    pub order: i32,
    pub description: Option<String>,
    pub help: Option<String>,
    pub access: Access,
    pub hidden: bool,
    pub handler: Option<Arc<dyn CommandAction>>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Category::Other,
            order: DEFAULT_ORDER,
            description: None,
            help: None,
            access: Access::Public,
            hidden: false,
            handler: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn owner_only(mut self) -> Self {
        self.access = Access::Owner;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(FnAction(handler)));
        self
    }

    pub fn with_action<A: CommandAction + 'static>(mut self, action: A) -> Self {
        self.handler = Some(Arc::new(action));
        self
    }

    /// Metadata this command declares for itself
    pub fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            category: self.category.clone(),
            order: self.order,
            description: self.description.clone(),
        }
    }

    pub fn is_owner_only(&self) -> bool {
        self.access == Access::Owner
    }

    /// Check the declaration can be bound under `prefix`
    pub fn validate(&self, prefix: char) -> Result<(), CommandError> {
        let invalid = |reason: &str| CommandError::InvalidDefinition {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(invalid("name contains whitespace"));
        }
        if self.name.starts_with(prefix) {
            return Err(invalid("name starts with the command prefix"));
        }
        if self.handler.is_none() {
            return Err(invalid("no action bound"));
        }
        Ok(())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("order", &self.order)
            .field("access", &self.access)
            .field("hidden", &self.hidden)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// Live registry of commands bound to the dispatcher
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a command, returning the one it shadows
    pub fn register(&mut self, command: Command) -> Option<Arc<Command>> {
        self.commands.insert(command.name.clone(), Arc::new(command))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Command>> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Commands that may appear in listings
    pub fn visible(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands.values().filter(|c| !c.hidden)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
