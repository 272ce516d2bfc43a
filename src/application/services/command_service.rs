use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{
    Command, CommandContext, CommandRegistry, Content, Message, MetadataCatalog, Shutdown, User,
};
use crate::domain::traits::Bot;

/// Result of loading a registration list into a registry
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub shadowed: Vec<String>,
    pub failed: Vec<(String, CommandError)>,
    /// Names in the enabled list with no matching command
    pub missing: Vec<String>,
}

/// Bind `units` into a fresh registry.
///
/// When `enabled` is given only the listed names are loaded. A unit that
/// fails validation is skipped; the rest still load. Later units with a
/// repeated name shadow earlier ones.
pub fn load_registry(
    units: Vec<Command>,
    enabled: Option<&[String]>,
    prefix: char,
) -> (CommandRegistry, LoadReport) {
    let mut registry = CommandRegistry::new();
    let mut report = LoadReport::default();

    if let Some(enabled) = enabled {
        report.missing = enabled
            .iter()
            .filter(|name| !units.iter().any(|u| &u.name == *name))
            .cloned()
            .collect();
        for name in &report.missing {
            tracing::warn!("Enabled command '{}' has no implementation", name);
        }
    }

    for unit in units {
        if let Some(enabled) = enabled {
            if !enabled.iter().any(|n| n == &unit.name) {
                tracing::debug!("Skipping disabled command: {}", unit.name);
                continue;
            }
        }

        if let Err(e) = unit.validate(prefix) {
            tracing::error!("Failed to load command '{}': {}", unit.name, e);
            report.failed.push((unit.name.clone(), e));
            continue;
        }

        let name = unit.name.clone();
        if registry.register(unit).is_some() {
            tracing::warn!("Command '{}' registered twice, keeping the later one", name);
            report.shadowed.push(name.clone());
        } else {
            report.loaded.push(name.clone());
        }
        tracing::debug!("Loaded command: {}", name);
    }

    tracing::info!(
        "Loaded {} commands ({} failed)",
        registry.len(),
        report.failed.len()
    );
    (registry, report)
}

/// What happened to one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a command, or no command by that name
    Ignored,
    /// Owner-only command invoked by someone else
    Rejected,
    Completed,
    /// The action errored or panicked; a generic reply was sent
    Failed(String),
}

/// Routes parsed messages to commands in the live registry
pub struct CommandService {
    registry: Arc<CommandRegistry>,
    catalog: Arc<MetadataCatalog>,
    parser: MessageParser,
    bot: Arc<dyn Bot>,
    owner: Option<String>,
    shutdown: Shutdown,
}

impl CommandService {
    pub fn new(
        registry: CommandRegistry,
        catalog: MetadataCatalog,
        prefix: char,
        bot: Arc<dyn Bot>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            catalog: Arc::new(catalog),
            parser: MessageParser::new(prefix),
            bot,
            owner: None,
            shutdown: Shutdown::new(),
        }
    }

    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &MetadataCatalog {
        &self.catalog
    }

    pub fn prefix(&self) -> char {
        self.parser.prefix()
    }

    pub fn bot(&self) -> &Arc<dyn Bot> {
        &self.bot
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    fn is_owner(&self, message: &Message) -> bool {
        match (self.owner.as_deref(), message.sender_id()) {
            (Some(owner), Some(sender)) => owner == sender,
            _ => false,
        }
    }

    /// Run the command a message names, if any.
    ///
    /// Faults inside the action never escape: errors and panics are logged
    /// and answered with a generic failure reply.
    pub async fn dispatch(&self, message: Message) -> DispatchOutcome {
        let message = self.parser.parse(message);
        let Content::Command { name, args } = message.content.clone() else {
            return DispatchOutcome::Ignored;
        };

        let Some(command) = self.registry.get(&name).cloned() else {
            tracing::debug!("[{}] Unknown command: {}", message.chat_id, name);
            return DispatchOutcome::Ignored;
        };

        if command.is_owner_only() && !self.is_owner(&message) {
            tracing::warn!(
                "[{}] {} tried owner-only command {}",
                message.chat_id,
                message.sender.as_ref().map(User::display_name).unwrap_or("unknown"),
                name
            );
            return DispatchOutcome::Rejected;
        }

        let Some(action) = command.handler.clone() else {
            return DispatchOutcome::Failed(format!("Command {} not implemented", name));
        };

        tracing::info!("[{}] Running {}{} {:?}", message.chat_id, self.prefix(), name, args);

        let chat_id = message.chat_id.clone();
        let ctx = CommandContext::new(
            message,
            name.clone(),
            args,
            self.prefix(),
            self.bot.clone(),
            self.registry.clone(),
            self.catalog.clone(),
            self.shutdown.clone(),
        );

        let failure = match tokio::spawn(async move { action.execute(ctx).await }).await {
            Ok(Ok(())) => return DispatchOutcome::Completed,
            Ok(Err(e)) => e.to_string(),
            Err(e) if e.is_panic() => "command panicked".to_string(),
            Err(e) => e.to_string(),
        };

        tracing::error!("[{}] Command {} failed: {}", chat_id, name, failure);
        let reply = format!(
            "Something went wrong while running `{}{}`.",
            self.prefix(),
            name
        );
        if let Err(e) = self.bot.send_message(&chat_id, &reply).await {
            tracing::error!("Failed to send message: {}", e);
        }
        DispatchOutcome::Failed(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::memory::{MemoryAdapter, Outbound};

    fn noop(name: &str) -> Command {
        Command::new(name).with_handler(|_ctx| async { Ok(()) })
    }

    fn service(units: Vec<Command>, bot: Arc<MemoryAdapter>) -> CommandService {
        let (registry, _) = load_registry(units, None, '$');
        CommandService::new(registry, MetadataCatalog::new(), '$', bot)
            .with_owner(Some("owner".to_string()))
    }

    fn from(user: &str, text: &str) -> Message {
        Message::from_text("chat", text).with_sender(User::new(user))
    }

    #[test]
    fn test_load_skips_failures_and_keeps_siblings() {
        let units = vec![noop("ping"), Command::new("broken"), noop("two words"), noop("help")];
        let (registry, report) = load_registry(units, None, '$');

        assert_eq!(registry.names(), vec!["help", "ping"]);
        assert_eq!(report.loaded, vec!["ping".to_string(), "help".to_string()]);
        let failed: Vec<_> = report.failed.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(failed, vec!["broken", "two words"]);
    }

    #[test]
    fn test_load_respects_enabled_list() {
        let enabled = vec!["ping".to_string(), "missing".to_string()];
        let (registry, report) = load_registry(vec![noop("ping"), noop("help")], Some(enabled.as_slice()), '$');

        assert_eq!(registry.names(), vec!["ping"]);
        assert_eq!(report.missing, vec!["missing".to_string()]);
    }

    #[test]
    fn test_load_later_unit_shadows_earlier() {
        let units = vec![noop("ping").with_order(1), noop("ping").with_order(2)];
        let (registry, report) = load_registry(units, None, '$');

        assert_eq!(registry.get("ping").map(|c| c.order), Some(2));
        assert_eq!(report.shadowed, vec!["ping".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_and_plain_text_are_ignored() {
        let bot = Arc::new(MemoryAdapter::new());
        let service = service(vec![noop("ping")], bot.clone());

        assert_eq!(service.dispatch(from("u", "hello")).await, DispatchOutcome::Ignored);
        assert_eq!(service.dispatch(from("u", "$nope")).await, DispatchOutcome::Ignored);
        assert!(bot.outbound().is_empty());
    }

    #[tokio::test]
    async fn test_owner_only_rejects_others_without_side_effect() {
        let bot = Arc::new(MemoryAdapter::new());
        let guarded = Command::new("wipe").owner_only().with_handler(|ctx| async move {
            ctx.reply("wiped").await
        });
        let service = service(vec![guarded], bot.clone());

        assert_eq!(service.dispatch(from("stranger", "$wipe")).await, DispatchOutcome::Rejected);
        assert!(bot.outbound().is_empty());

        assert_eq!(service.dispatch(from("owner", "$wipe")).await, DispatchOutcome::Completed);
        assert_eq!(bot.sent_texts(), vec!["wiped".to_string()]);
    }

    #[tokio::test]
    async fn test_errors_become_generic_reply() {
        let bot = Arc::new(MemoryAdapter::new());
        let failing = Command::new("boom").with_handler(|_ctx| async {
            Err(CommandError::ExecutionFailed("disk on fire".to_string()))
        });
        let service = service(vec![failing], bot.clone());

        let outcome = service.dispatch(from("u", "$boom")).await;
        assert!(matches!(outcome, DispatchOutcome::Failed(ref e) if e.contains("disk on fire")));
        assert_eq!(
            bot.outbound(),
            vec![Outbound::Sent {
                chat_id: "chat".to_string(),
                text: "Something went wrong while running `$boom`.".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_panics_are_contained() {
        let bot = Arc::new(MemoryAdapter::new());
        let panicking = Command::new("panic").with_handler(|ctx| async move {
            if ctx.args.is_empty() {
                panic!("no args");
            }
            Ok(())
        });
        let service = service(vec![panicking, noop("ping")], bot.clone());

        let outcome = service.dispatch(from("u", "$panic")).await;
        assert_eq!(outcome, DispatchOutcome::Failed("command panicked".to_string()));
        assert_eq!(service.dispatch(from("u", "$ping")).await, DispatchOutcome::Completed);
    }

    #[tokio::test]
    async fn test_args_reach_the_action() {
        let bot = Arc::new(MemoryAdapter::new());
        let echo = Command::new("echo").with_handler(|ctx| async move {
            let text = ctx.args.join(" ");
            ctx.reply(text).await
        });
        let service = service(vec![echo], bot.clone());

        service.dispatch(from("u", "$echo a  b c")).await;
        assert_eq!(bot.sent_texts(), vec!["a b c".to_string()]);
    }
}
