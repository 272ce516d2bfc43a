use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::application::services::HelpService;
use crate::domain::entities::{Command, CommandAction, CommandContext};

pub const COMMAND_NAME: &str = "help";

/// `$help` lists every visible command; `$help <name>` describes one
struct Help;

#[async_trait]
impl CommandAction for Help {
    async fn execute(&self, ctx: CommandContext) -> Result<(), CommandError> {
        let text = {
            let help = HelpService::new(ctx.registry(), ctx.catalog(), ctx.prefix());
            match ctx.first_arg() {
                Some(name) => help.describe(name),
                None => help.list_all(),
            }
        };
        ctx.reply(text).await
    }
}

pub fn command() -> Command {
    Command::new(COMMAND_NAME)
        .with_category("mandatory")
        .with_order(1)
        .with_help("Show available commands or help for a specific command")
        .with_action(Help)
}
