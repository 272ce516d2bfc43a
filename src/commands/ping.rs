use crate::domain::entities::Command;

pub const COMMAND_NAME: &str = "ping";

pub fn command() -> Command {
    Command::new(COMMAND_NAME)
        .with_category("utilities")
        .with_order(1)
        .with_help("Check bot latency")
        .with_handler(|ctx| async move { ctx.reply("Pong!").await })
}
