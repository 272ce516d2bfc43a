use crate::domain::entities::Command;

pub const COMMAND_NAME: &str = "terminate";

/// Owner-only. The acknowledgement is sent before shutdown is requested so
/// the caller sees it before the connection closes.
pub fn command() -> Command {
    Command::new(COMMAND_NAME)
        .with_category("mandatory")
        .with_order(0)
        .with_help("Terminate the bot (owner only)")
        .owner_only()
        .with_handler(|ctx| async move {
            ctx.reply("Terminating bot...").await?;
            tracing::info!("Terminate requested by {}", ctx.author_id().unwrap_or("unknown"));
            ctx.request_shutdown();
            Ok(())
        })
}
