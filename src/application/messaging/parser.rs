//! Message parser - Splits prefixed text into a command name and arguments

use crate::domain::entities::{Content, Message};

/// Turns raw message text into structured content
#[derive(Debug, Clone, Copy)]
pub struct MessageParser {
    command_prefix: char,
}

impl MessageParser {
    pub fn new(prefix: char) -> Self {
        Self {
            command_prefix: prefix,
        }
    }

    pub fn prefix(&self) -> char {
        self.command_prefix
    }

    /// Parse text into content.
    ///
    /// A command is the prefix immediately followed by a name, then optional
    /// whitespace-separated arguments. Anything else is plain text.
    pub fn parse_content(&self, text: &str) -> Content {
        let Some(rest) = text.strip_prefix(self.command_prefix) else {
            return Content::Text(text.to_string());
        };

        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return Content::Text(text.to_string());
        }

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_string();
        let args = parts.map(str::to_string).collect();

        Content::Command { name, args }
    }

    /// Re-parse a message whose content is still plain text
    pub fn parse(&self, mut message: Message) -> Message {
        if let Content::Text(text) = &message.content {
            message.content = self.parse_content(text);
        }
        message
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new('$')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str, args: &[&str]) -> Content {
        Content::Command {
            name: name.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_simple_command() {
        let parser = MessageParser::default();
        assert_eq!(parser.parse_content("$ping"), command("ping", &[]));
    }

    #[test]
    fn test_parse_command_with_args() {
        let parser = MessageParser::default();
        assert_eq!(parser.parse_content("$help  ping   extra"), command("help", &["ping", "extra"]));
    }

    #[test]
    fn test_prefix_must_touch_name() {
        let parser = MessageParser::default();
        assert_eq!(parser.parse_content("$ ping"), Content::Text("$ ping".to_string()));
        assert_eq!(parser.parse_content("$"), Content::Text("$".to_string()));
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        let parser = MessageParser::default();
        assert_eq!(parser.parse_content("ping"), Content::Text("ping".to_string()));
        assert_eq!(parser.parse_content("!ping"), Content::Text("!ping".to_string()));
    }

    #[test]
    fn test_custom_prefix() {
        let parser = MessageParser::new('!');
        assert_eq!(parser.parse_content("!ping"), command("ping", &[]));
        assert!(!parser.parse_content("$ping").is_command());
    }

    #[test]
    fn test_parse_message_keeps_sender() {
        let parser = MessageParser::default();
        let message = Message::from_text("chat", "$ping")
            .with_sender(crate::domain::entities::User::new("42"));
        let parsed = parser.parse(message);
        assert_eq!(parsed.content, command("ping", &[]));
        assert_eq!(parsed.sender_id(), Some("42"));
    }
}
