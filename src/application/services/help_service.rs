//! Help aggregation - groups the live commands by category and renders menus

use crate::domain::entities::{Category, Command, CommandRegistry, MetadataCatalog, DEFAULT_ORDER};

const NO_DESCRIPTION: &str = "No description";
const NO_HELP: &str = "No description provided";

/// One listed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub name: String,
    pub order: i32,
    pub description: String,
}

/// Commands sharing a category, already sorted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSection {
    pub category: Category,
    pub entries: Vec<HelpEntry>,
}

/// Builds help output from the live registry and the metadata catalog
pub struct HelpService<'a> {
    registry: &'a CommandRegistry,
    catalog: &'a MetadataCatalog,
    prefix: char,
}

impl<'a> HelpService<'a> {
    pub fn new(registry: &'a CommandRegistry, catalog: &'a MetadataCatalog, prefix: char) -> Self {
        Self {
            registry,
            catalog,
            prefix,
        }
    }

    /// Resolve `(category, order, description)` for a registered command
    fn resolve(&self, command: &Command) -> (Category, HelpEntry) {
        let own_help = command.help.as_deref().unwrap_or(NO_DESCRIPTION);

        let (category, order, description) = match self.catalog.get(&command.name) {
            Some(meta) => (
                meta.category.clone(),
                meta.order,
                meta.description.as_deref().unwrap_or(own_help),
            ),
            None => (Category::Other, DEFAULT_ORDER, own_help),
        };

        let entry = HelpEntry {
            name: command.name.clone(),
            order,
            description: description.to_string(),
        };
        (category, entry)
    }

    /// Visible commands grouped by category, in menu order
    pub fn sections(&self) -> Vec<HelpSection> {
        let mut sections: Vec<HelpSection> = Vec::new();

        for command in self.registry.visible() {
            let (category, entry) = self.resolve(command);
            match sections.iter_mut().find(|s| s.category == category) {
                Some(section) => section.entries.push(entry),
                None => sections.push(HelpSection {
                    category,
                    entries: vec![entry],
                }),
            }
        }

        sections.sort_by(|a, b| {
            a.category
                .priority()
                .cmp(&b.category.priority())
                .then_with(|| a.category.as_str().cmp(b.category.as_str()))
        });
        for section in &mut sections {
            section
                .entries
                .sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        }

        sections
    }

    /// Full categorized listing
    pub fn list_all(&self) -> String {
        let mut out = String::from("**Available Commands**\n");

        for section in self.sections() {
            out.push_str(&format!("\n**{}**\n", section.category.label()));
            for entry in &section.entries {
                out.push_str(&format!("**{}{}** — {}\n", self.prefix, entry.name, entry.description));
            }
        }

        out.push_str(&format!(
            "\nUse {}help <command> for more info on a specific command",
            self.prefix
        ));
        out
    }

    /// Help for a single command, or a not-found notice
    pub fn describe(&self, name: &str) -> String {
        let Some(command) = self.registry.get(name) else {
            return format!("Command `{}` not found.", name);
        };

        format!(
            "**Help: {prefix}{name}**\nDescription: {help}\nUsage: `{prefix}{name}`",
            prefix = self.prefix,
            name = command.name,
            help = command.help.as_deref().unwrap_or(NO_HELP),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CommandMetadata;

    fn noop(name: &str) -> Command {
        Command::new(name).with_handler(|_ctx| async { Ok(()) })
    }

    fn fixture() -> (CommandRegistry, MetadataCatalog) {
        let mut registry = CommandRegistry::new();
        registry.register(noop("help").with_help("Show available commands"));
        registry.register(noop("terminate").with_help("Terminate the bot"));
        registry.register(noop("ping").with_help("Check bot latency"));
        registry.register(noop("ban").with_help("Ban a user"));
        registry.register(noop("kick"));
        registry.register(noop("roll").with_help("Roll a die"));
        registry.register(noop("secret").hidden());

        let mut catalog = MetadataCatalog::new();
        catalog.insert("help", CommandMetadata::new("mandatory", 1));
        catalog.insert("terminate", CommandMetadata::new("mandatory", 0));
        catalog.insert("ping", CommandMetadata::new("utilities", 1));
        catalog.insert("ban", CommandMetadata::new("admin", 2));
        catalog.insert("kick", CommandMetadata::new("admin", 2).with_description("Kick a user"));
        catalog.insert("secret", CommandMetadata::new("admin", 0));
        (registry, catalog)
    }

    #[test]
    fn test_sections_follow_priority_then_order() {
        let (registry, catalog) = fixture();
        let help = HelpService::new(&registry, &catalog, '$');
        let sections = help.sections();

        let categories: Vec<_> = sections.iter().map(|s| s.category.clone()).collect();
        assert_eq!(
            categories,
            vec![Category::Mandatory, Category::Utilities, Category::Admin, Category::Other]
        );

        let mandatory: Vec<_> = sections[0].entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(mandatory, vec!["terminate", "help"]);

        // equal order falls back to name
        let admin: Vec<_> = sections[2].entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(admin, vec!["ban", "kick"]);
    }

    #[test]
    fn test_uncatalogued_command_falls_back_to_other() {
        let (registry, catalog) = fixture();
        let help = HelpService::new(&registry, &catalog, '$');
        let sections = help.sections();

        let other = sections.last().unwrap();
        assert_eq!(other.category, Category::Other);
        assert_eq!(
            other.entries,
            vec![HelpEntry {
                name: "roll".to_string(),
                order: 999,
                description: "Roll a die".to_string(),
            }]
        );
    }

    #[test]
    fn test_description_resolution() {
        let (registry, catalog) = fixture();
        let help = HelpService::new(&registry, &catalog, '$');
        let admin = &help.sections()[2];

        assert_eq!(admin.entries[0].description, "Ban a user");
        assert_eq!(admin.entries[1].description, "Kick a user");
    }

    #[test]
    fn test_custom_categories_sort_by_name_after_known() {
        let mut registry = CommandRegistry::new();
        registry.register(noop("song"));
        registry.register(noop("joke"));
        registry.register(noop("ping"));

        let mut catalog = MetadataCatalog::new();
        catalog.insert("song", CommandMetadata::new("music", 1));
        catalog.insert("joke", CommandMetadata::new("fun", 1));
        catalog.insert("ping", CommandMetadata::new("utilities", 1));

        let help = HelpService::new(&registry, &catalog, '$');
        let labels: Vec<_> = help.sections().iter().map(|s| s.category.label()).collect();
        assert_eq!(labels, vec!["Utilities", "Fun", "Music"]);
    }

    #[test]
    fn test_list_all_rendering() {
        let (registry, catalog) = fixture();
        let help = HelpService::new(&registry, &catalog, '$');
        let listing = help.list_all();

        assert!(listing.starts_with("**Available Commands**"));
        assert!(listing.contains("**$ping** — Check bot latency"));
        assert!(listing.contains("**$kick** — Kick a user"));
        assert!(!listing.contains("secret"));
        assert!(listing.ends_with("Use $help <command> for more info on a specific command"));

        let mandatory = listing.find("**Mandatory**").unwrap();
        let utilities = listing.find("**Utilities**").unwrap();
        let admin = listing.find("**Admin**").unwrap();
        let other = listing.find("**Other**").unwrap();
        assert!(mandatory < utilities && utilities < admin && admin < other);
    }

    #[test]
    fn test_describe_known_and_unknown() {
        let (registry, catalog) = fixture();
        let help = HelpService::new(&registry, &catalog, '$');

        let ping = help.describe("ping");
        assert!(ping.contains("Check bot latency"));
        assert!(ping.contains("`$ping`"));

        assert_eq!(help.describe("kick"), "**Help: $kick**\nDescription: No description provided\nUsage: `$kick`");
        assert_eq!(help.describe("doesnotexist"), "Command `doesnotexist` not found.");
    }
}
