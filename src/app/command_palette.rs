use crate::error::{Error, Result};
use tracing::warn;

/// Input starting with this character is treated as a command.
pub const TRIGGER: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashAction {
    Clear,
    List,
    Dark,
    Light,
    FreeTime,
    Tasks,
    New,
    View,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub action: SlashAction,
}

/// A submitted line resolved to a registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub index: usize,
    /// Trailing text after the command name, trimmed; `None` when empty.
    pub argument: Option<String>,
}

#[must_use]
pub fn builtin_commands() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition {
            name: "/clear",
            description: "Clear the message thread",
            action: SlashAction::Clear,
        },
        CommandDefinition {
            name: "/list",
            description: "Show all available commands",
            action: SlashAction::List,
        },
        CommandDefinition {
            name: "/dark",
            description: "Switch to dark mode",
            action: SlashAction::Dark,
        },
        CommandDefinition {
            name: "/light",
            description: "Switch to light mode",
            action: SlashAction::Light,
        },
        CommandDefinition {
            name: "/freetime",
            description: "Show free time analysis for next week",
            action: SlashAction::FreeTime,
        },
        CommandDefinition {
            name: "/tasks",
            description: "List tasks by status (e.g., /tasks today)",
            action: SlashAction::Tasks,
        },
        CommandDefinition {
            name: "/new",
            description: "Create a new entry with optional title (e.g., /new do the laundry)",
            action: SlashAction::New,
        },
        CommandDefinition {
            name: "/view",
            description: "View recent entries",
            action: SlashAction::View,
        },
    ]
}

/// The set of available commands, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDefinition>,
}

impl CommandRegistry {
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for command in builtin_commands() {
            if let Err(e) = registry.register(command) {
                warn!(error = %e, "skipping builtin command");
            }
        }
        registry
    }

    pub fn register(&mut self, command: CommandDefinition) -> Result<()> {
        if self.commands.iter().any(|c| c.name == command.name) {
            return Err(Error::DuplicateCommand(command.name.to_string()));
        }
        self.commands.push(command);
        Ok(())
    }

    #[must_use]
    pub fn commands(&self) -> &[CommandDefinition] {
        &self.commands
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CommandDefinition> {
        self.commands.get(index)
    }

    /// Indices of the commands whose name contains `input` (case-insensitive).
    /// The trigger alone matches everything; other text matches nothing.
    #[must_use]
    pub fn filter(&self, input: &str) -> Vec<usize> {
        if !input.starts_with(TRIGGER) {
            return Vec::new();
        }
        if input.len() == TRIGGER.len_utf8() {
            return (0..self.commands.len()).collect();
        }

        let query = input.to_lowercase();
        self.commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.name.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect()
    }

    /// Resolve a full submitted line by case-insensitive command-name prefix.
    ///
    /// Returns `Ok(None)` for plain text. The name must be followed by the end
    /// of input or whitespace, so `/newer` never resolves to `/new`.
    pub fn resolve_for_execution(&self, raw: &str) -> Result<Option<Resolved>> {
        let input = raw.trim();
        if !input.starts_with(TRIGGER) {
            return Ok(None);
        }

        for (index, command) in self.commands.iter().enumerate() {
            let split = command.name.len();
            let Some(head) = input.get(..split) else {
                continue;
            };
            if !head.eq_ignore_ascii_case(command.name) {
                continue;
            }
            let rest = &input[split..];
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                continue;
            }
            let argument = Some(rest.trim()).filter(|a| !a.is_empty()).map(str::to_string);
            return Ok(Some(Resolved { index, argument }));
        }

        let word = input.split_whitespace().next().unwrap_or(input);
        Err(Error::NoMatchingCommand(word.to_string()))
    }
}
