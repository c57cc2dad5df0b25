//! Slash command actions as a pure function of their context.

use crate::app::command::Command;
use crate::app::command_palette::{CommandRegistry, SlashAction};
use crate::domain::availability::next_work_week;
use crate::domain::models::Record;
use crate::error::{Error, Result};
use crate::theme::ThemeMode;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static TASKS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^/tasks\s+(.+)$").expect("valid tasks command regex")
});

pub const TASKS_USAGE: &str = "Invalid task command. Use format: /tasks <status>";
pub const NO_TASKS: &str = "No tasks found with that status.";

pub struct CommandContext<'a> {
    /// The full composed line.
    pub input: &'a str,
    /// Trailing text after the command name, when submitted as a full line.
    pub argument: Option<&'a str>,
    pub registry: &'a CommandRegistry,
    pub today: NaiveDate,
}

/// What the conversation does in response to a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ClearLog,
    Reply(String),
    SetTheme(ThemeMode),
    Run(Command),
}

pub fn execute(action: SlashAction, ctx: &CommandContext<'_>) -> Result<Effect> {
    let effect = match action {
        SlashAction::Clear => Effect::ClearLog,
        SlashAction::List => Effect::Reply(format_command_list(ctx.registry)),
        SlashAction::Dark => Effect::SetTheme(ThemeMode::Dark),
        SlashAction::Light => Effect::SetTheme(ThemeMode::Light),
        SlashAction::FreeTime => {
            let (start, end) = next_work_week(ctx.today);
            Effect::Run(Command::LoadFreeTime { start, end })
        }
        SlashAction::Tasks => Effect::Run(Command::QueryTasks(parse_task_status(ctx.input)?)),
        SlashAction::New => match ctx.argument {
            Some(title) => Effect::Run(Command::CreateTitled(title.to_string())),
            None => Effect::Run(Command::OpenDraft),
        },
        SlashAction::View => Effect::Run(Command::LoadRecent),
    };
    Ok(effect)
}

/// The status argument of `/tasks <status>`, trimmed.
pub fn parse_task_status(input: &str) -> Result<String> {
    TASKS_PATTERN
        .captures(input.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MalformedCommandArgument(TASKS_USAGE.to_string()))
}

#[must_use]
pub fn format_command_list(registry: &CommandRegistry) -> String {
    let list = registry
        .commands()
        .iter()
        .map(|c| format!("• {}\n    {}", c.name, c.description))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("📋 Available Commands:\n\n{list}")
}

#[must_use]
pub fn format_task_list(records: &[Record]) -> String {
    if records.is_empty() {
        return NO_TASKS.to_string();
    }
    records
        .iter()
        .map(|record| match record.first_date().and_then(format_due_date) {
            Some(due) => format!("• {} (Due: {due})", record.display_title()),
            None => format!("• {}", record.display_title()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_due_date(value: &str) -> Option<String> {
    use chrono::Datelike;
    let date = crate::domain::calendar::parse_local(value)?.date();
    Some(format!("{}/{}/{}", date.month(), date.day(), date.year()))
}
