//! Rendering of command results for terminals and for scripts.
//!
//! Each command builds a serializable report for `--json` and a
//! [`HumanReport`] for the terminal. Both go through [`emit_success`].

use std::fmt;

use serde::Serialize;

use crate::account::{MIN_PASSWORD_LEN, PASSWORD_SYMBOLS};
use crate::datetime::DUE_DATE_HINT;
use crate::error::{Error, JsonError, Result};
use crate::notify::Alert;
use crate::task::Task;

pub const SCHEMA_VERSION: &str = "taskline.v1";

/// Global flags that consume the next argument.
const VALUE_FLAGS: [&str; 4] = ["--data-dir", "--user", "--password", "--now"];

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// What a command prints to the terminal.
#[derive(Debug, Clone, Default)]
pub struct HumanReport {
    headline: String,
    facts: Vec<(&'static str, String)>,
    tasks: Vec<String>,
    alerts: Vec<String>,
    next: Option<String>,
}

impl HumanReport {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            ..Self::default()
        }
    }

    pub fn fact(&mut self, key: &'static str, value: impl Into<String>) {
        self.facts.push((key, value.into()));
    }

    pub fn push_task(&mut self, task: &Task) {
        self.tasks.push(task_line(task));
    }

    pub fn push_alerts(&mut self, alerts: &[Alert]) {
        self.alerts.extend(alerts.iter().map(ToString::to_string));
    }

    /// Suggested follow-up command.
    pub fn next(&mut self, command: impl Into<String>) {
        self.next = Some(command.into());
    }
}

impl fmt::Display for HumanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline)?;
        for (key, value) in &self.facts {
            write!(f, "\n  {key}: {value}")?;
        }
        if !self.tasks.is_empty() {
            f.write_str("\n")?;
            for line in &self.tasks {
                write!(f, "\n{line}")?;
            }
        }
        if !self.alerts.is_empty() {
            f.write_str("\n\nAlerts:")?;
            for alert in &self.alerts {
                write!(f, "\n  ! {alert}")?;
            }
        }
        if let Some(next) = &self.next {
            write!(f, "\n\nNext: {next}")?;
        }
        Ok(())
    }
}

/// `[x] title (priority, due date): description`
fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{mark}] {} ({}, due {})",
        task.title, task.priority, task.due_date
    );
    if !task.description.is_empty() {
        line.push_str(": ");
        line.push_str(&task.description);
    }
    line
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<&'a str>,
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: &HumanReport,
) -> Result<()> {
    if options.json {
        let envelope = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data: Some(data),
            error: None,
            next: human.next.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if !options.quiet {
        println!("{human}");
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = hint(err);
    if json {
        let envelope: Envelope<'_, ()> = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            data: None,
            error: Some(JsonError::from(err)),
            next: hint.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Command name for error reports, taken from the raw arguments so it is
/// known even when clap rejects them.
pub fn command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        if arg.starts_with('-') {
            if VALUE_FLAGS.contains(&arg.as_str()) {
                args.next();
            }
            continue;
        }
        words.push(arg);
        if words[0] != "task" || words.len() == 2 {
            break;
        }
    }

    if words.is_empty() {
        "taskline".to_string()
    } else {
        words.join(" ")
    }
}

fn hint(err: &Error) -> Option<String> {
    let hint = match err {
        Error::InvalidCredentials | Error::AccountNotFound(_) => {
            "taskline register --user <name> --password <password>".to_string()
        }
        Error::UsernameTaken(name) => format!("taskline login --user {name}"),
        Error::InvalidPassword(_) => format!(
            "use at least {MIN_PASSWORD_LEN} characters, a digit and one of {PASSWORD_SYMBOLS}"
        ),
        Error::TaskNotFound(_) => "taskline task list".to_string(),
        Error::InvalidDate { .. } => format!("dates look like {DUE_DATE_HINT}"),
        Error::InvalidConfig(_) => "fix taskline.toml then retry".to_string(),
        _ => return None,
    };
    Some(hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::AlertKind;

    fn task(description: &str, completed: bool) -> Task {
        Task {
            title: "Pay rent".to_string(),
            description: description.to_string(),
            priority: "High".to_string(),
            due_date: "2023-01-01 09:00 AM".to_string(),
            completed,
        }
    }

    fn args(words: &[&str]) -> Vec<String> {
        std::iter::once("taskline")
            .chain(words.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn task_line_marks_completion() {
        assert_eq!(
            task_line(&task("", false)),
            "[ ] Pay rent (High, due 2023-01-01 09:00 AM)"
        );
        assert_eq!(
            task_line(&task("landlord", true)),
            "[x] Pay rent (High, due 2023-01-01 09:00 AM): landlord"
        );
    }

    #[test]
    fn report_renders_tasks_then_alerts() {
        let mut human = HumanReport::new("taskline task list: 1 task");
        human.fact("user", "alice");
        human.push_task(&task("", false));
        human.push_alerts(&[Alert {
            title: "Pay rent".to_string(),
            kind: AlertKind::DueSoon,
            due_date: "2023-01-01 09:00 AM".to_string(),
        }]);
        human.next("taskline task done \"Pay rent\"");

        assert_eq!(
            human.to_string(),
            "taskline task list: 1 task\n  user: alice\n\n\
             [ ] Pay rent (High, due 2023-01-01 09:00 AM)\n\n\
             Alerts:\n  ! 'Pay rent' is due soon (2023-01-01 09:00 AM)\n\n\
             Next: taskline task done \"Pay rent\""
        );
    }

    #[test]
    fn headline_alone_when_nothing_else() {
        assert_eq!(HumanReport::new("taskline alerts: none").to_string(), "taskline alerts: none");
    }

    #[test]
    fn command_name_skips_global_flags() {
        assert_eq!(command_name(args(&[])), "taskline");
        assert_eq!(command_name(args(&["--user", "alice", "login"])), "login");
        assert_eq!(
            command_name(args(&["--json", "--data-dir", "/tmp/x", "task", "--password", "p", "rm", "a"])),
            "task rm"
        );
        assert_eq!(command_name(args(&["alerts", "--now", "2023-01-01 09:00 AM"])), "alerts");
    }

    #[test]
    fn hints_point_at_next_command() {
        assert_eq!(
            hint(&Error::TaskNotFound("x".into())).as_deref(),
            Some("taskline task list")
        );
        assert!(hint(&Error::Io(std::io::Error::other("disk"))).is_none());
    }
}
