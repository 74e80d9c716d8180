//! Due-date alerts.
//!
//! Alerts are computed, never stored. Completed tasks never alert.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::datetime;
use crate::task::Task;

/// Default width of the due-soon window
pub const DUE_SOON_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// The due date has passed
    Overdue,
    /// The due date falls inside the due-soon window
    DueSoon,
    /// The stored due date cannot be parsed
    MalformedDueDate,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub kind: AlertKind,
    pub due_date: String,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AlertKind::Overdue => write!(f, "'{}' is overdue (due {})", self.title, self.due_date),
            AlertKind::DueSoon => write!(f, "'{}' is due soon ({})", self.title, self.due_date),
            AlertKind::MalformedDueDate => write!(
                f,
                "'{}' has an unreadable due date '{}'",
                self.title, self.due_date
            ),
        }
    }
}

/// Alerts for `tasks` at `now`, using the default 24 hour window.
pub fn compute_alerts(tasks: &[Task], now: NaiveDateTime) -> Vec<Alert> {
    compute_alerts_within(tasks, now, Duration::hours(DUE_SOON_HOURS))
}

/// Alerts for `tasks` at `now`, in task order.
pub fn compute_alerts_within(tasks: &[Task], now: NaiveDateTime, window: Duration) -> Vec<Alert> {
    tasks
        .iter()
        .filter(|task| !task.completed)
        .filter_map(|task| {
            let kind = match datetime::parse(&task.due_date) {
                Err(_) => AlertKind::MalformedDueDate,
                Ok(due) if now > due => AlertKind::Overdue,
                Ok(due) if due - now < window => AlertKind::DueSoon,
                Ok(_) => return None,
            };
            Some(Alert {
                title: task.title.clone(),
                kind,
                due_date: task.due_date.clone(),
            })
        })
        .collect()
}
