//! taskline task / alerts command implementation
//!
//! Every command follows the same session contract: authenticate, load the
//! account's tasks, apply the change, compute alerts, then save.

use serde::Serialize;

use crate::datetime;
use crate::error::{Error, Result};
use crate::notify::Alert;
use crate::output::{emit_success, HumanReport};
use crate::session::Session;
use crate::task::{NewTask, Task, TaskEdit};

use super::Context;

/// Options for `taskline task add`
pub struct AddOptions {
    pub title: String,
    pub due: String,
    pub priority: Option<String>,
    pub description: String,
}

/// Options for `taskline task edit`
pub struct EditOptions {
    pub title: String,
    pub new_title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
}

/// Options for `taskline alerts`
pub struct AlertsOptions {
    pub now: Option<String>,
}

#[derive(Serialize)]
struct TaskReport {
    user: String,
    task: Task,
    alerts: Vec<Alert>,
}

#[derive(Serialize)]
struct ListReport {
    user: String,
    tasks: Vec<Task>,
    alerts: Vec<Alert>,
}

#[derive(Serialize)]
struct AlertsReport {
    user: String,
    now: String,
    alerts: Vec<Alert>,
}

pub fn run_add(ctx: &Context, options: AddOptions) -> Result<()> {
    let (user, password) = ctx.credentials()?;
    let mut store = ctx.load_accounts()?;
    let mut session = Session::open(&mut store, &ctx.storage, user, password)?;

    let priority = options
        .priority
        .unwrap_or_else(|| ctx.config.tasks.default_priority.clone());
    let task = session
        .tasks_mut()
        .create(NewTask {
            title: options.title,
            description: options.description,
            priority,
            due_date: options.due,
        })?
        .clone();

    finish_mutation(ctx, &session, "task add", task)
}

pub fn run_edit(ctx: &Context, options: EditOptions) -> Result<()> {
    let edit = TaskEdit {
        title: options.new_title,
        description: options.description,
        priority: options.priority,
        due_date: options.due,
    };
    if edit.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to edit: pass --title, --description, --priority or --due".to_string(),
        ));
    }

    let (user, password) = ctx.credentials()?;
    let mut store = ctx.load_accounts()?;
    let mut session = Session::open(&mut store, &ctx.storage, user, password)?;

    let task = session.tasks_mut().edit(&options.title, edit)?.clone();
    finish_mutation(ctx, &session, "task edit", task)
}

pub fn run_rm(ctx: &Context, title: String) -> Result<()> {
    let (user, password) = ctx.credentials()?;
    let mut store = ctx.load_accounts()?;
    let mut session = Session::open(&mut store, &ctx.storage, user, password)?;

    let task = session.tasks_mut().delete(&title)?;
    finish_mutation(ctx, &session, "task rm", task)
}

pub fn run_done(ctx: &Context, title: String) -> Result<()> {
    let (user, password) = ctx.credentials()?;
    let mut store = ctx.load_accounts()?;
    let mut session = Session::open(&mut store, &ctx.storage, user, password)?;

    let task = session.tasks_mut().mark_complete(&title)?.clone();
    finish_mutation(ctx, &session, "task done", task)
}

pub fn run_list(ctx: &Context) -> Result<()> {
    let (user, password) = ctx.credentials()?;
    let mut store = ctx.load_accounts()?;
    let session = Session::open(&mut store, &ctx.storage, user, password)?;

    let report = ListReport {
        user: session.username().to_string(),
        tasks: session.tasks().list().to_vec(),
        alerts: session.alerts(datetime::now(), ctx.config.alerts.due_soon_window()),
    };

    let header = match report.tasks.len() {
        0 => "taskline task list: no tasks".to_string(),
        1 => "taskline task list: 1 task".to_string(),
        n => format!("taskline task list: {n} tasks"),
    };
    let mut human = HumanReport::new(header);
    human.fact("user", report.user.clone());
    for task in &report.tasks {
        human.push_task(task);
    }
    human.push_alerts(&report.alerts);
    if report.tasks.is_empty() {
        human.next("taskline task add <title> --due <date>");
    }

    emit_success(ctx.output, "task list", &report, &human)
}

pub fn run_alerts(ctx: &Context, options: AlertsOptions) -> Result<()> {
    let now = match options.now.as_deref() {
        Some(raw) => datetime::parse(raw)?,
        None => datetime::now(),
    };

    let (user, password) = ctx.credentials()?;
    let mut store = ctx.load_accounts()?;
    let session = Session::open(&mut store, &ctx.storage, user, password)?;

    let report = AlertsReport {
        user: session.username().to_string(),
        now: datetime::format(&now),
        alerts: session.alerts(now, ctx.config.alerts.due_soon_window()),
    };

    let header = if report.alerts.is_empty() {
        "taskline alerts: none".to_string()
    } else {
        format!("taskline alerts: {}", report.alerts.len())
    };
    let mut human = HumanReport::new(header);
    human.fact("user", report.user.clone());
    human.fact("as of", report.now.clone());
    human.push_alerts(&report.alerts);

    emit_success(ctx.output, "alerts", &report, &human)
}

/// Compute alerts, save, and report a single changed task.
fn finish_mutation(ctx: &Context, session: &Session<'_>, command: &str, task: Task) -> Result<()> {
    let alerts = session.alerts(datetime::now(), ctx.config.alerts.due_soon_window());
    session.save()?;

    let report = TaskReport {
        user: session.username().to_string(),
        task,
        alerts,
    };

    let mut human = HumanReport::new(format!("taskline {command}: {}", report.task.title));
    human.fact("priority", report.task.priority.clone());
    human.fact("due", report.task.due_date.clone());
    human.fact("status", report.task.status_label());
    human.push_alerts(&report.alerts);

    emit_success(ctx.output, command, &report, &human)
}
