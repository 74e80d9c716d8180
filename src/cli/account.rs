//! taskline register / login command implementation

use serde::Serialize;

use crate::datetime;
use crate::error::Result;
use crate::notify::Alert;
use crate::output::{emit_success, HumanReport};
use crate::session::Session;

use super::Context;

#[derive(Serialize)]
struct RegisterReport {
    user: String,
    accounts_file: String,
}

#[derive(Serialize)]
struct LoginReport {
    user: String,
    tasks: usize,
    pending: usize,
    alerts: Vec<Alert>,
}

pub fn run_register(ctx: &Context) -> Result<()> {
    let (user, password) = ctx.credentials()?;
    ctx.storage.init()?;

    let mut store = ctx.load_accounts()?;
    let session = Session::register(&mut store, &ctx.storage, user, password)?;

    let report = RegisterReport {
        user: session.username().to_string(),
        accounts_file: ctx.storage.accounts_file().display().to_string(),
    };

    let mut human = HumanReport::new(format!("taskline register: {}", report.user));
    human.fact("accounts file", report.accounts_file.clone());
    human.next(format!(
        "taskline task add <title> --due \"{}\"",
        datetime::DUE_DATE_HINT
    ));

    emit_success(ctx.output, "register", &report, &human)
}

pub fn run_login(ctx: &Context) -> Result<()> {
    let (user, password) = ctx.credentials()?;
    let mut store = ctx.load_accounts()?;
    let session = Session::open(&mut store, &ctx.storage, user, password)?;

    let tasks = session.tasks().list();
    let report = LoginReport {
        user: session.username().to_string(),
        tasks: tasks.len(),
        pending: tasks.iter().filter(|task| !task.completed).count(),
        alerts: session.alerts(datetime::now(), ctx.config.alerts.due_soon_window()),
    };

    let mut human = HumanReport::new(format!("taskline login: {}", report.user));
    human.fact("tasks", report.tasks.to_string());
    human.fact("pending", report.pending.to_string());
    human.push_alerts(&report.alerts);
    if report.tasks == 0 {
        human.next("taskline task add <title> --due <date>");
    } else {
        human.next("taskline task list");
    }

    emit_success(ctx.output, "login", &report, &human)
}
