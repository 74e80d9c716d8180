//! Command-line interface for taskline
//!
//! This module defines the CLI structure using clap derive macros.
//! Account commands live in `account`, task and alert commands in `task`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::account::AccountStore;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::storage::{self, Storage};

mod account;
mod task;

/// taskline - personal task tracker
///
/// Register an account, then add, edit, complete and list tasks with due
/// dates. Overdue and due-soon tasks are reported as alerts.
#[derive(Parser, Debug)]
#[command(name = "taskline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding accounts and task files
    #[arg(long, global = true, env = "TASKLINE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Account username
    #[arg(long, global = true, env = "TASKLINE_USER")]
    pub user: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "TASKLINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new account from --user and --password
    Register,

    /// Check credentials and show pending alerts
    Login,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show overdue, due-soon and malformed-date alerts
    Alerts {
        /// Evaluate alerts at this time instead of now (YYYY-MM-DD hh:mm AM/PM)
        #[arg(long)]
        now: Option<String>,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Due date (YYYY-MM-DD hh:mm AM/PM)
        #[arg(long, required = true)]
        due: String,

        /// Priority: High, Medium or Low (case-insensitive)
        #[arg(long)]
        priority: Option<String>,

        /// Free-text description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Edit the first task with this title
    Edit {
        /// Title of the task to edit
        title: String,

        /// New title
        #[arg(long = "title", value_name = "TITLE")]
        new_title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New priority
        #[arg(long)]
        priority: Option<String>,

        /// New due date
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete the first task with this title
    Rm {
        /// Task title
        title: String,
    },

    /// Mark the first task with this title as complete
    Done {
        /// Task title
        title: String,
    },

    /// List tasks in the order they were added
    List,
}

/// Resolved global state shared by every command
pub(crate) struct Context {
    pub storage: Storage,
    pub config: Config,
    pub user: Option<String>,
    pub password: Option<String>,
    pub output: OutputOptions,
}

impl Context {
    fn from_cli(cli: &Cli) -> Self {
        let data_dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(storage::default_data_dir);
        let config = Config::load_from_dir(&data_dir);
        let storage = Storage::new(data_dir, &config.storage);
        Self {
            storage,
            config,
            user: cli.user.clone(),
            password: cli.password.clone(),
            output: OutputOptions {
                json: cli.json,
                quiet: cli.quiet,
            },
        }
    }

    /// Username and password, both required for every account command.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let user = self
            .user
            .as_deref()
            .ok_or_else(|| Error::InvalidArgument("--user is required".to_string()))?;
        let password = self
            .password
            .as_deref()
            .ok_or_else(|| Error::InvalidArgument("--password is required".to_string()))?;
        Ok((user, password))
    }

    pub fn load_accounts(&self) -> Result<AccountStore> {
        AccountStore::load(self.storage.accounts_file())
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let ctx = Context::from_cli(&self);
        tracing::debug!(data_dir = %ctx.storage.root().display(), "resolved data directory");

        match self.command {
            Commands::Register => account::run_register(&ctx),
            Commands::Login => account::run_login(&ctx),
            Commands::Alerts { now } => task::run_alerts(&ctx, task::AlertsOptions { now }),
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    title,
                    due,
                    priority,
                    description,
                } => task::run_add(
                    &ctx,
                    task::AddOptions {
                        title,
                        due,
                        priority,
                        description,
                    },
                ),
                TaskCommands::Edit {
                    title,
                    new_title,
                    description,
                    priority,
                    due,
                } => task::run_edit(
                    &ctx,
                    task::EditOptions {
                        title,
                        new_title,
                        description,
                        priority,
                        due,
                    },
                ),
                TaskCommands::Rm { title } => task::run_rm(&ctx, title),
                TaskCommands::Done { title } => task::run_done(&ctx, title),
                TaskCommands::List => task::run_list(&ctx),
            },
        }
    }
}
