//! An authenticated account bound to its task file.
//!
//! The session is an explicit value handed to every command; there is no
//! process-wide "current user". Lifecycle:
//! open (or register) -> task mutations -> alerts -> save.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};

use crate::account::{Account, AccountStore};
use crate::error::Result;
use crate::notify::{self, Alert};
use crate::storage::{self, Storage};
use crate::task::TaskManager;

pub struct Session<'a> {
    account: &'a mut Account,
    tasks_file: PathBuf,
}

impl<'a> Session<'a> {
    /// Authenticate and load the account's tasks.
    pub fn open(
        store: &'a mut AccountStore,
        storage: &Storage,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        store.authenticate(username, password)?;
        let account = store.lookup_mut(username)?;
        let tasks_file = storage.tasks_file(&account.username);
        account.tasks = TaskManager::from_tasks(storage::load_tasks(&tasks_file));
        tracing::debug!(username, tasks = account.tasks.len(), "session opened");
        Ok(Self {
            account,
            tasks_file,
        })
    }

    /// Register a new account and start a session with no tasks.
    pub fn register(
        store: &'a mut AccountStore,
        storage: &Storage,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        store.register(username, password)?;
        let account = store.lookup_mut(username)?;
        let tasks_file = storage.tasks_file(&account.username);
        Ok(Self {
            account,
            tasks_file,
        })
    }

    pub fn username(&self) -> &str {
        &self.account.username
    }

    pub fn tasks_file(&self) -> &Path {
        &self.tasks_file
    }

    pub fn tasks(&self) -> &TaskManager {
        &self.account.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskManager {
        &mut self.account.tasks
    }

    /// Alerts for this account's tasks at `now`.
    pub fn alerts(&self, now: NaiveDateTime, window: Duration) -> Vec<Alert> {
        notify::compute_alerts_within(self.account.tasks.list(), now, window)
    }

    /// Persist the task list, replacing the previous file.
    pub fn save(&self) -> Result<()> {
        storage::save_tasks(self.account.tasks.list(), &self.tasks_file)
    }
}
