//! taskline - personal task tracker library
//!
//! This library provides the core functionality for the taskline CLI:
//! accounts, per-account task lists, flat-file persistence and due-date
//! alerts.
//!
//! # Core Concepts
//!
//! - **Accounts**: username/password pairs, each owning one task list
//! - **Tasks**: title, description, priority and a due date
//! - **Alerts**: overdue, due-soon and malformed-date notices computed on demand
//! - **Sessions**: one authenticated account bound to its task file
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskline.toml`
//! - `error`: Error types and result aliases
//! - `datetime`: Due-date parsing and formatting
//! - `task`: Task records and the per-account task manager
//! - `account`: Account registry and credential rules
//! - `storage`: Data directory layout and task file persistence
//! - `notify`: Alert computation
//! - `session`: Authenticated account plus its task file
//! - `output`: Human and JSON output envelopes

pub mod account;
pub mod cli;
pub mod config;
pub mod datetime;
pub mod error;
pub mod notify;
pub mod output;
pub mod session;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
