//! Storage layer for taskline
//!
//! All state lives in flat text files under one data directory:
//!
//! ```text
//! <data_dir>/
//!   taskline.toml          # Optional configuration
//!   accounts.txt           # username,password per line
//!   tasks/
//!     <username>.txt       # title,description,priority,due_date,completed per line
//! ```
//!
//! One record per line, comma-delimited. A field is quoted only when it
//! contains a comma or a double quote, so ordinary files stay plain `a,b,c`
//! text. Lines that are not in that exact quoted form (hand-edited or older
//! files) are split on bare commas instead, and each line is decoded on its
//! own.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, Terminator, Writer, WriterBuilder};
use directories::ProjectDirs;
use tempfile::NamedTempFile;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::task::Task;

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = "taskline.toml";

/// Resolve the platform data directory, falling back to the current directory.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("dev", "taskline", "taskline")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Path layout for one data directory
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    accounts_file: String,
    tasks_dir: String,
}

impl Storage {
    pub fn new(root: PathBuf, config: &StorageConfig) -> Self {
        Self {
            root,
            accounts_file: config.accounts_file.clone(),
            tasks_dir: config.tasks_dir.clone(),
        }
    }

    /// Storage with the default file names
    pub fn with_defaults(root: PathBuf) -> Self {
        Self::new(root, &StorageConfig::default())
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.root.join(&self.accounts_file)
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join(&self.tasks_dir)
    }

    /// Per-account task file. Usernames are alphanumeric, so they are safe
    /// to use as file names.
    pub fn tasks_file(&self, username: &str) -> PathBuf {
        self.tasks_dir().join(format!("{username}.txt"))
    }

    /// Create the data directory tree
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.tasks_dir())?;
        Ok(())
    }
}

// =============================================================================
// Task persistence
// =============================================================================

/// Write `tasks` to `path`, replacing whatever was there.
pub fn save_tasks(tasks: &[Task], path: &Path) -> Result<()> {
    let rows = tasks.iter().map(|task| {
        vec![
            task.title.as_str(),
            task.description.as_str(),
            task.priority.as_str(),
            task.due_date.as_str(),
            if task.completed { "true" } else { "false" },
        ]
    });
    let data = encode_lines(rows)?;
    write_atomic(path, &data)?;
    tracing::debug!(path = %path.display(), count = tasks.len(), "saved tasks");
    Ok(())
}

/// Read tasks from `path`.
///
/// A missing or unreadable file is an empty task list. Short lines leave the
/// trailing fields empty; a missing completion flag means not completed.
pub fn load_tasks(path: &Path) -> Vec<Task> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot open task file, starting empty");
            return Vec::new();
        }
    };

    let tasks: Vec<Task> = decode_lines(&data, path)
        .into_iter()
        .map(|fields| {
            let field = |index: usize| fields.get(index).cloned().unwrap_or_default();
            Task {
                title: field(0),
                description: field(1),
                priority: field(2),
                due_date: field(3),
                completed: parse_flag(&field(4)),
            }
        })
        .collect();

    tracing::debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
    tasks
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}

// =============================================================================
// Line codec and file helpers
// =============================================================================

/// Encode rows as delimited lines.
pub(crate) fn encode_lines<'a, I>(rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    let mut writer = line_writer();
    for row in rows {
        writer.write_record(&row)?;
    }
    let data = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(data)
}

/// Decode one record per line.
///
/// Only empty lines are skipped. Invalid UTF-8 is replaced rather than
/// dropped, so a later save keeps the line.
pub(crate) fn decode_lines(data: &[u8], source: &Path) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    for (index, line) in data.split(|byte| *byte == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        if std::str::from_utf8(line).is_err() {
            tracing::warn!(
                path = %source.display(),
                line = index + 1,
                "replacing invalid UTF-8 in line"
            );
        }
        let fields = decode_quoted(line)
            .unwrap_or_else(|| line.split(|byte| *byte == b',').map(lossy).collect());
        records.push(fields);
    }
    records
}

/// Read `line` as quoted CSV, if it is exactly what `encode_lines` writes.
fn decode_quoted(line: &[u8]) -> Option<Vec<String>> {
    if !line.contains(&b'"') {
        return None;
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line);
    let mut record = ByteRecord::new();
    if !reader.read_byte_record(&mut record).ok()? {
        return None;
    }

    let mut writer = line_writer();
    writer.write_byte_record(&record).ok()?;
    let encoded = writer.into_inner().ok()?;
    if encoded.strip_suffix(b"\n") != Some(line) {
        return None;
    }
    Some(record.iter().map(lossy).collect())
}

fn line_writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Write data atomically using temp file + rename
///
/// Readers see either the old file or the new one, never a truncated one.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut temp = NamedTempFile::new_in(&parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
