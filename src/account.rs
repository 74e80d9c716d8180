//! Account registry.
//!
//! Accounts are stored one per line as `username,password` in the accounts
//! file. The whole file is rewritten on every registration.
//!
//! Credential rules:
//! - usernames are non-empty and ASCII alphanumeric, unique across the store
//! - passwords are at least 8 characters with one digit and one of `!@#$%^&*`

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::storage;
use crate::task::TaskManager;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LEN: usize = 8;

/// Symbols of which a password must contain at least one
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

/// A registered user and the tasks it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub tasks: TaskManager,
}

impl Account {
    fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            tasks: TaskManager::new(),
        }
    }
}

/// In-memory account set backed by the accounts file.
#[derive(Debug)]
pub struct AccountStore {
    path: PathBuf,
    accounts: Vec<Account>,
}

impl AccountStore {
    /// An empty store that persists to `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            accounts: Vec::new(),
        }
    }

    /// Load accounts from `path`.
    ///
    /// A missing file is an empty store; any other read failure is an error.
    pub fn load(path: PathBuf) -> Result<Self> {
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no accounts file yet");
                return Ok(Self::new(path));
            }
            Err(err) => return Err(err.into()),
        };

        let mut accounts: Vec<Account> = Vec::new();
        for fields in storage::decode_lines(&data, &path) {
            let username = fields.first().map_or("", |name| name.trim());
            if username.is_empty() {
                continue;
            }
            if accounts.iter().any(|account| account.username == username) {
                tracing::warn!(username, "ignoring duplicate account entry");
                continue;
            }
            let password = fields.get(1).map_or("", String::as_str);
            accounts.push(Account::new(username.to_string(), password.to_string()));
        }

        tracing::debug!(path = %path.display(), count = accounts.len(), "loaded accounts");
        Ok(Self { path, accounts })
    }

    /// Register a new account and persist the full account list.
    pub fn register(&mut self, username: &str, password: &str) -> Result<&Account> {
        validate_username(username)?;
        if self.lookup(username).is_ok() {
            return Err(Error::UsernameTaken(username.to_string()));
        }
        validate_password(password)?;

        self.accounts
            .push(Account::new(username.to_string(), password.to_string()));
        if let Err(err) = self.save() {
            self.accounts.pop();
            return Err(err);
        }

        tracing::debug!(username, "registered account");
        let index = self.accounts.len() - 1;
        Ok(&self.accounts[index])
    }

    /// Find the account with exactly this username and password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&Account> {
        self.accounts
            .iter()
            .find(|account| account.username == username && account.password == password)
            .ok_or(Error::InvalidCredentials)
    }

    pub fn lookup(&self, username: &str) -> Result<&Account> {
        self.accounts
            .iter()
            .find(|account| account.username == username)
            .ok_or_else(|| Error::AccountNotFound(username.to_string()))
    }

    pub fn lookup_mut(&mut self, username: &str) -> Result<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|account| account.username == username)
            .ok_or_else(|| Error::AccountNotFound(username.to_string()))
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(|account| account.username.as_str())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Rewrite the accounts file from the in-memory set.
    fn save(&self) -> Result<()> {
        let rows = self
            .accounts
            .iter()
            .map(|account| vec![account.username.as_str(), account.password.as_str()]);
        let data = storage::encode_lines(rows)?;
        storage::write_atomic(&self.path, &data)
    }
}

/// Usernames must be non-empty and ASCII alphanumeric.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || !username.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err(Error::InvalidUsername(username.to_string()));
    }
    Ok(())
}

/// Passwords need the minimum length, a digit and a symbol.
pub fn validate_password(password: &str) -> Result<()> {
    if password.contains(['\n', '\r']) {
        return Err(Error::InvalidPassword(
            "cannot contain line breaks".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::InvalidPassword(format!(
            "must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if !password.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(Error::InvalidPassword(
            "must contain at least one digit".to_string(),
        ));
    }
    if !password.chars().any(|ch| PASSWORD_SYMBOLS.contains(ch)) {
        return Err(Error::InvalidPassword(format!(
            "must contain at least one of {PASSWORD_SYMBOLS}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> AccountStore {
        AccountStore::load(dir.join("accounts.txt")).expect("load")
    }

    #[test]
    fn register_then_authenticate() {
        let dir = tempdir().expect("tempdir");
        let mut store = store_in(dir.path());

        let account = store.register("alice", "Secret1!").expect("register");
        assert_eq!(account.username, "alice");
        assert!(account.tasks.is_empty());

        assert!(store.authenticate("alice", "Secret1!").is_ok());
        assert!(matches!(
            store.authenticate("alice", "Secret2!"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            store.authenticate("Alice", "Secret1!"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            store.authenticate("bob", "Secret1!"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn register_persists_full_list() {
        let dir = tempdir().expect("tempdir");
        let mut store = store_in(dir.path());
        store.register("alice", "Secret1!").expect("alice");
        store.register("bob", "Hunter22#").expect("bob");

        let written = fs::read_to_string(dir.path().join("accounts.txt")).expect("read");
        assert_eq!(written, "alice,Secret1!\nbob,Hunter22#\n");

        let reloaded = store_in(dir.path());
        assert_eq!(reloaded.usernames().collect::<Vec<_>>(), vec!["alice", "bob"]);
        assert!(reloaded.authenticate("bob", "Hunter22#").is_ok());
    }

    #[test]
    fn passwords_with_commas_survive_reload() {
        let dir = tempdir().expect("tempdir");
        let mut store = store_in(dir.path());
        store.register("carol", "a,b,c1!xyz").expect("register");

        let reloaded = store_in(dir.path());
        assert!(reloaded.authenticate("carol", "a,b,c1!xyz").is_ok());
    }

    #[test]
    fn duplicate_username_rejected() {
        let dir = tempdir().expect("tempdir");
        let mut store = store_in(dir.path());
        store.register("alice", "Secret1!").expect("register");
        assert!(matches!(
            store.register("alice", "Other99$"),
            Err(Error::UsernameTaken(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn invalid_usernames_rejected() {
        let dir = tempdir().expect("tempdir");
        let mut store = store_in(dir.path());
        for username in ["", "al ice", "bob!", "a,b", "dash-name", "under_score", "../x"] {
            assert!(
                matches!(store.register(username, "Secret1!"), Err(Error::InvalidUsername(_))),
                "{username:?} should be rejected"
            );
        }
        assert!(store.is_empty());
        assert!(!dir.path().join("accounts.txt").exists());
    }

    #[test]
    fn invalid_username_checked_before_password() {
        let dir = tempdir().expect("tempdir");
        let mut store = store_in(dir.path());
        assert!(matches!(
            store.register("bad name", "short"),
            Err(Error::InvalidUsername(_))
        ));
    }

    #[test]
    fn invalid_passwords_rejected() {
        let dir = tempdir().expect("tempdir");
        let mut store = store_in(dir.path());
        for password in ["Sh0rt!", "NoDigits!!", "NoSymbol123", ""] {
            assert!(
                matches!(store.register("dave", password), Err(Error::InvalidPassword(_))),
                "{password:?} should be rejected"
            );
        }
        assert!(store.register("dave", "1234567!").is_ok());
    }

    #[test]
    fn password_rules_cover_each_requirement() {
        assert!(validate_password("abcdefg1!").is_ok());
        assert!(validate_password("abcd1!").is_err());
        assert!(validate_password("abcdefgh!").is_err());
        assert!(validate_password("abcdefgh1").is_err());
        assert!(validate_password("abcdefgh1(").is_err());
        assert!(matches!(
            validate_password("Secret1!\nbob"),
            Err(Error::InvalidPassword(reason)) if reason.contains("line breaks")
        ));
        for symbol in PASSWORD_SYMBOLS.chars() {
            assert!(validate_password(&format!("passw0rd{symbol}")).is_ok());
        }
    }

    #[test]
    fn lookup_reports_missing_account() {
        let dir = tempdir().expect("tempdir");
        let mut store = store_in(dir.path());
        store.register("alice", "Secret1!").expect("register");
        assert!(store.lookup("alice").is_ok());
        assert!(matches!(store.lookup("zed"), Err(Error::AccountNotFound(_))));
        assert!(store.lookup_mut("alice").is_ok());
    }

    #[test]
    fn load_skips_blank_and_duplicate_lines() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("accounts.txt");
        fs::write(&path, "alice,Secret1!\n\nalice,Other99$\nbob,Hunter22#\n").expect("write");

        let store = AccountStore::load(path).expect("load");
        assert_eq!(store.len(), 2);
        assert!(store.authenticate("alice", "Secret1!").is_ok());
    }

    #[test]
    fn load_reports_unreadable_file() {
        let dir = tempdir().expect("tempdir");
        // A directory in place of the accounts file cannot be read.
        let err = AccountStore::load(dir.path().to_path_buf()).expect_err("unreadable");
        assert!(matches!(err, Error::Io(_)));
    }
}
