mod support;

use predicates::str::contains;

use support::TestDir;

#[test]
fn register_creates_account_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new();

    dir.alice()
        .arg("register")
        .assert()
        .success()
        .stdout(contains("taskline register: alice"));

    assert_eq!(dir.read_file("accounts.txt")?, "alice,Secret1!\n");
    Ok(())
}

#[test]
fn register_appends_to_existing_accounts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new();
    dir.register_alice();
    dir.register("bob", "Hunter22#");

    assert_eq!(dir.read_file("accounts.txt")?, "alice,Secret1!\nbob,Hunter22#\n");
    Ok(())
}

#[test]
fn register_rejects_taken_username() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new();
    dir.register_alice();

    dir.user_cmd("alice", "Another1@")
        .arg("register")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Username already taken: alice"));

    assert_eq!(dir.read_file("accounts.txt")?, "alice,Secret1!\n");
    Ok(())
}

#[test]
fn register_rejects_bad_username() {
    let dir = TestDir::new();
    for username in ["bob!", "bob smith", "under_score"] {
        dir.user_cmd(username, "Secret1!")
            .arg("register")
            .assert()
            .failure()
            .code(2)
            .stderr(contains("Invalid username"));
    }
    assert!(!dir.path().join("accounts.txt").exists());
}

#[test]
fn register_rejects_weak_passwords() {
    let dir = TestDir::new();
    for password in ["Sh0rt!", "NoDigits!!", "NoSymbol123"] {
        dir.user_cmd("carol", password)
            .arg("register")
            .assert()
            .failure()
            .code(2)
            .stderr(contains("Invalid password"));
    }
}

#[test]
fn register_requires_credentials() {
    let dir = TestDir::new();
    dir.cmd()
        .arg("register")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("--user is required"));
}

#[test]
fn login_succeeds_with_registered_password() {
    let dir = TestDir::new();
    dir.register_alice();

    dir.alice()
        .arg("login")
        .assert()
        .success()
        .stdout(contains("taskline login: alice"))
        .stdout(contains("tasks: 0"));
}

#[test]
fn login_rejects_wrong_password() {
    let dir = TestDir::new();
    dir.register_alice();

    dir.user_cmd("alice", "Secret2!")
        .arg("login")
        .assert()
        .failure()
        .code(3)
        .stderr(contains("Invalid username or password"));
}

#[test]
fn login_is_case_sensitive() {
    let dir = TestDir::new();
    dir.register_alice();

    dir.user_cmd("Alice", "Secret1!")
        .arg("login")
        .assert()
        .failure()
        .code(3);
}

#[test]
fn credentials_can_come_from_env() {
    let dir = TestDir::new();
    dir.register_alice();

    dir.cmd()
        .env("TASKLINE_USER", "alice")
        .env("TASKLINE_PASSWORD", "Secret1!")
        .arg("login")
        .assert()
        .success();
}

#[test]
fn json_error_envelope_reports_auth_failure() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new();
    dir.register_alice();

    let output = dir
        .user_cmd("alice", "nope")
        .args(["--json", "login"])
        .output()?;
    assert_eq!(output.status.code(), Some(3));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["status"], "error");
    assert_eq!(value["command"], "login");
    assert_eq!(value["error"]["kind"], "auth_failed");
    assert_eq!(value["error"]["code"], 3);
    assert_eq!(value["error"]["message"], "Invalid username or password");
    assert_eq!(
        value["next"],
        "taskline register --user <name> --password <password>"
    );
    Ok(())
}

#[test]
fn quiet_register_prints_nothing() {
    let dir = TestDir::new();
    dir.alice()
        .args(["-q", "register"])
        .assert()
        .success()
        .stdout("");
}
