use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const NAME: &str = "dservice-cli-test";

fn service() -> Command {
    let mut cmd = Command::cargo_bin("service").expect("binary is built");
    cmd.env_remove("RUST_LOG")
        .env_remove("SERVICE_WINDOWS_BRIDGE")
        .arg("--runtime")
        .arg("/opt/deno/bin/deno");
    cmd
}

#[test]
fn generate_systemd_unit() {
    let home = tempdir().unwrap();
    service()
        .args(["generate", "--force", "systemd", "--name", NAME, "--cmd", "run app.ts"])
        .args(["--cwd", "/srv/app", "--path", "/usr/local/bin", "--env", "MODE=prod"])
        .arg("--home")
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Description={NAME} (Deno Service)"
        )))
        .stdout(predicate::str::contains("ExecStart=/bin/sh -c \"run app.ts\""))
        .stdout(predicate::str::contains(
            "Environment=PATH=/usr/local/bin:/opt/deno/bin",
        ))
        .stdout(predicate::str::contains("Environment=MODE=prod"))
        .stdout(predicate::str::contains("WorkingDirectory=/srv/app"))
        .stdout(predicate::str::contains("WantedBy=default.target"));

    assert_eq!(fs::read_dir(home.path()).unwrap().count(), 0);
}

#[test]
fn generate_takes_command_after_separator() {
    let home = tempdir().unwrap();
    service()
        .args(["generate", "--force", "upstart", "--name", NAME])
        .arg("--home")
        .arg(home.path())
        .args(["--", "/usr/bin/worker", "--queue", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exec /usr/bin/worker --queue main\n"))
        .stdout(predicate::str::contains("respawn limit 10 5"));
}

#[test]
fn generate_as_json() {
    let home = tempdir().unwrap();
    let output = service()
        .args(["--json", "generate", "--force", "windows", "--name", NAME, "--cmd", "x"])
        .arg("--home")
        .arg(home.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["servicePath"].is_null());
    assert!(value["manualSteps"].is_null());
    assert!(value["serviceFileContent"]
        .as_str()
        .unwrap()
        .starts_with("@echo off\r\n"));
}

#[test]
fn env_entries_need_an_equals_sign() {
    service()
        .args(["generate", "--force", "systemd", "--name", NAME, "--cmd", "x"])
        .args(["--env", "BROKEN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn unsupported_backend_is_reported() {
    service()
        .args(["generate", "--force", "openrc", "--name", NAME, "--cmd", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported init system: openrc"));
}

#[test]
fn existing_user_unit_blocks_generate() {
    let home = tempdir().unwrap();
    let units = home.path().join(".config/systemd/user");
    fs::create_dir_all(&units).unwrap();
    fs::write(units.join(format!("{NAME}.service")), "mine").unwrap();

    service()
        .args(["generate", "--force", "systemd", "--name", NAME, "--cmd", "x"])
        .arg("--home")
        .arg(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn missing_command_is_rejected() {
    service()
        .args(["generate", "--force", "systemd", "--name", NAME])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No command given"));
}
