use assert_cmd::Command;
use chrono::{Days, Local};
use predicates::prelude::*;
use tempfile::TempDir;

fn salonbook(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("salonbook").unwrap();
    cmd.env("SALONBOOK_HOME", home.path())
        .env_remove("SALONBOOK_LOG");
    cmd
}

fn tomorrow() -> String {
    let today = Local::now().date_naive();
    today
        .checked_add_days(Days::new(1))
        .unwrap()
        .format("%Y-%m-%d")
        .to_string()
}

fn demo_salon() -> TempDir {
    let home = tempfile::tempdir().unwrap();
    salonbook(&home)
        .args(["init", "--demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added technician Alice (T201)"));
    home
}

#[test]
fn help_lists_command_groups() {
    let home = tempfile::tempdir().unwrap();
    salonbook(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Booking Commands:"))
        .stdout(predicate::str::contains("Directory Commands:"));
}

#[test]
fn init_demo_opens_tomorrow() {
    let home = demo_salon();
    assert!(home.path().join("salon.json").exists());
    assert!(home.path().join("config.json").exists());

    salonbook(&home)
        .args(["slots", &tomorrow()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice (T201)"))
        .stdout(predicate::str::contains("16:00  Bob (T202)"));
}

#[test]
fn book_cancel_rebook() {
    let home = demo_salon();
    let date = tomorrow();

    salonbook(&home)
        .args(["book", "C101", "T201", &date, "10:00", "Gel", "Manicure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Booked A3001"))
        .stdout(predicate::str::contains("$55.00"));

    salonbook(&home)
        .args(["book", "C101", "T201", &date, "10:00", "Pedicure"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("T201"));

    salonbook(&home)
        .args(["cancel", "A3001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("open again"));

    salonbook(&home)
        .args(["book", "C101", "T201", &date, "10:00", "Pedicure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Booked A3002"));

    salonbook(&home)
        .args(["list", "--status", "cancelled"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A3001"))
        .stdout(predicate::str::contains("A3002").not());
}

#[test]
fn unknown_ids_fail_cleanly() {
    let home = demo_salon();
    salonbook(&home)
        .args(["cancel", "A9999"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Appointment not found: A9999"));

    salonbook(&home)
        .args(["client", "show", "bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn directory_commands_round_trip() {
    let home = tempfile::tempdir().unwrap();

    salonbook(&home)
        .args(["client", "add", "Dana Lee", "555-0000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C101"));

    salonbook(&home)
        .args(["tech", "add", "Alice", "--slot", "2025-11-21 10:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T201"));

    salonbook(&home)
        .args(["tech", "open", "T201", "2025-11-21 11:00"])
        .assert()
        .success();

    salonbook(&home)
        .args(["tech", "schedule", "T201"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-11-21: 10:00, 11:00"));

    salonbook(&home)
        .args(["client", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dana Lee"));
}

#[test]
fn data_dir_flag_overrides_env() {
    let env_home = tempfile::tempdir().unwrap();
    let flag_home = tempfile::tempdir().unwrap();

    salonbook(&env_home)
        .arg("--data-dir")
        .arg(flag_home.path())
        .args(["client", "add", "Dana", "555"])
        .assert()
        .success();

    assert!(flag_home.path().join("salon.json").exists());
    assert!(!env_home.path().join("salon.json").exists());
}
