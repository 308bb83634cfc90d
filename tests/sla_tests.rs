//! SLA monitoring tests through the CLI

mod common;

use chrono::{Duration, Utc};
use common::{create_test_request, hrsd, setup_portal};
use predicates::prelude::*;

#[test]
fn test_overdue_empty_before_deadlines() {
    let tmp = setup_portal();
    create_test_request(&tmp, "Fresh IT ticket", "it");

    hrsd()
        .current_dir(tmp.path())
        .arg("overdue")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing overdue"));
}

#[test]
fn test_overdue_reports_past_deadline() {
    let tmp = setup_portal();
    create_test_request(&tmp, "Stale IT ticket", "it");

    // IT SLA is 24h; evaluate two days out
    let as_of = (Utc::now() + Duration::hours(48)).to_rfc3339();
    hrsd()
        .current_dir(tmp.path())
        .args(["overdue", "--as-of", &as_of])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stale IT ticket"))
        .stdout(predicate::str::contains("1 overdue request(s)"));
}

#[test]
fn test_overdue_skips_completed() {
    let tmp = setup_portal();
    let id = create_test_request(&tmp, "Finished ticket", "it");
    for verb in ["review", "start", "complete"] {
        hrsd()
            .current_dir(tmp.path())
            .args([verb, &id])
            .assert()
            .success();
    }

    let as_of = (Utc::now() + Duration::days(30)).to_rfc3339();
    hrsd()
        .current_dir(tmp.path())
        .args(["overdue", "--as-of", &as_of, "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

#[test]
fn test_overdue_rejects_bad_timestamp() {
    let tmp = setup_portal();

    hrsd()
        .current_dir(tmp.path())
        .args(["overdue", "--as-of", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --as-of"));
}

#[test]
fn test_overdue_sweep_does_not_mutate() {
    let tmp = setup_portal();
    let id = create_test_request(&tmp, "Left waiting", "card");

    let as_of = (Utc::now() + Duration::days(10)).to_rfc3339();
    hrsd()
        .current_dir(tmp.path())
        .args(["overdue", "--as-of", &as_of])
        .assert()
        .success();

    // Status and history are untouched by the sweep
    hrsd()
        .current_dir(tmp.path())
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("submitted"));
    hrsd()
        .current_dir(tmp.path())
        .args(["history", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("No history yet"));
}
