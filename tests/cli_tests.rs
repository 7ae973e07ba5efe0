mod common;

use common::{ch, setup_test_db};
use predicates::str::contains;

fn init_with_users(db: &str) {
    ch().args(["--db", db, "--test", "init"]).assert().success();

    // user 1: plain member, user 2: reviewer
    ch().args([
        "--db", db, "user", "--add", "--name", "Alice", "--email", "alice@club.test", "--caps",
        "member",
    ])
    .assert()
    .success();

    ch().args([
        "--db", db, "user", "--add", "--name", "Rita", "--email", "rita@club.test", "--caps",
        "member,reviewer",
    ])
    .assert()
    .success();
}

#[test]
fn test_full_approval_flow_via_cli() {
    let db = setup_test_db("cli_approval");
    init_with_users(&db);

    ch().args([
        "--db", &db, "--user", "1", "add", "2026-08-01", "4.5", "--desc", "trail maintenance",
    ])
    .assert()
    .success()
    .stdout(contains("VH-2026-0001"));

    ch().args(["--db", &db, "--user", "1", "submit", "1"])
        .assert()
        .success()
        .stdout(contains("submitted"));

    ch().args(["--db", &db, "--user", "2", "approve", "1"])
        .assert()
        .success()
        .stdout(contains("approved"));

    ch().args(["--db", &db, "list"])
        .assert()
        .success()
        .stdout(contains("VH-2026-0001"))
        .stdout(contains("approved"));
}

#[test]
fn test_cli_rejects_self_approval() {
    let db = setup_test_db("cli_self_approval");
    init_with_users(&db);

    // Rita has the reviewer capability but owns this entry.
    ch().args(["--db", &db, "--user", "2", "add", "2026-08-02", "2.0"])
        .assert()
        .success();

    ch().args(["--db", &db, "--user", "2", "submit", "1"])
        .assert()
        .success();

    ch().args(["--db", &db, "--user", "2", "approve", "1"])
        .assert()
        .failure()
        .stderr(contains("Not allowed on this entry"));
}

#[test]
fn test_cli_requires_reason_for_rejection() {
    let db = setup_test_db("cli_reject_reason");
    init_with_users(&db);

    ch().args(["--db", &db, "--user", "1", "add", "2026-08-03", "2.0"])
        .assert()
        .success();
    ch().args(["--db", &db, "--user", "1", "submit", "1"])
        .assert()
        .success();

    // Blank reason is refused by validation, not by clap.
    ch().args(["--db", &db, "--user", "2", "reject", "1", "--reason", "  "])
        .assert()
        .failure()
        .stderr(contains("reason must not be blank"));

    ch().args([
        "--db", &db, "--user", "2", "reject", "1", "--reason", "no matching event",
    ])
    .assert()
    .success()
    .stdout(contains("rejected"));
}

#[test]
fn test_cli_audit_trail_shows_the_history() {
    let db = setup_test_db("cli_audit");
    init_with_users(&db);

    ch().args(["--db", &db, "--user", "1", "add", "2026-08-04", "3.0"])
        .assert()
        .success();
    ch().args(["--db", &db, "--user", "1", "submit", "1"])
        .assert()
        .success();
    ch().args(["--db", &db, "--user", "2", "approve", "1"])
        .assert()
        .success();

    ch().args(["--db", &db, "audit", "--entry", "VH-2026-0001"])
        .assert()
        .success()
        .stdout(contains("created"))
        .stdout(contains("status_change"));
}

#[test]
fn test_cli_correction_updates_hours() {
    let db = setup_test_db("cli_correct");
    init_with_users(&db);

    ch().args(["--db", &db, "--user", "1", "add", "2026-08-05", "4.5"])
        .assert()
        .success();
    ch().args(["--db", &db, "--user", "1", "submit", "1"])
        .assert()
        .success();
    ch().args(["--db", &db, "--user", "2", "approve", "1"])
        .assert()
        .success();

    ch().args([
        "--db", &db, "--user", "2", "correct", "1", "--hours", "3.0", "--reason",
        "mis-keyed duration",
    ])
    .assert()
    .success()
    .stdout(contains("corrected"));

    ch().args(["--db", &db, "list"])
        .assert()
        .success()
        .stdout(contains("3.00"));
}

#[test]
fn test_cli_return_then_resubmit() {
    let db = setup_test_db("cli_return");
    init_with_users(&db);

    ch().args(["--db", &db, "--user", "1", "add", "2026-08-06", "8.0"])
        .assert()
        .success();
    ch().args(["--db", &db, "--user", "1", "submit", "1"])
        .assert()
        .success();

    ch().args([
        "--db", &db, "--user", "2", "return", "1", "--reason", "which project?",
    ])
    .assert()
    .success()
    .stdout(contains("clarification"));

    // The question shows up in the conversation log.
    ch().args(["--db", &db, "list", "--messages"])
        .assert()
        .success()
        .stdout(contains("which project?"));

    // An entry in clarification can still be approved directly.
    ch().args(["--db", &db, "--user", "2", "approve", "1"])
        .assert()
        .success()
        .stdout(contains("approved"));
}

#[test]
fn test_cli_rejects_unknown_user() {
    let db = setup_test_db("cli_unknown_user");
    init_with_users(&db);

    ch().args(["--db", &db, "--user", "99", "add", "2026-08-07", "1.0"])
        .assert()
        .failure()
        .stderr(contains("User 99 not found"));
}

#[test]
fn test_cli_invalid_transition_reported() {
    let db = setup_test_db("cli_invalid_transition");
    init_with_users(&db);

    ch().args(["--db", &db, "--user", "1", "add", "2026-08-08", "1.0"])
        .assert()
        .success();

    // Approving a draft is not a legal transition.
    ch().args(["--db", &db, "--user", "2", "approve", "1"])
        .assert()
        .failure()
        .stderr(contains("Invalid transition: draft -> approved"));
}

#[test]
fn test_cli_pending_listing() {
    let db = setup_test_db("cli_pending");
    init_with_users(&db);

    ch().args(["--db", &db, "--user", "1", "add", "2026-08-09", "1.0"])
        .assert()
        .success();
    ch().args(["--db", &db, "--user", "1", "add", "2026-08-10", "2.0"])
        .assert()
        .success();
    ch().args(["--db", &db, "--user", "1", "submit", "2"])
        .assert()
        .success();

    // Only the submitted entry is waiting for review.
    ch().args(["--db", &db, "list", "--pending"])
        .assert()
        .success()
        .stdout(contains("VH-2026-0002"))
        .stdout(contains("1 entries"));
}
