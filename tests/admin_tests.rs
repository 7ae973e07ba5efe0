mod common;

use common::{ch, setup_test_db};
use predicates::str::contains;
use std::env;
use std::fs;
use std::path::PathBuf;

fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

#[test]
fn test_init_is_idempotent() {
    let db = setup_test_db("adm_init");

    ch().args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    // Re-running init against an existing database must not fail.
    ch().args(["--db", &db, "--test", "init"]).assert().success();
}

#[test]
fn test_db_migrate_and_check() {
    let db = setup_test_db("adm_migrate");
    ch().args(["--db", &db, "--test", "init"]).assert().success();

    ch().args(["--db", &db, "db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Migration completed"));

    // Markers keep a second run from re-applying anything.
    ch().args(["--db", &db, "db", "--migrate"]).assert().success();

    ch().args(["--db", &db, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_db_info_reports_counts() {
    let db = setup_test_db("adm_info");
    ch().args(["--db", &db, "--test", "init"]).assert().success();

    ch().args([
        "--db", &db, "user", "--add", "--name", "Alice", "--email", "alice@club.test",
    ])
    .assert()
    .success();

    ch().args(["--db", &db, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Users"));
}

#[test]
fn test_user_add_rejects_unknown_capability() {
    let db = setup_test_db("adm_bad_caps");
    ch().args(["--db", &db, "--test", "init"]).assert().success();

    ch().args([
        "--db", &db, "user", "--add", "--name", "Eve", "--email", "eve@club.test", "--caps",
        "owner",
    ])
    .assert()
    .failure()
    .stderr(contains("Invalid capability"));
}

#[test]
fn test_user_list_shows_capabilities() {
    let db = setup_test_db("adm_user_list");
    ch().args(["--db", &db, "--test", "init"]).assert().success();

    ch().args([
        "--db", &db, "user", "--add", "--name", "Rita", "--email", "rita@club.test", "--caps",
        "member,reviewer",
    ])
    .assert()
    .success();

    ch().args(["--db", &db, "user", "--list"])
        .assert()
        .success()
        .stdout(contains("Rita"))
        .stdout(contains("member,reviewer"));
}

#[test]
fn test_backup_copies_the_database() {
    let db = setup_test_db("adm_backup");
    ch().args(["--db", &db, "--test", "init"]).assert().success();

    let out = temp_out("adm_backup", "sqlite");
    ch().args(["--db", &db, "backup", "--file", &out])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert!(fs::metadata(&out).is_ok());
}

#[test]
fn test_backup_compress_produces_zip() {
    let db = setup_test_db("adm_backup_zip");
    ch().args(["--db", &db, "--test", "init"]).assert().success();

    let out = temp_out("adm_backup_zip", "sqlite");
    ch().args(["--db", &db, "backup", "--file", &out, "--compress"])
        .assert()
        .success()
        .stdout(contains("Compressed"));

    let zip = PathBuf::from(&out).with_extension("zip");
    assert!(zip.exists());
    // The uncompressed copy is removed after zipping.
    assert!(!PathBuf::from(&out).exists());
}
