use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.arg("--db-path").arg("some_db").arg("accounts");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage.",
        ));
}

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_db_path_from_environment() {
    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.env("BANKCORE_DB_PATH", "env_db").arg("accounts");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Falling back to in-memory storage"));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.arg("--db-path").arg(&db_path).arg("accounts");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARN").not());
}
