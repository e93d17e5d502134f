use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const VALID: &str = "\
jvm.python.version=3.9.0
jvm.python.major_version=3
jvm.python.minor_version=9
jvm.python.micro_version=0
jvm.python.release_level=15
jvm.python.release_serial=0
jvm.python.build.date=2020-01-01
jvm.python.build.time=12:00:00
jvm.python.build.hg_branch=default
jvm.python.build.hg_tag=tip
jvm.python.build.hg_version=abc123
";

fn jvpy() -> Command {
    let mut cmd = Command::cargo_bin("jvpy").unwrap();
    cmd.env("JVPY_VM_NAME", "OpenJDK 64-Bit Server VM")
        .env("JVPY_VM_VENDOR", "Oracle Corporation")
        .env_remove("JVPY_VERSION_PROPERTIES")
        .env_remove("RUST_LOG");
    cmd
}

fn write_metadata(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("version.properties");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn version_flag_prints_full_version_string() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_metadata(dir.path(), VALID);

    jvpy()
        .arg("--metadata")
        .arg(&path)
        .arg("--version")
        .assert()
        .success()
        .stdout(
            "3.9.0 (default:abc123, 2020-01-01, 12:00:00)\n\
             [OpenJDK 64-Bit Server VM (Oracle Corporation)]\n",
        );
}

#[test]
fn env_var_locates_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_metadata(dir.path(), &VALID.replace("hg_tag=tip", "hg_tag=v3.9.0"));

    jvpy()
        .env("JVPY_VERSION_PROPERTIES", &path)
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("3.9.0 (v3.9.0:abc123, "));
}

#[test]
fn banner_without_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_metadata(dir.path(), VALID);

    jvpy()
        .arg("--metadata")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("jvpy 3.9.0 (default:abc123"));
}

#[test]
fn json_output_carries_fields_and_summaries() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_metadata(dir.path(), VALID);

    let output = jvpy()
        .arg("--metadata")
        .arg(&path)
        .args(["--version", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["fields"]["major_version"], 3);
    assert_eq!(json["fields"]["scm_tag"], "tip");
    assert_eq!(json["release_level"], "final");
    assert_eq!(json["hex_version"], "0x030900f0");
    assert_eq!(json["scm_identifier"], "default");
    assert_eq!(
        json["host_descriptor"],
        "[OpenJDK 64-Bit Server VM (Oracle Corporation)]"
    );
}

#[test]
fn missing_metadata_fails_and_names_resource() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nowhere.properties");

    jvpy()
        .arg("--metadata")
        .arg(&path)
        .arg("--version")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.properties"));
}

#[test]
fn malformed_metadata_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_metadata(
        dir.path(),
        &VALID.replace("release_level=15", "release_level=final"),
    );

    jvpy()
        .arg("--metadata")
        .arg(&path)
        .arg("--version")
        .assert()
        .failure()
        .stderr(predicate::str::contains("jvm.python.release_level"));
}
