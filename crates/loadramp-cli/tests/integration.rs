use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use std::fs::File;
use tempfile::TempDir;

const PROFILE: &str =
    "<Scenario><Step><Label>Ramp Up</Label><Height>10</Height></Step></Scenario>";

fn loadramp(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("loadramp").unwrap();
    cmd.current_dir(dir.path()).env("LOADRAMP_ROOT", dir.path());
    cmd
}

/// Working-directory fixture: scenario file plus a gzip tar archive holding
/// one export with one profile document.
fn fixture(dir: &TempDir) {
    std::fs::write(
        dir.path().join("config.tcl"),
        "loads web\nstep2 height(10)\nset spf_file {loadtest.spf}\n",
    )
    .unwrap();

    let file = File::create(dir.path().join("loadtest.spf")).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    let mut header = tar::Header::new_gnu();
    header.set_size(PROFILE.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(
            &mut header,
            "tmp/AvExport/run1/loadprofiles/p1.xml",
            PROFILE.as_bytes(),
        )
        .unwrap();
    builder.into_inner().unwrap().finish().unwrap();
}

fn profile_text(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join("tmp/AvExport/run1/loadprofiles/p1.xml")).unwrap()
}

#[cfg(unix)]
fn write_script(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.path().join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// ---------------------------------------------------------------------------
// loadramp init / validate
// ---------------------------------------------------------------------------

#[test]
fn init_writes_default_settings() {
    let dir = TempDir::new().unwrap();
    loadramp(&dir).arg("init").assert().success();
    assert!(dir.path().join("loadramp.yaml").exists());

    let content = std::fs::read_to_string(dir.path().join("loadramp.yaml")).unwrap();
    assert!(content.contains("config.tcl"));
    assert!(content.contains("tmp/AvExport"));
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    loadramp(&dir).arg("init").assert().success();
    loadramp(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_default_settings_is_clean() {
    let dir = TempDir::new().unwrap();
    loadramp(&dir).arg("init").assert().success();
    loadramp(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("No warnings"));
}

#[test]
fn validate_empty_harness_command_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("loadramp.yaml"), "harness_command: ''\n").unwrap();
    loadramp(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("harness_command is empty"));
}

// ---------------------------------------------------------------------------
// loadramp mutate
// ---------------------------------------------------------------------------

#[test]
fn mutate_doubles_heights_and_rebuilds_archive() {
    let dir = TempDir::new().unwrap();
    fixture(&dir);

    loadramp(&dir).arg("mutate").assert().success();
    assert!(profile_text(&dir).contains("<Height>20</Height>"));
    assert!(dir.path().join("loadtest.spf").exists());

    // The rebuilt archive must round-trip: a second pass extracts it and
    // doubles again.
    loadramp(&dir).arg("mutate").assert().success();
    assert!(profile_text(&dir).contains("<Height>40</Height>"));
}

#[test]
fn mutate_without_scenario_file_fails() {
    let dir = TempDir::new().unwrap();
    loadramp(&dir)
        .arg("mutate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn mutate_reports_missing_archive_reference() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.tcl"), "no reference here\n").unwrap();
    loadramp(&dir)
        .arg("mutate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no archive reference"));
}

// ---------------------------------------------------------------------------
// loadramp heights
// ---------------------------------------------------------------------------

#[test]
fn heights_prints_scenario_mapping() {
    let dir = TempDir::new().unwrap();
    fixture(&dir);
    loadramp(&dir)
        .arg("heights")
        .assert()
        .success()
        .stdout(predicate::str::contains("web"))
        .stdout(predicate::str::contains("10"));
}

#[test]
fn heights_json_output() {
    let dir = TempDir::new().unwrap();
    fixture(&dir);
    loadramp(&dir)
        .args(["heights", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"web\": 10"));
}

// ---------------------------------------------------------------------------
// loadramp run
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn run_mutates_once_then_reports_done() {
    let dir = TempDir::new().unwrap();
    fixture(&dir);
    write_script(
        &dir,
        "harness.sh",
        "echo 'Attempt 1'\necho 'Unsuccessful transactions: 0'",
    );

    loadramp(&dir)
        .args(["run", "--command", "./harness.sh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Done"));

    // Seed log is empty, so exactly one mutate cycle ran before the
    // harness reported success.
    assert!(profile_text(&dir).contains("<Height>20</Height>"));
    assert!(dir.path().join("obs.log").exists());
}

#[cfg(unix)]
#[test]
fn run_gives_up_after_max_cycles() {
    let dir = TempDir::new().unwrap();
    fixture(&dir);
    write_script(
        &dir,
        "harness.sh",
        "echo 'Attempt 1'\necho 'Unsuccessful transactions: 2'",
    );

    loadramp(&dir)
        .args(["run", "--command", "./harness.sh", "--max-cycles", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 mutate cycles"));

    // Both cycles mutated before the cap was hit: 10 → 20 → 40.
    assert!(profile_text(&dir).contains("<Height>40</Height>"));
}

#[cfg(unix)]
#[test]
fn run_propagates_harness_failure() {
    let dir = TempDir::new().unwrap();
    fixture(&dir);
    write_script(&dir, "harness.sh", "echo 'exploded'\nexit 7");

    loadramp(&dir)
        .args(["run", "--command", "./harness.sh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exited with code 7"));
}

// ---------------------------------------------------------------------------
// Traversal safety, end to end
// ---------------------------------------------------------------------------

#[test]
fn mutate_rejects_traversal_archive() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.tcl"),
        "set spf_file {loadtest.spf}\n",
    )
    .unwrap();

    let file = File::create(dir.path().join("loadtest.spf")).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    let mut header = tar::Header::new_gnu();
    let payload = b"oops";
    header.set_size(payload.len() as u64);
    header.set_mode(0o644);
    header.set_entry_type(tar::EntryType::Regular);
    // Write the traversal name straight into the header: `append_data`
    // rejects paths containing `..` before the archive is written.
    let name = b"../../etc/passwd";
    header.as_mut_bytes()[..name.len()].copy_from_slice(name);
    header.set_cksum();
    builder.append(&header, payload.as_slice()).unwrap();
    builder.into_inner().unwrap().finish().unwrap();

    loadramp(&dir)
        .arg("mutate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("escapes the extraction root"));
    assert!(!dir.path().join("tmp").exists(), "nothing may be extracted");
}
