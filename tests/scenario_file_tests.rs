//! Scenario catalogue loading from TOML files

use predicates::prelude::*;
use std::io::Write;
use synguard::automaton::AutomatonState;
use synguard::scenario::{ScenarioCatalogue, ScenarioError};
use tempfile::NamedTempFile;

fn write_catalogue(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const CATALOGUE: &str = r#"
[[scenario]]
name = "FTP Session"
packets = ["SYN", "ACK", "USER", "PASS", "RETR", "FIN"]

[[scenario]]
name = "Late Injection"
packets = ["SYN", "FIN", "INJECT", "INJECT"]
"#;

#[test]
fn test_load_catalogue_from_file() {
    let file = write_catalogue(CATALOGUE);
    let catalogue = ScenarioCatalogue::from_file(file.path()).unwrap();

    assert_eq!(catalogue.len(), 2);

    let ftp = catalogue.select("FTP Session").unwrap().run();
    assert_eq!(ftp.final_state, AutomatonState::Closed);
    assert_eq!(ftp.len(), 6);

    let late = catalogue.select("2").unwrap().run();
    assert_eq!(late.final_state, AutomatonState::Trap);
    assert_eq!(late.len(), 3);
    assert_eq!(late.skipped(), 1);
}

#[test]
fn test_missing_file_reports_path() {
    let err = ScenarioCatalogue::from_file("/nonexistent/scenarios.toml").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/scenarios.toml"));
}

#[test]
fn test_duplicate_names_in_file() {
    let file = write_catalogue(
        r#"
        [[scenario]]
        name = "A"
        packets = ["SYN"]

        [[scenario]]
        name = "a"
        packets = ["FIN"]
        "#,
    );

    let err = ScenarioCatalogue::from_file(file.path()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ScenarioError>(),
        Some(&ScenarioError::DuplicateName("a".to_string()))
    );
}

#[test]
fn test_cli_uses_scenarios_file() {
    let file = write_catalogue(CATALOGUE);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("synguard");
    cmd.arg("--scenarios-file").arg(file.path()).arg("--list");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(" 1. FTP Session"))
        .stdout(predicate::str::contains(" 2. Late Injection"))
        .stdout(predicate::str::contains("Standard Web Browsing").not());
}

#[test]
fn test_cli_rejects_invalid_scenarios_file() {
    let file = write_catalogue("[[scenario]\nname = ");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("synguard");
    cmd.arg("--scenarios-file").arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scenario file"));
}

#[test]
fn test_numeric_name_in_file_is_rejected() {
    let file = write_catalogue(
        r#"
        [[scenario]]
        name = "Web"
        packets = ["SYN", "FIN"]

        [[scenario]]
        name = "443"
        packets = ["FIN"]
        "#,
    );

    let err = ScenarioCatalogue::from_file(file.path()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ScenarioError>(),
        Some(&ScenarioError::NumericName("443".to_string()))
    );
}
