use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

fn record_book() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "providers": [
                {{ "name": "node", "network": "ethereum:mainnet", "default": true }},
                {{ "name": "bor", "network": "polygon:mainnet", "serves_names": false }}
            ],
            "records": [
                {{ "name": "vitalik.eth", "address": "{VITALIK}" }}
            ]
        }}"#
    )
    .unwrap();
    file
}

fn ensgate(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ensgate"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary runs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn resolve_prints_checksummed_address() {
    let book = record_book();
    let path = book.path().to_str().unwrap();

    let output = ensgate(&["--records", path, "resolve", "vitalik.eth"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), VITALIK);
}

#[test]
fn name_and_owner_commands() {
    let book = record_book();
    let path = book.path().to_str().unwrap();

    let output = ensgate(&["--records", path, "name", &VITALIK.to_lowercase()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "vitalik.eth");

    let output = ensgate(&[
        "--records",
        path,
        "owner",
        "vitalik.eth",
        "--network",
        "polygon:mainnet",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), VITALIK);
}

#[test]
fn not_found_is_reported_on_stderr_with_success() {
    let book = record_book();
    let path = book.path().to_str().unwrap();

    let output = ensgate(&["--records", path, "resolve", "nobody.eth"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not resolve ENS 'nobody.eth'."));
}

#[test]
fn namehash_works_offline() {
    let output = ensgate(&["namehash", "eth"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "0x93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
    );
}

#[test]
fn missing_provider_is_an_error() {
    let output = ensgate(&["resolve", "vitalik.eth"]);
    assert!(!output.status.success());
}
