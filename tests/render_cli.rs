//! E2E tests for the check, schema and render --html-out commands

use std::process::Command;

/// Test that a bill matching every template placeholder checks cleanly
#[test]
fn check_clean_bill() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "check",
            "-b",
            "tests/data/bill.json",
            "-t",
            "tests/data/template",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No issues found"));
}

/// Test that a bill field without a placeholder is reported and fails the check
#[test]
fn check_flags_unused_field() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "check",
            "-b",
            "tests/data/bill_extra_field.json",
            "-t",
            "tests/data/template",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success(), "Expected exit code 1: {:?}", output);
    assert!(stdout.contains("unused_field"));
    assert!(stdout.contains("loyalty_bonus"));
}

/// Test JSON output for a placeholder left without a matching bill field
#[test]
fn check_flags_unmatched_placeholder_as_json() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "check",
            "-b",
            "tests/data/bill_missing_rebate.json",
            "-t",
            "tests/data/template",
            "--json",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success(), "Expected exit code 1: {:?}", output);
    assert!(stdout.contains("\"unmatched_placeholder\""));
    assert!(stdout.contains("\"__rebate\""));
    assert!(stdout.contains("\"issue_count\": 1"));
}

/// Test that render --html-out writes fully substituted HTML with rewritten asset URLs
#[test]
fn render_html_out() {
    let html_path = std::env::temp_dir().join("billgen-e2e-render.html");

    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "render",
            "-b",
            "tests/data/bill.json",
            "-t",
            "tests/data/template",
            "--html-out",
        ])
        .arg(&html_path)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let html = std::fs::read_to_string(&html_path).expect("substituted html");

    // Every placeholder is filled with the formatted value
    assert!(html.contains("Customer 100: John Doré"));
    assert!(html.contains("Billing period 2016-04-01 to 2016-04-30"));
    assert!(html.contains("$55.00"));
    assert!(html.contains("LOWER"));
    assert!(!html.contains("__"));

    // Relative asset references point at the template directory
    assert!(html.contains("file://"));
    assert!(html.contains("assets/bill.css"));
    assert!(!html.contains("../"));
}

/// Test that the schema command describes the bill input
#[test]
fn schema_json() {
    let output = Command::new("cargo")
        .args(["run", "--", "schema"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"$schema\""));
    assert!(stdout.contains("\"additionalProperties\""));
}

/// Test that the example bill is valid input for check
#[test]
fn schema_example_round_trips_through_check() {
    let example = Command::new("cargo")
        .args(["run", "--", "schema", "example"])
        .output()
        .expect("Failed to execute command");
    assert!(example.status.success(), "Command failed: {:?}", example);
    assert!(String::from_utf8_lossy(&example.stdout).contains("\"customer_id\": 100"));

    use std::io::Write;
    let mut check = Command::new("cargo")
        .args([
            "run",
            "--",
            "check",
            "-b",
            "-",
            "-t",
            "tests/data/template",
        ])
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .expect("Failed to execute command");
    check
        .stdin
        .take()
        .expect("stdin")
        .write_all(&example.stdout)
        .expect("pipe example bill");
    let output = check.wait_with_output().expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No issues found"));
}
