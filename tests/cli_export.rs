//! Binary-level behavior: export formats, the missing-store fixture
//! fallback, and the hard failure on unsupported formats.

use std::process::Command;

use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_conversation-search"))
}

#[test]
fn search_against_missing_store_uses_fixture_and_exits_zero() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("nope.db");

    let output = bin()
        .arg("--db")
        .arg(&db)
        .args(["search", "-k", "React", "-t", "ai", "-q"])
        .output()
        .expect("run search");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AI responses (1):"), "stdout: {stdout}");
    assert!(stdout.contains("web-app-project"));
}

#[test]
fn json_export_writes_a_parseable_envelope_file() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("nope.db");
    let out = tmp.path().join("results.json");

    let output = bin()
        .arg("--db")
        .arg(&db)
        .args(["search", "-k", "api", "--export", "json", "-q", "-o"])
        .arg(&out)
        .output()
        .expect("run export");

    assert!(output.status.success());
    let body = std::fs::read_to_string(&out).expect("read export file");
    let parsed: serde_json::Value = serde_json::from_str(&body).expect("valid json");
    assert!(parsed.get("user_prompts").is_some());
    assert!(parsed.get("ai_responses").is_some());
}

#[test]
fn unsupported_export_format_fails_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("nope.db");
    let out = tmp.path().join("results.xml");

    let output = bin()
        .arg("--db")
        .arg(&db)
        .args(["search", "-k", "api", "--export", "xml", "-q", "-o"])
        .arg(&out)
        .output()
        .expect("run export");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported export format"), "stderr: {stderr}");
    assert!(!out.exists(), "no partial file may be written");
}

#[test]
fn markdown_export_renders_the_narrative_sections() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("nope.db");
    let out = tmp.path().join("results.md");

    let output = bin()
        .arg("--db")
        .arg(&db)
        .args(["search", "--export", "markdown", "-q", "-o"])
        .arg(&out)
        .output()
        .expect("run export");

    assert!(output.status.success());
    let body = std::fs::read_to_string(&out).expect("read export file");
    assert!(body.contains("User prompts ("));
    assert!(body.contains("AI responses ("));
}

#[test]
fn remote_url_transport_failure_degrades_to_no_results() {
    let output = bin()
        .args([
            "search",
            "-k",
            "api",
            "--url",
            "http://127.0.0.1:1",
            "-q",
        ])
        .output()
        .expect("run remote search");

    assert!(output.status.success(), "transport failure must be non-fatal");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No matching conversation records found."));
}

#[test]
fn projects_listing_prints_fixture_projects() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("nope.db");

    let output = bin()
        .arg("--db")
        .arg(&db)
        .arg("projects")
        .output()
        .expect("run projects");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("claude-mem-demo"));
    assert!(stdout.contains("web-app-project"));
    assert!(stdout.contains("data-analysis"));
}
