//! CLI flag contract tests
//!
//! Runs the binary against throwaway repositories and checks that flags
//! (--timeunit, --shift, --out, --hide, --config) behave as documented.

use git2::{Repository, Signature, Time};
use std::path::Path;
use std::process::Command;

fn commitplot_bin() -> String {
    env!("CARGO_BIN_EXE_commitplot").to_string()
}

/// Repository with one commit per timestamp
fn setup_test_repo(timestamps: &[i64]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let mut parent: Option<git2::Oid> = None;
    for (i, ts) in timestamps.iter().enumerate() {
        let sig = Signature::new("Test", "test@example.com", &Time::new(*ts, 0)).unwrap();
        let parents: Vec<git2::Commit> = parent
            .map(|id| repo.find_commit(id).unwrap())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        let id = repo
            .commit(
                Some("HEAD"),
                &sig,
                &sig,
                &format!("commit {}", i),
                &tree,
                &parent_refs,
            )
            .unwrap();
        parent = Some(id);
    }
    dir
}

/// Run the binary inside `cwd` with an isolated user config dir
fn run_commitplot(cwd: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(commitplot_bin())
        .args(args)
        .current_dir(cwd)
        .env("XDG_CONFIG_HOME", cwd)
        .env("HOME", cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run commitplot");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

const TIMESTAMPS: &[i64] = &[1_700_000_000, 1_700_100_000, 1_700_300_000, 1_700_400_000];

#[test]
fn test_invalid_timeunit_is_usage_error() {
    let work = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_commitplot(work.path(), &["line", ".", "-t", "fortnight"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Usage"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_shift_is_usage_error() {
    let work = tempfile::tempdir().unwrap();
    let (code, _, stderr) =
        run_commitplot(work.path(), &["line", ".", "-t", "day", "--shift", "up"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Usage"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_extension_fails() {
    let repo = setup_test_repo(TIMESTAMPS);
    let work = tempfile::tempdir().unwrap();
    let id = repo.path().to_string_lossy().to_string();
    let (code, _, stderr) =
        run_commitplot(work.path(), &["line", &id, "-t", "day", "--hide", "-o", "out.png"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unsupported output format"), "stderr: {}", stderr);
    assert!(!work.path().join("out.png").exists());
}

#[test]
fn test_non_repository_id_fails() {
    let work = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_commitplot(work.path(), &["line", ".", "-t", "day", "--hide"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error"), "stderr: {}", stderr);
}

#[test]
fn test_line_writes_svg() {
    let repo = setup_test_repo(TIMESTAMPS);
    let work = tempfile::tempdir().unwrap();
    let id = repo.path().to_string_lossy().to_string();
    let (code, stdout, stderr) =
        run_commitplot(work.path(), &["line", &id, "-t", "day", "--hide", "-o", "chart.svg"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Save figure to"));

    let svg = std::fs::read_to_string(work.path().join("chart.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Number of commits over time (days)"));
}

#[test]
fn test_peak_writes_json_with_markers() {
    // Daily counts 1, 0, 1, 0, 1, 1 have turning points
    let repo = setup_test_repo(TIMESTAMPS);
    let work = tempfile::tempdir().unwrap();
    let id = repo.path().to_string_lossy().to_string();
    let (code, _, stderr) =
        run_commitplot(work.path(), &["peak", &id, "-t", "day", "--hide", "-o", "chart.json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(work.path().join("chart.json")).unwrap())
            .unwrap();
    assert_eq!(json["mode"], "peak");
    assert_eq!(json["series"].as_array().unwrap().len(), 1);
    assert!(json["series"][0]["peaks"].is_object());
}

#[test]
fn test_shift_and_norm_write_offsets() {
    let repo = setup_test_repo(TIMESTAMPS);
    let work = tempfile::tempdir().unwrap();
    let id = repo.path().to_string_lossy().to_string();
    let (code, _, stderr) = run_commitplot(
        work.path(),
        &[
            "line", &id, "-t", "day", "--acc", "--norm", "--shift", "right", "--hide", "-o",
            "chart.json",
        ],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(work.path().join("chart.json")).unwrap())
            .unwrap();
    assert_eq!(json["axis"], "offsets");
    let points = json["series"][0]["points"].as_array().unwrap();
    assert_eq!(points.last().unwrap()["x"], 0);
    assert_eq!(points.last().unwrap()["y"], 1.0);
    assert_eq!(points.first().unwrap()["y"], 0.0);
}

#[test]
fn test_html_output_and_config_file() {
    let repo = setup_test_repo(TIMESTAMPS);
    let work = tempfile::tempdir().unwrap();
    std::fs::write(work.path().join("commitplot.toml"), "[chart]\nwidth = 640\n").unwrap();
    let id = repo.path().to_string_lossy().to_string();
    let (code, _, stderr) = run_commitplot(
        work.path(),
        &["euclidean", &id, "-t", "week", "--hide", "-o", "out/chart.html"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);

    let html = std::fs::read_to_string(work.path().join("out").join("chart.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"width="640""#));
    assert!(html.contains("euclidean mode"));
}

#[test]
fn test_explicit_missing_config_fails() {
    let repo = setup_test_repo(TIMESTAMPS);
    let work = tempfile::tempdir().unwrap();
    let id = repo.path().to_string_lossy().to_string();
    let (code, _, stderr) = run_commitplot(
        work.path(),
        &["line", &id, "-t", "day", "--hide", "--config", "missing.toml"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("missing.toml"), "stderr: {}", stderr);
}

#[test]
fn test_init_creates_config_once() {
    let work = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_commitplot(work.path(), &["init"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(work.path().join("commitplot.toml").exists());

    let (code, _, stderr) = run_commitplot(work.path(), &["init"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--force"), "stderr: {}", stderr);

    let (code, _, _) = run_commitplot(work.path(), &["init", "--force"]);
    assert_eq!(code, 0);
}
