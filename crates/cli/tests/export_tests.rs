// Integration tests for `rcv export`.
// Run with: cargo test -p reconview-cli --test export_tests

use std::path::PathBuf;
use std::process::Command;

use chrono::Local;

fn rcv() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rcv"));
    cmd.env_remove("RECONVIEW_API_URL");
    cmd
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/report_small.json")
}

const HEADER: &str =
    "\"Código\",\"Cliente\",\"Valor Financeiro\",\"Valor Contabilidade\",\"Diferença\",\"Status\"";

#[test]
fn export_default_filename_is_dated() {
    let dir = tempfile::tempdir().unwrap();

    let output = rcv()
        .current_dir(dir.path())
        .args(["export", fixture_path().to_str().unwrap()])
        .output()
        .expect("rcv export");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );

    let expected = format!("diferencas_{}.csv", Local::now().date_naive());
    let path = dir.path().join(&expected);
    assert!(path.exists(), "expected {} in the working directory", expected);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exported 6 rows"), "stderr: {}", stderr);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 7, "header + 6 rows");
    assert_eq!(contents.lines().next().unwrap(), HEADER);
}

#[test]
fn export_status_filter_keeps_only_divergent() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("divergent.csv");

    let output = rcv()
        .args([
            "export",
            fixture_path().to_str().unwrap(),
            "--status",
            "divergent",
            "-o",
            out_path.to_str().unwrap(),
        ])
        .output()
        .expect("rcv export");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 5, "header + 4 divergent rows:\n{}", contents);
    for line in &lines[1..] {
        assert!(line.ends_with("\"DIVERGENT\""), "line: {}", line);
    }
    // Default sort: largest absolute difference first
    assert!(lines[1].starts_with("\"C-1002\""), "line: {}", lines[1]);
    // Unmatched record with zero signed difference still counts as divergent
    assert!(
        lines[2].starts_with("\"\",\"Gama Participações\""),
        "line: {}",
        lines[2],
    );
}

#[test]
fn export_search_composes_with_status() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("acme.csv");

    let output = rcv()
        .args([
            "export",
            fixture_path().to_str().unwrap(),
            "--search",
            "ACME",
            "-o",
            out_path.to_str().unwrap(),
        ])
        .output()
        .expect("rcv export");

    assert!(output.status.success());
    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(contents.lines().count(), 3, "header + both acme rows");

    // Same search, divergent only: nothing matches, header still written
    let output = rcv()
        .args([
            "export",
            fixture_path().to_str().unwrap(),
            "--search",
            "ACME",
            "--status",
            "divergent",
            "-o",
            out_path.to_str().unwrap(),
        ])
        .output()
        .expect("rcv export");

    assert!(output.status.success());
    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(contents.lines().count(), 1, "header only:\n{}", contents);
    assert_eq!(contents.lines().next().unwrap(), HEADER);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exported 0 rows"), "stderr: {}", stderr);
}

#[test]
fn export_sort_flags_change_row_order() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("by_diff.csv");

    let output = rcv()
        .args([
            "export",
            fixture_path().to_str().unwrap(),
            "--sort-by",
            "difference",
            "--direction",
            "asc",
            "-o",
            out_path.to_str().unwrap(),
            "-q",
        ])
        .output()
        .expect("rcv export");

    assert!(output.status.success());
    assert!(
        output.stderr.is_empty(),
        "quiet run should print nothing: {}",
        String::from_utf8_lossy(&output.stderr),
    );

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert!(lines[1].starts_with("\"C-1003\""), "most negative first: {}", lines[1]);
    assert!(
        lines[6].starts_with("\"C-1002\""),
        "largest signed difference last: {}",
        lines[6],
    );
}

#[test]
fn export_missing_report_exits_4() {
    let output = rcv()
        .args(["export", "no-such.json"])
        .output()
        .expect("rcv export");

    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn export_garbage_report_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let output = rcv()
        .args(["export", path.to_str().unwrap()])
        .output()
        .expect("rcv export");

    assert_eq!(
        output.status.code(),
        Some(3),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
}
