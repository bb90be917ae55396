use matrix_mul_core::{EngineError, Matrix, Orchestrator, TerminationCause};
use matrix_mul_process_pipe::ProcessRuntime;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;
use tempfile::TempDir;

const MATRIX_MUL: &str = env!("CARGO_BIN_EXE_matrix-mul");
const ROW_WORKER: &str = env!("CARGO_BIN_EXE_matrix-mul-row-worker");

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn render(matrix: &Matrix) -> String {
    matrix
        .rows()
        .map(|row| {
            row.iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn matrix_mul(args: &[&Path], extra: &[&str]) -> Output {
    Command::new(MATRIX_MUL)
        .args(args)
        .args(extra)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn counting_matrix(size: usize) -> Matrix {
    let rows = (0..size)
        .map(|r| (0..size).map(|c| (r * size + c) as i64 - 10).collect())
        .collect();
    Matrix::from_rows(rows).unwrap()
}

// ============================================================
// matrix-mul binary
// ============================================================

#[test]
fn test_two_by_two_report() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(&dir, "a.txt", "1 2\n3 4\n");
    let w = write_file(&dir, "w.txt", "5 6\n7 8\n");

    let output = matrix_mul(&[&a, &w], &["--size", "2"]);

    assert!(output.status.success(), "{output:?}");
    let out = stdout(&output);
    assert!(
        out.starts_with("Result of A*W = [\n19 22\n43 50\n]\nRuntime "),
        "unexpected report: {out}"
    );
    assert!(out.ends_with(" seconds\n"));
}

#[test]
fn test_default_size_identity_times_w() {
    let dir = tempfile::tempdir().unwrap();
    let w = counting_matrix(8);
    let a = write_file(&dir, "a.txt", &render(&Matrix::identity(8)));
    let w_path = write_file(&dir, "w.txt", &render(&w));

    let output = matrix_mul(&[&a, &w_path], &[]);

    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains(&format!("[\n{}\n]", render(&w))));
}

#[test]
fn test_processes_backend_matches_tasks_backend() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(&dir, "a.txt", &render(&counting_matrix(3)));
    let w = write_file(&dir, "w.txt", "2 0 0\n0 2 0\n0 0 2\n");
    let doubled = "[\n-20 -18 -16\n-14 -12 -10\n-8 -6 -4\n]";

    let tasks = matrix_mul(&[&a, &w], &["--size", "3"]);
    let processes = matrix_mul(
        &[&a, &w],
        &["--size", "3", "--backend", "processes", "--worker-program", ROW_WORKER],
    );

    assert!(tasks.status.success(), "{tasks:?}");
    assert!(processes.status.success(), "{processes:?}");
    assert!(stdout(&tasks).contains(doubled));
    assert!(stdout(&processes).contains(doubled));
}

#[test]
fn test_processes_backend_finds_worker_beside_binary() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(&dir, "a.txt", "1 2\n3 4\n");
    let w = write_file(&dir, "w.txt", "5 6\n7 8\n");

    let output = matrix_mul(&[&a, &w], &["-n", "2", "--backend", "processes"]);

    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("[\n19 22\n43 50\n]"));
}

#[test]
fn test_config_file_supplies_size() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(&dir, "a.txt", "1 2\n3 4\n");
    let w = write_file(&dir, "w.txt", "5 6\n7 8\n");
    let config = write_file(&dir, "config.json", r#"{"size": 2, "backend": "tasks"}"#);

    let output = matrix_mul(&[&a, &w], &["--config", config.to_str().unwrap()]);

    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("[\n19 22\n43 50\n]"));
}

// ============================================================
// Fatal conditions
// ============================================================

#[test]
fn test_missing_operand_file_fails_without_report() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(&dir, "a.txt", "1 2\n3 4\n");
    let missing = dir.path().join("missing.txt");

    let output = matrix_mul(&[&a, &missing], &["--size", "2"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout(&output).contains("Result of A*W"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.txt"));
}

#[test]
fn test_malformed_operand_fails_without_report() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(&dir, "a.txt", "1 two\n3 4\n");
    let w = write_file(&dir, "w.txt", "5 6\n7 8\n");

    let output = matrix_mul(&[&a, &w], &["--size", "2"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_config_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(&dir, "a.txt", "1\n");
    let config = write_file(&dir, "config.json", r#"{"rows": 2}"#);

    let output = matrix_mul(&[&a, &a], &["--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_crashing_worker_process_fails_without_report() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(&dir, "a.txt", "1 2\n3 4\n");
    let w = write_file(&dir, "w.txt", "5 6\n7 8\n");
    let worker = write_file(&dir, "crash.sh", "#!/bin/sh\ncat >/dev/null\nkill -9 $$\n");
    fs::set_permissions(&worker, fs::Permissions::from_mode(0o755)).unwrap();

    let output = matrix_mul(
        &[&a, &w],
        &[
            "--size",
            "2",
            "--backend",
            "processes",
            "--worker-program",
            worker.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout(&output).contains("Result of A*W"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("terminated abnormally"));
}

#[test]
fn test_out_of_range_size_fails_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(&dir, "a.txt", "1\n");

    for size in ["0", "4294967296", "100000"] {
        let output = matrix_mul(&[&a, &a], &["--size", size]);

        assert_eq!(output.status.code(), Some(1), "size {size}: {output:?}");
        assert!(output.stdout.is_empty());
        assert!(String::from_utf8_lossy(&output.stderr).contains("out of range"));
    }
}

#[test]
fn test_wrong_argument_count_is_usage_error() {
    let output = Command::new(MATRIX_MUL).arg("only-one.txt").output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

// ============================================================
// Row-worker program
// ============================================================

#[tokio::test]
async fn test_aborting_worker_process_fails_run() {
    let runtime = ProcessRuntime::new(ROW_WORKER).with_worker_args(["--abort-row", "1"]);
    let mut orchestrator = Orchestrator::new(runtime);

    let err = orchestrator
        .run(&Matrix::identity(3), Arc::new(counting_matrix(3)))
        .await
        .unwrap_err();

    match err {
        EngineError::WorkerAbnormalTermination { row, cause, .. } => {
            assert_eq!(row, 1);
            assert!(matches!(cause, TerminationCause::Signaled(_)));
        }
        other => panic!("Expected WorkerAbnormalTermination, got {other:?}"),
    }
    assert_eq!(orchestrator.runtime().outstanding(), 0);
}

#[tokio::test]
async fn test_staggered_worker_processes_merge_by_identity() {
    let runtime = ProcessRuntime::new(ROW_WORKER).with_worker_args(["--stagger-ms", "150"]);
    let mut orchestrator = Orchestrator::new(runtime);
    let w = counting_matrix(4);

    let outcome = orchestrator
        .run(&Matrix::identity(4), Arc::new(w.clone()))
        .await
        .unwrap();

    assert_eq!(outcome.completion_order, vec![3, 2, 1, 0]);
    assert_eq!(outcome.product, w);
}
