//! Runner tests against files on disk

use coder_order::{MethodQuery, Outcome, Value};
use coder_php::{Job, RunError, Runner};
use coder_syntax::ArrayPath;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const KERNEL: &str = "<?php\nclass Kernel\n{\n    protected $middleware = [\n        'auth',\n    ];\n\n    public function routes()\n    {\n        return [];\n    }\n}\n";

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_run_writes_modified_file() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Kernel.php", KERNEL);
    let job = Job::property(&file, "middleware", ArrayPath::root(), Value::from("web"));

    let outcome = Runner::new().run(job.clone()).await.unwrap();
    assert_eq!(outcome, Outcome::Modified);
    assert_eq!(
        read(&file),
        "<?php\nclass Kernel\n{\n    protected $middleware = [\n        'auth',\n        'web',\n    ];\n\n    public function routes()\n    {\n        return [];\n    }\n}\n"
    );

    let again = Runner::new().run(job).await.unwrap();
    assert_eq!(again, Outcome::Unchanged);
}

#[tokio::test]
async fn test_dry_run_leaves_file() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Kernel.php", KERNEL);
    let job = Job::method_return(&file, MethodQuery::new("routes"), ArrayPath::root(), Value::Int(1));

    let report = Runner::new().dry_run(true).run_batch(vec![job]).await;
    assert!(report.is_success());
    assert_eq!(report.modified_count(), 1);
    assert!(report.files_written.is_empty());
    assert_eq!(read(&file), KERNEL);
}

#[tokio::test]
async fn test_batch_applies_jobs_per_file_in_order() {
    let dir = TempDir::new().unwrap();
    let kernel = write_fixture(&dir, "Kernel.php", KERNEL);
    let other = write_fixture(&dir, "Other.php", "<?php\nclass Other\n{\n    public $ids = [3];\n}\n");

    let report = Runner::new()
        .run_batch(vec![
            Job::property(&kernel, "middleware", ArrayPath::root(), Value::from("web")),
            Job::property(&other, "ids", ArrayPath::root(), Value::Int(1)),
            Job::property(&kernel, "missing", ArrayPath::root(), Value::Int(1)),
            Job::method_return(&kernel, MethodQuery::new("routes"), "api".parse().unwrap(), Value::from("/health")),
        ])
        .await;

    let indexes: Vec<usize> = report.jobs.iter().map(|job| job.index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 3]);
    assert!(!report.is_success());
    assert_eq!(report.failed().map(|job| job.index).collect::<Vec<_>>(), vec![2]);
    assert!(matches!(report.jobs[2].result, Err(RunError::Apply { .. })));
    assert_eq!(report.modified_count(), 3);
    assert_eq!(report.files_written.len(), 2);

    assert_eq!(read(&other), "<?php\nclass Other\n{\n    public $ids = [1, 3];\n}\n");
    assert!(read(&kernel).contains("return ['api' => ['/health']];"));
    assert!(read(&kernel).contains("        'web',\n"));
}

#[tokio::test]
async fn test_missing_file_reports_io_error() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("Missing.php");
    let err = Runner::new()
        .run(Job::property(&file, "items", ArrayPath::root(), Value::Null))
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::Io { .. }));
    assert_eq!(err.path(), file.as_path());
}

#[tokio::test]
async fn test_parse_error_fails_every_job_for_file() {
    let dir = TempDir::new().unwrap();
    let broken = "<?php\nclass A {\n    public $items = [1;\n}\n";
    let file = write_fixture(&dir, "Broken.php", broken);

    let report = Runner::new()
        .run_batch(vec![
            Job::property(&file, "items", ArrayPath::root(), Value::Int(2)),
            Job::property(&file, "items", ArrayPath::root(), Value::Int(3)),
        ])
        .await;

    assert_eq!(report.failed().count(), 2);
    assert!(report
        .jobs
        .iter()
        .all(|job| matches!(job.result, Err(RunError::Parse { .. }))));
    assert_eq!(read(&file), broken);
}

#[tokio::test]
async fn test_aliased_paths_share_one_parse() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let file = write_fixture(&dir, "Items.php", "<?php\nclass Items\n{\n    public $items = [1];\n}\n");
    let alias = dir.path().join("sub").join("..").join("Items.php");

    let report = Runner::new()
        .run_batch(vec![
            Job::property(&file, "items", ArrayPath::root(), Value::Int(2)),
            Job::property(&alias, "items", ArrayPath::root(), Value::Int(3)),
        ])
        .await;

    assert!(report.is_success());
    assert_eq!(report.modified_count(), 2);
    assert_eq!(report.files_written, vec![file.clone()]);
    assert_eq!(report.jobs[1].file, alias);
    assert_eq!(read(&file), "<?php\nclass Items\n{\n    public $items = [1, 2, 3];\n}\n");
}
