use std::fs;
use std::io::ErrorKind;

use pxargs::output::ResultFileSink;
use pxargs::scheduler::{ExitOutcome, Job};
use pxargs::worker::{CommandTemplate, JobExecutor};
use tempfile::TempDir;

/// Executor writing into a fresh temporary output directory
fn test_executor(template: CommandTemplate) -> (TempDir, JobExecutor) {
    let dir = TempDir::new().unwrap();
    let sink = ResultFileSink::new(Some(dir.path().to_path_buf()));
    (dir, JobExecutor::new(template, sink))
}

async fn run_job(executor: &JobExecutor, job: &Job) -> ExitOutcome {
    let argv = executor.command_line(job);
    let mut child = executor.spawn(job, &argv).unwrap();
    ExitOutcome::from_status(child.wait().await.unwrap())
}

#[tokio::test]
async fn test_execute_simple_command() {
    let (dir, executor) = test_executor(CommandTemplate::new(["echo", "hello", "{}"]));
    let job = Job::new(0, "world");

    let outcome = run_job(&executor, &job).await;

    assert_eq!(outcome.code(), 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("world.out")).unwrap(),
        "hello world\n"
    );
    assert_eq!(fs::read_to_string(dir.path().join("world.err")).unwrap(), "");
}

#[tokio::test]
async fn test_execute_captures_stderr() {
    let (dir, executor) = test_executor(CommandTemplate::new([
        "sh",
        "-c",
        "echo 'error message for {}' >&2; exit 1",
    ]));
    let job = Job::new(0, "a");

    let outcome = run_job(&executor, &job).await;

    assert_eq!(outcome.code(), 1);
    assert!(!outcome.was_signaled());
    assert_eq!(
        fs::read_to_string(dir.path().join("a.err")).unwrap(),
        "error message for a\n"
    );
}

#[tokio::test]
async fn test_execute_truncates_previous_output() {
    let (dir, executor) = test_executor(CommandTemplate::new(["echo", "{}"]));
    fs::write(dir.path().join("x.out"), "stale output that is longer\n").unwrap();

    run_job(&executor, &Job::new(0, "x")).await;

    assert_eq!(fs::read_to_string(dir.path().join("x.out")).unwrap(), "x\n");
}

#[tokio::test]
async fn test_execute_large_output() {
    let (dir, executor) = test_executor(CommandTemplate::new(["seq", "1", "{}"]));

    let outcome = run_job(&executor, &Job::new(0, "1000")).await;

    assert_eq!(outcome.code(), 0);
    let output = fs::read_to_string(dir.path().join("1000.out")).unwrap();
    assert_eq!(output.lines().count(), 1000);
}

#[tokio::test]
async fn test_execute_without_output_dir() {
    let executor = JobExecutor::new(
        CommandTemplate::new(["echo", "{}"]),
        ResultFileSink::discard(),
    );

    let outcome = run_job(&executor, &Job::new(0, "dropped")).await;

    assert_eq!(outcome.code(), 0);
}

#[tokio::test]
async fn test_execute_is_not_a_shell() {
    let (dir, executor) = test_executor(CommandTemplate::new(["echo", "{}"]));

    // Shell metacharacters in the argument reach the program untouched.
    run_job(&executor, &Job::new(0, "$HOME;true")).await;

    assert_eq!(
        fs::read_to_string(dir.path().join("$HOME;true.out")).unwrap(),
        "$HOME;true\n"
    );
}

#[tokio::test]
async fn test_execute_invalid_command() {
    let (_dir, executor) = test_executor(CommandTemplate::new(["nonexistent_command_12345", "{}"]));
    let job = Job::new(0, "a");

    let err = executor
        .spawn(&job, &executor.command_line(&job))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_execute_empty_command() {
    let (_dir, executor) = test_executor(CommandTemplate::new(Vec::<String>::new()));
    let job = Job::new(0, "a");

    let err = executor.spawn(&job, &[]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
