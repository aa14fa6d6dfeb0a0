//! End-to-end runs of small `sh` units.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use primer_config::{InterpreterConfig, default_interpreters};
use primer_core::{Category, ExampleUnit};
use primer_runner::{Cancellation, ExitStatus, RunError, Runner, Schedule, run_pool};
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(10);

fn runner() -> Runner {
    Runner::new(default_interpreters(), vec!["PATH".to_string()])
}

fn sh(name: &str, source: &str) -> ExampleUnit {
    ExampleUnit::new(name, Category::Io, "sh", source).expect("valid unit")
}

#[tokio::test]
async fn captures_stdout_of_successful_unit() {
    let result = runner()
        .run(&sh("hello", "echo 'Hello, Alice!'\n"), TIMEOUT)
        .await
        .expect("unit should run");

    assert_eq!(result.exit_status, ExitStatus::Success);
    assert_eq!(result.stdout, "Hello, Alice!\n");
    assert_eq!(result.stderr, "");
}

#[tokio::test]
async fn nonzero_exit_keeps_stderr() {
    let result = runner()
        .run(&sh("boom", "echo partial\necho boom >&2\nexit 3\n"), TIMEOUT)
        .await
        .expect("unit should run");

    assert_eq!(
        result.exit_status,
        ExitStatus::Failure {
            code: Some(3),
            signal: None
        }
    );
    assert_eq!(result.stdout, "partial\n");
    assert_eq!(result.stderr, "boom\n");
}

#[tokio::test]
async fn timeout_kills_the_whole_process_group() {
    // The background sleep inherits stdout; only a group kill closes the pipe.
    let unit = sh("sleepy", "sleep 30 &\necho started\nwait\n");
    let started = Instant::now();
    let result = runner()
        .run(&unit, Duration::from_millis(300))
        .await
        .expect("unit should run");

    assert_eq!(result.exit_status, ExitStatus::TimedOut);
    assert_eq!(result.stdout, "started\n");
    assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
}

#[tokio::test]
async fn missing_fixture_is_reported_before_spawning() {
    let unit = sh("reader", "cat sample.json\n")
        .with_fixture("sample.json")
        .expect("relative fixture");
    let fixtures = TempDir::new().expect("tempdir should create");

    let err = runner()
        .with_fixtures_dir(Some(fixtures.path().to_path_buf()))
        .run(&unit, TIMEOUT)
        .await
        .expect_err("fixture is absent");

    match err {
        RunError::MissingFixture { unit, path } => {
            assert_eq!(unit, "reader");
            assert_eq!(path, PathBuf::from("sample.json"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn fixtures_are_staged_into_the_working_directory() {
    let fixtures = TempDir::new().expect("tempdir should create");
    std::fs::write(fixtures.path().join("data.csv"), "a,b\n1,2\n").expect("fixture writes");
    let unit = sh("csv", "wc -l < data.csv | tr -d ' '\n")
        .with_fixture("data.csv")
        .expect("relative fixture");

    let result = runner()
        .with_fixtures_dir(Some(fixtures.path().to_path_buf()))
        .run(&unit, TIMEOUT)
        .await
        .expect("unit should run");

    assert_eq!(result.stdout, "2\n");
    assert!(
        fixtures.path().join("data.csv").exists(),
        "source fixture must stay put"
    );
}

#[tokio::test]
async fn sandbox_is_home_and_is_removed_afterwards() {
    let result = runner()
        .run(&sh("where", "pwd\necho \"$HOME\"\ntouch output.txt\n"), TIMEOUT)
        .await
        .expect("unit should run");

    let lines: Vec<&str> = result.stdout.lines().collect();
    assert_eq!(lines.len(), 2, "{}", result.stdout);
    assert_eq!(lines[0], lines[1]);
    assert!(!std::path::Path::new(lines[0]).exists(), "sandbox should be gone");
}

#[tokio::test]
async fn stdin_is_fed_to_the_unit() {
    let unit = sh("greet", "read name\necho \"Hi, $name\"\n").with_stdin("Ada\n");
    let result = runner().run(&unit, TIMEOUT).await.expect("unit should run");
    assert_eq!(result.stdout, "Hi, Ada\n");
}

#[tokio::test]
async fn environment_is_rebuilt_from_scratch() {
    let mut interpreters = default_interpreters();
    let mut shell = InterpreterConfig::program("sh");
    shell.env = BTreeMap::from([("GREETING".to_string(), "hello".to_string())]);
    interpreters.insert("sh".to_string(), shell);
    let runner = Runner::new(interpreters, vec!["PATH".to_string()]);

    let unit = sh("env", "echo \"$GREETING\"\necho \"${CARGO_PKG_NAME:-unset}\"\n");
    let result = runner.run(&unit, TIMEOUT).await.expect("unit should run");
    assert_eq!(result.stdout, "hello\nunset\n");
}

#[tokio::test]
async fn unknown_language_has_no_interpreter() {
    let unit = ExampleUnit::new("ruby", Category::Oop, "rb", "puts 1\n").expect("valid unit");
    let err = runner().run(&unit, TIMEOUT).await.expect_err("no rb interpreter");
    assert!(matches!(err, RunError::NoInterpreter { ref language, .. } if language == "rb"));
    assert_eq!(err.kind(), "no_interpreter");
}

#[tokio::test]
async fn cancelling_kills_an_in_flight_unit() {
    let cancel = Cancellation::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = runner()
        .run_with_cancel(&sh("long", "sleep 30\n"), TIMEOUT, &cancel)
        .await
        .expect("unit should run");

    assert_eq!(result.exit_status, ExitStatus::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn reruns_are_identical() {
    let runner = runner();
    let unit = sh("stable", "printf 'one\\ntwo\\n'\necho x > output.txt\ncat output.txt\n");
    let first = runner.run(&unit, TIMEOUT).await.expect("first run");
    let second = runner.run(&unit, TIMEOUT).await.expect("second run");
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(first.exit_status, second.exit_status);
}

#[tokio::test]
async fn pool_runs_isolate_shared_file_names() {
    let units: Vec<Arc<ExampleUnit>> = (0..8)
        .map(|n| {
            Arc::new(sh(
                &format!("writer-{n}"),
                &format!("echo {n} > output.txt\nsleep 0.1\ncat output.txt\n"),
            ))
        })
        .collect();

    let mut completed = 0;
    let runs = run_pool(
        Arc::new(runner()),
        units,
        Schedule {
            concurrency: 4,
            timeout: TIMEOUT,
        },
        &Cancellation::new(),
        |_| completed += 1,
    )
    .await;

    assert_eq!(completed, 8);
    let mut outputs: Vec<(String, String)> = runs
        .into_iter()
        .map(|run| {
            let stdout = run.result.expect("unit should run").stdout;
            (run.unit.name().to_string(), stdout)
        })
        .collect();
    outputs.sort();
    let expected: Vec<(String, String)> = (0..8)
        .map(|n| (format!("writer-{n}"), format!("{n}\n")))
        .collect();
    assert_eq!(outputs, expected);
}

#[tokio::test]
async fn pool_cancelled_before_start_runs_nothing() {
    let cancel = Cancellation::new();
    cancel.cancel();
    let units = vec![
        Arc::new(sh("a", "echo a\n")),
        Arc::new(sh("b", "echo b\n")),
    ];

    let runs = run_pool(
        Arc::new(runner()),
        units,
        Schedule {
            concurrency: 1,
            timeout: TIMEOUT,
        },
        &cancel,
        |_| {},
    )
    .await;

    assert_eq!(runs.len(), 2);
    for run in runs {
        assert!(matches!(run.result, Err(RunError::Cancelled { .. })));
    }
}

#[tokio::test]
async fn pool_accepts_an_unbounded_concurrency_request() {
    let units = vec![
        Arc::new(sh("first", "echo first\n")),
        Arc::new(sh("second", "echo second\n")),
    ];

    let runs = run_pool(
        Arc::new(runner()),
        units,
        Schedule {
            concurrency: usize::MAX,
            timeout: TIMEOUT,
        },
        &Cancellation::new(),
        |_| {},
    )
    .await;

    assert_eq!(runs.len(), 2);
    for run in runs {
        let result = run.result.expect("unit should run");
        assert_eq!(result.exit_status, ExitStatus::Success);
    }
}

#[tokio::test]
async fn result_serializes_duration_in_millis() {
    let result = runner()
        .run(&sh("json", "echo hi\n"), TIMEOUT)
        .await
        .expect("unit should run");
    let value = serde_json::to_value(&result).expect("serializes");
    assert_eq!(value["exit_status"]["kind"], "success");
    assert!(value["duration_ms"].is_u64());
    assert_eq!(value["stdout"], "hi\n");
}
