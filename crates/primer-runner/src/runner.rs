use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use primer_config::{InterpreterConfig, PrimerConfig};
use primer_core::ExampleUnit;
use serde::{Serialize, Serializer};
use tokio::process::Command;

use crate::cancel::Cancellation;
use crate::error::RunError;
use crate::process::{self, Wait};
use crate::sandbox::Sandbox;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitStatus {
    Success,
    /// Non-zero exit code, or killed by `signal` on unix.
    Failure {
        code: Option<i32>,
        signal: Option<i32>,
    },
    TimedOut,
    Cancelled,
}

impl ExitStatus {
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    fn from_std(status: std::process::ExitStatus) -> Self {
        if status.success() {
            return Self::Success;
        }
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;
        Self::Failure {
            code: status.code(),
            signal,
        }
    }
}

/// Captured result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: ExitStatus,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Executes units in private sandboxes.
///
/// A `Runner` holds no per-run state and can be shared across tasks.
#[derive(Debug, Clone)]
pub struct Runner {
    interpreters: BTreeMap<String, InterpreterConfig>,
    passthrough_env: Vec<String>,
    fixtures_dir: Option<PathBuf>,
}

impl Runner {
    #[must_use]
    pub const fn new(
        interpreters: BTreeMap<String, InterpreterConfig>,
        passthrough_env: Vec<String>,
    ) -> Self {
        Self {
            interpreters,
            passthrough_env,
            fixtures_dir: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &PrimerConfig) -> Self {
        Self::new(
            config.interpreters.clone(),
            config.runner.passthrough_env.clone(),
        )
    }

    /// Directory fixtures are staged from.
    #[must_use]
    pub fn with_fixtures_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.fixtures_dir = dir;
        self
    }

    /// Run `unit` with no external cancellation.
    pub async fn run(
        &self,
        unit: &ExampleUnit,
        timeout: Duration,
    ) -> Result<ExecutionResult, RunError> {
        self.run_with_cancel(unit, timeout, &Cancellation::new())
            .await
    }

    /// Run `unit`, killing it when `timeout` elapses or `cancel` fires.
    ///
    /// Timeouts and cancellation are reported through
    /// [`ExecutionResult::exit_status`]; `Err` means the child never ran to a
    /// verdict (missing fixture, no interpreter, spawn failure).
    pub async fn run_with_cancel(
        &self,
        unit: &ExampleUnit,
        timeout: Duration,
        cancel: &Cancellation,
    ) -> Result<ExecutionResult, RunError> {
        let name = unit.name();
        if cancel.is_cancelled() {
            return Err(RunError::Cancelled {
                unit: name.to_string(),
            });
        }

        let interpreter =
            self.interpreters
                .get(unit.language())
                .ok_or_else(|| RunError::NoInterpreter {
                    unit: name.to_string(),
                    language: unit.language().to_string(),
                })?;

        let sandbox_error = |source| RunError::Sandbox {
            unit: name.to_string(),
            source,
        };
        let sandbox = Sandbox::create().map_err(sandbox_error)?;
        sandbox
            .stage_fixtures(unit, self.fixtures_dir.as_deref())
            .map_err(sandbox_error)?;
        if let Some(missing) = sandbox.missing_fixture(unit) {
            return Err(RunError::MissingFixture {
                unit: name.to_string(),
                path: missing.clone(),
            });
        }
        let script = sandbox.write_script(unit).map_err(sandbox_error)?;

        let mut command = self.command(interpreter, &script, &sandbox);
        command.stdin(if unit.stdin().is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let started = Instant::now();
        let child = command.spawn().map_err(|source| RunError::Spawn {
            unit: name.to_string(),
            program: interpreter.program.clone(),
            source,
        })?;
        tracing::debug!(unit = name, pid = child.id(), "spawned unit");

        let captured = process::supervise(child, unit.stdin(), timeout, cancel)
            .await
            .map_err(|source| RunError::Io {
                unit: name.to_string(),
                source,
            })?;
        let duration = started.elapsed();

        let exit_status = match captured.wait {
            Wait::Exited(status) => ExitStatus::from_std(status),
            Wait::TimedOut => {
                tracing::warn!(unit = name, ?timeout, "unit timed out and was killed");
                ExitStatus::TimedOut
            }
            Wait::Cancelled => {
                tracing::info!(unit = name, "unit cancelled");
                ExitStatus::Cancelled
            }
        };

        if let Err(error) = sandbox.close() {
            tracing::warn!(unit = name, %error, "failed to remove sandbox");
        }

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&captured.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&captured.stderr).into_owned(),
            exit_status,
            duration,
        })
    }

    fn command(
        &self,
        interpreter: &InterpreterConfig,
        script: &std::path::Path,
        sandbox: &Sandbox,
    ) -> Command {
        let mut command = Command::new(&interpreter.program);
        command
            .args(&interpreter.args)
            .arg(script)
            .current_dir(sandbox.work_dir())
            .env_clear();

        for key in &self.passthrough_env {
            if let Some(value) = std::env::var_os(key) {
                command.env(key, value);
            }
        }

        command
            .env("HOME", sandbox.work_dir())
            .env("TMPDIR", sandbox.tmp_dir())
            .env("TMP", sandbox.tmp_dir())
            .env("TEMP", sandbox.tmp_dir())
            .envs(&interpreter.env)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        command.process_group(0);

        command
    }
}
