use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use engine_logging::engine_debug;
use tokio::process::Command;

use crate::{CompressError, Stage};

/// Captured streams of a tool run that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes the external tool. Implementations report a non-zero exit as
/// `ToolExecution` and a missing binary as `ToolUnavailable`.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolOutput, CompressError>;
}

/// Runs the tool as a child process with stdin closed and both output
/// streams captured.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolOutput, CompressError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future (timeout, cancelled request) kills the child.
            .kill_on_drop(true);

        let child = command
            .spawn()
            .map_err(|err| spawn_error(program, err))?;
        engine_debug!("spawned {:?} pid={:?}", program, child.id());

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(waited) => waited,
                Err(_elapsed) => return Err(CompressError::Timeout { after: limit }),
            },
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|err| CompressError::io(Stage::Invoking, err))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if output.status.success() {
            Ok(ToolOutput { stdout, stderr })
        } else {
            // Ghostscript writes some errors to stdout even with -dQUIET.
            let diagnostic = if stderr.trim().is_empty() { stdout } else { stderr };
            Err(CompressError::ToolExecution {
                program: program.display().to_string(),
                code: output.status.code(),
                diagnostic,
            })
        }
    }
}

fn spawn_error(program: &Path, err: io::Error) -> CompressError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            CompressError::ToolUnavailable {
                program: program.display().to_string(),
                reason: err.to_string(),
            }
        }
        _ => CompressError::io(Stage::Invoking, err),
    }
}
