use std::fmt;
use std::io;
use std::time::Duration;

use pdfsqueeze_core::{CompressionFailure, FailureKind};
use thiserror::Error;

/// Step of an invocation an IO error happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preparing,
    Staging,
    Invoking,
    Collecting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Preparing => write!(f, "preparing the scratch directory"),
            Stage::Staging => write!(f, "staging the document"),
            Stage::Invoking => write!(f, "running the compression tool"),
            Stage::Collecting => write!(f, "collecting the result"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{program} failed ({}): {diagnostic}", exit_label(.code))]
    ToolExecution {
        program: String,
        code: Option<i32>,
        diagnostic: String,
    },
    #[error("compression tool {program:?} is not available: {reason}")]
    ToolUnavailable { program: String, reason: String },
    #[error("io error while {stage}: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: io::Error,
    },
    #[error("compression tool timed out after {}s", .after.as_secs())]
    Timeout { after: Duration },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl CompressError {
    pub(crate) fn io(stage: Stage, source: io::Error) -> Self {
        CompressError::Io { stage, source }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            CompressError::InvalidInput(_) => FailureKind::InvalidInput,
            CompressError::ToolExecution { .. } => FailureKind::ToolExecution,
            CompressError::ToolUnavailable { .. } => FailureKind::ToolUnavailable,
            CompressError::Io { .. } => FailureKind::Io,
            CompressError::Timeout { .. } => FailureKind::Timeout,
        }
    }

    /// Text shown to the user. Tool diagnostics are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            CompressError::InvalidInput(reason) => reason.clone(),
            CompressError::ToolExecution {
                diagnostic, code, ..
            } => {
                if diagnostic.trim().is_empty() {
                    format!("The compression tool failed with {}.", exit_label(code))
                } else {
                    diagnostic.clone()
                }
            }
            CompressError::ToolUnavailable { program, .. } => format!(
                "Could not run the '{program}' command. The compression tool is not installed \
                 correctly on the server."
            ),
            CompressError::Io { stage, source } => {
                format!("A file operation failed while {stage}: {source}")
            }
            CompressError::Timeout { after } => format!(
                "Compression did not finish within {} seconds.",
                after.as_secs()
            ),
        }
    }

    pub fn into_failure(self) -> CompressionFailure {
        CompressionFailure::new(self.kind(), self.user_message())
    }
}
