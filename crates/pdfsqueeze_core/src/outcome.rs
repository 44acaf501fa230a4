use std::fmt;

use bytes::Bytes;

/// Classification of a failed compression attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Missing document, empty document or preset outside the fixed set.
    InvalidInput,
    /// The tool ran and reported failure.
    ToolExecution,
    /// The tool binary could not be located or executed.
    ToolUnavailable,
    /// Staging or collecting files failed.
    Io,
    /// The tool did not finish within the configured limit.
    Timeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidInput => write!(f, "invalid input"),
            FailureKind::ToolExecution => write!(f, "compression failed"),
            FailureKind::ToolUnavailable => write!(f, "tool not available"),
            FailureKind::Io => write!(f, "file error"),
            FailureKind::Timeout => write!(f, "timed out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedDocument {
    pub bytes: Bytes,
    /// Suggested download name, already sanitized.
    pub file_name: String,
    pub original_len: u64,
}

impl CompressedDocument {
    /// Percentage saved relative to the upload; negative when the output grew.
    pub fn savings_percent(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        let saved = self.original_len as f64 - self.bytes.len() as f64;
        saved * 100.0 / self.original_len as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl CompressionFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionOutcome {
    Success(CompressedDocument),
    Failure(CompressionFailure),
}

impl CompressionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CompressionOutcome::Success(_))
    }
}
