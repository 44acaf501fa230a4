use std::path::PathBuf;
use std::time::Duration;

/// Knobs for running the compression tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    /// Executable to run; looked up on `PATH` when not absolute.
    pub program: PathBuf,
    /// Directory for per-invocation input and output files.
    pub scratch_dir: PathBuf,
    /// Kill the tool after this long; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Cap on simultaneous tool processes; `0` means unlimited.
    pub max_concurrent: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from(default_program()),
            scratch_dir: std::env::temp_dir(),
            timeout: Some(Duration::from_secs(120)),
            max_concurrent: 4,
        }
    }
}

/// Ghostscript's console executable name on this platform.
pub fn default_program() -> &'static str {
    if cfg!(windows) {
        "gswin64c"
    } else {
        "gs"
    }
}
