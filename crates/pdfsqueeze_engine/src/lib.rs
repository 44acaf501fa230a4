//! pdfsqueeze engine: scratch staging and external tool invocation.
mod command;
mod compressor;
mod error;
mod runner;
mod scratch;
mod settings;
mod types;

pub use command::{ghostscript_args, COMPATIBILITY_LEVEL};
pub use compressor::Compressor;
pub use error::{CompressError, Stage};
pub use runner::{ProcessRunner, ToolOutput, ToolRunner};
pub use scratch::{ScratchDir, StagedFiles};
pub use settings::{default_program, ToolSettings};
pub use types::{CompressedOutput, CompressionRequest, DocumentSource};
