use std::path::PathBuf;

use bytes::Bytes;
use pdfsqueeze_core::Preset;

use crate::CompressError;

/// Where the document to compress comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// In-memory upload; staged to a generated file before invocation.
    Bytes(Bytes),
    /// Existing file on disk; passed to the tool as an absolute path.
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    pub source: DocumentSource,
    pub preset: Preset,
}

impl CompressionRequest {
    pub fn new(source: DocumentSource, preset: Preset) -> Self {
        Self { source, preset }
    }

    /// Builds a request from a raw preset token, rejecting anything outside
    /// the fixed preset set.
    pub fn parse(source: DocumentSource, preset: &str) -> Result<Self, CompressError> {
        let preset = preset
            .parse::<Preset>()
            .map_err(|err| CompressError::InvalidInput(err.to_string()))?;
        Ok(Self::new(source, preset))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedOutput {
    pub bytes: Bytes,
    pub input_len: u64,
    pub preset: Preset,
}
