use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use engine_logging::{engine_trace, engine_warn};
use tempfile::{Builder, NamedTempFile, TempPath};

use crate::{CompressError, DocumentSource, Stage};

const INPUT_PREFIX: &str = "pdfsqueeze-in-";
const OUTPUT_PREFIX: &str = "pdfsqueeze-out-";
const SUFFIX: &str = ".pdf";

/// Directory holding the per-invocation files. Names carry a random suffix,
/// so concurrent invocations sharing the directory never collide.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Ensures `root` exists and is writable; creates it if missing.
    pub fn open(root: &Path) -> Result<Self, CompressError> {
        let root = std::path::absolute(root).map_err(|e| CompressError::io(Stage::Preparing, e))?;
        if root.exists() {
            let meta = fs::metadata(&root).map_err(|e| CompressError::io(Stage::Preparing, e))?;
            if !meta.is_dir() {
                return Err(CompressError::io(
                    Stage::Preparing,
                    std::io::Error::other(format!("{} is not a directory", root.display())),
                ));
            }
        } else {
            fs::create_dir_all(&root).map_err(|e| CompressError::io(Stage::Preparing, e))?;
        }
        // Basic writability probe: the temp file is removed on drop.
        NamedTempFile::new_in(&root).map_err(|e| CompressError::io(Stage::Preparing, e))?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes or validates the input and reserves an output path.
    pub fn stage(&self, source: &DocumentSource) -> Result<StagedFiles, CompressError> {
        let (input, input_len) = match source {
            DocumentSource::Bytes(bytes) => {
                if bytes.is_empty() {
                    return Err(CompressError::InvalidInput("the document is empty".into()));
                }
                let path = self.write_input(bytes)?;
                (StagedInput::Generated(path), bytes.len() as u64)
            }
            DocumentSource::Path(path) => {
                let path = std::path::absolute(path)
                    .map_err(|e| CompressError::io(Stage::Staging, e))?;
                let meta = fs::metadata(&path).map_err(|e| {
                    CompressError::InvalidInput(format!("cannot read {}: {e}", path.display()))
                })?;
                if !meta.is_file() {
                    return Err(CompressError::InvalidInput(format!(
                        "{} is not a regular file",
                        path.display()
                    )));
                }
                if meta.len() == 0 {
                    return Err(CompressError::InvalidInput(format!(
                        "{} is empty",
                        path.display()
                    )));
                }
                (StagedInput::Existing(path), meta.len())
            }
        };

        // The input guard is dropped (and its file removed) if this fails.
        let output = Builder::new()
            .prefix(OUTPUT_PREFIX)
            .suffix(SUFFIX)
            .tempfile_in(&self.root)
            .map_err(|e| CompressError::io(Stage::Staging, e))?
            .into_temp_path();

        engine_trace!(
            "staged input={:?} output={:?}",
            input.path(),
            &*output
        );
        Ok(StagedFiles {
            input,
            output,
            input_len,
        })
    }

    fn write_input(&self, bytes: &[u8]) -> Result<TempPath, CompressError> {
        let mut tmp = Builder::new()
            .prefix(INPUT_PREFIX)
            .suffix(SUFFIX)
            .tempfile_in(&self.root)
            .map_err(|e| CompressError::io(Stage::Staging, e))?;
        tmp.write_all(bytes)
            .and_then(|()| tmp.flush())
            .and_then(|()| tmp.as_file_mut().sync_all())
            .map_err(|e| CompressError::io(Stage::Staging, e))?;
        Ok(tmp.into_temp_path())
    }
}

#[derive(Debug)]
enum StagedInput {
    Generated(TempPath),
    Existing(PathBuf),
}

impl StagedInput {
    fn path(&self) -> &Path {
        match self {
            StagedInput::Generated(path) => &**path,
            StagedInput::Existing(path) => path.as_path(),
        }
    }
}

/// Files owned by one invocation. Generated files are deleted by
/// [`StagedFiles::close`], or on drop if the invocation is abandoned.
#[derive(Debug)]
pub struct StagedFiles {
    input: StagedInput,
    output: TempPath,
    input_len: u64,
}

impl StagedFiles {
    pub fn input_path(&self) -> &Path {
        self.input.path()
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn input_len(&self) -> u64 {
        self.input_len
    }

    /// Deletes the generated files. Failures are logged; the caller's
    /// result is never replaced by a cleanup error.
    pub fn close(self) {
        let StagedFiles { input, output, .. } = self;
        if let StagedInput::Generated(path) = input {
            remove(path);
        }
        remove(output);
    }
}

fn remove(path: TempPath) {
    let display = path.to_path_buf();
    match path.close() {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => engine_warn!("Failed to remove scratch file {:?}: {}", display, err),
    }
}
