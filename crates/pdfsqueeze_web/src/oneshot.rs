use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use engine_logging::engine_info;
use pdfsqueeze_core::compressed_file_name;
use pdfsqueeze_engine::{CompressionRequest, Compressor, DocumentSource};
use tempfile::NamedTempFile;

use crate::cli::CompressArgs;
use crate::render::format_size;

/// Compresses one file from the command line and returns the written path.
pub fn compress_file(args: &CompressArgs) -> Result<PathBuf> {
    let target = match &args.output {
        Some(path) => path.clone(),
        None => default_output(&args.input)?,
    };
    if target == args.input {
        bail!("Output would overwrite the input file: {}", target.display());
    }

    let compressor = Compressor::new(args.tool.to_settings());
    let request = CompressionRequest::new(DocumentSource::Path(args.input.clone()), args.preset);
    let output = compressor
        .compress_blocking(request)
        .with_context(|| format!("Failed to compress {}", args.input.display()))?;

    write_atomically(&target, &output.bytes)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    engine_info!(
        "Wrote {} ({} -> {}, preset {})",
        target.display(),
        format_size(output.input_len),
        format_size(output.bytes.len() as u64),
        output.preset
    );
    Ok(target)
}

fn default_output(input: &Path) -> Result<PathBuf> {
    let Some(name) = input.file_name() else {
        bail!("Input path has no file name: {}", input.display());
    };
    let name = compressed_file_name(&name.to_string_lossy());
    Ok(input.with_file_name(name))
}

/// Writes via a temp file in the target directory, then renames over the target.
fn write_atomically(target: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
