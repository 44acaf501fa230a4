use std::ffi::OsString;
use std::sync::Arc;

use bytes::Bytes;
use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::sync::{OnceCell, Semaphore, SemaphorePermit};

use crate::command::ghostscript_args;
use crate::runner::{ProcessRunner, ToolRunner};
use crate::scratch::{ScratchDir, StagedFiles};
use crate::{CompressError, CompressedOutput, CompressionRequest, Stage, ToolSettings};

/// Compression invoker: stages the document, runs the tool, collects the
/// output and removes every scratch file it created.
#[derive(Clone)]
pub struct Compressor {
    settings: ToolSettings,
    runner: Arc<dyn ToolRunner>,
    permits: Option<Arc<Semaphore>>,
    version: Arc<OnceCell<String>>,
}

impl Compressor {
    pub fn new(settings: ToolSettings) -> Self {
        let runner = Arc::new(ProcessRunner::new(settings.timeout));
        Self::with_runner(settings, runner)
    }

    pub fn with_runner(settings: ToolSettings, runner: Arc<dyn ToolRunner>) -> Self {
        let permits = match settings.max_concurrent {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };
        Self {
            settings,
            runner,
            permits,
            version: Arc::new(OnceCell::new()),
        }
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub async fn compress(
        &self,
        request: CompressionRequest,
    ) -> Result<CompressedOutput, CompressError> {
        let _permit = self.permit().await;

        let staged = self.stage(&request).await?;
        let args = ghostscript_args(request.preset, staged.input_path(), staged.output_path());
        engine_info!(
            "Compressing {} bytes with preset {}",
            staged.input_len(),
            request.preset
        );

        let collected = self.invoke_and_collect(&args, &staged).await;
        let input_len = staged.input_len();
        staged.close();

        let bytes = collected?;
        engine_info!(
            "Compressed {} -> {} bytes (preset {})",
            input_len,
            bytes.len(),
            request.preset
        );
        Ok(CompressedOutput {
            bytes,
            input_len,
            preset: request.preset,
        })
    }

    /// Runs [`Compressor::compress`] to completion on a private runtime.
    /// Must not be called from within an async context.
    pub fn compress_blocking(
        &self,
        request: CompressionRequest,
    ) -> Result<CompressedOutput, CompressError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| CompressError::io(Stage::Preparing, err))?;
        runtime.block_on(self.compress(request))
    }

    /// Asks the tool for its version; used to detect a missing installation early.
    ///
    /// A successful answer is remembered by the compressor and its clones;
    /// failures are not.
    pub async fn probe(&self) -> Result<String, CompressError> {
        let version = self
            .version
            .get_or_try_init(|| async {
                let _permit = self.permit().await;
                let output = self
                    .runner
                    .run(&self.settings.program, &[OsString::from("--version")])
                    .await?;
                Ok::<_, CompressError>(output.stdout.trim().to_string())
            })
            .await?;
        Ok(version.clone())
    }

    async fn permit(&self) -> Option<SemaphorePermit<'_>> {
        match &self.permits {
            // The semaphore is never closed, so acquiring only waits.
            Some(permits) => permits.acquire().await.ok(),
            None => None,
        }
    }

    /// Opens the scratch directory and writes the input on the blocking pool.
    async fn stage(&self, request: &CompressionRequest) -> Result<StagedFiles, CompressError> {
        let root = self.settings.scratch_dir.clone();
        let source = request.source.clone();
        tokio::task::spawn_blocking(move || ScratchDir::open(&root)?.stage(&source))
            .await
            .map_err(|err| CompressError::io(Stage::Staging, std::io::Error::other(err)))?
    }

    async fn invoke_and_collect(
        &self,
        args: &[OsString],
        staged: &StagedFiles,
    ) -> Result<Bytes, CompressError> {
        engine_debug!("{:?} {:?}", self.settings.program, args);
        if let Err(err) = self.runner.run(&self.settings.program, args).await {
            engine_warn!("Compression tool failed: {}", err);
            return Err(err);
        }

        let bytes = tokio::fs::read(staged.output_path())
            .await
            .map_err(|err| CompressError::io(Stage::Collecting, err))?;
        if bytes.is_empty() {
            return Err(CompressError::ToolExecution {
                program: self.settings.program.display().to_string(),
                code: Some(0),
                diagnostic: "the tool reported success but produced an empty file".to_string(),
            });
        }
        Ok(Bytes::from(bytes))
    }
}
