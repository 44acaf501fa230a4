use engine_logging::{engine_error, engine_info, engine_warn};
use pdfsqueeze_core::{
    compressed_file_name, CompressedDocument, CompressionFailure, CompressionOutcome, Effect,
    FailureKind, Msg, Preset, UploadedDocument,
};
use pdfsqueeze_engine::{CompressionRequest, Compressor, DocumentSource};

use crate::{SessionId, SessionStore};

/// Executes core effects against the engine and feeds the results back into
/// the owning session.
#[derive(Clone)]
pub struct EffectRunner {
    compressor: Compressor,
    sessions: SessionStore,
}

impl EffectRunner {
    pub fn new(compressor: Compressor, sessions: SessionStore) -> Self {
        Self {
            compressor,
            sessions,
        }
    }

    /// Starts `effects` and returns without waiting for them. Each
    /// compression runs on its own task; a supervising task reports its
    /// outcome to the session, or a failure if the worker panicked.
    pub fn run(&self, session: SessionId, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Compress {
                    request_id,
                    document,
                    preset,
                } => {
                    engine_info!(
                        "Compress session={} request={} doc={} size={} preset={}",
                        session,
                        request_id,
                        document.id().short(),
                        document.len(),
                        preset
                    );
                    let compressor = self.compressor.clone();
                    let sessions = self.sessions.clone();
                    tokio::spawn(async move {
                        let worker = tokio::spawn(async move {
                            compress_document(&compressor, &document, preset).await
                        });
                        let outcome = match worker.await {
                            Ok(outcome) => outcome,
                            Err(err) => {
                                engine_error!(
                                    "Compression task for session {} died: {}",
                                    session,
                                    err
                                );
                                CompressionOutcome::Failure(CompressionFailure::new(
                                    FailureKind::Io,
                                    "Compression stopped unexpectedly. Please try again.",
                                ))
                            }
                        };
                        sessions.dispatch(
                            session,
                            Msg::CompressionFinished {
                                request_id,
                                outcome,
                            },
                        );
                    });
                }
            }
        }
    }
}

async fn compress_document(
    compressor: &Compressor,
    document: &UploadedDocument,
    preset: Preset,
) -> CompressionOutcome {
    let request = CompressionRequest::new(DocumentSource::Bytes(document.bytes().clone()), preset);
    match compressor.compress(request).await {
        Ok(output) => CompressionOutcome::Success(CompressedDocument {
            bytes: output.bytes,
            file_name: compressed_file_name(document.file_name()),
            original_len: output.input_len,
        }),
        Err(err) => {
            engine_warn!("Compression of {} failed: {}", document.id().short(), err);
            CompressionOutcome::Failure(err.into_failure())
        }
    }
}
