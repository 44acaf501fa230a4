#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file in the upload control.
    DocumentSelected(crate::UploadedDocument),
    /// Upload arrived but is not usable (no file, not a PDF).
    UploadRejected { reason: String },
    /// User discarded the current upload.
    DocumentCleared,
    /// User clicked Compress with the preset token from the selector.
    CompressRequested { preset: String },
    /// Effect runner finished an invocation.
    CompressionFinished {
        request_id: crate::RequestId,
        outcome: crate::CompressionOutcome,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
