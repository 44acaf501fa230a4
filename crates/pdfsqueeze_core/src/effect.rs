#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the compression tool; answer with `Msg::CompressionFinished`
    /// carrying the same `request_id`.
    Compress {
        request_id: crate::RequestId,
        document: crate::UploadedDocument,
        preset: crate::Preset,
    },
}
