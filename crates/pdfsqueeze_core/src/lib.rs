//! pdfsqueeze core: pure per-session state machine and view-model helpers.
mod document;
mod effect;
mod filename;
mod msg;
mod outcome;
mod preset;
mod state;
mod update;
mod view_model;

pub use document::{DocumentId, UploadedDocument};
pub use effect::Effect;
pub use filename::compressed_file_name;
pub use msg::Msg;
pub use outcome::{CompressedDocument, CompressionFailure, CompressionOutcome, FailureKind};
pub use preset::{Preset, UnknownPreset};
pub use state::{Phase, RequestId, SessionState};
pub use update::update;
pub use view_model::{DownloadView, PresetOption, SessionViewModel, StatusView};
