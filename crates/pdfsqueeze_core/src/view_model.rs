use crate::{CompressionOutcome, FailureKind, Phase, Preset, SessionState};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionViewModel {
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub selected_preset: Preset,
    pub presets: Vec<PresetOption>,
    pub status: StatusView,
    pub download: Option<DownloadView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetOption {
    pub token: &'static str,
    pub help: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusView {
    /// Nothing uploaded yet.
    Empty,
    /// A document is uploaded and no attempt is live.
    Ready,
    InProgress { preset: Preset },
    Succeeded,
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadView {
    pub file_name: String,
    pub size: u64,
    pub original_size: u64,
    pub savings_percent: f64,
}

impl SessionViewModel {
    pub(crate) fn from_state(state: &SessionState) -> Self {
        let document = state.document();
        let selected_preset = state.selected_preset();
        let presets = Preset::ALL
            .into_iter()
            .map(|preset| PresetOption {
                token: preset.token(),
                help: preset.help(),
                selected: preset == selected_preset,
            })
            .collect();

        let status = match state.phase() {
            Phase::InProgress { preset, .. } => StatusView::InProgress { preset: *preset },
            Phase::Finished(CompressionOutcome::Success(_)) => StatusView::Succeeded,
            Phase::Finished(CompressionOutcome::Failure(failure)) => StatusView::Failed {
                kind: failure.kind,
                message: failure.message.clone(),
            },
            Phase::Idle if document.is_some() => StatusView::Ready,
            Phase::Idle => StatusView::Empty,
        };

        let download = state.current_result().map(|result| DownloadView {
            file_name: result.file_name.clone(),
            size: result.bytes.len() as u64,
            original_size: result.original_len,
            savings_percent: result.savings_percent(),
        });

        Self {
            file_name: document.map(|doc| doc.file_name().to_string()),
            file_size: document.map(|doc| doc.len() as u64),
            selected_preset,
            presets,
            status,
            download,
        }
    }

    pub fn can_compress(&self) -> bool {
        self.file_name.is_some() && !matches!(self.status, StatusView::InProgress { .. })
    }
}
