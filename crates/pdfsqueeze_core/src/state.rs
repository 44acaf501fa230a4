use crate::view_model::SessionViewModel;
use crate::{CompressedDocument, CompressionFailure, CompressionOutcome, Preset, UploadedDocument};

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    InProgress {
        request_id: RequestId,
        preset: Preset,
    },
    Finished(CompressionOutcome),
}

/// Everything one browser session remembers between requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    document: Option<UploadedDocument>,
    selected_preset: Preset,
    phase: Phase,
    last_request_id: RequestId,
    dirty: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SessionViewModel {
        SessionViewModel::from_state(self)
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    pub fn selected_preset(&self) -> Preset {
        self.selected_preset
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        match self.phase {
            Phase::InProgress { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    /// Successful result for the current document, if any.
    pub fn current_result(&self) -> Option<&CompressedDocument> {
        match &self.phase {
            Phase::Finished(CompressionOutcome::Success(doc)) if self.document.is_some() => {
                Some(doc)
            }
            _ => None,
        }
    }

    /// Returns whether anything renderable changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Tracks `doc`; a different identity drops the stored outcome and
    /// abandons any in-flight request.
    pub(crate) fn select_document(&mut self, doc: UploadedDocument) -> bool {
        let same = self
            .document
            .as_ref()
            .is_some_and(|current| current.id() == doc.id());
        if same {
            return false;
        }
        self.document = Some(doc);
        self.phase = Phase::Idle;
        self.dirty = true;
        true
    }

    pub(crate) fn clear_document(&mut self) {
        if self.document.is_some() || self.phase != Phase::Idle {
            self.document = None;
            self.phase = Phase::Idle;
            self.dirty = true;
        }
    }

    pub(crate) fn begin_request(&mut self, preset: Preset) -> RequestId {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.selected_preset = preset;
        self.phase = Phase::InProgress { request_id, preset };
        self.dirty = true;
        request_id
    }

    pub(crate) fn reject(&mut self, failure: CompressionFailure) {
        self.phase = Phase::Finished(CompressionOutcome::Failure(failure));
        self.dirty = true;
    }

    /// Stores `outcome` when it answers the in-flight request; stale
    /// completions are dropped.
    pub(crate) fn finish_request(
        &mut self,
        request_id: RequestId,
        outcome: CompressionOutcome,
    ) -> bool {
        if self.in_flight() != Some(request_id) {
            return false;
        }
        self.phase = Phase::Finished(outcome);
        self.dirty = true;
        true
    }
}
