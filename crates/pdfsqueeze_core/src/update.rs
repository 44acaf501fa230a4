use crate::{
    CompressionFailure, Effect, FailureKind, Msg, Preset, SessionState, UploadedDocument,
};

/// Pure update function: applies a message to session state and returns any effects.
pub fn update(mut state: SessionState, msg: Msg) -> (SessionState, Vec<Effect>) {
    let effects = match msg {
        Msg::DocumentSelected(doc) => {
            state.select_document(doc);
            Vec::new()
        }
        Msg::UploadRejected { reason } => {
            state.clear_document();
            state.reject(CompressionFailure::new(FailureKind::InvalidInput, reason));
            Vec::new()
        }
        Msg::DocumentCleared => {
            state.clear_document();
            Vec::new()
        }
        Msg::CompressRequested { preset } => {
            if state.in_flight().is_some() {
                return (state, Vec::new());
            }
            match validate_request(state.document(), &preset) {
                Ok((document, preset)) => {
                    let request_id = state.begin_request(preset);
                    vec![Effect::Compress {
                        request_id,
                        document,
                        preset,
                    }]
                }
                Err(failure) => {
                    state.reject(failure);
                    Vec::new()
                }
            }
        }
        Msg::CompressionFinished {
            request_id,
            outcome,
        } => {
            state.finish_request(request_id, outcome);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn validate_request(
    document: Option<&UploadedDocument>,
    raw_preset: &str,
) -> Result<(UploadedDocument, Preset), CompressionFailure> {
    let document = match document {
        Some(doc) if !doc.is_empty() => doc.clone(),
        Some(_) => {
            return Err(CompressionFailure::new(
                FailureKind::InvalidInput,
                "The uploaded file is empty.",
            ))
        }
        None => {
            return Err(CompressionFailure::new(
                FailureKind::InvalidInput,
                "Upload a PDF file first.",
            ))
        }
    };
    let preset = raw_preset
        .parse::<Preset>()
        .map_err(|err| CompressionFailure::new(FailureKind::InvalidInput, err.to_string()))?;
    Ok((document, preset))
}
