use bytes::Bytes;
use pdfsqueeze_core::{
    update, CompressedDocument, CompressionOutcome, Effect, Msg, SessionState, StatusView,
    UploadedDocument,
};

fn doc(name: &str, content: &'static [u8]) -> UploadedDocument {
    UploadedDocument::new(name, Bytes::from_static(content))
}

fn success(content: &'static [u8]) -> CompressionOutcome {
    CompressionOutcome::Success(CompressedDocument {
        bytes: Bytes::from_static(content),
        file_name: "compressed_a.pdf".to_string(),
        original_len: 100,
    })
}

fn compress(state: SessionState, preset: &str) -> (SessionState, Vec<Effect>) {
    update(
        state,
        Msg::CompressRequested {
            preset: preset.to_string(),
        },
    )
}

#[test]
fn second_request_while_in_flight_is_ignored() {
    let (state, _) = update(SessionState::new(), Msg::DocumentSelected(doc("a.pdf", b"%PDF")));
    let (state, first) = compress(state, "ebook");
    let (state, second) = compress(state, "screen");

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(state.in_flight(), Some(1));
}

#[test]
fn completion_for_abandoned_document_is_dropped() {
    let (state, _) = update(SessionState::new(), Msg::DocumentSelected(doc("a.pdf", b"%PDF-a")));
    let (state, _) = compress(state, "ebook");

    // A new upload arrives while the first request is still running.
    let (state, _) = update(state, Msg::DocumentSelected(doc("b.pdf", b"%PDF-b")));
    assert_eq!(state.in_flight(), None);

    let (state, _) = update(
        state,
        Msg::CompressionFinished {
            request_id: 1,
            outcome: success(b"%PDF-a-small"),
        },
    );

    assert!(state.current_result().is_none());
    assert_eq!(state.view().status, StatusView::Ready);
    assert_eq!(state.document().map(|d| d.file_name()), Some("b.pdf"));
}

#[test]
fn completion_with_unknown_request_id_is_dropped() {
    let (state, _) = update(SessionState::new(), Msg::DocumentSelected(doc("a.pdf", b"%PDF")));
    let (state, _) = compress(state, "ebook");
    let (state, _) = update(
        state,
        Msg::CompressionFinished {
            request_id: 42,
            outcome: success(b"%PDF-x"),
        },
    );

    assert_eq!(state.in_flight(), Some(1));
    assert!(state.current_result().is_none());
}

#[test]
fn request_ids_increase_across_attempts() {
    let (state, _) = update(SessionState::new(), Msg::DocumentSelected(doc("a.pdf", b"%PDF")));
    let (state, effects) = compress(state, "ebook");
    let Effect::Compress { request_id, .. } = &effects[0];
    assert_eq!(*request_id, 1);

    let (state, _) = update(
        state,
        Msg::CompressionFinished {
            request_id: 1,
            outcome: success(b"%PDF-1"),
        },
    );
    let (_state, effects) = compress(state, "prepress");
    let Effect::Compress { request_id, .. } = &effects[0];
    assert_eq!(*request_id, 2);
}
