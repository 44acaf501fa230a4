use std::fmt::Write;

use pdfsqueeze_core::{FailureKind, SessionViewModel, StatusView};
use serde_json::{json, Value};

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:42rem;margin:2rem auto;\
padding:0 1rem;color:#222}h1{font-size:1.6rem}fieldset{border:1px solid #ddd;border-radius:6px;\
margin:1rem 0;padding:1rem}.ok{color:#1a7f37}.err{color:#b42318}pre{background:#f6f6f6;\
padding:.75rem;overflow-x:auto;white-space:pre-wrap}.muted{color:#666;font-size:.9rem}\
button{padding:.4rem 1rem}";

/// Renders the single page of the front-end from a session view.
pub fn render_page(view: &SessionViewModel) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if matches!(view.status, StatusView::InProgress { .. }) {
        // Poll until the in-flight request settles.
        html.push_str("<meta http-equiv=\"refresh\" content=\"2\">\n");
    }
    let _ = write!(html, "<title>PDF Compressor</title>\n<style>{STYLE}</style>\n</head>\n<body>\n");
    html.push_str("<h1>&#128196; PDF Compressor</h1>\n");
    html.push_str("<p>Upload a PDF, choose a compression level, and get your smaller file.</p>\n");

    render_upload(&mut html, view);
    if view.file_name.is_some() {
        render_compress(&mut html, view);
    }
    render_status(&mut html, view);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_upload(html: &mut String, view: &SessionViewModel) {
    html.push_str("<fieldset>\n<legend>Upload a PDF file</legend>\n");
    html.push_str(
        "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"file\" accept=\"application/pdf,.pdf\" required>\n\
         <button type=\"submit\">Upload</button>\n</form>\n",
    );
    if let (Some(name), Some(size)) = (&view.file_name, view.file_size) {
        let _ = write!(
            html,
            "<p class=\"muted\">Current file: <strong>{}</strong> ({})</p>\n\
             <form method=\"post\" action=\"/reset\"><button type=\"submit\">Remove</button></form>\n",
            escape_html(name),
            format_size(size)
        );
    }
    html.push_str("</fieldset>\n");
}

fn render_compress(html: &mut String, view: &SessionViewModel) {
    html.push_str("<fieldset>\n<legend>Select Compression Quality</legend>\n");
    html.push_str("<form method=\"post\" action=\"/compress\">\n<select name=\"preset\">\n");
    for option in &view.presets {
        let _ = writeln!(
            html,
            "<option value=\"{token}\"{selected}>{token}: {help}</option>",
            token = option.token,
            help = escape_html(option.help),
            selected = if option.selected { " selected" } else { "" }
        );
    }
    html.push_str("</select>\n");
    let disabled = if view.can_compress() { "" } else { " disabled" };
    let _ = write!(
        html,
        "<button type=\"submit\"{disabled}>Compress PDF</button>\n</form>\n\
         <p class=\"muted\">ebook is a good balance; screen gives the smallest size.</p>\n\
         </fieldset>\n"
    );
}

fn render_status(html: &mut String, view: &SessionViewModel) {
    match &view.status {
        StatusView::Empty | StatusView::Ready => {}
        StatusView::InProgress { preset } => {
            let _ = writeln!(
                html,
                "<p>&#9203; Compressing your PDF with the <strong>{preset}</strong> preset&hellip;</p>"
            );
        }
        StatusView::Succeeded => {
            html.push_str("<p class=\"ok\">&#9989; Compression successful!</p>\n");
            if let Some(download) = &view.download {
                let _ = write!(
                    html,
                    "<p><a href=\"/download\" download=\"{name}\">&#11015;&#65039; Download {name}</a></p>\n\
                     <p class=\"muted\">{before} &rarr; {after} ({savings:.1}% smaller)</p>\n",
                    name = escape_html(&download.file_name),
                    before = format_size(download.original_size),
                    after = format_size(download.size),
                    savings = download.savings_percent
                );
            }
        }
        StatusView::Failed { kind, message } => {
            let _ = writeln!(html, "<p class=\"err\">{}</p>", failure_headline(*kind));
            let _ = writeln!(html, "<pre>{}</pre>", escape_html(message));
        }
    }
}

fn failure_headline(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::InvalidInput => "This request cannot be compressed.",
        FailureKind::ToolExecution => "Ghostscript failed during compression.",
        FailureKind::ToolUnavailable => "The compression tool is not available on this server.",
        FailureKind::Io => "A server-side file operation failed.",
        FailureKind::Timeout => "Compression took too long and was stopped.",
    }
}

/// JSON form of the session view, for scripts polling `/status`.
pub fn status_json(view: &SessionViewModel) -> Value {
    let (status, failure) = match &view.status {
        StatusView::Empty => ("empty", Value::Null),
        StatusView::Ready => ("ready", Value::Null),
        StatusView::InProgress { .. } => ("in_progress", Value::Null),
        StatusView::Succeeded => ("succeeded", Value::Null),
        StatusView::Failed { kind, message } => (
            "failed",
            json!({ "kind": failure_kind_token(*kind), "message": message }),
        ),
    };
    json!({
        "status": status,
        "file_name": view.file_name,
        "file_size": view.file_size,
        "preset": view.selected_preset.token(),
        "failure": failure,
        "download": view.download.as_ref().map(|d| json!({
            "file_name": d.file_name,
            "size": d.size,
            "original_size": d.original_size,
            "savings_percent": d.savings_percent,
        })),
    })
}

fn failure_kind_token(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::InvalidInput => "invalid_input",
        FailureKind::ToolExecution => "tool_execution",
        FailureKind::ToolUnavailable => "tool_unavailable",
        FailureKind::Io => "io",
        FailureKind::Timeout => "timeout",
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < KIB * KIB {
        format!("{:.1} KB", value / KIB)
    } else {
        format!("{:.1} MB", value / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pdfsqueeze_core::{update, Msg, SessionState, UploadedDocument};

    fn view_after(msgs: Vec<Msg>) -> SessionViewModel {
        let mut state = SessionState::new();
        for msg in msgs {
            state = update(state, msg).0;
        }
        state.view()
    }

    #[test]
    fn empty_session_shows_only_upload_form() {
        let html = render_page(&view_after(Vec::new()));
        assert!(html.contains("action=\"/upload\""));
        assert!(!html.contains("action=\"/compress\""));
        assert!(!html.contains("/download"));
    }

    #[test]
    fn uploaded_file_name_is_escaped() {
        let doc = UploadedDocument::new("<b>x</b>.pdf", Bytes::from_static(b"%PDF-1.4"));
        let html = render_page(&view_after(vec![Msg::DocumentSelected(doc)]));
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;.pdf"));
        assert!(html.contains("<option value=\"ebook\" selected>"));
        assert!(html.contains("action=\"/compress\""));
    }

    #[test]
    fn in_progress_page_refreshes_and_disables_button() {
        let doc = UploadedDocument::new("a.pdf", Bytes::from_static(b"%PDF-1.4"));
        let view = view_after(vec![
            Msg::DocumentSelected(doc),
            Msg::CompressRequested {
                preset: "screen".to_string(),
            },
        ]);
        let html = render_page(&view);
        assert!(html.contains("http-equiv=\"refresh\""));
        assert!(html.contains("Compress PDF</button>"));
        assert!(html.contains(" disabled>"));
        assert_eq!(status_json(&view)["status"], "in_progress");
        assert_eq!(status_json(&view)["preset"], "screen");
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
