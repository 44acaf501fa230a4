use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use engine_logging::{engine_info, engine_warn};
use pdfsqueeze_core::{Msg, SessionState, SessionViewModel, UploadedDocument};
use pdfsqueeze_engine::{Compressor, ToolSettings};
use serde::Deserialize;

use crate::render::{render_page, status_json};
use crate::upload::looks_like_pdf;
use crate::{EffectRunner, SessionId, SessionStore};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub max_upload_bytes: usize,
    pub session_ttl: Duration,
    pub tool: ToolSettings,
}

/// Shared handles for the route handlers.
#[derive(Clone)]
pub struct AppContext {
    sessions: SessionStore,
    effects: EffectRunner,
    compressor: Compressor,
}

impl AppContext {
    pub fn new(compressor: Compressor, session_ttl: Duration) -> Self {
        let sessions = SessionStore::new(session_ttl);
        let effects = EffectRunner::new(compressor.clone(), sessions.clone());
        Self {
            sessions,
            effects,
            compressor,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

pub fn build_router(ctx: AppContext, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/compress", post(compress))
        .route("/download", get(download))
        .route("/reset", post(reset))
        .route("/status", get(status))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(ctx)
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    let compressor = Compressor::new(config.tool.clone());
    match compressor.probe().await {
        Ok(version) => engine_info!(
            "Using {:?} version {}",
            config.tool.program,
            version
        ),
        Err(err) => engine_warn!("Compression tool check failed, requests will fail: {}", err),
    }

    let ctx = AppContext::new(compressor, config.session_ttl);
    let app = build_router(ctx, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    engine_info!("Listening on http://{}", config.bind);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    engine_info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        engine_warn!("Failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}

/// Resolves the caller's session; `Some(cookie)` when a new one was opened.
fn session(ctx: &AppContext, headers: &HeaderMap) -> (SessionId, Option<HeaderValue>) {
    let (id, created) = ctx.sessions.resolve(SessionId::from_headers(headers));
    let cookie = created
        .then(|| HeaderValue::from_str(&id.cookie()).ok())
        .flatten();
    (id, cookie)
}

fn with_cookie(response: impl IntoResponse, cookie: Option<HeaderValue>) -> Response {
    let mut response = response.into_response();
    if let Some(cookie) = cookie {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}

async fn index(State(ctx): State<AppContext>, headers: HeaderMap) -> Response {
    let (id, cookie) = session(&ctx, &headers);
    let view = current_view(&ctx, id);
    with_cookie(Html(render_page(&view)), cookie)
}

async fn upload(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let (id, cookie) = session(&ctx, &headers);

    let mut msg = Msg::UploadRejected {
        reason: "Choose a PDF file to upload.".to_string(),
    };
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return with_cookie((err.status(), err.body_text()), cookie),
        };
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("document.pdf").to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return with_cookie((err.status(), err.body_text()), cookie),
        };
        msg = if bytes.is_empty() {
            Msg::UploadRejected {
                reason: format!("{file_name} is empty."),
            }
        } else if !looks_like_pdf(&bytes) {
            Msg::UploadRejected {
                reason: format!("{file_name} is not a PDF file."),
            }
        } else {
            engine_info!(
                "Upload session={} name_len={} size={}",
                id,
                file_name.len(),
                bytes.len()
            );
            Msg::DocumentSelected(UploadedDocument::new(file_name, bytes))
        };
        break;
    }

    ctx.sessions.dispatch(id, msg);
    with_cookie(Redirect::to("/"), cookie)
}

#[derive(Debug, Deserialize)]
struct CompressForm {
    #[serde(default)]
    preset: String,
}

async fn compress(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Form(form): Form<CompressForm>,
) -> Response {
    let (id, cookie) = session(&ctx, &headers);
    let effects = ctx
        .sessions
        .dispatch(id, Msg::CompressRequested { preset: form.preset });
    ctx.effects.run(id, effects);
    with_cookie(Redirect::to("/"), cookie)
}

async fn download(State(ctx): State<AppContext>, headers: HeaderMap) -> Response {
    let (id, cookie) = session(&ctx, &headers);
    let result = ctx
        .sessions
        .read(id, |state| state.current_result().cloned())
        .flatten();

    let Some(result) = result else {
        return with_cookie(
            (
                StatusCode::NOT_FOUND,
                Html("<p>Nothing to download yet. <a href=\"/\">Back</a></p>"),
            ),
            cookie,
        );
    };

    let disposition = content_disposition(&result.file_name);
    let response = (
        [
            (CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (CONTENT_DISPOSITION, disposition),
        ],
        result.bytes,
    );
    with_cookie(response, cookie)
}

async fn reset(State(ctx): State<AppContext>, headers: HeaderMap) -> Response {
    let (id, cookie) = session(&ctx, &headers);
    ctx.sessions.dispatch(id, Msg::DocumentCleared);
    with_cookie(Redirect::to("/"), cookie)
}

async fn status(State(ctx): State<AppContext>, headers: HeaderMap) -> Response {
    let (id, cookie) = session(&ctx, &headers);
    let view = current_view(&ctx, id);
    with_cookie(Json(status_json(&view)), cookie)
}

async fn healthz(State(ctx): State<AppContext>) -> Response {
    match ctx.compressor.probe().await {
        Ok(version) => (StatusCode::OK, format!("ok gs {version}\n")).into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("{}\n", err.user_message()),
        )
            .into_response(),
    }
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
fn content_disposition(file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .filter(|c| *c != '"' && *c != '\\')
        .collect();
    let mut value = format!("attachment; filename=\"{fallback}\"");
    if !file_name.is_ascii() {
        value.push_str("; filename*=UTF-8''");
        for byte in file_name.bytes() {
            if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
                value.push(byte as char);
            } else {
                value.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    HeaderValue::from_str(&value)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"compressed.pdf\""))
}

fn current_view(ctx: &AppContext, id: SessionId) -> SessionViewModel {
    ctx.sessions
        .read(id, SessionState::view)
        .unwrap_or_else(|| SessionState::new().view())
}
