//! pdfsqueeze web front-end: routes, per-session store and HTML rendering.
pub mod cli;
mod effects;
mod oneshot;
mod render;
mod server;
mod sessions;
mod upload;

pub use effects::EffectRunner;
pub use oneshot::compress_file;
pub use render::{escape_html, format_size, render_page, status_json};
pub use server::{build_router, serve, AppContext, ServerConfig};
pub use sessions::{SessionId, SessionStore, SESSION_COOKIE};
pub use upload::looks_like_pdf;
