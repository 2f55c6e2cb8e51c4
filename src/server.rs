//! Static file server for the generated site.
//!
//! `plain-folio serve` points an actix-web app at the output directory.
//! The mapping is deliberately dumb: the request path names a file,
//! the extension picks the MIME type from a fixed table, directories
//! fall back to their `index.html`. Missing files are 404, unreadable
//! files are 500, and anything trying to climb out of the root with
//! `..` is treated as missing.

use std::env;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

/// Extension → MIME. Anything else ships as an octet stream.
const MIME_TABLE: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
    ("json", "application/json"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("ico", "image/x-icon"),
    ("woff2", "font/woff2"),
    ("txt", "text/plain; charset=utf-8"),
];

pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    MIME_TABLE
        .iter()
        .find(|(known, _)| Some(*known) == ext.as_deref())
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}

/// Map a request path onto a file under `root`. `None` means the path
/// is unsafe or names nothing servable; the caller answers 404.
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    let rel = Path::new(trimmed);
    // Reject parent traversal and absolute components outright.
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let mut full = root.join(rel);
    if trimmed.is_empty() || full.is_dir() {
        full = full.join("index.html");
    }
    Some(full)
}

/// The serving state: the site root directory.
#[derive(Clone)]
pub struct SiteRoot(pub PathBuf);

/// Catch-all handler for every GET.
pub async fn asset(req: HttpRequest, root: web::Data<SiteRoot>) -> HttpResponse {
    let Some(path) = resolve(&root.0, req.path()) else {
        log::warn!("rejected request path {:?}", req.path());
        return not_found();
    };
    match std::fs::read(&path) {
        Ok(body) => HttpResponse::Ok().content_type(mime_for(&path)).body(body),
        Err(err) if err.kind() == ErrorKind::NotFound => not_found(),
        Err(err) => {
            log::error!("failed to read {}: {err}", path.display());
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body("500 Internal Server Error")
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body("404 Not Found")
}

/// Listen port: the PORT environment variable wins over the config
/// value when it parses.
pub fn effective_port(config_port: u16) -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(config_port)
}

/// Serve `root` on `port` until interrupted. Blocks the calling thread.
pub fn serve(root: PathBuf, port: u16) -> std::io::Result<()> {
    actix_web::rt::System::new().block_on(run(root, port))
}

async fn run(root: PathBuf, port: u16) -> std::io::Result<()> {
    let bind_address = format!("0.0.0.0:{port}");
    log::info!("serving {} at http://{bind_address}", root.display());
    let state = web::Data::new(SiteRoot(root));
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .default_service(web::get().to(asset))
    })
    .bind(&bind_address)?
    .run()
    .await
}
