//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::residents: Resident list, search, summary cards
//! - routes::selection: QRIS detail modal (open / dismiss)
//! - routes::qr: QR preview, server-side export, browser download

pub mod error;
pub mod routes;
pub mod session;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use iuranweb_config::Config;
use iuranweb_core::{
    DirectorySaveTarget, ExportNaming, ImageSource, QrAssetExporter,
    ResidentDirectory, SessionStore, TransactionIdFormatter,
};
use tokio::net::TcpListener;

pub use error::ApiError;
pub use session::SessionId;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<ResidentDirectory>,
    pub sessions: Arc<SessionStore>,
    pub exporter: QrAssetExporter,
    pub save_target: Arc<DirectorySaveTarget>,
    pub formatter: TransactionIdFormatter,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, directory: ResidentDirectory, source: Arc<dyn ImageSource>) -> Self {
        let exporter = QrAssetExporter::new(source, ExportNaming::from(&config.export));
        Self {
            directory: Arc::new(directory),
            sessions: Arc::new(SessionStore::new()),
            exporter,
            save_target: Arc::new(DirectorySaveTarget::new(config.export.directory.clone())),
            formatter: TransactionIdFormatter::new(config.export.label_prefix.clone()),
            config,
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::residents::{api_resident_detail, api_residents, api_summary, htmx_residents_list, page_residents};
    use routes::selection::{api_selection, htmx_dismiss, htmx_select, htmx_selection};
    use routes::qr::{htmx_qr_export, qr_download, qr_preview};

    // Routes that read or change a view session
    let session_routes = Router::new()
        .route("/", get(page_residents))
        .route("/residents", get(page_residents))
        .route("/residents/list", get(htmx_residents_list))
        .route("/residents/:id/select", post(htmx_select))
        .route("/selection", get(htmx_selection))
        .route("/selection/dismiss", post(htmx_dismiss))
        .route("/residents/:id/qr/export", post(htmx_qr_export))
        .route("/residents/:id/qr/download", get(qr_download))
        .route("/api/selection", get(api_selection))
        .route_layer(from_fn_with_state(state.clone(), session::session_middleware));

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/residents", get(api_residents))
        .route("/api/residents/:id", get(api_resident_detail))
        .route("/api/summary", get(api_summary))
        .route("/residents/:id/qr/preview", get(qr_preview))
        .merge(session_routes)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Iuran Warga</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        iuranweb_utils::escape_html(title),
        content
    )
}

/// Top bar with the app name
pub fn nav_header(current_path: &str) -> String {
    let active_class = if current_path == "/" || current_path.starts_with("/residents") {
        "text-emerald-700 font-semibold"
    } else {
        "text-gray-600 hover:text-emerald-700"
    };
    format!(
        r#"<header class='bg-white border-b'>
    <div class='max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 h-16 flex items-center justify-between'>
        <a href='/' class='text-xl font-bold text-emerald-600'>Iuran Warga</a>
        <nav><a href='/residents' class='{}'>Pembayaran QRIS</a></nav>
    </div>
</header>"#,
        active_class
    )
}

/// Check if request is from HTMX (partial page update)
fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(r#"<main class='max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8'>{}</main>"#, inner_content)
    } else {
        base_html(title, &format!(
            r#"{}
<main class='max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8'>{}</main>"#,
            nav_header(current_path), inner_content))
    }
}

/// Start the HTTP server
///
/// Binds the configured address and serves until Ctrl-C.
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.bind_address();
    let resident_count = state.directory.len();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting iuranweb server on http://{}", addr);
    log::info!("Serving {} residents", resident_count);
    log::info!("Available routes:");
    log::info!("  - /residents (Resident list and QRIS codes)");
    log::info!("  - /residents/:id/qr/download (QR download)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
