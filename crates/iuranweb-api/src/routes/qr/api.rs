//! QR endpoints
//!
//! Handlers copy what they need out of the session before awaiting the
//! fetch, so no session lock is held while the remote image downloads.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Extension;
use chrono::Utc;
use iuranweb_core::{load_preview, BrowserDownload, Resident};

use super::page::render_export_notice;
use crate::{ApiError, AppState, SessionId};

/// Label of the view the export was started from
///
/// When the resident is the one currently open, its view label is reused so
/// the file name matches what the modal shows; otherwise a fresh label is
/// derived from the current time.
async fn export_label(state: &AppState, sid: &str, resident: &Resident) -> String {
    let formatter = &state.formatter;
    let id = resident.id;
    state
        .sessions
        .with_session(sid, |s| {
            s.selection
                .active()
                .filter(|a| a.resident.id == id)
                .map(|a| formatter.format(&a.resident, a.opened_at))
        })
        .await
        .unwrap_or_else(|| formatter.format(resident, Utc::now()))
}

/// Inline preview; never fails once the resident exists
pub async fn qr_preview(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Response, ApiError> {
    let resident = state.directory.require(id)?;
    let preview = load_preview(&**state.exporter.source(), &resident.qr_image_ref).await;

    let headers = [
        (header::CONTENT_TYPE, preview.content_type),
        (header::CACHE_CONTROL, "no-store".to_string()),
        (
            header::HeaderName::from_static("x-qr-placeholder"),
            preview.is_placeholder.to_string(),
        ),
    ];
    Ok((headers, preview.bytes).into_response())
}

/// Save the QR into the configured export directory
pub async fn htmx_qr_export(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
    Path(id): Path<u32>,
) -> Result<Html<String>, ApiError> {
    let resident = state.directory.require(id)?;
    let label = export_label(&state, &sid, &resident).await;

    let result = state
        .exporter
        .export_resident(&resident, &label, &*state.save_target)
        .await;
    Ok(Html(render_export_notice(&result)))
}

/// Hand the QR to the browser as an attachment
pub async fn qr_download(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
    Path(id): Path<u32>,
) -> Result<Response, ApiError> {
    let resident = state.directory.require(id)?;
    let label = export_label(&state, &sid, &resident).await;

    let target = BrowserDownload::new();
    let result = state.exporter.export_resident(&resident, &label, &target).await;
    if result.is_err() {
        return Ok((StatusCode::BAD_GATEWAY, Html(render_export_notice(&result))).into_response());
    }

    let payload = target.take().await.ok_or_else(|| ApiError::Internal {
        message: "download payload missing after export".to_string(),
    })?;

    let headers = [
        (header::CONTENT_TYPE, content_type_for(&payload.file_name).to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(&payload.file_name)),
        (header::CACHE_CONTROL, "no-store".to_string()),
    ];
    Ok((headers, payload.bytes).into_response())
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// ASCII fallback name plus the exact UTF-8 name (RFC 6266)
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("QRIS_A_TRX1.png"), "image/png");
        assert_eq!(content_type_for("QRIS_A_TRX1.JPG"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[test]
    fn test_content_disposition() {
        let value = content_disposition("QRIS_Budi_Santoso_TRX1.png");
        assert_eq!(
            value,
            "attachment; filename=\"QRIS_Budi_Santoso_TRX1.png\"; filename*=UTF-8''QRIS_Budi_Santoso_TRX1.png"
        );

        let value = content_disposition("QRIS_Dédi\"x_T.png");
        assert!(value.contains("filename=\"QRIS_D_di_x_T.png\""));
        assert!(value.contains("filename*=UTF-8''QRIS_D%C3%A9di%22x_T.png"));
    }
}
