//! Selection endpoints - HTMX modal fragments and JSON snapshot

use axum::extract::{Path, State};
use axum::response::{Html, Json};
use axum::Extension;
use chrono::Utc;
use iuranweb_core::SessionSnapshot;

use super::page::render_qris_modal;
use crate::{ApiError, AppState, SessionId};

/// Open the detail view for one resident
pub async fn htmx_select(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
    Path(id): Path<u32>,
) -> Result<Html<String>, ApiError> {
    let resident = state.directory.require(id)?;
    let opened_at = Utc::now();
    state
        .sessions
        .with_session(&sid, |s| s.selection.select_at(resident.clone(), opened_at))
        .await;

    let label = state.formatter.format(&resident, opened_at);
    Ok(Html(render_qris_modal(&resident, &label, &state.config.billing)))
}

/// Close the detail view; empties the modal slot
pub async fn htmx_dismiss(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
) -> Html<String> {
    state.sessions.with_session(&sid, |s| s.selection.dismiss()).await;
    Html(String::new())
}

/// Modal for whatever the session currently has selected
pub async fn htmx_selection(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
) -> Html<String> {
    let formatter = &state.formatter;
    let open = state
        .sessions
        .with_session(&sid, |s| {
            s.selection
                .active()
                .map(|a| (a.resident.clone(), formatter.format(&a.resident, a.opened_at)))
        })
        .await;

    match open {
        Some((resident, label)) => Html(render_qris_modal(&resident, &label, &state.config.billing)),
        None => Html(String::new()),
    }
}

pub async fn api_selection(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
) -> Json<SessionSnapshot> {
    let formatter = &state.formatter;
    let snapshot = state.sessions.with_session(&sid, |s| s.snapshot(formatter)).await;
    Json(snapshot)
}
