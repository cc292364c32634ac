//! Resident API endpoints - JSON API and HTMX partial responses

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{Html, Json};
use axum::Extension;
use iuranweb_config::DuesComponent;
use iuranweb_core::{DirectorySummary, Resident};

use super::page::{render_count, render_residents_content};
use crate::{ApiError, AppState, SessionId};

/// Filtered resident list for the JSON API
#[derive(Debug, Clone, serde::Serialize)]
pub struct ResidentListResponse {
    pub query: String,
    pub total: usize,
    pub shown: usize,
    pub residents: Vec<Resident>,
}

/// Summary cards plus the dues breakdown
#[derive(Debug, Clone, serde::Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: DirectorySummary,
    pub currency_symbol: String,
    pub components: Vec<DuesComponent>,
}

fn query_param(params: &HashMap<String, String>) -> String {
    params.get("q").cloned().unwrap_or_default()
}

pub async fn api_residents(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<ResidentListResponse> {
    let query = query_param(&params);
    let residents: Vec<Resident> = state
        .directory
        .filter(&query)
        .iter()
        .map(|r| r.as_ref().clone())
        .collect();

    Json(ResidentListResponse {
        total: state.directory.len(),
        shown: residents.len(),
        query,
        residents,
    })
}

pub async fn api_resident_detail(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Resident>, ApiError> {
    let resident = state.directory.require(id)?;
    Ok(Json(resident.as_ref().clone()))
}

pub async fn api_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        summary: state.directory.summary(),
        currency_symbol: state.config.billing.currency_symbol.clone(),
        components: state.config.billing.components.clone(),
    })
}

/// HTMX search partial: table body plus an out-of-band count update
///
/// The query is remembered in the caller's session so a reload keeps it.
pub async fn htmx_residents_list(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let query = query_param(&params);
    state.sessions.with_session(&sid, |s| s.set_query(&query)).await;

    let residents = state.directory.filter(&query);
    let symbol = &state.config.billing.currency_symbol;
    Html(format!(
        "{}{}",
        render_residents_content(&residents, symbol, &state.config.billing.components),
        render_count(residents.len(), state.directory.len(), true)
    ))
}
