//! Session cookie handling
//!
//! Every page and HTMX route runs behind [`session_middleware`], which
//! resolves the caller's view session and exposes it as a [`SessionId`]
//! request extension.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::AppState;

pub const SESSION_COOKIE: &str = "iuranweb_sid";

/// Id of the view session serving this request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

/// Read the session id out of the `Cookie` header(s)
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let presented = session_id_from_headers(req.headers());
    let id = state.sessions.open(presented.as_deref()).await;
    let is_new = presented.as_deref() != Some(id.as_str());

    req.extensions_mut().insert(SessionId(id.clone()));
    let mut resp = next.run(req).await;

    if is_new {
        if let Ok(v) = HeaderValue::from_str(&session_cookie(&id)) {
            resp.headers_mut().append(header::SET_COOKIE, v);
        }
    }
    resp
}
