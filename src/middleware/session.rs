use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};

use crate::api::AppState;
use crate::gateway::Session;

/// Pulls the caller's session off the request. Never rejects: a missing or
/// malformed credential is just an anonymous session, and the gateway decides the rest.
#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(session_from_headers(&parts.headers, &state.config.routes.session_cookie))
    }
}

/// Bearer token from the Authorization header wins; otherwise the named session cookie
pub fn session_from_headers(headers: &HeaderMap, cookie_name: &str) -> Session {
    if let Some(token) = bearer_from_headers(headers) {
        return Session::bearer(token);
    }
    match cookie_from_headers(headers, cookie_name) {
        Some(token) => Session::bearer(token),
        None => Session::anonymous(),
    }
}

fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn cookie_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
}
