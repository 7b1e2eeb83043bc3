// handlers/landing.rs - GET / landing gate

use axum::{extract::State, response::Redirect};

use crate::api::AppState;
use crate::gateway::Session;

/// GET / - Send signed-in callers home and everyone else to login.
///
/// A gateway failure is treated as "no identity", so an outage also lands on login.
pub async fn landing(State(state): State<AppState>, session: Session) -> Redirect {
    let routes = &state.config.routes;

    match state.gateway.current_identity(&session).await {
        Ok(Some(identity)) => {
            tracing::debug!("Landing: identity {} present", identity.id);
            Redirect::temporary(&routes.home_path)
        }
        Ok(None) => Redirect::temporary(&routes.login_path),
        Err(e) => {
            tracing::warn!("Landing: identity lookup failed, redirecting to login: {}", e);
            Redirect::temporary(&routes.login_path)
        }
    }
}
