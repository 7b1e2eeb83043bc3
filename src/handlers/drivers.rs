// handlers/drivers.rs - GET /api/drivers handler

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};

use crate::api::AppState;
use crate::config::ListingFailurePolicy;
use crate::error::ApiError;
use crate::gateway::{GatewayError, Session};
use crate::query::{SortDirection, TableQuery};
use crate::types::Driver;

/// The one read this endpoint issues: drivers projected to id/full_name/phone, by name ascending
pub fn driver_listing_query() -> TableQuery {
    TableQuery::from(Driver::TABLE)
        .select(&Driver::COLUMNS)
        .order_by(Driver::SORT_KEY, SortDirection::Asc)
}

/// GET /api/drivers - List drivers ordered by full name
///
/// Rows are returned in the gateway's order. On any gateway failure the
/// configured [`ListingFailurePolicy`] decides the answer; by default that is
/// `200 []`, which callers cannot tell apart from an empty table.
pub async fn list(State(state): State<AppState>, session: Session) -> Response {
    match fetch_drivers(&state, &session).await {
        Ok(drivers) => Json(drivers).into_response(),
        Err(e) => {
            tracing::warn!("Driver listing failed: {}", e);
            match state.config.api.listing_failure_policy {
                ListingFailurePolicy::Empty => Json(Vec::<Driver>::new()).into_response(),
                ListingFailurePolicy::Error => {
                    ApiError::bad_gateway("Driver listing unavailable").into_response()
                }
            }
        }
    }
}

async fn fetch_drivers(state: &AppState, session: &Session) -> Result<Vec<Driver>, GatewayError> {
    let rows = state.gateway.query(session, &driver_listing_query()).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| GatewayError::Decode(e.to_string())))
        .collect()
}
