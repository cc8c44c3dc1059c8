//! Availability check endpoint.

use axum::Json;
use axum::extract::State;
use tw_protocol::availability::{AvailabilityRequest, AvailabilityResponse};

use super::bookings::validate_slot;
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/availability/ — seats left in a slot and whether a party fits.
/// Read-only; nothing is reserved.
pub async fn check_availability(
    State(state): State<AppState>,
    Json(req): Json<AvailabilityRequest>,
) -> ApiResult<Json<AvailabilityResponse>> {
    validate_slot(&req.date, &req.time, req.guests)?;
    let decision = state.oracle.check(&req.date, &req.time, req.guests).await?;
    Ok(Json(decision.into()))
}
