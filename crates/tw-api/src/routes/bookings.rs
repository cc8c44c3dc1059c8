//! Booking endpoints.

use axum::Json;
use axum::extract::{Query, State};
use tw_protocol::reservation::{
    BookingQuery, BookingRequest, BookingResponse, GroupBookingRequest, GroupBookingResponse,
    Reservation, parse_date,
};

use crate::capacity::Admission;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::ReservationStore;

/// Reject what the store must never see: empty parties and non-ISO dates.
pub(crate) fn validate_slot(date: &str, time: &str, guests: u32) -> ApiResult<()> {
    if guests == 0 {
        return Err(ApiError::BadRequest("guests must be at least 1".into()));
    }
    if parse_date(date).is_none() {
        return Err(ApiError::BadRequest(format!(
            "invalid date '{date}', expected YYYY-MM-DD"
        )));
    }
    if time.trim().is_empty() {
        return Err(ApiError::BadRequest("time must not be empty".into()));
    }
    Ok(())
}

/// POST /api/bookings/ — book one slot if it has room.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> ApiResult<Json<BookingResponse>> {
    validate_slot(&req.date, &req.time, req.guests)?;

    let booking = req.into_new_reservation();
    let mut response = BookingResponse {
        id: -1,
        date: booking.date.clone(),
        time: booking.time.clone(),
        guests: booking.guests,
        name: booking.name.clone(),
        success: false,
        message: String::new(),
    };

    match state.oracle.reserve(booking).await? {
        Admission::Admitted { reservation, .. } => {
            response.id = reservation.id;
            response.success = true;
            response.message = "Booking successful!".into();
        }
        Admission::Rejected { decision } => {
            response.message = format!(
                "No availability. Only {} seats left.",
                decision.display_seats_left()
            );
        }
    }
    Ok(Json(response))
}

/// GET /api/bookings/?date=&time= — bookings in insertion order.
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> ApiResult<Json<Vec<Reservation>>> {
    let date = query.date.as_deref().filter(|d| !d.is_empty());
    let time = query.time.as_deref().filter(|t| !t.is_empty());
    let bookings = state.store.query(date, time).await?;
    Ok(Json(bookings))
}

/// POST /api/bookings/group/ — same party on several dates, each admitted
/// independently in request order.
pub async fn create_group_booking(
    State(state): State<AppState>,
    Json(req): Json<GroupBookingRequest>,
) -> ApiResult<Json<GroupBookingResponse>> {
    if req.dates.is_empty() {
        return Err(ApiError::BadRequest("dates must not be empty".into()));
    }
    for date in &req.dates {
        validate_slot(date, &req.time, req.guests)?;
    }

    let mut response = GroupBookingResponse::default();
    for date in &req.dates {
        match state.oracle.reserve(req.reservation_for(date)).await? {
            Admission::Admitted { .. } => response.successful_dates.push(date.clone()),
            Admission::Rejected { .. } => response.failed_dates.push(date.clone()),
        }
    }

    tracing::info!(
        event_type = %req.event_type,
        booked = response.successful_dates.len(),
        failed = response.failed_dates.len(),
        "group booking processed"
    );
    Ok(Json(response))
}
