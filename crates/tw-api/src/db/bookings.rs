//! Booking table queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tw_protocol::reservation::{NewReservation, Reservation};

/// Booking row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub guests: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Reservation {
    type Error = sqlx::Error;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Reservation {
            id: row.id,
            date: row.date,
            time: row.time,
            guests: guests_from_column(row.id, row.guests)?,
            name: row.name,
            email: row.email,
            phone: row.phone,
            special_requests: row.special_requests,
            created_at: row.created_at,
        })
    }
}

/// Party size as stored: must fit the `INTEGER` column.
fn guests_to_column(guests: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(guests)
        .map_err(|_| sqlx::Error::Encode(format!("party size {guests} exceeds column range").into()))
}

/// Party size as read back: a stored booking always has at least one guest.
fn guests_from_column(id: i64, guests: i32) -> Result<u32, sqlx::Error> {
    match u32::try_from(guests) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(sqlx::Error::Decode(
            format!("booking {id} has invalid party size {guests}").into(),
        )),
    }
}

/// Insert a booking; returns the assigned id and insertion timestamp.
pub async fn insert(
    pool: &PgPool,
    booking: &NewReservation,
) -> Result<(i64, DateTime<Utc>), sqlx::Error> {
    let guests = guests_to_column(booking.guests)?;
    sqlx::query_as::<_, (i64, DateTime<Utc>)>(
        "INSERT INTO bookings (date, time, guests, name, email, phone, special_requests)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, created_at",
    )
    .bind(&booking.date)
    .bind(&booking.time)
    .bind(guests)
    .bind(&booking.name)
    .bind(&booking.email)
    .bind(&booking.phone)
    .bind(&booking.special_requests)
    .fetch_one(pool)
    .await
}

/// List bookings in insertion order, optionally filtered by date and/or time.
pub async fn list(
    pool: &PgPool,
    date: Option<&str>,
    time: Option<&str>,
) -> Result<Vec<BookingRow>, sqlx::Error> {
    sqlx::query_as::<_, BookingRow>(
        "SELECT * FROM bookings
         WHERE ($1::TEXT IS NULL OR date = $1)
           AND ($2::TEXT IS NULL OR time = $2)
         ORDER BY id",
    )
    .bind(date)
    .bind(time)
    .fetch_all(pool)
    .await
}

/// Total guests booked into an exact (date, time) slot.
pub async fn slot_occupancy(pool: &PgPool, date: &str, time: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(guests), 0)::BIGINT FROM bookings WHERE date = $1 AND time = $2",
    )
    .bind(date)
    .bind(time)
    .fetch_one(pool)
    .await
}
