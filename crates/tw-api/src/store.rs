//! Reservation store — append-only booking table.
//!
//! Two backends:
//! - [`PgStore`]: PostgreSQL via `sqlx` (production).
//! - [`MemoryStore`]: `RwLock<Vec>` (tests and development).
//!
//! The store validates nothing; admission control lives in
//! [`crate::capacity::CapacityOracle`].

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tw_protocol::reservation::{NewReservation, Reservation};

use crate::db;

/// Errors from the storage layer. Always fatal for the request.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent table of confirmed bookings.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Append a booking, assigning its id and `created_at`.
    async fn append(&self, reservation: NewReservation) -> StoreResult<Reservation>;

    /// Bookings in insertion order, filtered by exact date and/or time.
    async fn query(&self, date: Option<&str>, time: Option<&str>) -> StoreResult<Vec<Reservation>>;

    /// Sum of guests booked into the exact `(date, time)` slot.
    async fn occupancy(&self, date: &str, time: &str) -> StoreResult<i64> {
        let booked = self.query(Some(date), Some(time)).await?;
        Ok(booked.iter().map(|r| i64::from(r.guests)).sum())
    }

    /// Backend name (for logging).
    fn backend_name(&self) -> &str;
}

/// In-memory store.
pub struct MemoryStore {
    rows: RwLock<Vec<Reservation>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn append(&self, reservation: NewReservation) -> StoreResult<Reservation> {
        let mut rows = self.rows.write().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = reservation.into_reservation(id, Utc::now());
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn query(&self, date: Option<&str>, time: Option<&str>) -> StoreResult<Vec<Reservation>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|r| date.is_none_or(|d| r.date == d))
            .filter(|r| time.is_none_or(|t| r.time == t))
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

/// PostgreSQL-backed store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn append(&self, reservation: NewReservation) -> StoreResult<Reservation> {
        let (id, created_at) = db::bookings::insert(&self.pool, &reservation).await?;
        Ok(reservation.into_reservation(id, created_at))
    }

    async fn query(&self, date: Option<&str>, time: Option<&str>) -> StoreResult<Vec<Reservation>> {
        let rows = db::bookings::list(&self.pool, date, time).await?;
        let reservations = rows
            .into_iter()
            .map(Reservation::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reservations)
    }

    async fn occupancy(&self, date: &str, time: &str) -> StoreResult<i64> {
        Ok(db::bookings::slot_occupancy(&self.pool, date, time).await?)
    }

    fn backend_name(&self) -> &str {
        "postgres"
    }
}
