use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Calendar date format used for every reservation (`YYYY-MM-DD`, no timezone).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder identity stored for reservations made through the chat assistant.
pub const CHAT_RESERVATION_NAME: &str = "Chat Reservation";

/// Special-requests note stored for reservations made through the chat assistant.
pub const CHAT_RESERVATION_NOTE: &str = "Booked via chatbot";

/// A confirmed booking as persisted by the reservation store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Store-assigned, monotonic identifier.
    pub id: i64,
    /// Calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Free-form time of day, e.g. `"7:00 PM"`.
    pub time: String,
    /// Party size (always > 0).
    pub guests: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub special_requests: String,
    /// Server-assigned insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// The capacity slot this reservation occupies.
    pub fn slot(&self) -> SlotKey {
        SlotKey::new(&self.date, &self.time)
    }
}

/// Fields supplied by the caller when appending a reservation.
/// The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub date: String,
    pub time: String,
    pub guests: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub special_requests: String,
}

impl NewReservation {
    /// Reservation captured from a chat message. The chat path never
    /// collects contact details.
    pub fn from_chat(date: &str, time: &str, guests: u32) -> Self {
        Self {
            date: date.to_string(),
            time: time.to_string(),
            guests,
            name: CHAT_RESERVATION_NAME.to_string(),
            email: String::new(),
            phone: String::new(),
            special_requests: CHAT_RESERVATION_NOTE.to_string(),
        }
    }

    pub fn slot(&self) -> SlotKey {
        SlotKey::new(&self.date, &self.time)
    }

    /// Attach store-assigned fields.
    pub fn into_reservation(self, id: i64, created_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            date: self.date,
            time: self.time,
            guests: self.guests,
            name: self.name,
            email: self.email,
            phone: self.phone,
            special_requests: self.special_requests,
            created_at,
        }
    }
}

/// Unit of capacity accounting: an exact `(date, time)` string pair.
///
/// `"7:00 PM"` and `"7:00PM"` are different slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub date: String,
    pub time: String,
}

impl SlotKey {
    pub fn new(date: &str, time: &str) -> Self {
        Self {
            date: date.to_string(),
            time: time.to_string(),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.date, self.time)
    }
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Request body for `POST /api/bookings/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

impl BookingRequest {
    pub fn into_new_reservation(self) -> NewReservation {
        NewReservation {
            date: self.date,
            time: self.time,
            guests: self.guests,
            name: self.name,
            email: self.email,
            phone: self.phone.unwrap_or_default(),
            special_requests: self.special_requests.unwrap_or_default(),
        }
    }
}

/// Response body for `POST /api/bookings/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    /// Assigned reservation id, or `-1` when the slot had no room.
    pub id: i64,
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub name: String,
    pub success: bool,
    pub message: String,
}

/// Query string for `GET /api/bookings/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingQuery {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Request body for `POST /api/bookings/group/`: the same party booked on
/// several dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupBookingRequest {
    pub dates: Vec<String>,
    pub time: String,
    pub guests: u32,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub special_requirements: Option<String>,
}

impl GroupBookingRequest {
    /// Reservation for one of the requested dates.
    pub fn reservation_for(&self, date: &str) -> NewReservation {
        NewReservation {
            date: date.to_string(),
            time: self.time.clone(),
            guests: self.guests,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: String::new(),
            special_requests: format!(
                "Event Type: {}. {}",
                self.event_type,
                self.special_requirements.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Response body for `POST /api/bookings/group/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBookingResponse {
    pub successful_dates: Vec<String>,
    pub failed_dates: Vec<String>,
}
