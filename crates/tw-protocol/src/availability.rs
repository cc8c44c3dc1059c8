use serde::{Deserialize, Serialize};

/// Outcome of a capacity check for one slot and party size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityDecision {
    /// `max_capacity - occupancy`. May be negative if a slot was
    /// overbooked outside the oracle; clamp only when displaying.
    pub seats_left: i64,
    /// Whether the party fits (`seats_left >= party_size`).
    pub admitted: bool,
}

impl CapacityDecision {
    /// Compute a decision from slot occupancy.
    pub fn evaluate(max_capacity: u32, occupied: i64, party_size: u32) -> Self {
        let seats_left = i64::from(max_capacity) - occupied;
        Self {
            seats_left,
            admitted: seats_left >= i64::from(party_size),
        }
    }

    /// Seats left, clamped at zero for user-facing text.
    pub fn display_seats_left(&self) -> i64 {
        self.seats_left.max(0)
    }
}

/// Request body for `POST /api/availability/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub date: String,
    pub time: String,
    pub guests: u32,
}

/// Response body for `POST /api/availability/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub seats_left: i64,
}

impl From<CapacityDecision> for AvailabilityResponse {
    fn from(d: CapacityDecision) -> Self {
        Self {
            available: d.admitted,
            seats_left: d.seats_left,
        }
    }
}
