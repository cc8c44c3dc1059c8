//! Capacity oracle — per-slot seat accounting against a global maximum.
//!
//! `check` is a pure read. `reserve` serializes check-and-append per exact
//! `(date, time)` slot behind an async mutex, so concurrent admissions into
//! one slot can never push its occupancy past `max_capacity`. Different
//! slots never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tw_protocol::availability::CapacityDecision;
use tw_protocol::reservation::{NewReservation, Reservation, SlotKey};

use crate::store::{ReservationStore, StoreResult};

/// Result of an attempted reservation.
#[derive(Debug, Clone)]
pub enum Admission {
    /// The party fit and the booking was persisted.
    Admitted {
        reservation: Reservation,
        decision: CapacityDecision,
    },
    /// Not enough seats; nothing was persisted.
    Rejected { decision: CapacityDecision },
}

impl Admission {
    pub fn decision(&self) -> CapacityDecision {
        match self {
            Admission::Admitted { decision, .. } | Admission::Rejected { decision } => *decision,
        }
    }

    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

type SlotLock = Arc<tokio::sync::Mutex<()>>;

/// A caller's claim on a slot lock. Dropping it, on success, error or
/// cancellation alike, prunes the map entry once nobody else holds or
/// waits on it.
struct SlotHandle<'a> {
    locks: &'a Mutex<HashMap<SlotKey, SlotLock>>,
    slot: SlotKey,
    lock: SlotLock,
}

impl Drop for SlotHandle<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Only the map and this handle left.
        if locks.get(&self.slot).is_some_and(|l| Arc::strong_count(l) == 2) {
            locks.remove(&self.slot);
        }
    }
}

/// Admission control over the reservation store.
pub struct CapacityOracle {
    store: Arc<dyn ReservationStore>,
    max_capacity: u32,
    slot_locks: Mutex<HashMap<SlotKey, SlotLock>>,
}

impl CapacityOracle {
    pub fn new(store: Arc<dyn ReservationStore>, max_capacity: u32) -> Self {
        Self {
            store,
            max_capacity,
            slot_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    pub fn store(&self) -> &Arc<dyn ReservationStore> {
        &self.store
    }

    /// Seats left in the slot and whether `party_size` fits. No side effects.
    pub async fn check(&self, date: &str, time: &str, party_size: u32) -> StoreResult<CapacityDecision> {
        let occupied = self.store.occupancy(date, time).await?;
        Ok(CapacityDecision::evaluate(self.max_capacity, occupied, party_size))
    }

    /// Check and, if admitted, append. Atomic with respect to other
    /// `reserve` calls for the same slot.
    pub async fn reserve(&self, reservation: NewReservation) -> StoreResult<Admission> {
        let slot = reservation.slot();
        let handle = self.lock_for(&slot);

        let admission = {
            let _guard = handle.lock.lock().await;
            let decision = self
                .check(&reservation.date, &reservation.time, reservation.guests)
                .await?;
            if decision.admitted {
                let reservation = self.store.append(reservation).await?;
                Admission::Admitted {
                    reservation,
                    decision,
                }
            } else {
                Admission::Rejected { decision }
            }
        };
        drop(handle);

        let decision = admission.decision();
        if admission.is_admitted() {
            tracing::info!(
                slot = %slot,
                seats_left = decision.seats_left,
                "reservation admitted"
            );
        } else {
            tracing::info!(
                slot = %slot,
                seats_left = decision.seats_left,
                max_capacity = self.max_capacity,
                "reservation rejected: slot full"
            );
        }
        Ok(admission)
    }

    fn lock_for(&self, slot: &SlotKey) -> SlotHandle<'_> {
        let mut locks = self.slot_locks.lock().unwrap_or_else(|e| e.into_inner());
        let lock = locks.entry(slot.clone()).or_default().clone();
        SlotHandle {
            locks: &self.slot_locks,
            slot: slot.clone(),
            lock,
        }
    }

    #[cfg(test)]
    fn tracked_slots(&self) -> usize {
        self.slot_locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
