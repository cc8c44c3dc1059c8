//! Reservation pipeline: extract → capacity check → persist → confirm.
//!
//! The deterministic confirmation is always part of the reply. The model
//! only adds a friendlier narrative after it, and is skipped silently when
//! it fails.

use std::sync::Arc;

use chrono::NaiveDate;
use tw_nlu::ReservationExtractor;
use tw_protocol::chat::ReservationIntent;
use tw_protocol::reservation::{NewReservation, Reservation};

use super::ChatReply;
use crate::capacity::{Admission, CapacityOracle};
use crate::llm::{CompletionRequest, TextCompletion};
use crate::store::StoreResult;

const NARRATIVE_DIRECTIVE: &str = "You are a restaurant reservation agent with years of \
experience in restaurant operations. The reservation below is already confirmed. Write a short, \
friendly note (2-3 sentences) thanking the customer and restating the date, time and party size. \
Do not change any detail and do not ask for more information.";

/// What happened to the requested booking.
#[derive(Debug, Clone)]
pub enum ReservationOutcome {
    Confirmed(Reservation),
    FullyBooked { seats_left: i64 },
}

#[derive(Debug, Clone)]
pub struct ReservationReply {
    pub intent: ReservationIntent,
    pub outcome: ReservationOutcome,
    pub reply: ChatReply,
}

pub struct ReservationPipeline {
    extractor: ReservationExtractor,
    oracle: Arc<CapacityOracle>,
    completion: Arc<dyn TextCompletion>,
}

impl ReservationPipeline {
    pub fn new(oracle: Arc<CapacityOracle>, completion: Arc<dyn TextCompletion>) -> Self {
        Self {
            extractor: ReservationExtractor::new(),
            oracle,
            completion,
        }
    }

    pub async fn handle(&self, message: &str) -> StoreResult<ReservationReply> {
        let intent = self.extractor.extract(message);
        self.process(message, intent).await
    }

    /// Like [`handle`](Self::handle) with an explicit "today" for the date default.
    pub async fn handle_at(&self, message: &str, today: NaiveDate) -> StoreResult<ReservationReply> {
        let intent = self.extractor.extract_at(message, today);
        self.process(message, intent).await
    }

    async fn process(&self, message: &str, intent: ReservationIntent) -> StoreResult<ReservationReply> {
        let booking = NewReservation::from_chat(&intent.date, &intent.time, intent.guests);

        match self.oracle.reserve(booking).await? {
            Admission::Rejected { decision } => {
                let text = rejection_message(&intent, self.oracle.max_capacity());
                Ok(ReservationReply {
                    intent,
                    outcome: ReservationOutcome::FullyBooked {
                        seats_left: decision.seats_left,
                    },
                    reply: ChatReply::new(text),
                })
            }
            Admission::Admitted { reservation, .. } => {
                let confirmation = confirmation_message(&intent);
                let text = match self.narrative(message, &confirmation).await {
                    Some(narrative) => format!("{confirmation}\n\n{narrative}"),
                    None => confirmation,
                };
                Ok(ReservationReply {
                    intent,
                    outcome: ReservationOutcome::Confirmed(reservation),
                    reply: ChatReply::new(text),
                })
            }
        }
    }

    async fn narrative(&self, message: &str, confirmation: &str) -> Option<String> {
        let request = CompletionRequest::new(
            NARRATIVE_DIRECTIVE,
            format!("Customer message: {message}\n{confirmation}"),
        );
        match self.completion.complete(&request).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = self.completion.provider_name(),
                    "narrative generation failed, sending confirmation only"
                );
                None
            }
        }
    }
}

pub fn confirmation_message(intent: &ReservationIntent) -> String {
    format!(
        "Reservation confirmed for {} people on {} at {}.",
        intent.guests, intent.date, intent.time
    )
}

pub fn rejection_message(intent: &ReservationIntent, max_capacity: u32) -> String {
    format!(
        "Sorry, we are fully booked for {} at {} (Max capacity: {max_capacity} guests). \
         Please choose another date or time, or reduce the party size.",
        intent.date, intent.time
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionError, CompletionResult, DisabledCompletion};
    use crate::store::{MemoryStore, ReservationStore};
    use async_trait::async_trait;
    use tw_protocol::reservation::CHAT_RESERVATION_NAME;

    struct Scripted(&'static str);

    #[async_trait]
    impl TextCompletion for Scripted {
        async fn complete(&self, _request: &CompletionRequest) -> CompletionResult<String> {
            Ok(self.0.to_string())
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }
    }

    struct Failing;

    #[async_trait]
    impl TextCompletion for Failing {
        async fn complete(&self, _request: &CompletionRequest) -> CompletionResult<String> {
            Err(CompletionError::Status {
                status: 503,
                body: "overloaded".into(),
            })
        }

        fn provider_name(&self) -> &str {
            "failing"
        }
    }

    fn pipeline(
        store: Arc<MemoryStore>,
        completion: Arc<dyn TextCompletion>,
    ) -> ReservationPipeline {
        ReservationPipeline::new(Arc::new(CapacityOracle::new(store, 50)), completion)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()
    }

    #[tokio::test]
    async fn confirmed_booking_is_persisted_with_chat_identity() {
        let store = Arc::new(MemoryStore::new());
        let p = pipeline(store.clone(), Arc::new(Scripted("We look forward to seeing you!")));

        let reply = p
            .handle_at("book a table for 4 on 2025-06-01 at 6pm", today())
            .await
            .unwrap();

        assert!(matches!(reply.outcome, ReservationOutcome::Confirmed(_)));
        assert_eq!(
            reply.reply.text,
            "Reservation confirmed for 4 people on 2025-06-01 at 6:00 pm.\n\nWe look forward to seeing you!"
        );
        assert!(reply.reply.html.starts_with("<p>Reservation confirmed"));

        let stored = store.query(Some("2025-06-01"), Some("6:00 pm")).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].guests, 4);
        assert_eq!(stored[0].name, CHAT_RESERVATION_NAME);
        assert!(stored[0].email.is_empty());
        assert!(stored[0].phone.is_empty());
    }

    #[tokio::test]
    async fn defaults_fill_missing_fields() {
        let store = Arc::new(MemoryStore::new());
        let p = pipeline(store.clone(), Arc::new(DisabledCompletion));

        let reply = p.handle_at("book a table", today()).await.unwrap();
        assert_eq!(reply.intent.date, "2025-06-01");
        assert_eq!(reply.intent.time, "7:00 PM");
        assert_eq!(reply.intent.guests, 2);
        assert_eq!(
            reply.reply.text,
            "Reservation confirmed for 2 people on 2025-06-01 at 7:00 PM."
        );
    }

    #[tokio::test]
    async fn full_slot_is_rejected_without_persisting() {
        let store = Arc::new(MemoryStore::new());
        store
            .append(NewReservation::from_chat("2025-06-01", "7:00 PM", 48))
            .await
            .unwrap();
        let p = pipeline(store.clone(), Arc::new(Scripted("unused")));

        let reply = p
            .handle_at("reservation for 3 on 2025-06-01 at 7:00 PM", today())
            .await
            .unwrap();

        match reply.outcome {
            ReservationOutcome::FullyBooked { seats_left } => assert_eq!(seats_left, 2),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(
            reply.reply.text,
            "Sorry, we are fully booked for 2025-06-01 at 7:00 PM (Max capacity: 50 guests). \
             Please choose another date or time, or reduce the party size."
        );
        assert_eq!(store.occupancy("2025-06-01", "7:00 PM").await.unwrap(), 48);
    }

    #[tokio::test]
    async fn generation_failure_keeps_confirmation() {
        let store = Arc::new(MemoryStore::new());
        let p = pipeline(store.clone(), Arc::new(Failing));

        let reply = p
            .handle_at("book 3 seats on 2025-06-01 at 8 PM", today())
            .await
            .unwrap();

        assert_eq!(
            reply.reply.text,
            "Reservation confirmed for 3 people on 2025-06-01 at 8:00 PM."
        );
        assert_eq!(store.occupancy("2025-06-01", "8:00 PM").await.unwrap(), 3);
    }
}
