//! Chat pipelines.
//!
//! A message goes to the reservation pipeline when it mentions
//! "reservation", "book" or "table", otherwise to the inquiry pipeline.
//! Both always produce a reply; only storage failures escape as errors.

pub mod inquiry;
pub mod reservation;

use tw_nlu::{ChatRoute, route};

pub use inquiry::InquiryPipeline;
pub use reservation::{ReservationOutcome, ReservationPipeline, ReservationReply};

use crate::render;
use crate::sessions::Turn;
use crate::store::StoreResult;

/// A chat answer in both plain text (kept in session history) and HTML
/// (sent to the client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub html: String,
}

impl ChatReply {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let html = render::to_html(&text);
        Self { text, html }
    }
}

/// Both pipelines behind the routing check.
pub struct ChatAssistant {
    reservations: ReservationPipeline,
    inquiries: InquiryPipeline,
}

impl ChatAssistant {
    pub fn new(reservations: ReservationPipeline, inquiries: InquiryPipeline) -> Self {
        Self {
            reservations,
            inquiries,
        }
    }

    pub async fn respond(&self, message: &str, history: &[Turn]) -> StoreResult<ChatReply> {
        match route(message) {
            ChatRoute::Reservation => Ok(self.reservations.handle(message).await?.reply),
            ChatRoute::Inquiry => Ok(self.inquiries.handle(message, history).await),
        }
    }
}
