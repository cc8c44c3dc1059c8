//! Chat message routing between the reservation and inquiry pipelines.

/// Words that send a message to the reservation pipeline.
const RESERVATION_MARKERS: &[&str] = &["reservation", "book", "table"];

/// Which pipeline handles a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRoute {
    Reservation,
    Inquiry,
}

/// Route a message by case-insensitive substring match on the reservation markers.
pub fn route(message: &str) -> ChatRoute {
    let lower = message.to_lowercase();
    if RESERVATION_MARKERS.iter().any(|m| lower.contains(m)) {
        ChatRoute::Reservation
    } else {
        ChatRoute::Inquiry
    }
}
