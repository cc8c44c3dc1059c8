//! Deterministic text understanding for the chat assistant.
//!
//! Everything here is pure pattern matching with no external calls:
//! - [`ReservationExtractor`]: date, time and party size from free text.
//! - [`TopicClassifier`]: keyword/pattern relevance score for inquiries.
//! - [`route`]: decides which chat pipeline handles a message.

pub mod classify;
pub mod extract;
pub mod routing;
pub mod vocabulary;

pub use classify::{RELEVANCE_THRESHOLD, TopicClassifier};
pub use extract::{ReservationExtractor, normalize_time};
pub use routing::{ChatRoute, route};
