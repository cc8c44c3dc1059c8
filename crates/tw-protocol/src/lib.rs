pub mod availability;
pub mod chat;
pub mod reservation;

pub use availability::*;
pub use chat::*;
pub use reservation::*;
