//! Tablewise API — library crate for the reservation and chat server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `tw-e2e-tests`) can access internal types like `AppState`,
//! `build_router`, and `TextCompletion`.

pub mod capacity;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod render;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod store;
