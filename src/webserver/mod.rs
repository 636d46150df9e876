//! HTTP API layer
//!
//! Axum server, shared state, and one route module per resource.

pub mod routes;
pub mod server;
pub mod state;
pub mod utils;

pub use server::{shutdown, start_server};
pub use state::AppState;
