//! Web layer for the travel server.
//!
//! Provides HTTP endpoints for route queries and bookings.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, cors_layer, create_router};
pub use state::AppState;
