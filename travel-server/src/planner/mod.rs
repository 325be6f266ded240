//! Itinerary planner.
//!
//! This module implements the core of a route query: given the fewest-hop
//! path between two locations and the offers on each of its legs, compose
//! every time-consistent itinerary and compute its totals.

mod aggregate;
mod compose;
mod config;
mod search;

pub use aggregate::{Totals, aggregate, format_duration, format_price, price_itinerary, round_to_minute};
pub use compose::compose;
pub use config::ComposeConfig;
pub use search::{LegOffers, OfferProvider, PlanError, Planner};
