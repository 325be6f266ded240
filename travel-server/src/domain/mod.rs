//! Domain types for the itinerary engine.
//!
//! Price-list snapshots as delivered by the feed, the itineraries composed
//! from them, and bookings. Snapshot types validate their invariants before
//! ingestion so storage and search can trust them.

mod booking;
mod error;
mod itinerary;
mod location;
mod pricelist;

pub use booking::Booking;
pub use error::DomainError;
pub use itinerary::{Itinerary, LegOffer, PricedItinerary, RoutePlan};
pub use location::{Company, InvalidLocationName, Location, LocationName};
pub use pricelist::{Leg, Offer, PriceList, PriceListSummary, RouteInfo};
