//! Booking type.

use super::LocationName;

/// A reservation of a selected itinerary.
///
/// Bookings record the price list they were quoted from but are not
/// checked against it: a booking may name a price list that is no
/// longer current.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub company_names: Vec<String>,
    pub start_time: String,
    pub first_name: String,
    pub last_name: String,
    pub total_price: f64,
    pub total_duration: String,
    pub pricelist_id: String,
    pub origin: LocationName,
    pub destination: LocationName,
}
