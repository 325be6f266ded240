//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Booking, PricedItinerary, RoutePlan};
use crate::graph::RouteGraph;

/// Response to a route query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesResponse {
    /// Sum of leg distances, rendered as a decimal string
    pub total_distance: String,

    /// Expiry of the price list the routes were computed from
    pub valid_until: DateTime<Utc>,

    #[serde(rename = "pricelistID")]
    pub pricelist_id: String,

    pub possible_routes: Vec<PricedItinerary>,
}

impl RoutesResponse {
    /// Create from a computed plan.
    pub fn from_plan(plan: &RoutePlan) -> Self {
        Self {
            total_distance: plan.total_distance.to_string(),
            valid_until: plan.valid_until,
            pricelist_id: plan.pricelist_id.clone(),
            possible_routes: plan.itineraries.clone(),
        }
    }
}

/// Origin and destination of a booked journey.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRoutes {
    pub from: String,
    pub destination: String,
}

/// Reason a booking request was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    /// A required text field is blank
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("companyNames must not be empty")]
    NoCompanies,

    /// Total price is negative or not a number
    #[error("invalid totalPrice: {0}")]
    InvalidPrice(f64),

    /// Origin or destination is not part of the route graph
    #[error("unknown location: {0}")]
    UnknownLocation(String),
}

/// Request to book an itinerary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub company_names: Vec<String>,
    pub start_time: String,
    pub first_name: String,
    pub last_name: String,
    pub total_price: f64,
    pub total_duration: String,
    #[serde(rename = "pricelistID")]
    pub pricelist_id: String,
    pub routes: BookingRoutes,

    /// Echoed by clients; not used
    #[serde(default)]
    pub valid_until: Option<String>,
}

impl BookingRequest {
    /// Check the request and resolve its locations against the graph.
    pub fn into_booking(self, graph: &RouteGraph) -> Result<Booking, BookingError> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("startTime", &self.start_time),
            ("pricelistID", &self.pricelist_id),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(BookingError::EmptyField(*field));
        }
        if self.company_names.is_empty() {
            return Err(BookingError::NoCompanies);
        }
        if !self.total_price.is_finite() || self.total_price < 0.0 {
            return Err(BookingError::InvalidPrice(self.total_price));
        }

        let resolve = |name: &str| {
            graph
                .resolve(name)
                .ok_or_else(|| BookingError::UnknownLocation(name.to_string()))
        };
        let origin = resolve(&self.routes.from)?;
        let destination = resolve(&self.routes.destination)?;

        Ok(Booking {
            company_names: self.company_names,
            start_time: self.start_time,
            first_name: self.first_name,
            last_name: self.last_name,
            total_price: self.total_price,
            total_duration: self.total_duration,
            pricelist_id: self.pricelist_id,
            origin,
            destination,
        })
    }
}

/// Response to an accepted booking.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: i64,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,

    /// Id of the current price list, if one is stored
    #[serde(rename = "pricelistID")]
    pub pricelist_id: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
