//! Itinerary types.
//!
//! An `Itinerary` is one complete, time-consistent selection of offers
//! covering every leg of a path. A `RoutePlan` is the full answer to a
//! route query: every itinerary found for a path under one price list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An offer as seen from a route query: the flight plus its company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegOffer {
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "companyID")]
    pub company_id: String,
    pub price: f64,
    #[serde(rename = "flightStart")]
    pub flight_start: DateTime<Utc>,
    #[serde(rename = "flightEnd")]
    pub flight_end: DateTime<Utc>,
}

/// Ordered selection of one offer per leg, in path order.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    offers: Vec<LegOffer>,
}

impl Itinerary {
    /// Wrap an ordered selection of offers.
    pub fn new(offers: Vec<LegOffer>) -> Self {
        Self { offers }
    }

    /// The chosen offers, one per leg.
    pub fn offers(&self) -> &[LegOffer] {
        &self.offers
    }

    /// Number of legs covered.
    pub fn leg_count(&self) -> usize {
        self.offers.len()
    }

    /// Consume the itinerary, returning its offers.
    pub fn into_offers(self) -> Vec<LegOffer> {
        self.offers
    }
}

/// An itinerary with its presentation totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedItinerary {
    #[serde(rename = "totalPrice")]
    pub total_price: String,
    #[serde(rename = "totalDuration")]
    pub total_duration: String,
    #[serde(rename = "providers")]
    pub offers: Vec<LegOffer>,
}

/// Every itinerary found between two locations under one price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub pricelist_id: String,
    pub valid_until: DateTime<Utc>,
    pub total_distance: i64,
    pub itineraries: Vec<PricedItinerary>,
}
