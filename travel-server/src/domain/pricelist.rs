//! Price-list snapshot types.
//!
//! A `PriceList` is a dated snapshot of every leg and offer the external
//! feed currently sells. The field layout mirrors the feed's JSON so a
//! snapshot deserializes directly into these types.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Company, DomainError, Location, LocationName};

/// Static information about a directed hop between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub id: String,
    pub from: Location,
    pub to: Location,
    pub distance: i64,
}

/// A priced, time-bound transport option for a single leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub company: Company,
    pub price: f64,
    pub flight_start: DateTime<Utc>,
    pub flight_end: DateTime<Utc>,
}

impl Offer {
    /// Check the offer's price and flight times.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::EmptyId("offer"));
        }
        if self.company.id.is_empty() {
            return Err(DomainError::EmptyId("company"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::InvalidPrice {
                offer_id: self.id.clone(),
                price: self.price,
            });
        }
        if self.flight_end <= self.flight_start {
            return Err(DomainError::InvalidFlightTimes {
                offer_id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// One directed hop of a price list, covered by competing offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub id: String,
    pub route_info: RouteInfo,
    #[serde(rename = "providers")]
    pub offers: Vec<Offer>,
}

impl Leg {
    /// Check the leg's identifiers, location names and offers.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::EmptyId("leg"));
        }
        if self.route_info.id.is_empty() {
            return Err(DomainError::EmptyId("route info"));
        }
        for location in [&self.route_info.from, &self.route_info.to] {
            if location.id.is_empty() {
                return Err(DomainError::EmptyId("location"));
            }
            LocationName::parse(&location.name).map_err(|e| DomainError::InvalidLocation {
                leg_id: self.id.clone(),
                reason: e.to_string(),
            })?;
        }
        self.offers.iter().try_for_each(Offer::validate)?;
        first_duplicate(self.offers.iter().map(|offer| offer.id.as_str())).map_or(Ok(()), |id| {
            Err(DomainError::DuplicateId {
                kind: "offer",
                id: id.to_string(),
            })
        })
    }
}

/// A dated snapshot of all legs and offers valid until a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceList {
    pub id: String,
    pub valid_until: DateTime<Utc>,
    pub legs: Vec<Leg>,
}

impl PriceList {
    /// Validate the whole snapshot before it is ingested.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::EmptyId("price list"));
        }
        self.legs.iter().try_for_each(Leg::validate)?;
        first_duplicate(self.legs.iter().map(|leg| leg.id.as_str())).map_or(Ok(()), |id| {
            Err(DomainError::DuplicateId {
                kind: "leg",
                id: id.to_string(),
            })
        })
    }

    /// Distinct locations referenced by the legs, in first-seen order.
    pub fn locations(&self) -> Vec<&Location> {
        let mut seen = HashSet::new();
        self.legs
            .iter()
            .flat_map(|leg| [&leg.route_info.from, &leg.route_info.to])
            .filter(|location| seen.insert(location.id.as_str()))
            .collect()
    }

    /// Distinct companies referenced by the offers, in first-seen order.
    pub fn companies(&self) -> Vec<&Company> {
        let mut seen = HashSet::new();
        self.legs
            .iter()
            .flat_map(|leg| leg.offers.iter().map(|offer| &offer.company))
            .filter(|company| seen.insert(company.id.as_str()))
            .collect()
    }

    /// Total number of offers across all legs.
    pub fn offer_count(&self) -> usize {
        self.legs.iter().map(|leg| leg.offers.len()).sum()
    }
}

fn first_duplicate<'a>(mut ids: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.find(|id| !seen.insert(*id))
}

/// Identity and deadline of a stored price list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceListSummary {
    pub id: String,
    pub valid_until: DateTime<Utc>,
}

impl PriceListSummary {
    /// Whether the deadline is still in the future at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_until > now
    }

    /// Time left before the deadline, or `None` once it has passed.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.is_valid_at(now).then(|| self.valid_until - now)
    }
}
