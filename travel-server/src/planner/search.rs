//! Route planning.
//!
//! Turns a query between two locations into a `RoutePlan`: find the
//! fewest-hop path, fetch each leg's offers, compose itineraries and
//! attach their totals.

use tracing::debug;

use crate::domain::{LegOffer, LocationName, PriceListSummary, RoutePlan};
use crate::graph::{RouteEdge, RouteGraph};

use super::aggregate::price_itinerary;
use super::compose::compose;
use super::config::ComposeConfig;

/// Error from route planning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// Nothing has been ingested yet
    #[error("no price list available")]
    NoPriceList,

    /// No path, a leg without offers, or no time-consistent combination
    #[error("no providers from {origin} to {destination}")]
    NoProviders {
        origin: LocationName,
        destination: LocationName,
    },

    /// Location is not part of the route graph
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// Durable storage failed
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Offers covering one leg of a path.
#[derive(Debug, Clone, Default)]
pub struct LegOffers {
    /// Distance of the leg's route.
    pub distance: i64,

    /// Offers ordered by ascending start time.
    pub offers: Vec<LegOffer>,
}

/// Trait for providing the offers of a leg.
///
/// This abstraction allows the planner to be tested with mock data.
pub trait OfferProvider {
    /// Get the offers for `edge` under the given price list, ordered by
    /// start time. A leg the price list doesn't cover has no offers.
    fn leg_offers(&self, pricelist_id: &str, edge: &RouteEdge) -> Result<LegOffers, PlanError>;
}

/// Itinerary planner over a route graph.
pub struct Planner<'a, P: OfferProvider> {
    provider: &'a P,
    graph: &'a RouteGraph,
    config: &'a ComposeConfig,
}

impl<'a, P: OfferProvider> Planner<'a, P> {
    /// Create a new planner.
    pub fn new(provider: &'a P, graph: &'a RouteGraph, config: &'a ComposeConfig) -> Self {
        Self {
            provider,
            graph,
            config,
        }
    }

    /// Plan every itinerary from `origin` to `destination` under `pricelist`.
    pub fn plan(
        &self,
        pricelist: &PriceListSummary,
        origin: &LocationName,
        destination: &LocationName,
    ) -> Result<RoutePlan, PlanError> {
        let no_providers = || PlanError::NoProviders {
            origin: origin.clone(),
            destination: destination.clone(),
        };

        let path = self.graph.enumerate_shortest(origin, destination);
        if path.is_empty() {
            debug!(%origin, %destination, "No path between locations");
            return Err(no_providers());
        }

        let mut total_distance = 0;
        let mut legs = Vec::with_capacity(path.len());
        for edge in &path {
            let leg = self.provider.leg_offers(&pricelist.id, edge)?;
            if leg.offers.is_empty() {
                debug!(
                    from = %edge.from,
                    to = %edge.to,
                    pricelist = %pricelist.id,
                    "Leg has no offers"
                );
                return Err(no_providers());
            }
            total_distance += leg.distance;
            legs.push(leg.offers);
        }

        let itineraries = compose(&legs, self.config);
        if itineraries.is_empty() {
            return Err(no_providers());
        }

        Ok(RoutePlan {
            pricelist_id: pricelist.id.clone(),
            valid_until: pricelist.valid_until,
            total_distance,
            itineraries: itineraries.into_iter().map(price_itinerary).collect(),
        })
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
