//! Route queries, ingestion and bookings over one store.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{CacheConfig, ItineraryCache};
use crate::domain::{Booking, PriceList, PriceListSummary, RoutePlan};
use crate::graph::RouteGraph;
use crate::planner::{ComposeConfig, PlanError, Planner};
use crate::store::{IngestOutcome, SqlitePricelistStore, StoreError, blocking};

/// Answers route queries against the current price list.
pub struct RouteService {
    store: SqlitePricelistStore,
    graph: Arc<RouteGraph>,
    cache: ItineraryCache,
    compose: ComposeConfig,
}

impl RouteService {
    pub fn new(
        store: SqlitePricelistStore,
        graph: RouteGraph,
        cache_config: &CacheConfig,
        compose: ComposeConfig,
    ) -> Self {
        Self {
            cache: ItineraryCache::new(store.clone(), cache_config),
            store,
            graph: Arc::new(graph),
            compose,
        }
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    pub fn store(&self) -> &SqlitePricelistStore {
        &self.store
    }

    /// The current price list, if any has been ingested.
    pub async fn current(&self) -> Result<Option<PriceListSummary>, StoreError> {
        let store = self.store.clone();
        blocking(move || store.current()).await
    }

    /// Every itinerary from `origin` to `destination` under the current
    /// price list.
    pub async fn get_routes(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Arc<RoutePlan>, PlanError> {
        let resolve = |name: &str| {
            self.graph
                .resolve(name)
                .ok_or_else(|| PlanError::UnknownLocation(name.to_string()))
        };
        let origin = resolve(origin)?;
        let destination = resolve(destination)?;

        let pricelist = self.current().await?.ok_or(PlanError::NoPriceList)?;
        debug!(
            pricelist = %pricelist.id,
            %origin,
            %destination,
            "Route query"
        );

        let compute = || {
            let store = self.store.clone();
            let graph = self.graph.clone();
            let compose = self.compose.clone();
            let (pricelist, origin, destination) =
                (pricelist.clone(), origin.clone(), destination.clone());
            blocking(move || {
                Planner::new(&store, &graph, &compose).plan(&pricelist, &origin, &destination)
            })
        };

        self.cache
            .get_or_compute(&pricelist.id, &origin, &destination, compute)
            .await
    }

    /// Ingest a price list and drop in-process plans of superseded lists.
    pub async fn ingest(&self, list: PriceList) -> Result<IngestOutcome, StoreError> {
        let store = self.store.clone();
        let outcome = blocking(move || store.ingest(&list)).await?;
        if let IngestOutcome::Ingested { .. } = outcome {
            self.cache.invalidate_all();
        }
        Ok(outcome)
    }

    /// Record a booking, returning its id.
    pub async fn add_booking(&self, booking: Booking) -> Result<i64, StoreError> {
        let store = self.store.clone();
        let id = blocking(move || store.add_booking(&booking)).await?;
        info!(booking = id, "Booking accepted");
        Ok(id)
    }
}
