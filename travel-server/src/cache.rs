//! Caching layer for route plans.
//!
//! Plans are keyed by (price list id, origin, destination). The durable
//! copy lives in the store and survives restarts; an in-process moka cache
//! sits in front of it and coalesces concurrent misses for the same key,
//! so a plan is computed at most once per key at a time.
//!
//! Because the price list id is part of the key, entries never go stale:
//! once a new list becomes current, queries simply stop asking for the old
//! keys. Ingestion still purges the durable rows and clears this layer to
//! bound memory.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::domain::{LocationName, RoutePlan};
use crate::planner::PlanError;
use crate::store::{SqlitePricelistStore, blocking};

/// Cache key: (price list id, origin, destination).
type PlanKey = (String, LocationName, LocationName);

/// Configuration for the in-process cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for in-process entries.
    pub ttl: Duration,

    /// Maximum number of in-process entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

/// Two-level cache of computed route plans.
pub struct ItineraryCache {
    plans: MokaCache<PlanKey, Arc<RoutePlan>>,
    store: SqlitePricelistStore,
}

impl ItineraryCache {
    /// Create a new cache in front of the given store.
    pub fn new(store: SqlitePricelistStore, config: &CacheConfig) -> Self {
        let plans = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { plans, store }
    }

    fn key(pricelist_id: &str, origin: &LocationName, destination: &LocationName) -> PlanKey {
        (pricelist_id.to_string(), origin.clone(), destination.clone())
    }

    /// Look up a plan, checking memory first and then the durable table.
    pub async fn lookup(
        &self,
        pricelist_id: &str,
        origin: &LocationName,
        destination: &LocationName,
    ) -> Result<Option<Arc<RoutePlan>>, PlanError> {
        let key = Self::key(pricelist_id, origin, destination);
        if let Some(plan) = self.plans.get(&key).await {
            return Ok(Some(plan));
        }

        let Some(plan) = self.load_durable(pricelist_id, origin, destination).await? else {
            return Ok(None);
        };
        let plan = Arc::new(plan);
        self.plans.insert(key, plan.clone()).await;
        Ok(Some(plan))
    }

    /// Store a computed plan under its own price list id.
    ///
    /// Returns false when the plan's list is no longer current; such a
    /// plan is neither persisted nor kept in memory.
    pub async fn store(
        &self,
        origin: &LocationName,
        destination: &LocationName,
        plan: RoutePlan,
    ) -> Result<bool, PlanError> {
        let plan = Arc::new(plan);
        let stored = self.persist(origin, destination, plan.clone()).await?;
        if stored {
            let key = Self::key(&plan.pricelist_id, origin, destination);
            self.plans.insert(key, plan).await;
        }
        Ok(stored)
    }

    /// Get a plan, computing it on a miss.
    ///
    /// Concurrent callers for the same key wait on a single computation.
    /// A failed computation is not cached; the next caller retries.
    pub async fn get_or_compute<F, Fut>(
        &self,
        pricelist_id: &str,
        origin: &LocationName,
        destination: &LocationName,
        compute: F,
    ) -> Result<Arc<RoutePlan>, PlanError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RoutePlan, PlanError>>,
    {
        let key = Self::key(pricelist_id, origin, destination);
        self.plans
            .try_get_with(key, self.fill(pricelist_id, origin, destination, compute))
            .await
            .map_err(|err: Arc<PlanError>| (*err).clone())
    }

    /// Produce the value for a missing in-process entry.
    async fn fill<F, Fut>(
        &self,
        pricelist_id: &str,
        origin: &LocationName,
        destination: &LocationName,
        compute: F,
    ) -> Result<Arc<RoutePlan>, PlanError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RoutePlan, PlanError>>,
    {
        if let Some(plan) = self.load_durable(pricelist_id, origin, destination).await? {
            debug!(pricelist = pricelist_id, %origin, %destination, "Durable cache hit");
            return Ok(Arc::new(plan));
        }

        debug!(pricelist = pricelist_id, %origin, %destination, "Cache miss, computing");
        let plan = Arc::new(compute().await?);
        match self.persist(origin, destination, plan.clone()).await {
            Ok(true) => {}
            Ok(false) => debug!(
                pricelist = pricelist_id,
                "Price list superseded, plan not persisted"
            ),
            Err(err) => warn!(error = %err, "Failed to persist plan"),
        }
        Ok(plan)
    }

    async fn load_durable(
        &self,
        pricelist_id: &str,
        origin: &LocationName,
        destination: &LocationName,
    ) -> Result<Option<RoutePlan>, PlanError> {
        let store = self.store.clone();
        let (id, origin, destination) = Self::key(pricelist_id, origin, destination);
        blocking(move || {
            store
                .cached_plan(&id, &origin, &destination)
                .map_err(PlanError::from)
        })
        .await
    }

    async fn persist(
        &self,
        origin: &LocationName,
        destination: &LocationName,
        plan: Arc<RoutePlan>,
    ) -> Result<bool, PlanError> {
        let store = self.store.clone();
        let (origin, destination) = (origin.clone(), destination.clone());
        blocking(move || {
            store
                .store_cached_plan(&origin, &destination, &plan)
                .map_err(PlanError::from)
        })
        .await
    }

    /// Drop every in-process entry.
    pub fn invalidate_all(&self) {
        self.plans.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Company, Leg, Location, Offer, PriceList, PricedItinerary, RouteInfo};
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, hour, 0, 0).unwrap()
    }

    fn name(s: &str) -> LocationName {
        LocationName::parse(s).unwrap()
    }

    fn price_list(id: &str, valid_until: DateTime<Utc>) -> PriceList {
        PriceList {
            id: id.to_string(),
            valid_until,
            legs: vec![Leg {
                id: format!("{id}-leg"),
                route_info: RouteInfo {
                    id: format!("{id}-ri"),
                    from: Location {
                        id: "e".into(),
                        name: "Earth".into(),
                    },
                    to: Location {
                        id: "m".into(),
                        name: "Mars".into(),
                    },
                    distance: 10,
                },
                offers: vec![Offer {
                    id: format!("{id}-o"),
                    company: Company {
                        id: "c".into(),
                        name: "SpaceX".into(),
                    },
                    price: 1.0,
                    flight_start: at(1),
                    flight_end: at(2),
                }],
            }],
        }
    }

    fn plan(pricelist_id: &str) -> RoutePlan {
        RoutePlan {
            pricelist_id: pricelist_id.to_string(),
            valid_until: at(12),
            total_distance: 10,
            itineraries: vec![PricedItinerary {
                total_price: "1.00".into(),
                total_duration: "1 hours, 0 minutes".into(),
                offers: vec![],
            }],
        }
    }

    fn setup() -> (TempDir, SqlitePricelistStore, ItineraryCache) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqlitePricelistStore::new(dir.path().join("cache.db")).unwrap();
        store.initialize().unwrap();
        store.ingest(&price_list("a", at(12))).unwrap();
        let cache = ItineraryCache::new(store.clone(), &CacheConfig::default());
        (dir, store, cache)
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 1000);
        let tuned = config.with_max_capacity(5).with_ttl(Duration::from_secs(1));
        assert_eq!(tuned.max_capacity, 5);
        assert_eq!(tuned.ttl, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn lookup_miss_then_hit() {
        let (_dir, store, cache) = setup();
        let (earth, mars) = (name("Earth"), name("Mars"));

        assert!(cache.lookup("a", &earth, &mars).await.unwrap().is_none());
        assert!(cache.store(&earth, &mars, plan("a")).await.unwrap());
        assert_eq!(store.cache_entry_count().unwrap(), 1);

        let hit = cache.lookup("a", &earth, &mars).await.unwrap().unwrap();
        assert_eq!(*hit, plan("a"));
    }

    #[tokio::test]
    async fn durable_entries_survive_invalidation() {
        let (_dir, _store, cache) = setup();
        let (earth, mars) = (name("Earth"), name("Mars"));
        cache.store(&earth, &mars, plan("a")).await.unwrap();

        cache.invalidate_all();
        let hit = cache.lookup("a", &earth, &mars).await.unwrap();
        assert_eq!(hit.as_deref(), Some(&plan("a")));
    }

    #[tokio::test]
    async fn superseded_plan_is_not_stored() {
        let (_dir, store, cache) = setup();
        store.ingest(&price_list("b", at(13))).unwrap();
        let (earth, mars) = (name("Earth"), name("Mars"));

        assert!(!cache.store(&earth, &mars, plan("a")).await.unwrap());
        assert!(cache.lookup("a", &earth, &mars).await.unwrap().is_none());
        assert_eq!(store.cache_entry_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_misses_compute_once() {
        let (_dir, store, cache) = setup();
        let cache = Arc::new(cache);
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute("a", &name("Earth"), &name("Mars"), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(plan("a"))
                    })
                    .await
            }));
        }

        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert_eq!(result.pricelist_id, "a");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.cache_entry_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn durable_hit_skips_compute() {
        let (_dir, store, cache) = setup();
        let (earth, mars) = (name("Earth"), name("Mars"));
        store.store_cached_plan(&earth, &mars, &plan("a")).unwrap();

        let calls = AtomicUsize::new(0);
        let result = cache
            .get_or_compute("a", &earth, &mars, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(plan("other"))
            })
            .await
            .unwrap();
        assert_eq!(*result, plan("a"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (_dir, _store, cache) = setup();
        let (earth, mars) = (name("Earth"), name("Mars"));

        let err = cache
            .get_or_compute("a", &earth, &mars, || async {
                Err::<RoutePlan, _>(PlanError::Storage("boom".into()))
            })
            .await
            .unwrap_err();
        assert_eq!(err, PlanError::Storage("boom".into()));

        let ok = cache
            .get_or_compute("a", &earth, &mars, || async { Ok(plan("a")) })
            .await
            .unwrap();
        assert_eq!(ok.pricelist_id, "a");
    }
}
