//! Durable price-list storage.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use tracing::{debug, info};

use super::error::{StoreError, StoreResult};
use super::sqlite::{configure_connection, decode_time, encode_time};
use crate::domain::{LegOffer, LocationName, PriceList, PriceListSummary, RoutePlan};
use crate::graph::RouteEdge;
use crate::planner::{LegOffers, OfferProvider, PlanError};

const SCHEMA: &str = include_str!("schema.sql");

/// Retention policy for stored price lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionConfig {
    max_price_lists: usize,
}

impl RetentionConfig {
    pub const DEFAULT_MAX_PRICE_LISTS: usize = 15;

    /// At least one price list is always retained.
    pub fn new(max_price_lists: usize) -> Self {
        Self {
            max_price_lists: max_price_lists.max(1),
        }
    }

    pub fn max_price_lists(&self) -> usize {
        self.max_price_lists
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PRICE_LISTS)
    }
}

/// Result of ingesting a price list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A list with this id was already stored; nothing changed.
    AlreadyPresent,

    /// The list was stored.
    Ingested {
        /// Ids of the price lists evicted to make room, oldest first.
        evicted: Vec<String>,
        /// Number of cached results dropped because their list is no
        /// longer current.
        purged_cache_entries: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SqlitePricelistStoreBuilder {
    path: Option<PathBuf>,
    retention: RetentionConfig,
}

impl SqlitePricelistStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn retention(mut self, retention: RetentionConfig) -> Self {
        self.retention = retention;
        self
    }

    pub fn build(self) -> StoreResult<SqlitePricelistStore> {
        let path = self.path.ok_or(StoreError::MissingStore)?;
        Ok(SqlitePricelistStore {
            path,
            retention: self.retention,
        })
    }
}

/// Price lists, their cached query results and bookings in one SQLite
/// database.
///
/// Every operation opens its own connection, so the store is cheap to
/// clone and safe to use from blocking worker threads. Ingestion runs in
/// a single immediate transaction: readers see either the old current
/// list or the new one, never a partial snapshot.
#[derive(Debug, Clone)]
pub struct SqlitePricelistStore {
    path: PathBuf,
    retention: RetentionConfig,
}

impl SqlitePricelistStore {
    pub fn builder() -> SqlitePricelistStoreBuilder {
        SqlitePricelistStoreBuilder::new()
    }

    pub fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        SqlitePricelistStoreBuilder::new().path(path).build()
    }

    pub(super) fn open(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.path).map_err(|source| {
            StoreError::OpenDatabase {
                path: self.path.clone(),
                source,
            }
        })?;
        configure_connection(&conn).map_err(|source| StoreError::OpenDatabase {
            path: self.path.clone(),
            source,
        })?;
        Ok(conn)
    }

    pub fn initialize(&self) -> StoreResult<()> {
        let conn = self.open()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Store a price list, evicting the oldest lists beyond the retention
    /// limit and dropping cached results of lists that are no longer
    /// current.
    ///
    /// Re-ingesting a known id is a no-op, even if the payload differs.
    /// Any failure rolls back the whole ingest, evictions included.
    pub fn ingest(&self, list: &PriceList) -> StoreResult<IngestOutcome> {
        let mut conn = self.open()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if price_list_exists(&tx, &list.id)? {
            debug!(pricelist = %list.id, "Price list already stored");
            return Ok(IngestOutcome::AlreadyPresent);
        }
        list.validate()?;

        let evicted = evict_oldest(&tx, self.retention.max_price_lists)?;
        insert_price_list(&tx, list)?;

        let current = current_summary(&tx)?.ok_or(StoreError::NoPriceList)?;
        let purged_cache_entries = tx.execute(
            "DELETE FROM cached_routes WHERE pricelist_id != ?1",
            params![current.id],
        )?;
        tx.commit()?;

        info!(
            pricelist = %list.id,
            valid_until = %list.valid_until,
            legs = list.legs.len(),
            offers = list.offer_count(),
            evicted = evicted.len(),
            purged_cache_entries,
            "Stored price list"
        );
        Ok(IngestOutcome::Ingested {
            evicted,
            purged_cache_entries,
        })
    }

    /// Evict the oldest price lists until there is room for one more.
    pub fn enforce_retention(&self) -> StoreResult<Vec<String>> {
        let mut conn = self.open()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let evicted = evict_oldest(&tx, self.retention.max_price_lists)?;
        tx.commit()?;
        Ok(evicted)
    }

    /// The price list with the latest expiry, if any.
    pub fn current(&self) -> StoreResult<Option<PriceListSummary>> {
        let conn = self.open()?;
        current_summary(&conn)
    }

    /// Id of the current price list.
    pub fn current_id(&self) -> StoreResult<String> {
        self.current()?
            .map(|summary| summary.id)
            .ok_or(StoreError::NoPriceList)
    }

    pub fn price_list_count(&self) -> StoreResult<usize> {
        let conn = self.open()?;
        count_price_lists(&conn)
    }

    /// Stored price-list ids, oldest expiry first.
    pub fn price_list_ids(&self) -> StoreResult<Vec<String>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT id FROM pricelists ORDER BY valid_until ASC, id ASC")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    /// Offers of the leg from `from` to `to` in the given price list,
    /// ordered by departure.
    pub fn leg_offers(
        &self,
        pricelist_id: &str,
        from: &LocationName,
        to: &LocationName,
    ) -> StoreResult<LegOffers> {
        let conn = self.open()?;
        let distance: Option<i64> = conn
            .query_row(
                "SELECT r.distance
                 FROM legs l
                 JOIN route_infos r ON r.pricelist_id = l.pricelist_id AND r.leg_id = l.id
                 JOIN locations lf ON lf.pricelist_id = r.pricelist_id AND lf.id = r.from_id
                 JOIN locations lt ON lt.pricelist_id = r.pricelist_id AND lt.id = r.to_id
                 WHERE l.pricelist_id = ?1 AND lf.name = ?2 AND lt.name = ?3
                 LIMIT 1",
                params![pricelist_id, from.as_str(), to.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(distance) = distance else {
            return Ok(LegOffers::default());
        };

        let mut stmt = conn.prepare(
            "SELECT c.name, c.id, o.price, o.flight_start, o.flight_end
             FROM legs l
             JOIN route_infos r ON r.pricelist_id = l.pricelist_id AND r.leg_id = l.id
             JOIN locations lf ON lf.pricelist_id = r.pricelist_id AND lf.id = r.from_id
             JOIN locations lt ON lt.pricelist_id = r.pricelist_id AND lt.id = r.to_id
             JOIN offers o ON o.pricelist_id = l.pricelist_id AND o.leg_id = l.id
             JOIN companies c ON c.pricelist_id = o.pricelist_id AND c.id = o.company_id
             WHERE l.pricelist_id = ?1 AND lf.name = ?2 AND lt.name = ?3
             ORDER BY o.flight_start ASC, o.id ASC",
        )?;
        let rows = stmt
            .query_map(params![pricelist_id, from.as_str(), to.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let offers = rows
            .into_iter()
            .map(|(company_name, company_id, price, start, end)| {
                Ok(LegOffer {
                    company_name,
                    company_id,
                    price,
                    flight_start: decode_time("offers", start)?,
                    flight_end: decode_time("offers", end)?,
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(LegOffers { distance, offers })
    }

    /// A previously computed plan for this price list and location pair.
    pub fn cached_plan(
        &self,
        pricelist_id: &str,
        origin: &LocationName,
        destination: &LocationName,
    ) -> StoreResult<Option<RoutePlan>> {
        let conn = self.open()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM cached_routes
                 WHERE pricelist_id = ?1 AND origin = ?2 AND destination = ?3",
                params![pricelist_id, origin.as_str(), destination.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        payload
            .map(|json| serde_json::from_str(&json).map_err(StoreError::from))
            .transpose()
    }

    /// Persist a computed plan.
    ///
    /// The write only happens while the plan's price list is still
    /// current, so a slow computation can't resurrect results that an
    /// ingest has already purged. Returns whether the plan was stored.
    pub fn store_cached_plan(
        &self,
        origin: &LocationName,
        destination: &LocationName,
        plan: &RoutePlan,
    ) -> StoreResult<bool> {
        let payload = serde_json::to_string(plan)?;
        let conn = self.open()?;
        let written = conn.execute(
            "INSERT INTO cached_routes (pricelist_id, origin, destination, payload)
             SELECT ?1, ?2, ?3, ?4
             WHERE ?1 = (SELECT id FROM pricelists ORDER BY valid_until DESC, id DESC LIMIT 1)
             ON CONFLICT (pricelist_id, origin, destination) DO UPDATE SET payload = excluded.payload",
            params![plan.pricelist_id, origin.as_str(), destination.as_str(), payload],
        )?;
        Ok(written > 0)
    }

    pub fn cache_entry_count(&self) -> StoreResult<usize> {
        let conn = self.open()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cached_routes", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl OfferProvider for SqlitePricelistStore {
    fn leg_offers(&self, pricelist_id: &str, edge: &RouteEdge) -> Result<LegOffers, PlanError> {
        SqlitePricelistStore::leg_offers(self, pricelist_id, &edge.from, &edge.to)
            .map_err(PlanError::from)
    }
}

fn price_list_exists(conn: &Connection, id: &str) -> StoreResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM pricelists WHERE id = ?1",
            params![id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn count_price_lists(conn: &Connection) -> StoreResult<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM pricelists", [], |row| row.get(0))?;
    Ok(count as usize)
}

fn current_summary(conn: &Connection) -> StoreResult<Option<PriceListSummary>> {
    let row: Option<(String, i64)> = conn
        .query_row(
            "SELECT id, valid_until FROM pricelists
             ORDER BY valid_until DESC, id DESC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    row.map(|(id, valid_until)| {
        Ok(PriceListSummary {
            id,
            valid_until: decode_time("pricelists", valid_until)?,
        })
    })
    .transpose()
}

/// Delete oldest-expiring lists while the count is at or above `cap`.
fn evict_oldest(tx: &Transaction<'_>, cap: usize) -> StoreResult<Vec<String>> {
    let mut evicted = Vec::new();
    while count_price_lists(tx)? >= cap {
        let oldest: Option<String> = tx
            .query_row(
                "SELECT id FROM pricelists ORDER BY valid_until ASC, id ASC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let Some(oldest) = oldest else {
            break;
        };
        delete_price_list(tx, &oldest)?;
        info!(pricelist = %oldest, "Evicted price list");
        evicted.push(oldest);
    }
    Ok(evicted)
}

fn delete_price_list(tx: &Transaction<'_>, id: &str) -> StoreResult<()> {
    for table in [
        "companies",
        "offers",
        "locations",
        "route_infos",
        "legs",
        "bookings",
        "cached_routes",
    ] {
        tx.execute(
            &format!("DELETE FROM {table} WHERE pricelist_id = ?1"),
            params![id],
        )?;
    }
    tx.execute("DELETE FROM pricelists WHERE id = ?1", params![id])?;
    Ok(())
}

fn insert_price_list(tx: &Transaction<'_>, list: &PriceList) -> StoreResult<()> {
    tx.execute(
        "INSERT INTO pricelists (id, valid_until) VALUES (?1, ?2)",
        params![list.id, encode_time(list.valid_until)],
    )?;

    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO locations (pricelist_id, id, name) VALUES (?1, ?2, ?3)",
        )?;
        for location in list.locations() {
            stmt.execute(params![list.id, location.id, location.name.as_str()])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO companies (pricelist_id, id, name) VALUES (?1, ?2, ?3)",
        )?;
        for company in list.companies() {
            stmt.execute(params![list.id, company.id, company.name])?;
        }
    }

    let mut leg_stmt =
        tx.prepare("INSERT INTO legs (pricelist_id, id, route_info_id) VALUES (?1, ?2, ?3)")?;
    let mut route_stmt = tx.prepare(
        "INSERT INTO route_infos (pricelist_id, leg_id, id, from_id, to_id, distance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    let mut offer_stmt = tx.prepare(
        "INSERT INTO offers (pricelist_id, leg_id, id, company_id, price, flight_start, flight_end)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    for leg in &list.legs {
        let route = &leg.route_info;
        leg_stmt.execute(params![list.id, leg.id, route.id])?;
        route_stmt.execute(params![
            list.id,
            leg.id,
            route.id,
            route.from.id,
            route.to.id,
            route.distance
        ])?;
        for offer in &leg.offers {
            offer_stmt.execute(params![
                list.id,
                leg.id,
                offer.id,
                offer.company.id,
                offer.price,
                encode_time(offer.flight_start),
                encode_time(offer.flight_end)
            ])?;
        }
    }
    Ok(())
}

/// Current time as stored in the database.
pub(super) fn now_micros() -> i64 {
    encode_time(Utc::now())
}

#[cfg(test)]
#[path = "pricelists_tests.rs"]
mod tests;
