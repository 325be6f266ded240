//! Background price-list refresh.
//!
//! While the current list is valid the loop sleeps until it expires. Once
//! it has expired (or nothing is stored yet) a new list is fetched and
//! ingested. Failures are logged and retried after a fixed backoff; they
//! never reach route queries, which keep serving the last stored list.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::error::{FeedError, RefreshError};
use crate::domain::{PriceList, PriceListSummary};
use crate::service::RouteService;
use crate::store::IngestOutcome;

/// Something that can produce the latest price list.
pub trait PriceListSource {
    fn fetch(&self) -> impl Future<Output = Result<PriceList, FeedError>> + Send;
}

/// Configuration for the refresh loop.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Delay before retrying after a failure, or after fetching a list
    /// that is already expired.
    pub retry_backoff: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            retry_backoff: Duration::from_secs(60),
        }
    }
}

impl RefreshConfig {
    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }
}

/// Time left on a list, or `None` once it has expired.
fn remaining(summary: &PriceListSummary, now: DateTime<Utc>) -> Option<Duration> {
    summary
        .remaining_at(now)
        .and_then(|left| left.to_std().ok())
}

/// Run one refresh step, returning how long to wait before the next.
///
/// Nothing is fetched while the current list is still valid.
pub async fn refresh_once<S: PriceListSource>(
    service: &RouteService,
    source: &S,
    config: &RefreshConfig,
    now: DateTime<Utc>,
) -> Result<Duration, RefreshError> {
    if let Some(current) = service.current().await?
        && let Some(wait) = remaining(&current, now)
    {
        return Ok(wait);
    }

    let list = source.fetch().await?;
    let fetched = PriceListSummary {
        id: list.id.clone(),
        valid_until: list.valid_until,
    };

    match service.ingest(list).await? {
        IngestOutcome::AlreadyPresent => {
            info!(pricelist = %fetched.id, "Feed returned a known price list");
        }
        IngestOutcome::Ingested {
            evicted,
            purged_cache_entries,
        } => {
            info!(
                pricelist = %fetched.id,
                valid_until = %fetched.valid_until,
                evicted = evicted.len(),
                purged_cache_entries,
                "Ingested price list"
            );
        }
    }

    Ok(remaining(&fetched, now).unwrap_or_else(|| {
        warn!(
            pricelist = %fetched.id,
            valid_until = %fetched.valid_until,
            "Fetched price list is already expired"
        );
        config.retry_backoff
    }))
}

/// Keep the store supplied with a valid price list. Never returns.
pub async fn run_refresh_loop<S: PriceListSource>(
    service: Arc<RouteService>,
    source: S,
    config: RefreshConfig,
) {
    loop {
        let wait = match refresh_once(&service, &source, &config, Utc::now()).await {
            Ok(wait) => wait,
            Err(err) => {
                warn!(error = %err, retry_in = ?config.retry_backoff, "Price list refresh failed");
                config.retry_backoff
            }
        };
        tokio::time::sleep(wait).await;
    }
}
