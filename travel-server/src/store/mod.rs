//! SQLite-backed storage for price lists, cached route plans and bookings.
//!
//! Each price list is stored as one snapshot keyed by its id; locations
//! and companies are scoped to the list that mentions them. Cached plans
//! and bookings carry the id of the list they were computed from and are
//! removed together with it.

mod bookings;
mod error;
mod pricelists;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use pricelists::{
    IngestOutcome, RetentionConfig, SqlitePricelistStore, SqlitePricelistStoreBuilder,
};

/// Run a store operation on the blocking thread pool.
pub async fn blocking<T, E, F>(f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| E::from(StoreError::Task(err.to_string())))?
}
