//! SQLite connection setup and value encoding.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use super::error::{StoreError, StoreResult};

pub fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;\n\
         PRAGMA synchronous = NORMAL;\n\
         PRAGMA foreign_keys = ON;\n\
         PRAGMA temp_store = MEMORY;\n\
         PRAGMA busy_timeout = 5000;\n",
    )
}

/// Timestamps are stored as microseconds since the epoch so that SQL
/// ordering matches chronological ordering.
pub fn encode_time(time: DateTime<Utc>) -> i64 {
    time.timestamp_micros()
}

pub fn decode_time(table: &'static str, micros: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| StoreError::CorruptRow {
        table,
        message: format!("timestamp out of range: {micros}"),
    })
}
