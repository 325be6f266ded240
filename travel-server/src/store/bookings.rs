//! Booking persistence.

use rusqlite::params;
use tracing::info;

use super::error::StoreResult;
use super::pricelists::{SqlitePricelistStore, now_micros};
use crate::domain::Booking;

impl SqlitePricelistStore {
    /// Record a booking, returning its row id.
    ///
    /// The booking is stored under the price list it names whether or not
    /// that list is still current, and is deleted along with that list.
    pub fn add_booking(&self, booking: &Booking) -> StoreResult<i64> {
        let company_names = serde_json::to_string(&booking.company_names)?;
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO bookings (
                company_names, start_time, first_name, last_name, total_price,
                total_duration, pricelist_id, origin, destination, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                company_names,
                booking.start_time,
                booking.first_name,
                booking.last_name,
                booking.total_price,
                booking.total_duration,
                booking.pricelist_id,
                booking.origin.as_str(),
                booking.destination.as_str(),
                now_micros(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(
            booking = id,
            pricelist = %booking.pricelist_id,
            origin = %booking.origin,
            destination = %booking.destination,
            "Stored booking"
        );
        Ok(id)
    }

    /// Number of bookings recorded against a price list.
    pub fn booking_count(&self, pricelist_id: &str) -> StoreResult<usize> {
        let conn = self.open()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM bookings WHERE pricelist_id = ?1",
            params![pricelist_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Company names of every booking against a price list, oldest first.
    pub fn booked_companies(&self, pricelist_id: &str) -> StoreResult<Vec<Vec<String>>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT company_names FROM bookings WHERE pricelist_id = ?1 ORDER BY id ASC",
        )?;
        let raw = stmt
            .query_map(params![pricelist_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        raw.iter()
            .map(|json| serde_json::from_str(json).map_err(Into::into))
            .collect()
    }
}
