//! Itinerary totals.
//!
//! Reduces a selection of offers to its total price and elapsed time and
//! renders both for presentation. The rendered forms are part of the
//! public response, so their exact shape matters.

use chrono::Duration;

use crate::domain::{Itinerary, LegOffer, PricedItinerary};

/// Total price and elapsed time of an itinerary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// Sum of all chosen offer prices.
    pub price: f64,

    /// Earliest departure to latest arrival, rounded to the nearest minute.
    pub duration: Duration,
}

/// Compute the totals of a set of chosen offers.
///
/// An empty selection has zero price and zero duration.
pub fn aggregate(offers: &[LegOffer]) -> Totals {
    let price: f64 = offers.iter().map(|o| o.price).sum();

    let first_departure = offers.iter().map(|o| o.flight_start).min();
    let last_arrival = offers.iter().map(|o| o.flight_end).max();
    let duration = match (first_departure, last_arrival) {
        (Some(start), Some(end)) => round_to_minute(end - start),
        _ => Duration::zero(),
    };

    Totals { price, duration }
}

/// Round a duration to the nearest whole minute, halves away from zero.
pub fn round_to_minute(duration: Duration) -> Duration {
    const MINUTE_NANOS: i128 = 60_000_000_000;

    let nanos = duration
        .num_nanoseconds()
        .map(i128::from)
        .unwrap_or_else(|| i128::from(duration.num_milliseconds()) * 1_000_000);

    let minutes = if nanos >= 0 {
        (nanos + MINUTE_NANOS / 2) / MINUTE_NANOS
    } else {
        (nanos - MINUTE_NANOS / 2) / MINUTE_NANOS
    };
    Duration::minutes(minutes as i64)
}

/// Render a price with exactly two decimals.
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// Render a duration as days, hours and minutes.
///
/// Days and hours are each left out when zero; minutes always appear.
///
/// ```
/// use chrono::Duration;
/// use travel_server::planner::format_duration;
///
/// assert_eq!(format_duration(Duration::minutes(125)), "2 hours, 5 minutes");
/// assert_eq!(format_duration(Duration::minutes(45)), "45 minutes");
/// assert_eq!(format_duration(Duration::minutes(1450)), "1 days, 10 minutes");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_minutes().max(0);
    let days = total / (24 * 60);
    let hours = (total % (24 * 60)) / 60;
    let minutes = total % 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{days} days, "));
    }
    if hours > 0 {
        out.push_str(&format!("{hours} hours, "));
    }
    out.push_str(&format!("{minutes} minutes"));
    out
}

/// Attach presentation totals to an itinerary.
pub fn price_itinerary(itinerary: Itinerary) -> PricedItinerary {
    let totals = aggregate(itinerary.offers());
    PricedItinerary {
        total_price: format_price(totals.price),
        total_duration: format_duration(totals.duration),
        offers: itinerary.into_offers(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
    }

    fn offer_strategy() -> impl Strategy<Value = LegOffer> {
        (0u32..100_000, 0i64..500_000, 1i64..500_000).prop_map(|(cents, start, len)| LegOffer {
            company_name: "P".to_string(),
            company_id: "p".to_string(),
            price: f64::from(cents) / 100.0,
            flight_start: base() + Duration::seconds(start),
            flight_end: base() + Duration::seconds(start + len),
        })
    }

    proptest! {
        #[test]
        fn duration_is_rounded_span(offers in prop::collection::vec(offer_strategy(), 1..5)) {
            let start = offers.iter().map(|o| o.flight_start).min().unwrap();
            let end = offers.iter().map(|o| o.flight_end).max().unwrap();
            let span_secs = (end - start).num_seconds();

            let totals = aggregate(&offers);
            prop_assert_eq!(totals.duration.num_minutes(), (span_secs + 30) / 60);
        }

        #[test]
        fn price_is_sum(offers in prop::collection::vec(offer_strategy(), 0..5)) {
            let expected: f64 = offers.iter().map(|o| o.price).sum();
            let totals = aggregate(&offers);
            prop_assert_eq!(format_price(totals.price), format!("{:.2}", expected));
        }

        #[test]
        fn formatted_duration_reassembles(minutes in 0i64..100_000) {
            let text = format_duration(Duration::minutes(minutes));
            let mut total = 0;
            for part in text.split(", ") {
                let (value, unit) = part.split_once(' ').unwrap();
                let value: i64 = value.parse().unwrap();
                total += match unit {
                    "days" => value * 1440,
                    "hours" => value * 60,
                    "minutes" => value,
                    other => panic!("unexpected unit {other}"),
                };
            }
            prop_assert_eq!(total, minutes);
            prop_assert!(text.ends_with(" minutes"));
        }
    }
}
