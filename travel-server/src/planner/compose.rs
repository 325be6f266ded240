//! Itinerary composition.
//!
//! Combines per-leg offers into complete itineraries by backtracking over
//! the legs in path order. Each leg's offers are expected in ascending
//! start-time order, which makes the output order stable.

use tracing::debug;

use super::config::ComposeConfig;
use crate::domain::{Itinerary, LegOffer};

/// Whether `next` can be taken after arriving on `previous`.
fn connects(previous: &LegOffer, next: &LegOffer, config: &ComposeConfig) -> bool {
    next.flight_start > previous.flight_end + config.min_connection()
}

/// Generate every itinerary that takes one offer per leg, in leg order.
///
/// Every offer on the first leg is a valid start. On later legs an offer
/// is admissible only if it departs strictly after the offer chosen for
/// the previous leg arrives (plus the configured layover). Branches with
/// no admissible offer are dropped silently; an empty result means no
/// combination satisfies the connection rule.
pub fn compose(legs: &[Vec<LegOffer>], config: &ComposeConfig) -> Vec<Itinerary> {
    let mut itineraries = Vec::new();
    if legs.is_empty() {
        return itineraries;
    }

    let mut chosen: Vec<usize> = Vec::with_capacity(legs.len());
    extend(legs, config, &mut chosen, &mut itineraries);

    debug!(
        legs = legs.len(),
        itineraries = itineraries.len(),
        "Composed itineraries"
    );
    itineraries
}

fn extend(
    legs: &[Vec<LegOffer>],
    config: &ComposeConfig,
    chosen: &mut Vec<usize>,
    out: &mut Vec<Itinerary>,
) {
    let position = chosen.len();
    if position == legs.len() {
        let offers = chosen
            .iter()
            .enumerate()
            .map(|(leg, &idx)| legs[leg][idx].clone())
            .collect();
        out.push(Itinerary::new(offers));
        return;
    }

    let previous = position
        .checked_sub(1)
        .map(|prev| &legs[prev][chosen[prev]]);

    for (idx, offer) in legs[position].iter().enumerate() {
        if previous.is_some_and(|prev| !connects(prev, offer, config)) {
            continue;
        }
        chosen.push(idx);
        extend(legs, config, chosen, out);
        chosen.pop();
    }
}
