//! Composition configuration for the itinerary planner.

use chrono::Duration;

/// Configuration parameters for itinerary composition.
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    /// Minimum layover between consecutive flights (minutes).
    /// A flight is admissible only if it departs strictly later than the
    /// previous flight's arrival plus this margin. Zero means plain
    /// strict ordering.
    pub min_connection_mins: i64,
}

impl ComposeConfig {
    /// Create a new configuration with the given minimum layover.
    pub fn new(min_connection_mins: i64) -> Self {
        Self {
            min_connection_mins,
        }
    }

    /// Returns the minimum layover as a Duration.
    pub fn min_connection(&self) -> Duration {
        Duration::minutes(self.min_connection_mins)
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            min_connection_mins: 0,
        }
    }
}
