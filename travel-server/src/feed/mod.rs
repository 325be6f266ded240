//! Price-list feed: HTTP client and background refresh.

mod client;
mod error;
mod refresh;

pub use client::{DEFAULT_FEED_URL, FeedClient, FeedConfig, parse_price_list};
pub use error::{FeedError, RefreshError};
pub use refresh::{PriceListSource, RefreshConfig, refresh_once, run_refresh_loop};
