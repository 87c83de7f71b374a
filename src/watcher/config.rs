/// Order book channel name on the indexer feed.
pub const CHANNEL: &str = "v4_orderbook";

/// Seconds between keep-alive pings.
pub const PING_INTERVAL_SEC: u64 = 30;
