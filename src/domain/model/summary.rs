use serde::Serialize;

use super::entry::Entry;

/// Immutable point-in-time projection of the top of book, for rendering
/// and serialization only. Field order is part of the output contract.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BookSummary {
    pub best_bid: Entry,
    pub best_ask: Entry,
    pub spread: f64,
}
