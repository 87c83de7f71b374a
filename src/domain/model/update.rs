use super::entry::Entry;

/// One decoded batch of book deltas from the feed. Initial snapshots and
/// incremental updates both arrive in this form and take the same apply
/// path through the book.
#[derive(Clone, Debug, Default)]
pub struct BookUpdate {
    pub update_id: u64,
    pub asks: Vec<Entry>,
    pub bids: Vec<Entry>,
}

impl BookUpdate {
    /// True when the batch carries no levels on either side.
    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}
