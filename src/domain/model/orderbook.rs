use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use ordered_float::OrderedFloat;

use super::entry::Entry;
use super::summary::BookSummary;

pub type Price = f64;
pub type Size = f64;

/// Size and provenance stored at one price level. The update id records
/// which feed message last touched the level and is the only ordering
/// signal available when a crossed book has to be repaired.
#[derive(Clone, Copy, Debug)]
struct StoredLevel {
    size: Size,
    update_id: u64,
}

type Side = BTreeMap<OrderedFloat<Price>, StoredLevel>;

/// Two-sided price-level order book driven by absolute-size level updates.
///
/// `best_bid` and `best_ask` are a cache over the level maps, recomputed
/// inside every `update` and never mutated on their own. Empty sides are
/// represented by the `Entry::NO_ASK`/`Entry::NO_BID` sentinels so the
/// spread stays well-defined (and very large) when there is no market.
///
/// Not safe for concurrent mutation: one sequential stream of update
/// batches, applied in feed order by a single consumer. Update ids must be
/// monotonically assigned by the feed; the book cannot verify that itself.
pub struct OrderBook {
    bids: Side,
    asks: Side,
    best_bid: Entry,
    best_ask: Entry,
    uncross: bool,
}

impl OrderBook {
    /// Create an empty book. `uncross` enables the crossed-book repair for
    /// the lifetime of the book; it is a global toggle, not per update.
    pub fn new(uncross: bool) -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            best_bid: Entry::NO_BID,
            best_ask: Entry::NO_ASK,
            uncross,
        }
    }

    /// Apply one update batch and report whether the visible top of book
    /// (best bid, best ask or spread) changed.
    ///
    /// Deltas are absolute replacements: a positive size inserts or
    /// overwrites the level, a zero size removes it. Snapshot and
    /// incremental batches are applied identically.
    pub fn update(&mut self, update_id: u64, asks: &[Entry], bids: &[Entry]) -> bool {
        let prev_best_ask = self.best_ask;
        let prev_best_bid = self.best_bid;
        let prev_spread = prev_best_ask.price - prev_best_bid.price;

        Self::apply(&mut self.asks, asks, update_id);
        Self::apply(&mut self.bids, bids, update_id);

        let spread = self.resolve();

        self.best_ask != prev_best_ask || self.best_bid != prev_best_bid || spread != prev_spread
    }

    /// Current best bid, or `Entry::NO_BID` when the bid side is empty.
    pub fn best_bid(&self) -> Entry {
        self.best_bid
    }

    /// Current best ask, or `Entry::NO_ASK` when the ask side is empty.
    pub fn best_ask(&self) -> Entry {
        self.best_ask
    }

    pub fn spread(&self) -> f64 {
        self.best_ask.price - self.best_bid.price
    }

    /// Number of resting bid levels.
    pub fn bid_depth(&self) -> usize {
        self.bids.len()
    }

    /// Number of resting ask levels.
    pub fn ask_depth(&self) -> usize {
        self.asks.len()
    }

    /// Snapshot of the cached top of book.
    pub fn summarize(&self) -> BookSummary {
        BookSummary {
            best_bid: self.best_bid,
            best_ask: self.best_ask,
            spread: self.spread(),
        }
    }

    fn apply(side: &mut Side, deltas: &[Entry], update_id: u64) {
        for delta in deltas {
            let key = OrderedFloat(delta.price);
            if delta.size == 0.0 {
                side.remove(&key);
            } else {
                side.insert(
                    key,
                    StoredLevel {
                        size: delta.size,
                        update_id,
                    },
                );
            }
        }
    }

    /// Recompute the cached best levels and, when enabled, repair a crossed
    /// book. Returns the resulting spread.
    ///
    /// A crossed book (spread <= 0 with both sides populated) is repaired
    /// one best-bid/best-ask pair at a time: the side whose top level was
    /// written by the older update is stale and gets removed; if both tops
    /// came from the same update the crossing message represents an
    /// execution, and the sizes are netted against each other. Each pass
    /// removes at least one level or shrinks the resting size, so the loop
    /// ends within min(|asks|, |bids|) passes.
    fn resolve(&mut self) -> f64 {
        let mut best_ask = Self::lowest(&self.asks).unwrap_or(Entry::NO_ASK);
        let mut best_bid = Self::highest(&self.bids).unwrap_or(Entry::NO_BID);
        let mut spread = best_ask.price - best_bid.price;

        let mut passes = 0u32;
        while self.uncross && spread <= 0.0 && !self.bids.is_empty() && !self.asks.is_empty() {
            passes += 1;
            warn!("crossing detected; uncrossing pass={}", passes);

            let ask_key = OrderedFloat(best_ask.price);
            let bid_key = OrderedFloat(best_bid.price);
            let ask_id = self.asks[&ask_key].update_id;
            let bid_id = self.bids[&bid_key].update_id;

            if bid_id < ask_id {
                self.bids.remove(&bid_key);
            } else if bid_id > ask_id {
                self.asks.remove(&ask_key);
            } else if best_bid.size > best_ask.size {
                self.asks.remove(&ask_key);
                self.bids.insert(
                    bid_key,
                    StoredLevel {
                        size: best_bid.size - best_ask.size,
                        update_id: bid_id,
                    },
                );
            } else if best_bid.size < best_ask.size {
                self.bids.remove(&bid_key);
                self.asks.insert(
                    ask_key,
                    StoredLevel {
                        size: best_ask.size - best_bid.size,
                        update_id: ask_id,
                    },
                );
            } else {
                self.asks.remove(&ask_key);
                self.bids.remove(&bid_key);
            }

            best_ask = Self::lowest(&self.asks).unwrap_or(Entry::NO_ASK);
            best_bid = Self::highest(&self.bids).unwrap_or(Entry::NO_BID);
            spread = best_ask.price - best_bid.price;
        }

        self.best_ask = best_ask;
        self.best_bid = best_bid;
        spread
    }

    fn lowest(side: &Side) -> Option<Entry> {
        side.iter().next().map(|(price, level)| Entry {
            price: price.0,
            size: level.size,
        })
    }

    fn highest(side: &Side) -> Option<Entry> {
        side.iter().next_back().map(|(price, level)| Entry {
            price: price.0,
            size: level.size,
        })
    }
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summarize();
        // The summary's shape is fully under our control; failing to encode
        // it is a programming defect, not a runtime condition.
        let encoded = serde_json::to_string(&summary)
            .unwrap_or_else(|e| panic!("could not encode book summary {:?}: {}", summary, e));
        f.write_str(&encoded)
    }
}
