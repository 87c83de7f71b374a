pub mod entry;
pub mod orderbook;
pub mod summary;
pub mod update;

pub use entry::Entry;
pub use orderbook::OrderBook;
pub use summary::BookSummary;
pub use update::BookUpdate;
