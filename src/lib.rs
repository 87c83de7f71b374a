pub mod config_loader;
pub mod domain;
pub mod infrastructure;
pub mod watcher;

pub use domain::error::FeedError;
pub use domain::model::entry::Entry;
pub use domain::model::orderbook::OrderBook;
pub use domain::model::summary::BookSummary;
pub use domain::model::update::BookUpdate;
pub use infrastructure::exchange::dydx::*;
pub use watcher::BookWatcher;
