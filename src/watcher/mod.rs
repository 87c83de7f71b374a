//! Order Book Watcher Module
//!
//! This module contains the long-running session logic: subscribing to the
//! feed, draining update batches into the order book, and rendering the
//! top-of-book summary whenever it changes.

pub mod config;
mod book_watcher;

pub use book_watcher::BookWatcher;
