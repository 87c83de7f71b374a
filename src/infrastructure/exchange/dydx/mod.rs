pub mod client;
pub mod models;
pub mod parsers;

pub use client::DydxClient;
pub use parsers::DydxParser;
