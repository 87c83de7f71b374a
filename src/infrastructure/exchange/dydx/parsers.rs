use anyhow::Result;
use log::debug;
use serde_json::Value;

use crate::domain::error::FeedError;
use crate::domain::model::entry::Entry;
use crate::domain::model::update::BookUpdate;

use super::models::{DydxMessage, RawLevel, SnapshotContents, UpdateContents};

/// Decodes raw indexer frames into book updates.
pub struct DydxParser;

impl DydxParser {
    /// Classify and decode one frame.
    ///
    /// Returns `None` for frames carrying no book content (connection acks
    /// and empty batches). A frame with a malformed level or an unknown
    /// `type` is rejected whole; nothing from it reaches the book.
    pub fn parse_message(raw: &str) -> Result<Option<BookUpdate>> {
        let message: DydxMessage = serde_json::from_str(raw)?;

        let update = match message.kind.as_str() {
            "connected" => return Ok(None),
            "subscribed" => {
                debug!("subscription acknowledged, channel id: {:?}", message.id);
                Self::parse_snapshot(message.message_id, message.contents)?
            }
            "channel_data" => Self::parse_update(message.message_id, message.contents)?,
            other => return Err(FeedError::UnexpectedMessageKind(other.to_string()).into()),
        };

        if update.is_empty() {
            Ok(None)
        } else {
            Ok(Some(update))
        }
    }

    /// Decode a `subscribed` snapshot: levels as `{price, size}` objects.
    fn parse_snapshot(update_id: u64, contents: Option<Value>) -> Result<BookUpdate> {
        let contents: SnapshotContents = match contents {
            Some(value) => serde_json::from_value(value)?,
            None => SnapshotContents::default(),
        };

        Ok(BookUpdate {
            update_id,
            asks: Self::object_entries(&contents.asks)?,
            bids: Self::object_entries(&contents.bids)?,
        })
    }

    /// Decode a `channel_data` update: levels as `["price", "size"]` pairs.
    fn parse_update(update_id: u64, contents: Option<Value>) -> Result<BookUpdate> {
        let contents: UpdateContents = match contents {
            Some(value) => serde_json::from_value(value)?,
            None => UpdateContents::default(),
        };

        Ok(BookUpdate {
            update_id,
            asks: Self::pair_entries(&contents.asks)?,
            bids: Self::pair_entries(&contents.bids)?,
        })
    }

    fn object_entries(levels: &[RawLevel]) -> Result<Vec<Entry>, FeedError> {
        levels
            .iter()
            .map(|level| {
                Ok(Entry {
                    price: Self::parse_field("price", &level.price)?,
                    size: Self::parse_field("size", &level.size)?,
                })
            })
            .collect()
    }

    fn pair_entries(pairs: &[[String; 2]]) -> Result<Vec<Entry>, FeedError> {
        pairs
            .iter()
            .map(|[price, size]| {
                Ok(Entry {
                    price: Self::parse_field("price", price)?,
                    size: Self::parse_field("size", size)?,
                })
            })
            .collect()
    }

    fn parse_field(field: &'static str, value: &str) -> Result<f64, FeedError> {
        value.parse::<f64>().map_err(|_| FeedError::MalformedLevel {
            field,
            value: value.to_string(),
        })
    }
}
