// Models for dYdX indexer websocket messages
use serde::Deserialize;
use serde_json::Value;

/// Outer envelope shared by every frame the indexer sends. `contents` is
/// left raw because its shape depends on `type`.
#[derive(Debug, Deserialize)]
pub struct DydxMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message_id: u64,
    #[serde(default)]
    pub contents: Option<Value>,
}

/// Snapshot levels arrive as objects with string-encoded numbers.
#[derive(Debug, Deserialize)]
pub struct RawLevel {
    pub price: String,
    pub size: String,
}

/// `subscribed` contents: the initial full book.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SnapshotContents {
    pub bids: Vec<RawLevel>,
    pub asks: Vec<RawLevel>,
}

/// `channel_data` contents: incremental deltas as `["price", "size"]` pairs.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateContents {
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
}
