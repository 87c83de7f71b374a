use thiserror::Error;

/// Errors surfaced by the feed decoding layer. The order book core itself
/// only accepts already-parsed numeric deltas and cannot fail.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A price or size field could not be parsed as a number.
    #[error("malformed level: expected {field} to be a float; got {value:?}")]
    MalformedLevel { field: &'static str, value: String },

    /// A feed message was neither connection ack, subscription ack, nor update.
    #[error("unexpected message type: {0}")]
    UnexpectedMessageKind(String),

    /// An operation required a live websocket connection.
    #[error("not connected to websocket server")]
    NotConnected,
}
