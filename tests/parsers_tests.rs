use anyhow::Result;
use serde_json::json;

use dydx_book_client::domain::error::FeedError;
use dydx_book_client::infrastructure::exchange::dydx::parsers::DydxParser;

#[test]
fn test_connected_message_carries_no_update() -> Result<()> {
    let raw = json!({
        "type": "connected",
        "connection_id": "c5a28fa3",
        "message_id": 0
    })
    .to_string();

    let update = DydxParser::parse_message(&raw)?;
    assert!(update.is_none());

    Ok(())
}

#[test]
fn test_subscribed_message_decodes_snapshot() -> Result<()> {
    let raw = json!({
        "type": "subscribed",
        "channel": "v4_orderbook",
        "id": "ETH-USD",
        "message_id": 1,
        "contents": {
            "bids": [
                { "price": "3500.5", "size": "1.25" },
                { "price": "3499.0", "size": "0.5" }
            ],
            "asks": [
                { "price": "3501.0", "size": "2.0" }
            ]
        }
    })
    .to_string();

    let update = DydxParser::parse_message(&raw)?.expect("snapshot should carry levels");

    assert_eq!(update.update_id, 1);
    assert_eq!(update.bids.len(), 2);
    assert_eq!(update.asks.len(), 1);
    assert_eq!(update.bids[0].price, 3500.5);
    assert_eq!(update.bids[0].size, 1.25);
    assert_eq!(update.asks[0].price, 3501.0);
    assert_eq!(update.asks[0].size, 2.0);

    Ok(())
}

#[test]
fn test_channel_data_decodes_string_pairs() -> Result<()> {
    let raw = json!({
        "type": "channel_data",
        "channel": "v4_orderbook",
        "id": "ETH-USD",
        "message_id": 42,
        "contents": {
            "bids": [["3500.5", "0"]],
            "asks": [["3501.0", "1.5"], ["3502.0", "3.0"]]
        }
    })
    .to_string();

    let update = DydxParser::parse_message(&raw)?.expect("update should carry levels");

    assert_eq!(update.update_id, 42);
    assert_eq!(update.bids.len(), 1);
    // Zero sizes decode as-is; removal happens in the book, not the parser
    assert_eq!(update.bids[0].size, 0.0);
    assert_eq!(update.asks.len(), 2);
    assert_eq!(update.asks[1].price, 3502.0);

    Ok(())
}

#[test]
fn test_unknown_message_type_is_rejected() {
    let raw = json!({
        "type": "unsubscribed",
        "message_id": 3
    })
    .to_string();

    let err = DydxParser::parse_message(&raw).unwrap_err();

    match err.downcast_ref::<FeedError>() {
        Some(FeedError::UnexpectedMessageKind(kind)) => assert_eq!(kind, "unsubscribed"),
        other => panic!("Expected UnexpectedMessageKind, got {:?}", other),
    }
}

#[test]
fn test_malformed_price_rejects_whole_message() {
    let raw = json!({
        "type": "channel_data",
        "message_id": 4,
        "contents": {
            "bids": [["not-a-number", "1.0"]],
            "asks": [["3501.0", "1.5"]]
        }
    })
    .to_string();

    let err = DydxParser::parse_message(&raw).unwrap_err();

    match err.downcast_ref::<FeedError>() {
        Some(FeedError::MalformedLevel { field, value }) => {
            assert_eq!(*field, "price");
            assert_eq!(value, "not-a-number");
        }
        other => panic!("Expected MalformedLevel, got {:?}", other),
    }
}

#[test]
fn test_malformed_size_rejects_whole_message() {
    let raw = json!({
        "type": "subscribed",
        "message_id": 5,
        "contents": {
            "bids": [{ "price": "3500.5", "size": "" }],
            "asks": []
        }
    })
    .to_string();

    let err = DydxParser::parse_message(&raw).unwrap_err();

    match err.downcast_ref::<FeedError>() {
        Some(FeedError::MalformedLevel { field, .. }) => assert_eq!(*field, "size"),
        other => panic!("Expected MalformedLevel, got {:?}", other),
    }
}

#[test]
fn test_empty_contents_skipped() -> Result<()> {
    let raw = json!({
        "type": "channel_data",
        "message_id": 6,
        "contents": { "bids": [], "asks": [] }
    })
    .to_string();

    assert!(DydxParser::parse_message(&raw)?.is_none());

    // Missing contents entirely behaves the same way
    let raw = json!({
        "type": "channel_data",
        "message_id": 7
    })
    .to_string();

    assert!(DydxParser::parse_message(&raw)?.is_none());

    Ok(())
}
