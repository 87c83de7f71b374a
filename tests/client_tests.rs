use dydx_book_client::domain::error::FeedError;
use dydx_book_client::infrastructure::exchange::dydx::client::DydxClient;

#[tokio::test]
async fn test_connect_failure_is_an_error_not_a_panic() {
    let mut client = DydxClient::new();

    // Nothing listens on the discard port; the supervisor relies on this
    // surfacing as a plain error it can retry.
    let result = client.connect("ws://127.0.0.1:9/v4/ws").await;

    assert!(result.is_err());
    assert!(!client.connected());
}

#[tokio::test]
async fn test_operations_require_connection() {
    let mut client = DydxClient::new();

    let err = client.subscribe("v4_orderbook", "ETH-USD").await.unwrap_err();
    match err.downcast_ref::<FeedError>() {
        Some(FeedError::NotConnected) => {}
        other => panic!("Expected NotConnected, got {:?}", other),
    }

    let err = client.ping().await.unwrap_err();
    match err.downcast_ref::<FeedError>() {
        Some(FeedError::NotConnected) => {}
        other => panic!("Expected NotConnected, got {:?}", other),
    }

    let err = client.receive().await.unwrap_err();
    match err.downcast_ref::<FeedError>() {
        Some(FeedError::NotConnected) => {}
        other => panic!("Expected NotConnected, got {:?}", other),
    }

    let err = client.disconnect().await.unwrap_err();
    match err.downcast_ref::<FeedError>() {
        Some(FeedError::NotConnected) => {}
        other => panic!("Expected NotConnected, got {:?}", other),
    }
}
