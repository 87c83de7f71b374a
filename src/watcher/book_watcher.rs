use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};
use tokio::sync::{broadcast, Mutex};
use tokio::time::Duration;

use crate::domain::model::orderbook::OrderBook;
use crate::infrastructure::exchange::dydx::client::DydxClient;
use crate::infrastructure::exchange::dydx::parsers::DydxParser;
use crate::watcher::config;

/// Drives one feed session: subscribes, applies update batches to the book
/// in arrival order, and prints the summary line when the top changed.
pub struct BookWatcher {
    /// Client connection
    pub client: Arc<Mutex<DydxClient>>,

    /// The book this session maintains
    pub book: Arc<Mutex<OrderBook>>,

    /// Market id subscribed to, e.g. "ETH-USD"
    pub market: String,
}

impl BookWatcher {
    pub fn new(client: Arc<Mutex<DydxClient>>, book: Arc<Mutex<OrderBook>>, market: String) -> Self {
        Self {
            client,
            book,
            market,
        }
    }

    /// Task to periodically ping the websocket connection.
    pub async fn ping_task(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let mut interval = tokio::time::interval(Duration::from_secs(config::PING_INTERVAL_SEC));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let mut client = self.client.lock().await;
                    if let Err(e) = client.ping().await {
                        error!("Ping failed: {}", e);
                        return Err(anyhow!("Ping failed"));
                    }
                    debug!("Ping sent");
                }
                _ = shutdown.recv() => {
                    info!("Ping task received shutdown signal");
                    return Ok(());
                }
            }
        }
    }

    /// Task to listen for feed messages and keep the book current.
    ///
    /// Undecodable messages are logged and dropped whole; transport errors
    /// end the task so the session supervisor can reconnect.
    pub async fn listen_task(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        {
            let mut client = self.client.lock().await;
            client.subscribe(config::CHANNEL, &self.market).await?;
        }
        info!("Watching {} order book", self.market);

        loop {
            tokio::select! {
                msg_result = async {
                    let mut client = self.client.lock().await;
                    client.receive().await
                } => {
                    match msg_result {
                        Ok(Some(msg)) => {
                            debug!("Raw message: {}", msg);
                            self.handle_message(&msg).await;
                        }
                        Ok(None) => {
                            debug!("No message received");
                        }
                        Err(e) => {
                            error!("Error receiving message: {}", e);
                            return Err(e);
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Listen task received shutdown signal");
                    return Ok(());
                }
            }
        }
    }

    async fn handle_message(&self, msg: &str) {
        match DydxParser::parse_message(msg) {
            Ok(Some(update)) => {
                let mut book = self.book.lock().await;
                let changed = book.update(update.update_id, &update.asks, &update.bids);
                if changed {
                    println!("{}", book);
                }
            }
            Ok(None) => {
                debug!("Message carried no book content");
            }
            Err(e) => {
                warn!("Dropping undecodable message: {}", e);
            }
        }
    }
}
