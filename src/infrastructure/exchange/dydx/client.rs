use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error};
use serde_json::json;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tungstenite::Message;
use url::Url;

use crate::domain::error::FeedError;

/// Websocket client for the dYdX v4 indexer feed.
pub struct DydxClient {
    socket: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

impl Default for DydxClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DydxClient {
    pub fn new() -> Self {
        DydxClient { socket: None }
    }

    pub async fn connect(&mut self, ws_url: &str) -> Result<()> {
        let url = Url::parse(ws_url)?;
        let (socket, _) = connect_async(url).await?;
        self.socket = Some(socket);
        Ok(())
    }

    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut socket) = self.socket.take() {
            socket.close(None).await?;
            Ok(())
        } else {
            Err(FeedError::NotConnected.into())
        }
    }

    pub fn connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Subscribe to a channel for one market id.
    pub async fn subscribe(&mut self, channel: &str, market: &str) -> Result<()> {
        let request = json!({
            "type": "subscribe",
            "channel": channel,
            "id": market,
        });

        let request_text = serde_json::to_string(&request)?;
        debug!("Sending request: {}", request_text);

        if let Some(socket) = &mut self.socket {
            socket.send(Message::Text(request_text)).await?;
            Ok(())
        } else {
            Err(FeedError::NotConnected.into())
        }
    }

    /// Send a websocket ping to keep the connection alive.
    pub async fn ping(&mut self) -> Result<()> {
        if let Some(socket) = &mut self.socket {
            socket.send(Message::Ping(vec![])).await?;
            Ok(())
        } else {
            Err(FeedError::NotConnected.into())
        }
    }

    /// Receive a message from the websocket server and return it as a String.
    ///
    /// Control frames and binary frames are swallowed and reported as
    /// `Ok(None)`; a closed or broken stream clears the socket.
    pub async fn receive(&mut self) -> Result<Option<String>> {
        if let Some(socket) = &mut self.socket {
            match socket.next().await {
                Some(Ok(msg)) => match msg {
                    Message::Text(text) => {
                        debug!("Received text: {}", text);
                        Ok(Some(text))
                    }
                    Message::Binary(_) => {
                        debug!("Received binary message");
                        Ok(None)
                    }
                    Message::Ping(_) => {
                        debug!("Received ping, automatically responding with pong");
                        Ok(None)
                    }
                    Message::Pong(_) => {
                        debug!("Received pong");
                        Ok(None)
                    }
                    Message::Close(_) => {
                        debug!("Received close frame");
                        Ok(None)
                    }
                    Message::Frame(_) => {
                        debug!("Received raw frame");
                        Ok(None)
                    }
                },
                Some(Err(e)) => {
                    error!("Error receiving message: {}", e);
                    // Connection likely broken, clear the socket and propagate
                    self.socket = None;
                    Err(anyhow::anyhow!("WebSocket error: {}", e))
                }
                None => {
                    debug!("WebSocket stream ended");
                    self.socket = None;
                    Ok(None)
                }
            }
        } else {
            error!("Not connected to WebSocket server");
            Err(FeedError::NotConnected.into())
        }
    }
}
