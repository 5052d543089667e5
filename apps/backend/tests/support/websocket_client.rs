use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

pub struct WebSocketClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketClient {
    pub async fn connect(url: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let (stream, _) = connect_async(url).await?;
        Ok(Self { stream })
    }

    pub async fn send_json(&mut self, value: &Value) -> Result<(), Box<dyn std::error::Error>> {
        self.stream
            .send(Message::Text(value.to_string().into()))
            .await?;
        Ok(())
    }

    pub async fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.stream.close(None).await?;
        Ok(())
    }

    /// Next JSON text frame, skipping pings and pongs. `None` on close or
    /// timeout.
    pub async fn recv_json(&mut self) -> Option<Value> {
        loop {
            let next = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .ok()??
                .ok()?;
            match next {
                Message::Text(text) => return serde_json::from_str(&text).ok(),
                Message::Ping(_) | Message::Pong(_) => continue,
                _ => return None,
            }
        }
    }

    /// Reads until a message of the given `type` arrives.
    pub async fn recv_type(&mut self, kind: &str) -> Option<Value> {
        loop {
            let msg = self.recv_json().await?;
            if msg["type"] == kind {
                return Some(msg);
            }
        }
    }

    /// Reads `game_update` messages until `accept` matches one.
    pub async fn recv_update_where(&mut self, accept: impl Fn(&Value) -> bool) -> Option<Value> {
        loop {
            let msg = self.recv_type("game_update").await?;
            if accept(&msg["snapshot"]) {
                return Some(msg["snapshot"].clone());
            }
        }
    }
}

impl WebSocketClient {
    /// Reads until a message of type `kind` satisfies `accept`.
    pub async fn recv_type_where(
        &mut self,
        kind: &str,
        accept: impl Fn(&Value) -> bool,
    ) -> Option<Value> {
        loop {
            let msg = self.recv_type(kind).await?;
            if accept(&msg) {
                return Some(msg);
            }
        }
    }
}
