use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

use crate::application::ports::{ChannelEvent, MessageChannelPort};

/// Message channel over a WebSocket client connection.
pub struct WsMessageChannel {
    buffer: usize,
}

impl WsMessageChannel {
    pub fn new() -> Self {
        Self { buffer: 64 }
    }
}

impl Default for WsMessageChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageChannelPort for WsMessageChannel {
    async fn open(&self, url: &str) -> mpsc::Receiver<ChannelEvent> {
        let (tx, rx) = mpsc::channel(self.buffer);
        let url = url.to_string();

        tokio::spawn(async move {
            let (mut stream, _) = match connect_async(url.as_str()).await {
                Ok(ok) => ok,
                Err(e) => {
                    let _ = tx.send(ChannelEvent::Error(format!("{url}: {e}"))).await;
                    let _ = tx.send(ChannelEvent::Closed).await;
                    return;
                }
            };
            if tx.send(ChannelEvent::Opened).await.is_err() {
                return;
            }

            while let Some(msg) = stream.next().await {
                let event = match msg {
                    Ok(Message::Text(text)) => ChannelEvent::Message(text.to_string()),
                    Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                        Ok(text) => ChannelEvent::Message(text),
                        Err(e) => {
                            warn!("Non-UTF-8 frame from {} dropped: {}", url, e);
                            continue;
                        }
                    },
                    Ok(Message::Close(frame)) => {
                        debug!("{} closed by peer: {:?}", url, frame);
                        break;
                    }
                    Ok(_) => continue,
                    Err(e) => ChannelEvent::Error(e.to_string()),
                };
                let fatal = matches!(event, ChannelEvent::Error(_));
                if tx.send(event).await.is_err() || fatal {
                    break;
                }
            }
            let _ = tx.send(ChannelEvent::Closed).await;
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::ws::{Message as AxumMessage, WebSocket, WebSocketUpgrade},
        response::IntoResponse,
        routing::get,
        Router,
    };

    async fn feed(ws: WebSocketUpgrade) -> impl IntoResponse {
        ws.on_upgrade(|mut socket: WebSocket| async move {
            let _ = socket.send(AxumMessage::Text(r#"{"gyro": 4.5}"#.into())).await;
            let _ = socket.send(AxumMessage::Binary(b"{\"label\":\"c\xffat\"}".to_vec())).await;
            let _ = socket.send(AxumMessage::Text(r#"{"ultrasonic": 42}"#.into())).await;
            let _ = socket.send(AxumMessage::Binary(br#"{"boxes":[]}"#.to_vec())).await;
            let _ = socket.send(AxumMessage::Close(None)).await;
        })
    }

    async fn collect(mut rx: mpsc::Receiver<ChannelEvent>) -> Vec<ChannelEvent> {
        let mut out = Vec::new();
        while let Some(ev) = rx.recv().await {
            out.push(ev);
        }
        out
    }

    #[tokio::test]
    async fn forwards_messages_in_order_and_drops_invalid_utf8() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, Router::new().route("/", get(feed))).await.unwrap() });

        let events = collect(WsMessageChannel::new().open(&format!("ws://{addr}/")).await).await;
        assert_eq!(
            events,
            vec![
                ChannelEvent::Opened,
                ChannelEvent::Message(r#"{"gyro": 4.5}"#.into()),
                ChannelEvent::Message(r#"{"ultrasonic": 42}"#.into()),
                ChannelEvent::Message(r#"{"boxes":[]}"#.into()),
                ChannelEvent::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn refused_connection_is_error_then_closed() {
        // Grab a free port and release it so nothing listens there.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let events = collect(WsMessageChannel::new().open(&format!("ws://{addr}")).await).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ChannelEvent::Error(_)));
        assert_eq!(events[1], ChannelEvent::Closed);
    }
}
