use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::{debug, info, warn};

use crate::adapters::http::state::HttpState;
use crate::application::{
    dto::{SurfaceInbound, SurfaceOutbound},
    surface::SurfaceController,
};
use crate::domain::errors::DomainResult;

pub async fn ws_handler(ws: WebSocketUpgrade, State(st): State<HttpState>) -> impl axum::response::IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, st))
}

async fn handle_socket(socket: WebSocket, st: HttpState) {
    info!("🖥️ Display surface connected");
    let (mut sink, mut stream) = socket.split();
    let (answer_tx, mut answer_rx) = mpsc::channel::<DomainResult<String>>(4);
    let mut frames = st.frames.subscribe();

    // Writer: answers and overlay frames share the one socket.
    let writer = tokio::spawn(async move {
        loop {
            let json = tokio::select! {
                answer = answer_rx.recv() => match answer {
                    Some(Ok(sdp)) => serde_json::to_string(&SurfaceOutbound::Answer { sdp: &sdp }),
                    Some(Err(e)) => {
                        let message = e.to_string();
                        serde_json::to_string(&SurfaceOutbound::Error { message: &message })
                    }
                    None => break,
                },
                frame = frames.recv() => match frame {
                    Ok(frame) => serde_json::to_string(&SurfaceOutbound::Frame(&frame)),
                    // A slow surface just skips to the newest frame.
                    Err(RecvError::Lagged(n)) => {
                        debug!("Surface lagging, skipped {} frames", n);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
            };
            let Ok(json) = json else { continue };
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut controller = SurfaceController::new(st.surface.clone());
    while let Some(Ok(msg)) = stream.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        match serde_json::from_str::<SurfaceInbound>(&text) {
            Ok(inbound) => {
                if let Some(answer) = controller.handle(inbound).await {
                    if answer_tx.send(answer).await.is_err() {
                        break;
                    }
                }
            }
            Err(e) => warn!("Invalid message from display surface dropped: {}", e),
        }
    }

    // Releases this surface's video session, if it still holds the live one.
    drop(controller);
    writer.abort();
    info!("Display surface disconnected");
}
