use crate::hub::SessionHub;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

pub async fn handle_socket(socket: WebSocket, hub: Arc<SessionHub>) {
    let (mut sender, mut receiver) = socket.split();
    let session = hub.add_session().await;
    let session_id = session.session_id;
    let latest_state = session.latest_state;
    let mut outbound_rx = session.outbound_rx;

    let send_task = tokio::spawn(async move {
        loop {
            let mut ordered = Vec::new();
            tokio::select! {
                payload = outbound_rx.recv() => match payload {
                    Some(payload) => ordered.push(payload),
                    None => {
                        // the hub dropped this session
                        let _ = sender.send(Message::Close(None)).await;
                        return;
                    }
                },
                _ = latest_state.wait_for_update() => {}
            }

            while let Ok(payload) = outbound_rx.try_recv() {
                ordered.push(payload);
            }
            for payload in ordered {
                if sender.send(Message::Text(payload)).await.is_err() {
                    return;
                }
            }

            if let Some(payload) = latest_state.take_latest() {
                if sender.send(Message::Text(payload)).await.is_err() {
                    return;
                }
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => {
                if !hub.handle_text_message(&session_id, &text).await {
                    break;
                }
            }
            Message::Binary(data) => {
                let Ok(text) = std::str::from_utf8(&data) else { continue };
                if !hub.handle_text_message(&session_id, text).await {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    hub.remove_session(&session_id).await;
    send_task.abort();
}
