use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{
    Message,
    handshake::server::{Request, Response},
};
use uuid::Uuid;

use crate::actor::dispatcher::Dispatcher;
use crate::actor::model::{Command, ResponseSignal, Task};
use crate::api::model::{ApiRequest, ApiResponse};

pub async fn accept_connection(stream: TcpStream, dispatcher: Dispatcher) {
    let addr = match stream.peer_addr() {
        Ok(addr) => addr.to_string(),
        Err(_) => "unknown".to_string(),
    };
    let mut id = Uuid::new_v4();

    let callback = |req: &Request, response: Response| {
        if let Some(id_header) = req.headers().get("Authorization") {
            if let Ok(id_str) = id_header.to_str() {
                if let Ok(parsed_id) = Uuid::parse_str(id_str) {
                    id = parsed_id;
                } else {
                    tracing::warn!("Invalid UUID in Authorization header: {}", id_str);
                }
            } else {
                tracing::warn!("Failed to convert Authorization header to string");
            }
        }

        Ok(response)
    };

    let ws_stream = match tokio_tungstenite::accept_hdr_async(stream, callback).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!("WebSocket handshake failed for address {}: {}", addr, e);
            return;
        }
    };

    tracing::debug!("Accepted connection with ID: {}, address: {}", id, addr);
    let session = dispatcher.open_session(id).await;

    let (mut write, mut read) = ws_stream.split();
    let (response_tx, mut response_rx) = tokio::sync::mpsc::channel::<ResponseSignal>(100);

    let writer = tokio::spawn(async move {
        while let Some(response) = response_rx.recv().await {
            let ResponseSignal::Reply(response) = response else {
                tracing::debug!("Stopping response handler for ID: {}", id);
                break;
            };
            if let Err(e) = write.send(Message::Text(response.to_string().into())).await {
                tracing::error!("Failed to send response to {}: {}", id, e);
                break;
            }
        }
    });

    while let Some(message) = read.next().await {
        let msg = match message {
            Ok(msg) => msg,
            Err(e) => {
                tracing::error!("Error reading message from {}: {}", id, e);
                break;
            }
        };
        if !msg.is_text() {
            continue;
        }

        let request = match serde_json::from_str::<ApiRequest>(&msg.to_string()) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("Failed to parse message from {}: {}", id, e);
                let _ = response_tx
                    .send(ResponseSignal::Reply(ApiResponse::error("", e)))
                    .await;
                continue;
            }
        };

        let command = match Command::parse(&request.method, request.params) {
            Ok(command) => command,
            Err(e) => {
                let _ = response_tx
                    .send(ResponseSignal::Reply(ApiResponse::error(request.id, e)))
                    .await;
                continue;
            }
        };

        let task = Task {
            request_id: request.id,
            command,
            respond_to: response_tx.clone(),
        };
        if let Err(e) = session.submit(task).await {
            tracing::error!("Failed to submit task: {}", e);
            break;
        }
    }

    let _ = response_tx.send(ResponseSignal::Stop).await;
    if let Err(e) = writer.await {
        tracing::warn!("Response writer for {} ended with error: {:?}", id, e);
    }
    dispatcher.close_session(id).await;
}
