use std::env;

use city_builder::{
    actor::dispatcher::Dispatcher,
    api::websocket,
    config::{CONFIG_ENV, DEFAULT_ADDR, GameConfig},
    instrumentation,
};
use tokio::task::JoinSet;

#[tokio::main]
async fn main() {
    if let Err(e) = instrumentation::init_tracing_subscriber() {
        eprintln!("Failed to set global subscriber: {e}");
        return;
    }
    tracing::info!("Starting the application...");

    let addr = env::args().nth(1).unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let config_path = env::args().nth(2).or_else(|| env::var(CONFIG_ENV).ok());

    let config = match config_path {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load config {}: {}", path, e);
                return;
            }
        },
        None => GameConfig::default(),
    };

    let dispatcher = Dispatcher::new(config);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(socket) => socket,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return;
        }
    };

    tracing::info!("Listening for TCP connections on {}", addr);

    let mut handles = JoinSet::new();

    loop {
        tokio::select! {
            Ok((stream, peer)) = listener.accept() => {
                tracing::info!("New connection from {}", peer);
                while handles.try_join_next().is_some() {}
                handles.spawn(websocket::accept_connection(stream, dispatcher.clone()));
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, stopping sessions...");
                break;
            }
        }
    }

    dispatcher.stop().await;
    handles.shutdown().await;

    tracing::info!("All connections have been closed.");
}
