pub mod model;
pub mod websocket;
