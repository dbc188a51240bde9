use thiserror::Error;

use crate::blueprint::model::{Cost, format_cost};

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("unknown building kind: {0}")]
    UnknownKind(String),

    #[error("no building type specified")]
    EmptyKind,

    #[error("{kind} is locked, research {tech} first")]
    Locked { kind: String, tech: String },

    #[error("insufficient resources, requires {}", format_cost(.required))]
    InsufficientResources { required: Cost },

    #[error("building #{0} not found")]
    BuildingNotFound(u32),

    #[error("unknown technology: {0}")]
    UnknownTechnology(String),

    #[error("{0} already researched")]
    AlreadyResearched(String),

    #[error("not enough research points for {tech}, requires {cost}")]
    NotEnoughResearch { tech: String, cost: u64 },

    #[error("trading requires a logistics_center")]
    MarketClosed,

    #[error("{0} is not an active trading city")]
    InvalidCity(String),

    #[error("{city} has no offer #{index}")]
    InvalidOffer { city: String, index: usize },

    #[error("not enough storage for {needed} {resource}, only {free} free")]
    NoStorage {
        resource: String,
        free: u64,
        needed: u64,
    },

    #[error("a port is required to build ships")]
    NoPort,

    #[error("no ships available, a raid needs {0}")]
    NoShips(u64),

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("invalid params: {0}")]
    InvalidParams(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(serde_json::Error),
}
