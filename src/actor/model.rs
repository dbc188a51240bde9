use serde::Deserialize;
use tokio::sync::mpsc;

use crate::api::model::ApiResponse;
use crate::error::{GameError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListResources,
    ListBuildings,
    Catalog,
    ListResearch,
    Research { tech: String },
    Build { kind: String },
    BuildShip,
    Upgrade { building_id: u32 },
    Tick,
    TradingCities,
    CityOffers { city: String },
    OpenMarket,
    Trade { city: String, offer_index: usize },
    Raid,
}

#[derive(Deserialize)]
struct TechParams {
    tech: String,
}

#[derive(Deserialize)]
struct KindParams {
    kind: String,
}

#[derive(Deserialize)]
struct UpgradeParams {
    building_id: u32,
}

#[derive(Deserialize)]
struct CityParams {
    city: String,
}

#[derive(Deserialize)]
struct TradeParams {
    city: String,
    offer_index: usize,
}

impl Command {
    pub fn parse(method: &str, params: serde_json::Value) -> Result<Self> {
        let command = match method {
            "list_resources" => Command::ListResources,
            "list_buildings" => Command::ListBuildings,
            "catalog" => Command::Catalog,
            "list_research" => Command::ListResearch,
            "research" => {
                let p: TechParams = serde_json::from_value(params)?;
                Command::Research { tech: p.tech }
            }
            "build" => {
                let p: KindParams = serde_json::from_value(params)?;
                Command::Build { kind: p.kind }
            }
            "build_ship" => Command::BuildShip,
            "upgrade" => {
                let p: UpgradeParams = serde_json::from_value(params)?;
                Command::Upgrade {
                    building_id: p.building_id,
                }
            }
            "tick" => Command::Tick,
            "trading_cities" => Command::TradingCities,
            "city_offers" => {
                let p: CityParams = serde_json::from_value(params)?;
                Command::CityOffers { city: p.city }
            }
            "open_market" => Command::OpenMarket,
            "trade" => {
                let p: TradeParams = serde_json::from_value(params)?;
                Command::Trade {
                    city: p.city,
                    offer_index: p.offer_index,
                }
            }
            "raid" => Command::Raid,
            other => return Err(GameError::UnknownMethod(other.to_string())),
        };
        Ok(command)
    }
}

#[derive(Debug)]
pub struct Task {
    pub request_id: String,
    pub command: Command,
    pub respond_to: mpsc::Sender<ResponseSignal>,
}

#[derive(Debug)]
pub enum SessionMessage {
    Task(Task),
    Stop,
}

#[derive(Debug, Clone)]
pub enum ResponseSignal {
    Reply(ApiResponse),
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("tick", serde_json::Value::Null).unwrap(),
            Command::Tick
        );
        assert_eq!(
            Command::parse("build", json!({"kind": "farm"})).unwrap(),
            Command::Build {
                kind: "farm".to_string()
            }
        );
        assert_eq!(
            Command::parse("trade", json!({"city": "Goldport", "offer_index": 2})).unwrap(),
            Command::Trade {
                city: "Goldport".to_string(),
                offer_index: 2
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            Command::parse("demolish", json!({})),
            Err(GameError::UnknownMethod(_))
        ));
        assert!(matches!(
            Command::parse("upgrade", json!({"building_id": "one"})),
            Err(GameError::InvalidParams(_))
        ));
        assert!(matches!(
            Command::parse("build", serde_json::Value::Null),
            Err(GameError::InvalidParams(_))
        ));
    }
}
