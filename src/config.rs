use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use crate::blueprint::model::{Cost, cost};
use crate::error::{GameError, Result};

pub const DEFAULT_ADDR: &str = "127.0.0.1:9100";
pub const CONFIG_ENV: &str = "CITY_CONFIG";

/// Tuning for a single city. Every field has a default so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: Option<u64>,
    pub starting_resources: Cost,
    pub capacity: CapacityConfig,
    pub upkeep: UpkeepConfig,
    pub market: MarketConfig,
    pub raid: RaidConfig,
    pub ship_cost: Cost,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            starting_resources: cost(&[
                ("wood", 20),
                ("stone", 20),
                ("food", 10),
                ("iron", 5),
                ("research_points", 5),
                ("gold", 50),
                ("population", 5),
                ("water", 10),
            ]),
            capacity: CapacityConfig::default(),
            upkeep: UpkeepConfig::default(),
            market: MarketConfig::default(),
            raid: RaidConfig::default(),
            ship_cost: cost(&[("wood", 30), ("iron", 10), ("gold", 20)]),
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&raw).map_err(GameError::Config)?;
        tracing::info!("Loaded game config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Derives a per-service seed so services sharing a config seed do not
    /// draw identical streams.
    pub fn seed_for(&self, salt: u64) -> Option<u64> {
        self.seed.map(|seed| seed ^ salt)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub currency: u64,
    pub bulk: u64,
    pub advanced: u64,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            currency: 1000,
            bulk: 200,
            advanced: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct UpkeepConfig {
    /// Percent of the population eaten as food each tick.
    pub food_percent: u64,
    /// Percent of the population lost when food runs out.
    pub starvation_percent: u64,
    pub water_per_building: u64,
    pub drought_penalty: u64,
}

impl Default for UpkeepConfig {
    fn default() -> Self {
        Self {
            food_percent: 20,
            starvation_percent: 10,
            water_per_building: 1,
            drought_penalty: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub cities: Vec<String>,
    pub active_cities: usize,
    pub offers_per_side: usize,
    pub quantity: u64,
    pub base_prices: BTreeMap<String, u64>,
    pub buy_factor: (f64, f64),
    pub sell_factor: (f64, f64),
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            cities: [
                "Northhaven",
                "Eastmarch",
                "Stonebridge",
                "Riverside",
                "Goldport",
                "Ironhold",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            active_cities: 3,
            offers_per_side: 2,
            quantity: 10,
            base_prices: cost(&[
                ("wood", 2),
                ("stone", 2),
                ("food", 3),
                ("water", 1),
                ("iron", 5),
                ("coal", 4),
                ("sand", 2),
                ("concrete", 8),
                ("steel", 12),
            ]),
            buy_factor: (1.2, 1.6),
            sell_factor: (0.7, 1.0),
        }
    }
}

/// Odds and payoff of a raid. Ships committed to a failed raid are lost;
/// on success they come back together with the loot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RaidConfig {
    pub ships_committed: u64,
    pub success_chance: f64,
    pub loot: Cost,
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self {
            ships_committed: 1,
            success_chance: 0.5,
            loot: cost(&[("gold", 40), ("iron", 10)]),
        }
    }
}
