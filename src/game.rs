//! The facade a presentation layer talks to. Every command returns an
//! [`ActionResult`]; domain errors never cross this boundary.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::blueprint::catalog::Catalog;
use crate::blueprint::model::Cost;
use crate::config::GameConfig;
use crate::economy::building::{Building, BuildingFactory, BuildingRegistry};
use crate::economy::construction::ConstructionService;
use crate::economy::ledger::{ResourceLedger, Stock};
use crate::economy::production::{ProductionService, TickReport};
use crate::economy::raid::{RaidOutcome, RaidService, SHIPS};
use crate::economy::technology::{TechInfo, TechTree};
use crate::economy::trade::{Offer, TradeService};
use crate::error::{GameError, Result};

const TRADE_SALT: u64 = 0x7EAD_0001;
const RAID_SALT: u64 = 0x4A1D_0002;

pub const LOGISTICS_CENTER: &str = "logistics_center";
pub const PORT: &str = "port";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(reason: impl fmt::Display) -> Self {
        Self {
            success: false,
            message: reason.to_string(),
        }
    }
}

impl From<Result<String>> for ActionResult {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(message) => ActionResult::ok(message),
            Err(e) => {
                tracing::debug!("Action rejected: {}", e);
                ActionResult::fail(e)
            }
        }
    }
}

pub struct GameService {
    ledger: ResourceLedger,
    registry: BuildingRegistry,
    construction: ConstructionService,
    production: ProductionService,
    tech: TechTree,
    trade: TradeService,
    raid: RaidService,
    ship_cost: Cost,
}

impl GameService {
    /// Wires every service once and seeds the starting stock.
    pub fn new(config: &GameConfig) -> Self {
        let catalog = Catalog::default();
        let tech = TechTree::new(&catalog);
        let mut ledger = ResourceLedger::new(config.capacity);
        for (name, amount) in &config.starting_resources {
            ledger.add(name, *amount);
        }

        Self {
            ledger,
            registry: BuildingRegistry::new(),
            construction: ConstructionService::new(BuildingFactory::new(catalog)),
            production: ProductionService::new(config.upkeep),
            tech,
            trade: TradeService::new(config.market.clone(), config.seed_for(TRADE_SALT)),
            raid: RaidService::new(config.raid.clone(), config.seed_for(RAID_SALT)),
            ship_cost: config.ship_cost.clone(),
        }
    }

    pub fn list_resources(&self) -> BTreeMap<String, u64> {
        self.ledger.amounts()
    }

    pub fn stocks(&self) -> &BTreeMap<String, Stock> {
        self.ledger.stocks()
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn list_buildings(&self) -> &[Building] {
        self.registry.all()
    }

    pub fn get_building_catalog(&self) -> BTreeMap<String, BTreeMap<String, Cost>> {
        self.construction.catalog().by_category()
    }

    pub fn list_research(&self) -> BTreeMap<String, TechInfo> {
        self.tech.list()
    }

    pub fn research(&mut self, tech_name: &str) -> ActionResult {
        self.tech
            .research(&mut self.ledger, tech_name.trim())
            .map(|unlocked| {
                format!("Researched {}, unlocked: {}", tech_name.trim(), unlocked.join(", "))
            })
            .into()
    }

    pub fn build(&mut self, kind: &str) -> ActionResult {
        let kind = kind.trim();
        match self.try_build(kind) {
            Ok(building) => ActionResult::ok(format!("Built {building}")),
            Err(e @ (GameError::EmptyKind | GameError::UnknownKind(_))) => ActionResult::fail(e),
            Err(e) => ActionResult::fail(format!("Cannot build {kind}: {e}")),
        }
    }

    fn try_build(&mut self, kind: &str) -> Result<Building> {
        if kind.is_empty() {
            return Err(GameError::EmptyKind);
        }
        let cost = self
            .construction
            .catalog()
            .get(kind)
            .map(|b| b.cost.clone())
            .ok_or_else(|| GameError::UnknownKind(kind.to_string()))?;

        if !self.tech.is_unlocked(kind) {
            return Err(GameError::Locked {
                kind: kind.to_string(),
                tech: self.tech.gate_of(kind).unwrap_or_default().to_string(),
            });
        }

        self.construction
            .build(&mut self.ledger, &mut self.registry, &cost, kind)
    }

    pub fn build_ship(&mut self) -> ActionResult {
        self.try_build_ship().into()
    }

    fn try_build_ship(&mut self) -> Result<String> {
        if !self.registry.has_kind(PORT) {
            return Err(GameError::NoPort);
        }
        self.ledger.spend(&self.ship_cost)?;
        self.ledger.add(SHIPS, 1);
        let fleet = self.ledger.amount_of(SHIPS);
        tracing::info!("Ship launched, fleet is {}", fleet);
        Ok(format!("Ship built, fleet size {fleet}"))
    }

    pub fn upgrade(&mut self, building_id: u32) -> ActionResult {
        self.construction
            .upgrade(&mut self.ledger, &mut self.registry, building_id)
            .map(|b| format!("Upgraded #{} [{}] to level {}", b.id, b.kind, b.level))
            .into()
    }

    pub fn tick(&mut self) -> TickReport {
        self.production.tick(&mut self.ledger, &self.registry)
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.production.ticks()
    }

    /// Opens a market session on first access once trading is available.
    fn market(&mut self) -> Option<&mut TradeService> {
        if !self.registry.has_kind(LOGISTICS_CENTER) {
            return None;
        }
        if !self.trade.is_open() {
            self.trade.open_session();
        }
        Some(&mut self.trade)
    }

    pub fn open_market(&mut self) -> ActionResult {
        if !self.registry.has_kind(LOGISTICS_CENTER) {
            return ActionResult::fail(GameError::MarketClosed);
        }
        self.trade.open_session();
        ActionResult::ok(format!(
            "Market opened: {}",
            self.trade.active_cities().join(", ")
        ))
    }

    pub fn get_trading_cities(&mut self) -> Vec<String> {
        self.market()
            .map(|market| market.active_cities())
            .unwrap_or_default()
    }

    pub fn get_city_offers(&mut self, city: &str) -> Vec<Offer> {
        self.market()
            .map(|market| market.offers(city))
            .unwrap_or_default()
    }

    pub fn trade(&mut self, city: &str, offer_index: usize) -> ActionResult {
        if self.market().is_none() {
            return ActionResult::fail(GameError::MarketClosed);
        }
        self.trade
            .execute_trade(&mut self.ledger, city, offer_index)
            .into()
    }

    pub fn raid(&mut self) -> ActionResult {
        match self.raid.execute_raid(&mut self.ledger) {
            Ok(RaidOutcome::Victory(message)) => ActionResult::ok(message),
            Ok(RaidOutcome::Defeat(message)) => ActionResult::fail(message),
            Err(e) => ActionResult::fail(e),
        }
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
