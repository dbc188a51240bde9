use std::collections::BTreeMap;

use serde::Serialize;

use crate::blueprint::model::Cost;
use crate::config::CapacityConfig;
use crate::error::{GameError, Result};

pub const CURRENCY: &str = "gold";

const BULK: [&str; 6] = ["wood", "stone", "food", "water", "coal", "sand"];
const ADVANCED: [&str; 7] = [
    "iron",
    "concrete",
    "steel",
    "energy",
    "population",
    "research_points",
    "ships",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Currency,
    Bulk,
    Advanced,
}

impl Category {
    /// Names outside the known sets fall into `Advanced`.
    pub fn of(name: &str) -> Self {
        if name == CURRENCY {
            Category::Currency
        } else if BULK.contains(&name) {
            Category::Bulk
        } else {
            Category::Advanced
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stock {
    pub amount: u64,
    pub capacity: u64,
}

/// Named resource quantities, each bounded by its own capacity.
///
/// Every mutation keeps `amount <= capacity`; amounts are unsigned so
/// they cannot go negative.
#[derive(Debug, Clone)]
pub struct ResourceLedger {
    stocks: BTreeMap<String, Stock>,
    defaults: CapacityConfig,
}

impl ResourceLedger {
    pub fn new(defaults: CapacityConfig) -> Self {
        let mut ledger = Self {
            stocks: BTreeMap::new(),
            defaults,
        };
        for name in std::iter::once(CURRENCY).chain(BULK).chain(ADVANCED) {
            ledger.entry(name);
        }
        ledger
    }

    fn default_capacity(&self, name: &str) -> u64 {
        match Category::of(name) {
            Category::Currency => self.defaults.currency,
            Category::Bulk => self.defaults.bulk,
            Category::Advanced => self.defaults.advanced,
        }
    }

    fn entry(&mut self, name: &str) -> &mut Stock {
        let capacity = self.default_capacity(name);
        self.stocks.entry(name.to_string()).or_insert_with(|| {
            tracing::debug!("Registering resource {} with capacity {}", name, capacity);
            Stock {
                amount: 0,
                capacity,
            }
        })
    }

    /// Adds up to the capacity and returns how much was actually stored.
    pub fn add(&mut self, name: &str, amount: u64) -> u64 {
        let stock = self.entry(name);
        let before = stock.amount;
        stock.amount = stock.amount.saturating_add(amount).min(stock.capacity);
        let stored = stock.amount - before;
        if stored < amount {
            tracing::debug!(
                "{} capped at {}, discarded {}",
                name,
                stock.capacity,
                amount - stored
            );
        }
        stored
    }

    pub fn consume(&mut self, name: &str, amount: u64) -> bool {
        match self.stocks.get_mut(name) {
            Some(stock) if stock.amount >= amount => {
                stock.amount -= amount;
                true
            }
            None if amount == 0 => true,
            _ => false,
        }
    }

    pub fn has(&self, name: &str, amount: u64) -> bool {
        self.amount_of(name) >= amount
    }

    pub fn amount_of(&self, name: &str) -> u64 {
        self.stocks.get(name).map_or(0, |s| s.amount)
    }

    pub fn capacity_of(&self, name: &str) -> u64 {
        self.stocks.get(name).map_or(0, |s| s.capacity)
    }

    /// Room left before `name` hits its capacity. Unregistered names report
    /// the default capacity they would be created with.
    pub fn free_space(&self, name: &str) -> u64 {
        self.stocks
            .get(name)
            .map_or_else(|| self.default_capacity(name), |s| s.capacity - s.amount)
    }

    pub fn increase_capacity(&mut self, name: &str, amount: u64) {
        let stock = self.entry(name);
        stock.capacity = stock.capacity.saturating_add(amount);
        tracing::debug!("{} capacity raised to {}", name, stock.capacity);
    }

    pub fn can_afford(&self, cost: &Cost) -> bool {
        cost.iter().all(|(name, amount)| self.has(name, *amount))
    }

    /// Deducts a whole cost map or nothing at all.
    pub fn spend(&mut self, cost: &Cost) -> Result<()> {
        if !self.can_afford(cost) {
            return Err(GameError::InsufficientResources {
                required: cost.clone(),
            });
        }
        for (name, amount) in cost {
            let spent = self.consume(name, *amount);
            debug_assert!(spent, "validated before deduction");
        }
        Ok(())
    }

    pub fn amounts(&self) -> BTreeMap<String, u64> {
        self.stocks
            .iter()
            .map(|(name, stock)| (name.clone(), stock.amount))
            .collect()
    }

    pub fn stocks(&self) -> &BTreeMap<String, Stock> {
        &self.stocks
    }
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new(CapacityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::model::cost;

    #[test]
    fn test_add_clamps_at_capacity() {
        let mut ledger = ResourceLedger::default();
        assert_eq!(ledger.capacity_of("wood"), 200);
        assert_eq!(ledger.add("wood", 150), 150);
        assert_eq!(ledger.add("wood", 150), 50);
        assert_eq!(ledger.amount_of("wood"), 200);
    }

    #[test]
    fn test_default_capacity_by_category() {
        let ledger = ResourceLedger::default();
        assert_eq!(ledger.capacity_of("gold"), 1000);
        assert_eq!(ledger.capacity_of("sand"), 200);
        assert_eq!(ledger.capacity_of("steel"), 100);
        assert_eq!(ledger.capacity_of("unobtainium"), 0);
    }

    #[test]
    fn test_add_unknown_resource_auto_creates() {
        let mut ledger = ResourceLedger::default();
        assert_eq!(ledger.amount_of("spice"), 0);
        ledger.add("spice", 5);
        assert_eq!(ledger.amount_of("spice"), 5);
        assert_eq!(ledger.capacity_of("spice"), 100);
    }

    #[test]
    fn test_consume_insufficient_leaves_amount() {
        let mut ledger = ResourceLedger::default();
        ledger.add("food", 3);
        assert!(!ledger.consume("food", 4));
        assert_eq!(ledger.amount_of("food"), 3);
        assert!(ledger.consume("food", 3));
        assert_eq!(ledger.amount_of("food"), 0);
        assert!(!ledger.consume("spice", 1));
    }

    #[test]
    fn test_increase_capacity_is_additive() {
        let mut ledger = ResourceLedger::default();
        ledger.increase_capacity("iron", 50);
        ledger.increase_capacity("iron", 50);
        assert_eq!(ledger.capacity_of("iron"), 200);
    }

    #[test]
    fn test_spend_is_all_or_nothing() {
        let mut ledger = ResourceLedger::default();
        ledger.add("wood", 10);
        ledger.add("stone", 2);

        let err = ledger
            .spend(&cost(&[("wood", 5), ("stone", 5)]))
            .unwrap_err();
        assert!(matches!(err, GameError::InsufficientResources { .. }));
        assert_eq!(ledger.amount_of("wood"), 10);
        assert_eq!(ledger.amount_of("stone"), 2);

        ledger.spend(&cost(&[("wood", 5), ("stone", 2)])).unwrap();
        assert_eq!(ledger.amount_of("wood"), 5);
        assert_eq!(ledger.amount_of("stone"), 0);
    }
}
