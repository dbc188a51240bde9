use std::fmt;

use serde::Serialize;

use crate::config::UpkeepConfig;
use crate::economy::building::BuildingRegistry;
use crate::economy::ledger::ResourceLedger;

pub const POPULATION: &str = "population";
pub const FOOD: &str = "food";
pub const WATER: &str = "water";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    Starvation { food_needed: u64, population_lost: u64 },
    Drought { water_needed: u64, population_lost: u64 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Starvation {
                food_needed,
                population_lost,
            } => write!(
                f,
                "Starvation: needed {food_needed} food, lost {population_lost} population"
            ),
            Notice::Drought {
                water_needed,
                population_lost,
            } => write!(
                f,
                "Drought: needed {water_needed} water, lost {population_lost} population"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub notices: Vec<Notice>,
    /// Producers that sat idle because an input was missing.
    pub stalled: Vec<u32>,
}

pub struct ProductionService {
    upkeep: UpkeepConfig,
    ticks: u64,
}

impl ProductionService {
    pub fn new(upkeep: UpkeepConfig) -> Self {
        Self { upkeep, ticks: 0 }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances the economy by one step: food upkeep, water upkeep, then
    /// every producer in registry order. Shortfalls become notices, never
    /// errors.
    pub fn tick(&mut self, ledger: &mut ResourceLedger, registry: &BuildingRegistry) -> TickReport {
        self.ticks += 1;
        let mut report = TickReport {
            tick: self.ticks,
            ..Default::default()
        };

        if let Some(notice) = self.feed_population(ledger) {
            report.notices.push(notice);
        }
        if let Some(notice) = self.supply_water(ledger, registry) {
            report.notices.push(notice);
        }

        for building in registry.all().iter().filter(|b| b.is_producer()) {
            let inputs = building.consumption();
            if ledger.spend(&inputs).is_err() {
                tracing::debug!("{} stalled, missing inputs {:?}", building, inputs);
                report.stalled.push(building.id);
                continue;
            }
            for (name, amount) in building.production() {
                ledger.add(&name, amount);
            }
        }

        for notice in &report.notices {
            tracing::warn!("Tick {}: {}", report.tick, notice);
        }
        tracing::debug!(
            "Tick {} complete, {} producers stalled",
            report.tick,
            report.stalled.len()
        );
        report
    }

    fn feed_population(&self, ledger: &mut ResourceLedger) -> Option<Notice> {
        let population = ledger.amount_of(POPULATION);
        if population == 0 {
            return None;
        }
        let food_needed = (population * self.upkeep.food_percent / 100).max(1);
        if ledger.consume(FOOD, food_needed) {
            return None;
        }
        let population_lost = (population * self.upkeep.starvation_percent / 100)
            .max(1)
            .min(population);
        ledger.consume(POPULATION, population_lost);
        Some(Notice::Starvation {
            food_needed,
            population_lost,
        })
    }

    fn supply_water(
        &self,
        ledger: &mut ResourceLedger,
        registry: &BuildingRegistry,
    ) -> Option<Notice> {
        let water_needed = self.upkeep.water_per_building * registry.len() as u64;
        if water_needed == 0 || ledger.consume(WATER, water_needed) {
            return None;
        }
        let population_lost = self
            .upkeep
            .drought_penalty
            .min(ledger.amount_of(POPULATION));
        ledger.consume(POPULATION, population_lost);
        Some(Notice::Drought {
            water_needed,
            population_lost,
        })
    }
}

impl Default for ProductionService {
    fn default() -> Self {
        Self::new(UpkeepConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::model::Profile;
    use crate::economy::building::Building;

    #[test]
    fn test_upkeep_feeds_population() {
        let mut production = ProductionService::default();
        let mut ledger = ResourceLedger::default();
        ledger.add(POPULATION, 12);
        ledger.add(FOOD, 5);

        let report = production.tick(&mut ledger, &BuildingRegistry::new());
        assert!(report.notices.is_empty());
        assert_eq!(ledger.amount_of(FOOD), 3);
        assert_eq!(ledger.amount_of(POPULATION), 12);
        assert_eq!(report.tick, 1);
    }

    #[test]
    fn test_small_population_still_eats() {
        let mut production = ProductionService::default();
        let mut ledger = ResourceLedger::default();
        ledger.add(POPULATION, 2);
        ledger.add(FOOD, 1);

        production.tick(&mut ledger, &BuildingRegistry::new());
        assert_eq!(ledger.amount_of(FOOD), 0);
    }

    #[test]
    fn test_drought_costs_one_population() {
        let mut production = ProductionService::default();
        let mut ledger = ResourceLedger::default();
        let mut registry = BuildingRegistry::new();
        registry.add(Building::new(1, "market", Profile::Civic));
        registry.add(Building::new(2, "market", Profile::Civic));
        ledger.add(POPULATION, 5);
        ledger.add(FOOD, 10);
        ledger.add(WATER, 1);

        let report = production.tick(&mut ledger, &registry);
        assert_eq!(
            report.notices,
            vec![Notice::Drought {
                water_needed: 2,
                population_lost: 1
            }]
        );
        assert_eq!(ledger.amount_of(WATER), 1);
        assert_eq!(ledger.amount_of(POPULATION), 4);
    }

    #[test]
    fn test_no_water_upkeep_without_buildings() {
        let mut production = ProductionService::default();
        let mut ledger = ResourceLedger::default();
        let report = production.tick(&mut ledger, &BuildingRegistry::new());
        assert!(report.notices.is_empty());
    }

    #[test]
    fn test_registry_order_feeds_later_consumers() {
        let mut production = ProductionService::default();
        let mut ledger = ResourceLedger::default();
        let mut registry = BuildingRegistry::new();
        registry.add(Building::new(
            1,
            "house",
            Profile::producer(&[(POPULATION, 1)], &[(FOOD, 1)]),
        ));
        registry.add(Building::new(2, "farm", Profile::producer(&[(FOOD, 5)], &[])));
        registry.add(Building::new(
            3,
            "house",
            Profile::producer(&[(POPULATION, 1)], &[(FOOD, 1)]),
        ));
        ledger.add(WATER, 10);

        let report = production.tick(&mut ledger, &registry);
        assert_eq!(report.stalled, vec![1]);
        assert_eq!(ledger.amount_of(FOOD), 4);
        assert_eq!(ledger.amount_of(POPULATION), 1);
    }
}
