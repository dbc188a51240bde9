use crate::blueprint::catalog::Catalog;
use crate::blueprint::model::{Cost, cost};
use crate::economy::building::{Building, BuildingFactory, BuildingRegistry};
use crate::economy::ledger::ResourceLedger;
use crate::error::{GameError, Result};

/// Upgrading from `level` costs 20 wood, 20 stone and 5 iron per level.
pub fn upgrade_cost(level: u32) -> Cost {
    let level = u64::from(level);
    cost(&[("wood", 20 * level), ("stone", 20 * level), ("iron", 5 * level)])
}

pub struct ConstructionService {
    factory: BuildingFactory,
}

impl ConstructionService {
    pub fn new(factory: BuildingFactory) -> Self {
        Self { factory }
    }

    pub fn catalog(&self) -> &Catalog {
        self.factory.catalog()
    }

    pub fn can_afford(&self, ledger: &ResourceLedger, cost: &Cost) -> bool {
        ledger.can_afford(cost)
    }

    pub fn build(
        &mut self,
        ledger: &mut ResourceLedger,
        registry: &mut BuildingRegistry,
        cost: &Cost,
        kind: &str,
    ) -> Result<Building> {
        if !self.can_afford(ledger, cost) {
            return Err(GameError::InsufficientResources {
                required: cost.clone(),
            });
        }
        // Resolve the kind before paying so an unknown kind costs nothing.
        let building = self.factory.create(kind)?;
        ledger.spend(cost)?;

        if let Some(capacity) = building.capacity() {
            for (name, amount) in &capacity {
                ledger.increase_capacity(name, *amount);
            }
        }

        tracing::info!("Built {}", building);
        registry.add(building.clone());
        Ok(building)
    }

    pub fn upgrade(
        &mut self,
        ledger: &mut ResourceLedger,
        registry: &mut BuildingRegistry,
        building_id: u32,
    ) -> Result<Building> {
        let building = registry
            .get_mut(building_id)
            .ok_or(GameError::BuildingNotFound(building_id))?;

        let old_level = building.level;
        ledger.spend(&upgrade_cost(old_level))?;
        building.level += 1;

        if let (Some(before), Some(after)) = (
            building.capacity_at(old_level),
            building.capacity_at(building.level),
        ) {
            for (name, amount) in &after {
                let delta = amount - before.get(name).copied().unwrap_or(0);
                ledger.increase_capacity(name, delta);
            }
        }

        tracing::info!("Upgraded {}", building);
        Ok(building.clone())
    }
}

impl Default for ConstructionService {
    fn default() -> Self {
        Self::new(BuildingFactory::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ConstructionService, ResourceLedger, BuildingRegistry) {
        (
            ConstructionService::default(),
            ResourceLedger::default(),
            BuildingRegistry::new(),
        )
    }

    #[test]
    fn test_build_deducts_and_registers() {
        let (mut construction, mut ledger, mut registry) = setup();
        ledger.add("wood", 12);
        ledger.add("stone", 5);
        let farm_cost = cost(&[("wood", 10), ("stone", 5)]);

        assert!(construction.can_afford(&ledger, &farm_cost));
        let farm = construction
            .build(&mut ledger, &mut registry, &farm_cost, "farm")
            .unwrap();

        assert_eq!(farm.id, 1);
        assert_eq!(ledger.amount_of("wood"), 2);
        assert_eq!(ledger.amount_of("stone"), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_build_unaffordable_mutates_nothing() {
        let (mut construction, mut ledger, mut registry) = setup();
        ledger.add("wood", 50);
        let result = construction.build(
            &mut ledger,
            &mut registry,
            &cost(&[("wood", 50), ("stone", 50)]),
            "warehouse",
        );
        assert!(matches!(result, Err(GameError::InsufficientResources { .. })));
        assert_eq!(ledger.amount_of("wood"), 50);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_build_unknown_kind_is_free() {
        let (mut construction, mut ledger, mut registry) = setup();
        ledger.add("wood", 5);
        let result = construction.build(&mut ledger, &mut registry, &cost(&[("wood", 5)]), "castle");
        assert!(matches!(result, Err(GameError::UnknownKind(_))));
        assert_eq!(ledger.amount_of("wood"), 5);
    }

    #[test]
    fn test_upgrade_missing_building() {
        let (mut construction, mut ledger, mut registry) = setup();
        assert!(matches!(
            construction.upgrade(&mut ledger, &mut registry, 42),
            Err(GameError::BuildingNotFound(42))
        ));
    }

    #[test]
    fn test_upgrade_unaffordable_reports_cost() {
        let (mut construction, mut ledger, mut registry) = setup();
        ledger.add("wood", 10);
        ledger.add("stone", 5);
        let farm_cost = cost(&[("wood", 10), ("stone", 5)]);
        construction
            .build(&mut ledger, &mut registry, &farm_cost, "farm")
            .unwrap();

        let err = construction
            .upgrade(&mut ledger, &mut registry, 1)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "insufficient resources, requires 5 iron, 20 stone, 20 wood"
        );
        assert_eq!(registry.get(1).map(|b| b.level), Some(1));
    }

    #[test]
    fn test_upgrade_applies_capacity_delta_once() {
        let (mut construction, mut ledger, mut registry) = setup();
        ledger.add("wood", 200);
        ledger.add("stone", 200);
        ledger.add("iron", 20);
        construction
            .build(&mut ledger, &mut registry, &cost(&[("food", 0)]), "silo")
            .unwrap();
        assert_eq!(ledger.capacity_of("food"), 500);

        construction.upgrade(&mut ledger, &mut registry, 1).unwrap();
        assert_eq!(ledger.capacity_of("food"), 800);
        assert_eq!(ledger.capacity_of("water"), 600);

        construction.upgrade(&mut ledger, &mut registry, 1).unwrap();
        assert_eq!(registry.get(1).map(|b| b.level), Some(3));
        assert_eq!(ledger.capacity_of("food"), 1100);
        assert_eq!(ledger.amount_of("wood"), 200 - 20 - 40);
    }
}
