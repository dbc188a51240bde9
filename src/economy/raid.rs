use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::blueprint::model::format_cost;
use crate::config::RaidConfig;
use crate::economy::ledger::ResourceLedger;
use crate::error::{GameError, Result};

pub const SHIPS: &str = "ships";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaidOutcome {
    Victory(String),
    Defeat(String),
}

pub struct RaidService {
    config: RaidConfig,
    rng: StdRng,
}

impl RaidService {
    pub fn new(config: RaidConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    /// Sends the committed ships out. They come back with the loot with
    /// probability `success_chance`, otherwise they are lost.
    pub fn execute_raid(&mut self, ledger: &mut ResourceLedger) -> Result<RaidOutcome> {
        let committed = self.config.ships_committed;
        if committed == 0 || !ledger.has(SHIPS, committed) {
            return Err(GameError::NoShips(committed.max(1)));
        }

        let chance = self.config.success_chance.clamp(0.0, 1.0);
        if self.rng.random_bool(chance) {
            for (name, amount) in &self.config.loot {
                ledger.add(name, *amount);
            }
            tracing::info!("Raid succeeded, loot {:?}", self.config.loot);
            Ok(RaidOutcome::Victory(format!(
                "The raid succeeded, the fleet returned with {}",
                format_cost(&self.config.loot)
            )))
        } else {
            ledger.consume(SHIPS, committed);
            tracing::info!("Raid failed, lost {} ships", committed);
            Ok(RaidOutcome::Defeat(format!(
                "The raid failed, {committed} ships were lost"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::model::cost;

    fn raid(success_chance: f64) -> RaidService {
        RaidService::new(
            RaidConfig {
                success_chance,
                ..Default::default()
            },
            Some(3),
        )
    }

    #[test]
    fn test_raid_without_ships() {
        let mut ledger = ResourceLedger::default();
        assert!(matches!(
            raid(1.0).execute_raid(&mut ledger),
            Err(GameError::NoShips(1))
        ));
    }

    #[test]
    fn test_certain_victory_keeps_ships() {
        let mut ledger = ResourceLedger::default();
        ledger.add(SHIPS, 2);
        let outcome = raid(1.0).execute_raid(&mut ledger).unwrap();
        assert!(matches!(outcome, RaidOutcome::Victory(_)));
        assert_eq!(ledger.amount_of(SHIPS), 2);
        assert_eq!(ledger.amount_of("gold"), 40);
        assert_eq!(ledger.amount_of("iron"), 10);
    }

    #[test]
    fn test_certain_defeat_loses_ships() {
        let mut ledger = ResourceLedger::default();
        ledger.add(SHIPS, 2);
        let mut service = RaidService::new(
            RaidConfig {
                ships_committed: 2,
                success_chance: 0.0,
                loot: cost(&[("gold", 1)]),
            },
            Some(3),
        );
        let outcome = service.execute_raid(&mut ledger).unwrap();
        assert_eq!(
            outcome,
            RaidOutcome::Defeat("The raid failed, 2 ships were lost".to_string())
        );
        assert_eq!(ledger.amount_of(SHIPS), 0);
        assert_eq!(ledger.amount_of("gold"), 0);
    }
}
