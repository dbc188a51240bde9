use std::collections::BTreeMap;

use crate::blueprint::model::{Blueprint, Cost, Profile, cost};

pub struct Catalog {
    blueprints: Vec<Blueprint>,
}

impl Catalog {
    pub fn new(blueprints: Vec<Blueprint>) -> Self {
        Self { blueprints }
    }

    pub fn get(&self, kind: &str) -> Option<&Blueprint> {
        self.blueprints.iter().find(|b| b.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Blueprint> {
        self.blueprints.iter()
    }

    /// Base kinds are the ones no technology gates.
    pub fn base_kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.blueprints
            .iter()
            .filter(|b| b.requires.is_none())
            .map(|b| b.kind)
    }

    pub fn by_category(&self) -> BTreeMap<String, BTreeMap<String, Cost>> {
        let mut view: BTreeMap<String, BTreeMap<String, Cost>> = BTreeMap::new();
        for b in &self.blueprints {
            view.entry(b.category.to_string())
                .or_default()
                .insert(b.kind.to_string(), b.cost.clone());
        }
        view
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(standard_blueprints())
    }
}

fn standard_blueprints() -> Vec<Blueprint> {
    vec![
        Blueprint {
            kind: "farm",
            category: "resources",
            description: "Grows food for the population",
            cost: cost(&[("wood", 10), ("stone", 5)]),
            requires: None,
            profile: Profile::producer(&[("food", 5)], &[]),
        },
        Blueprint {
            kind: "lumber_mill",
            category: "resources",
            description: "Cuts wood",
            cost: cost(&[("wood", 5), ("stone", 5)]),
            requires: None,
            profile: Profile::producer(&[("wood", 4)], &[]),
        },
        Blueprint {
            kind: "quarry",
            category: "resources",
            description: "Extracts stone",
            cost: cost(&[("wood", 5), ("stone", 10)]),
            requires: None,
            profile: Profile::producer(&[("stone", 3)], &[]),
        },
        Blueprint {
            kind: "well",
            category: "resources",
            description: "Draws water for the city",
            cost: cost(&[("wood", 8), ("stone", 4)]),
            requires: None,
            profile: Profile::producer(&[("water", 6)], &[]),
        },
        Blueprint {
            kind: "house",
            category: "housing",
            description: "Grows the population while fed",
            cost: cost(&[("wood", 5), ("stone", 2)]),
            requires: None,
            profile: Profile::producer(&[("population", 1)], &[("food", 1)]),
        },
        Blueprint {
            kind: "library",
            category: "science",
            description: "Generates research points",
            cost: cost(&[("wood", 15), ("stone", 10)]),
            requires: None,
            profile: Profile::producer(&[("research_points", 1)], &[]),
        },
        Blueprint {
            kind: "warehouse",
            category: "storage",
            description: "Raises storage capacity for raw materials",
            cost: cost(&[("wood", 50), ("stone", 50)]),
            requires: None,
            profile: Profile::storage(&[
                ("wood", 200),
                ("stone", 200),
                ("food", 200),
                ("iron", 100),
                ("coal", 100),
                ("sand", 200),
                ("concrete", 100),
            ]),
        },
        Blueprint {
            kind: "market",
            category: "commerce",
            description: "Local market square",
            cost: cost(&[("wood", 10), ("stone", 10)]),
            requires: None,
            profile: Profile::Civic,
        },
        Blueprint {
            kind: "mine",
            category: "resources",
            description: "Digs iron ore",
            cost: cost(&[("wood", 5), ("stone", 10), ("iron", 5)]),
            requires: Some("mining"),
            profile: Profile::producer(&[("iron", 2)], &[]),
        },
        Blueprint {
            kind: "coal_mine",
            category: "resources",
            description: "Digs coal",
            cost: cost(&[("stone", 10), ("iron", 10)]),
            requires: Some("mining"),
            profile: Profile::producer(&[("coal", 8)], &[]),
        },
        Blueprint {
            kind: "power_plant",
            category: "industry",
            description: "Burns coal into energy",
            cost: cost(&[("stone", 10), ("iron", 10)]),
            requires: Some("energy"),
            profile: Profile::producer(&[("energy", 10)], &[("coal", 2)]),
        },
        Blueprint {
            kind: "laboratory",
            category: "science",
            description: "Powered research facility",
            cost: cost(&[("stone", 20), ("iron", 10), ("energy", 5)]),
            requires: Some("science"),
            profile: Profile::producer(&[("research_points", 3)], &[("energy", 2)]),
        },
        Blueprint {
            kind: "sand_quarry",
            category: "resources",
            description: "Mechanised sand extraction",
            cost: cost(&[("stone", 15), ("iron", 5), ("energy", 10)]),
            requires: Some("industry"),
            profile: Profile::producer(&[("sand", 5)], &[("energy", 1)]),
        },
        Blueprint {
            kind: "concrete_factory",
            category: "industry",
            description: "Turns sand into concrete",
            cost: cost(&[("stone", 20), ("iron", 15), ("energy", 15)]),
            requires: Some("industry"),
            profile: Profile::producer(&[("concrete", 2)], &[("sand", 2), ("energy", 3)]),
        },
        Blueprint {
            kind: "steel_mill",
            category: "industry",
            description: "Smelts iron and coal into steel",
            cost: cost(&[("stone", 25), ("iron", 20), ("energy", 10)]),
            requires: Some("industry"),
            profile: Profile::producer(
                &[("steel", 1)],
                &[("iron", 1), ("coal", 1), ("energy", 5)],
            ),
        },
        Blueprint {
            kind: "apartment",
            category: "housing",
            description: "Dense housing, needs power",
            cost: cost(&[("wood", 15), ("stone", 10), ("concrete", 5)]),
            requires: Some("urban_planning"),
            profile: Profile::producer(&[("population", 3)], &[("food", 2), ("energy", 1)]),
        },
        Blueprint {
            kind: "silo",
            category: "storage",
            description: "Raises food and water capacity",
            cost: cost(&[("wood", 30), ("stone", 40)]),
            requires: Some("urban_planning"),
            profile: Profile::storage(&[("food", 300), ("water", 200)]),
        },
        Blueprint {
            kind: "logistics_center",
            category: "commerce",
            description: "Opens trade routes to other cities",
            cost: cost(&[("wood", 40), ("stone", 40), ("iron", 20)]),
            requires: Some("logistics"),
            profile: Profile::Civic,
        },
        Blueprint {
            kind: "port",
            category: "commerce",
            description: "Harbour where ships are built",
            cost: cost(&[("wood", 60), ("stone", 30), ("iron", 20)]),
            requires: Some("logistics"),
            profile: Profile::Civic,
        },
    ]
}
