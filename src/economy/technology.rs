use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::blueprint::catalog::Catalog;
use crate::economy::ledger::ResourceLedger;
use crate::error::{GameError, Result};

pub const RESEARCH_POINTS: &str = "research_points";

#[derive(Debug, Clone)]
pub struct Technology {
    pub name: &'static str,
    pub cost: u64,
    pub unlocks: &'static [&'static str],
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechInfo {
    pub cost: u64,
    pub unlocks: Vec<String>,
    pub description: String,
    pub researched: bool,
}

const TECHNOLOGIES: &[Technology] = &[
    Technology {
        name: "mining",
        cost: 5,
        unlocks: &["mine", "coal_mine"],
        description: "Deep shafts for iron and coal",
    },
    Technology {
        name: "energy",
        cost: 10,
        unlocks: &["power_plant"],
        description: "Coal fired power generation",
    },
    Technology {
        name: "science",
        cost: 10,
        unlocks: &["laboratory"],
        description: "Systematic experimentation",
    },
    Technology {
        name: "industry",
        cost: 20,
        unlocks: &["sand_quarry", "concrete_factory", "steel_mill"],
        description: "Heavy industry and refined materials",
    },
    Technology {
        name: "urban_planning",
        cost: 15,
        unlocks: &["apartment", "silo"],
        description: "Dense housing and bulk storage",
    },
    Technology {
        name: "logistics",
        cost: 15,
        unlocks: &["logistics_center", "port"],
        description: "Trade routes and shipping",
    },
];

pub struct TechTree {
    technologies: &'static [Technology],
    base: BTreeSet<String>,
    unlocked: BTreeSet<String>,
}

impl TechTree {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            technologies: TECHNOLOGIES,
            base: catalog.base_kinds().map(String::from).collect(),
            unlocked: BTreeSet::new(),
        }
    }

    fn technology(&self, name: &str) -> Option<&Technology> {
        self.technologies.iter().find(|t| t.name == name)
    }

    pub fn is_researched(&self, name: &str) -> bool {
        self.unlocked.contains(name)
    }

    pub fn is_unlocked(&self, kind: &str) -> bool {
        self.base.contains(kind)
            || self
                .technologies
                .iter()
                .any(|t| self.unlocked.contains(t.name) && t.unlocks.contains(&kind))
    }

    /// Technology whose research unlocks `kind`, if any.
    pub fn gate_of(&self, kind: &str) -> Option<&'static str> {
        self.technologies
            .iter()
            .find(|t| t.unlocks.contains(&kind))
            .map(|t| t.name)
    }

    pub fn list(&self) -> BTreeMap<String, TechInfo> {
        self.technologies
            .iter()
            .map(|t| {
                (
                    t.name.to_string(),
                    TechInfo {
                        cost: t.cost,
                        unlocks: t.unlocks.iter().map(|k| k.to_string()).collect(),
                        description: t.description.to_string(),
                        researched: self.is_researched(t.name),
                    },
                )
            })
            .collect()
    }

    /// Spends research points and returns the building kinds it unlocked.
    pub fn research(&mut self, ledger: &mut ResourceLedger, name: &str) -> Result<Vec<String>> {
        if self.is_researched(name) {
            return Err(GameError::AlreadyResearched(name.to_string()));
        }
        let tech = self
            .technology(name)
            .ok_or_else(|| GameError::UnknownTechnology(name.to_string()))?;

        if !ledger.consume(RESEARCH_POINTS, tech.cost) {
            return Err(GameError::NotEnoughResearch {
                tech: name.to_string(),
                cost: tech.cost,
            });
        }

        let unlocks: Vec<String> = tech.unlocks.iter().map(|k| k.to_string()).collect();
        self.unlocked.insert(name.to_string());
        tracing::info!("Researched {}, unlocked {:?}", name, unlocks);
        Ok(unlocks)
    }
}
