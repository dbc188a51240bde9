use std::fmt;

use serde::Serialize;

use crate::blueprint::catalog::Catalog;
use crate::blueprint::model::{Cost, Profile};
use crate::error::{GameError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct Building {
    pub id: u32,
    pub kind: String,
    pub level: u32,
    pub profile: Profile,
}

impl Building {
    pub fn new(id: u32, kind: impl Into<String>, profile: Profile) -> Self {
        Self {
            id,
            kind: kind.into(),
            level: 1,
            profile,
        }
    }

    pub fn is_producer(&self) -> bool {
        matches!(self.profile, Profile::Producer { .. })
    }

    /// Yields grow by half the base per level above the first, truncated.
    pub fn production(&self) -> Cost {
        match &self.profile {
            Profile::Producer { produces, .. } => scale(produces, |base| {
                base * (u64::from(self.level) + 1) / 2
            }),
            _ => Cost::new(),
        }
    }

    /// Inputs grow by a fifth of the base per level above the first, truncated.
    pub fn consumption(&self) -> Cost {
        match &self.profile {
            Profile::Producer { consumes, .. } => scale(consumes, |base| {
                base * (u64::from(self.level) + 4) / 5
            }),
            _ => Cost::new(),
        }
    }

    pub fn capacity_at(&self, level: u32) -> Option<Cost> {
        match &self.profile {
            Profile::Storage { capacity } => {
                Some(scale(capacity, |base| base * u64::from(level)))
            }
            _ => None,
        }
    }

    pub fn capacity(&self) -> Option<Cost> {
        self.capacity_at(self.level)
    }
}

fn scale(base: &Cost, f: impl Fn(u64) -> u64) -> Cost {
    base.iter()
        .map(|(name, value)| (name.clone(), f(*value)))
        .collect()
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} [{}] lvl {}", self.id, self.kind, self.level)
    }
}

/// Creates buildings from catalog kinds, handing out sequential ids.
pub struct BuildingFactory {
    catalog: Catalog,
    last_id: u32,
}

impl BuildingFactory {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            last_id: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn create(&mut self, kind: &str) -> Result<Building> {
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(GameError::EmptyKind);
        }
        let blueprint = self
            .catalog
            .get(kind)
            .ok_or_else(|| GameError::UnknownKind(kind.to_string()))?;
        self.last_id += 1;
        Ok(Building::new(self.last_id, kind, blueprint.profile.clone()))
    }
}

impl Default for BuildingFactory {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}

/// Append-only store; buildings are never removed once built.
#[derive(Debug, Default)]
pub struct BuildingRegistry {
    buildings: Vec<Building>,
}

impl BuildingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, building: Building) {
        tracing::debug!("Registered building {}", building);
        self.buildings.push(building);
    }

    pub fn all(&self) -> &[Building] {
        &self.buildings
    }

    pub fn get(&self, id: u32) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == id)
    }

    pub fn by_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Building> + 'a {
        self.buildings.iter().filter(move |b| b.kind == kind)
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.by_kind(kind).next().is_some()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }
}
