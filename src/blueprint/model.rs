use std::collections::BTreeMap;

use serde::Serialize;

/// Resource name -> quantity. Used for build costs, upkeep and yields.
pub type Cost = BTreeMap<String, u64>;

pub fn cost(lines: &[(&str, u64)]) -> Cost {
    lines
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

pub fn format_cost(cost: &Cost) -> String {
    if cost.is_empty() {
        return "nothing".to_string();
    }
    cost.iter()
        .map(|(name, value)| format!("{value} {name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Profile {
    Producer { produces: Cost, consumes: Cost },
    Storage { capacity: Cost },
    Civic,
}

impl Profile {
    pub fn producer(produces: &[(&str, u64)], consumes: &[(&str, u64)]) -> Self {
        Profile::Producer {
            produces: cost(produces),
            consumes: cost(consumes),
        }
    }

    pub fn storage(capacity: &[(&str, u64)]) -> Self {
        Profile::Storage {
            capacity: cost(capacity),
        }
    }
}

pub struct Blueprint {
    pub kind: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub cost: Cost,
    /// Technology gating this kind; `None` means always available.
    pub requires: Option<&'static str>,
    pub profile: Profile,
}
