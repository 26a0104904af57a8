use serde::{Serialize, Deserialize};
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DraftRules {
    pub max_points: i64,
    pub max_weapon_points: i64,
    pub min_roster_size: u32,
    pub min_total_cost: i64,
}

impl Default for DraftRules {
    fn default() -> Self {
        Self {
            max_points: 1500,
            max_weapon_points: 500,
            min_roster_size: 4,
            min_total_cost: 0,
        }
    }
}

/// Point costs per id. Character entries are indexed by constellation
/// (C0 first), weapon entries by refinement (R1 first).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CostTable {
    pub characters: HashMap<String, Vec<i64>>,
    pub weapons: HashMap<String, Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DraftSettings {
    pub max_picks: u32,
    pub max_bans: u32,
    pub max_pre_bans: u32,
    pub turn_seconds: u32,
    pub overtime_seconds: u32,
    pub rules: DraftRules,
    pub costs: CostTable,
}

impl Default for DraftSettings {
    fn default() -> Self {
        Self {
            max_picks: 6,
            max_bans: 1,
            max_pre_bans: 3,
            turn_seconds: 45,
            overtime_seconds: 230,
            rules: DraftRules::default(),
            costs: CostTable::default(),
        }
    }
}
