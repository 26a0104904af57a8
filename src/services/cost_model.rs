use crate::dto::settings_dto::{CostTable, DraftRules, DraftSettings};

pub trait CostModel {
    fn cost_of_character(&self, character_id: &str, constellation_level: i64) -> i64;
    fn cost_of_weapon(&self, weapon_id: &str, refinement_level: i64) -> i64;
    fn rules(&self) -> &DraftRules;
}

/// Looks up `levels[level]`, clamping past the end. Unknown ids cost nothing.
fn lookup(table: &std::collections::HashMap<String, Vec<i64>>, id: &str, level: usize) -> i64 {
    match table.get(id) {
        Some(levels) if !levels.is_empty() => levels[level.min(levels.len() - 1)],
        _ => 0,
    }
}

pub struct SettingsCostModel<'a> {
    costs: &'a CostTable,
    rules: &'a DraftRules,
}

impl<'a> SettingsCostModel<'a> {
    pub fn new(settings: &'a DraftSettings) -> Self {
        Self { costs: &settings.costs, rules: &settings.rules }
    }
}

impl CostModel for SettingsCostModel<'_> {
    fn cost_of_character(&self, character_id: &str, constellation_level: i64) -> i64 {
        lookup(&self.costs.characters, character_id, constellation_level.max(0) as usize)
    }

    fn cost_of_weapon(&self, weapon_id: &str, refinement_level: i64) -> i64 {
        // R1 is the first entry.
        lookup(&self.costs.weapons, weapon_id, (refinement_level.max(1) - 1) as usize)
    }

    fn rules(&self) -> &DraftRules {
        self.rules
    }
}
