use serde::{Serialize, Deserialize};

use crate::dto::draft_dto::PerSide;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SideScore {
    pub character_points: i64,
    pub weapon_points: i64,
    pub total_points: i64,
    pub over_budget: bool,
    pub over_weapon_budget: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct DraftScore {
    pub draft_id: String,
    pub sides: PerSide<SideScore>,
}
