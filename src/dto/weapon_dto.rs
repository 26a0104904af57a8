use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub rarity: i64,
    pub weapon_type: String,
    pub owned: bool,
    pub level: i64,
    pub refinement_level: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateWeapon {
    pub owned: Option<bool>,
    pub level: Option<i64>,
    pub refinement_level: Option<i64>,
}
