use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub character_ids: Json<Vec<String>>,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct TeamsUpdate {
    pub r#type: String,
    pub teams: Vec<Team>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub character_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TeamValidation {
    pub roster_size: u32,
    pub total_cost: i64,
    pub meets_min_roster: bool,
    pub meets_min_cost: bool,
}
