use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub rarity: i64,
    pub element: String,
    pub weapon_type: String,
    pub owned: bool,
    pub level: i64,
    pub constellation_level: i64,
    pub equipped_weapon_id: Option<String>,
}

/// Partial update from the roster screen. Absent fields are left alone;
/// `equipped_weapon_id: Some(None)` unequips.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateCharacter {
    pub owned: Option<bool>,
    pub level: Option<i64>,
    pub constellation_level: Option<i64>,
    #[serde(default, with = "double_option")]
    pub equipped_weapon_id: Option<Option<String>>,
}

mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}

#[derive(Serialize)]
pub struct CharactersUpdate {
    pub r#type: String,
    pub characters: Vec<Character>,
}
